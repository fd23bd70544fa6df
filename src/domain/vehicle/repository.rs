//! Vehicle repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Vehicle;
use crate::domain::DomainResult;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Persist a newly registered vehicle
    async fn save(&self, vehicle: Vehicle) -> DomainResult<()>;

    /// Find vehicle by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Vehicle>>;

    /// All active vehicles, newest first
    async fn find_active(&self) -> DomainResult<Vec<Vehicle>>;

    /// Active vehicles with at least the given capacity, newest first
    async fn find_available_candidates(&self, min_capacity_kg: i32) -> DomainResult<Vec<Vehicle>>;

    /// Toggle the active flag. Fails if the vehicle does not exist.
    async fn set_active(&self, id: Uuid, active: bool) -> DomainResult<()>;
}
