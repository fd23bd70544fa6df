//! Fleet service
//!
//! Vehicle registration, listing and soft-deletion. Shape validation of the
//! incoming fields (name length, capacity and tyre ranges) happens at the
//! HTTP boundary; this layer owns the lifecycle.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, Vehicle};

pub struct FleetService {
    repos: Arc<dyn RepositoryProvider>,
}

impl FleetService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn register_vehicle(
        &self,
        name: String,
        capacity_kg: i32,
        tyres: i32,
    ) -> DomainResult<Vehicle> {
        let vehicle = Vehicle::new(name.trim(), capacity_kg, tyres);
        self.repos.vehicles().save(vehicle.clone()).await?;
        info!(vehicle_id = %vehicle.id, name = %vehicle.name, "Vehicle registered");
        Ok(vehicle)
    }

    /// Active vehicles, newest first.
    pub async fn list_vehicles(&self) -> DomainResult<Vec<Vehicle>> {
        self.repos.vehicles().find_active().await
    }

    /// Soft-delete: the vehicle stops accepting bookings but existing
    /// bookings keep referring to it.
    pub async fn deactivate_vehicle(&self, id: Uuid) -> DomainResult<Vehicle> {
        let mut vehicle = self
            .repos
            .vehicles()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Vehicle",
                field: "id",
                value: id.to_string(),
            })?;

        vehicle.deactivate();
        self.repos.vehicles().set_active(id, false).await?;
        info!(vehicle_id = %id, "Vehicle deactivated");
        Ok(vehicle)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    fn service() -> FleetService {
        FleetService::new(Arc::new(InMemoryRepositoryProvider::new()))
    }

    #[tokio::test]
    async fn register_trims_name_and_lists_newest_first() {
        let svc = service();
        let first = svc.register_vehicle("  Tata Ace  ".into(), 750, 4).await.unwrap();
        assert_eq!(first.name, "Tata Ace");

        let second = svc.register_vehicle("Eicher Pro".into(), 1000, 6).await.unwrap();

        let listed = svc.list_vehicles().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn deactivated_vehicle_disappears_from_listing() {
        let svc = service();
        let v = svc.register_vehicle("Tata Ace".into(), 750, 4).await.unwrap();

        let deactivated = svc.deactivate_vehicle(v.id).await.unwrap();
        assert!(!deactivated.is_active);
        assert!(svc.list_vehicles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deactivate_unknown_vehicle_is_not_found() {
        let svc = service();
        let err = svc.deactivate_vehicle(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Vehicle", .. }));
    }
}
