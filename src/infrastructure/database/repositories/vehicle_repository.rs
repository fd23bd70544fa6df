//! SeaORM implementation of VehicleRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::vehicle::{Vehicle, VehicleRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::vehicle;

pub struct SeaOrmVehicleRepository {
    db: DatabaseConnection,
}

impl SeaOrmVehicleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: vehicle::Model) -> Vehicle {
    Vehicle {
        id: m.id,
        name: m.name,
        capacity_kg: m.capacity_kg,
        tyres: m.tyres,
        is_active: m.is_active,
        created_at: m.created_at,
    }
}

fn domain_to_active_model(v: &Vehicle) -> vehicle::ActiveModel {
    vehicle::ActiveModel {
        id: Set(v.id),
        name: Set(v.name.clone()),
        capacity_kg: Set(v.capacity_kg),
        tyres: Set(v.tyres),
        is_active: Set(v.is_active),
        created_at: Set(v.created_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── VehicleRepository impl ──────────────────────────────────────

#[async_trait]
impl VehicleRepository for SeaOrmVehicleRepository {
    async fn save(&self, v: Vehicle) -> DomainResult<()> {
        debug!("Saving vehicle: {}", v.id);
        domain_to_active_model(&v).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Vehicle>> {
        let model = vehicle::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_active(&self) -> DomainResult<Vec<Vehicle>> {
        let models = vehicle::Entity::find()
            .filter(vehicle::Column::IsActive.eq(true))
            .order_by_desc(vehicle::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_available_candidates(&self, min_capacity_kg: i32) -> DomainResult<Vec<Vehicle>> {
        let models = vehicle::Entity::find()
            .filter(vehicle::Column::IsActive.eq(true))
            .filter(vehicle::Column::CapacityKg.gte(min_capacity_kg))
            .order_by_desc(vehicle::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> DomainResult<()> {
        debug!("Setting vehicle {} active={}", id, active);

        let existing = vehicle::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Vehicle",
                field: "id",
                value: id.to_string(),
            });
        }

        let model = vehicle::ActiveModel {
            id: Set(id),
            is_active: Set(active),
            ..Default::default()
        };
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
