//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::vehicle::VehicleRepository;

use super::booking_repository::SeaOrmBookingRepository;
use super::vehicle_repository::SeaOrmVehicleRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
pub struct SeaOrmRepositoryProvider {
    vehicles: SeaOrmVehicleRepository,
    bookings: SeaOrmBookingRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            vehicles: SeaOrmVehicleRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn vehicles(&self) -> &dyn VehicleRepository {
        &self.vehicles
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }
}
