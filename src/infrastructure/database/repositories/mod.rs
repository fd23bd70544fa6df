//! SeaORM repository implementations

pub mod booking_repository;
pub mod repository_provider;
pub mod vehicle_repository;

pub use booking_repository::SeaOrmBookingRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use vehicle_repository::SeaOrmVehicleRepository;
