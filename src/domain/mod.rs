//! Core business entities, pure functions and repository traits

pub mod booking;
pub mod error;
pub mod repositories;
pub mod scheduling;
pub mod vehicle;

// Re-export commonly used types
pub use booking::{Booking, BookingQuery, BookingRepository, BookingStatus, InsertOutcome};
pub use error::{ConflictingBooking, DomainError, DomainResult};
pub use repositories::RepositoryProvider;
pub use scheduling::{estimate_ride_duration, intervals_overlap};
pub use vehicle::{Vehicle, VehicleRepository};
