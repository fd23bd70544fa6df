//! Domain errors

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// A booking that collides with a requested window.
///
/// Carried inside [`DomainError::BookingConflict`] so callers can show
/// exactly which bookings block the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictingBooking {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Vehicle {0} is not available for booking")]
    VehicleInactive(Uuid),

    #[error("Invalid pincode: {0}")]
    InvalidPincode(String),

    #[error("Invalid start time: {0}")]
    InvalidStartTime(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Vehicle {vehicle_id} is already booked for an overlapping time slot")]
    BookingConflict {
        vehicle_id: Uuid,
        conflicts: Vec<ConflictingBooking>,
    },

    #[error("Booking {0} is already cancelled")]
    AlreadyCancelled(Uuid),

    #[error("Cannot cancel a completed booking ({0})")]
    AlreadyCompleted(Uuid),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
