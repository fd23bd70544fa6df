//! Booking DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::error::ConflictingBooking;
use crate::domain::Booking;

/// Request to book a vehicle
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    /// Vehicle to book
    pub vehicle_id: Uuid,
    /// Origin pincode (6-digit numeric string)
    #[validate(length(equal = 6, message = "must be exactly 6 digits"))]
    pub from_pincode: String,
    /// Destination pincode (6-digit numeric string)
    #[validate(length(equal = 6, message = "must be exactly 6 digits"))]
    pub to_pincode: String,
    /// Window start (ISO 8601)
    pub start_time: String,
    /// Opaque customer identifier
    #[validate(length(min = 1, message = "must not be empty"))]
    pub customer_id: String,
}

/// Booking details in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingDto {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub customer_id: String,
    pub status: String,
    pub estimated_ride_duration_hours: i64,
    pub created_at: DateTime<Utc>,
}

impl BookingDto {
    pub fn from_domain(b: Booking) -> Self {
        Self {
            id: b.id,
            vehicle_id: b.vehicle_id,
            from_pincode: b.from_pincode,
            to_pincode: b.to_pincode,
            start_time: b.start_time,
            end_time: b.end_time,
            customer_id: b.customer_id,
            status: b.status.as_str().to_string(),
            estimated_ride_duration_hours: b.estimated_ride_duration_hours,
            created_at: b.created_at,
        }
    }
}

/// Booking listing filters
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct BookingFilter {
    /// Only bookings of this customer
    pub customer_id: Option<String>,
    /// Only bookings with this status (active, completed, cancelled)
    pub status: Option<String>,
}

/// A booking blocking a requested window
#[derive(Debug, Serialize, ToSchema)]
pub struct ConflictingBookingDto {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Detail payload of a 409 conflict response
#[derive(Debug, Serialize, ToSchema)]
pub struct ConflictDetails {
    pub vehicle_id: Uuid,
    pub conflicting_bookings: Vec<ConflictingBookingDto>,
}

impl ConflictDetails {
    pub fn new(vehicle_id: Uuid, conflicts: Vec<ConflictingBooking>) -> Self {
        Self {
            vehicle_id,
            conflicting_bookings: conflicts
                .into_iter()
                .map(|c| ConflictingBookingDto {
                    id: c.id,
                    start_time: c.start_time,
                    end_time: c.end_time,
                })
                .collect(),
        }
    }
}
