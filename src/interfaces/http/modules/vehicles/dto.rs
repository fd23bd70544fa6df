//! Vehicle DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::application::Availability;
use crate::domain::Vehicle;

/// Request to register a new vehicle
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVehicleRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    /// Load capacity in kilograms
    #[validate(range(min = 1, max = 10000, message = "must be between 1 and 10000"))]
    pub capacity_kg: i32,
    /// Number of tyres
    #[validate(range(min = 2, max = 20, message = "must be between 2 and 20"))]
    pub tyres: i32,
}

/// Vehicle details in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VehicleDto {
    pub id: Uuid,
    pub name: String,
    pub capacity_kg: i32,
    pub tyres: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl VehicleDto {
    pub fn from_domain(v: Vehicle) -> Self {
        Self {
            id: v.id,
            name: v.name,
            capacity_kg: v.capacity_kg,
            tyres: v.tyres,
            is_active: v.is_active,
            created_at: v.created_at,
        }
    }
}

/// Availability search query parameters
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AvailabilityParams {
    /// Minimum load capacity in kilograms
    pub capacity_required: i32,
    /// Origin pincode (6-digit numeric string)
    pub from_pincode: String,
    /// Destination pincode (6-digit numeric string)
    pub to_pincode: String,
    /// Window start (ISO 8601)
    pub start_time: String,
}

/// Availability search result
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityDto {
    /// Vehicles free for the whole window, newest first
    pub vehicles: Vec<VehicleDto>,
    pub estimated_ride_duration_hours: i64,
    /// Window start the search was evaluated against
    pub start_time: DateTime<Utc>,
    /// Window end (start + estimated duration)
    pub end_time: DateTime<Utc>,
}

impl AvailabilityDto {
    pub fn from_domain(a: Availability) -> Self {
        Self {
            vehicles: a.vehicles.into_iter().map(VehicleDto::from_domain).collect(),
            estimated_ride_duration_hours: a.estimated_ride_duration_hours,
            start_time: a.start_time,
            end_time: a.end_time,
        }
    }
}
