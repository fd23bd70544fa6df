//! Common HTTP types

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope.
///
/// All REST endpoints wrap their payload in this structure.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload; `null` on failure (except conflict responses, which carry
    /// the colliding bookings here)
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Failure response that still carries structured detail, e.g. the
    /// colliding set of a booking conflict.
    pub fn error_with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: false,
            data: Some(data),
            error: Some(message.into()),
        }
    }
}

/// HTTP status for a domain error.
pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::BookingConflict { .. } => StatusCode::CONFLICT,
        DomainError::VehicleInactive(_)
        | DomainError::InvalidPincode(_)
        | DomainError::InvalidStartTime(_)
        | DomainError::Validation(_)
        | DomainError::AlreadyCancelled(_)
        | DomainError::AlreadyCompleted(_) => StatusCode::BAD_REQUEST,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ── Tests ──────────────────────────────────────────────────────
