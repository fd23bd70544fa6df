//! Booking HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use uuid::Uuid;

use crate::application::{BookingService, CreateBookingCommand};
use crate::domain::{BookingQuery, BookingStatus, DomainError};
use crate::interfaces::http::common::{status_for, ApiResponse, ValidatedJson};

use super::dto::*;

/// Application state for booking handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub booking_service: Arc<BookingService>,
}

/// Create-booking error body: conflict responses carry the colliding set,
/// all other failures just the message.
type CreateBookingError = (StatusCode, Json<ApiResponse<ConflictDetails>>);

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Vehicle booked", body = ApiResponse<BookingDto>),
        (status = 404, description = "Vehicle not found"),
        (status = 400, description = "Vehicle inactive, invalid pincode or start time"),
        (status = 409, description = "Overlapping active booking", body = ApiResponse<ConflictDetails>)
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingDto>>), CreateBookingError> {
    let start_time = DateTime::parse_from_rfc3339(&request.start_time)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| {
            let err = DomainError::InvalidStartTime(e.to_string());
            (status_for(&err), Json(ApiResponse::error(err.to_string())))
        })?;

    let cmd = CreateBookingCommand {
        vehicle_id: request.vehicle_id,
        from_pincode: request.from_pincode,
        to_pincode: request.to_pincode,
        start_time,
        customer_id: request.customer_id,
    };

    match state.booking_service.create_booking(cmd).await {
        Ok(booking) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(BookingDto::from_domain(booking))),
        )),
        Err(DomainError::BookingConflict { vehicle_id, conflicts }) => Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error_with_data(
                "Vehicle is already booked for an overlapping time slot",
                ConflictDetails::new(vehicle_id, conflicts),
            )),
        )),
        Err(e) => Err((status_for(&e), Json(ApiResponse::error(e.to_string())))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    params(BookingFilter),
    responses(
        (status = 200, description = "Bookings, newest first", body = ApiResponse<Vec<BookingDto>>),
        (status = 400, description = "Unknown status filter")
    )
)]
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    Query(filter): Query<BookingFilter>,
) -> Result<Json<ApiResponse<Vec<BookingDto>>>, (StatusCode, Json<ApiResponse<Vec<BookingDto>>>)> {
    let status = match filter.status.as_deref() {
        None => None,
        Some(s) => match BookingStatus::parse(s) {
            Some(status) => Some(status),
            None => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(
                        "status must be one of: active, completed, cancelled",
                    )),
                ));
            }
        },
    };

    let query = BookingQuery {
        customer_id: filter.customer_id,
        status,
    };

    match state.booking_service.list_bookings(query).await {
        Ok(bookings) => Ok(Json(ApiResponse::success(
            bookings.into_iter().map(BookingDto::from_domain).collect(),
        ))),
        Err(e) => Err((status_for(&e), Json(ApiResponse::error(e.to_string())))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    tag = "Bookings",
    params(("booking_id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    match state.booking_service.get_booking(booking_id).await {
        Ok(booking) => Ok(Json(ApiResponse::success(BookingDto::from_domain(booking)))),
        Err(e) => Err((status_for(&e), Json(ApiResponse::error(e.to_string())))),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{booking_id}",
    tag = "Bookings",
    params(("booking_id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found"),
        (status = 400, description = "Already cancelled or completed")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    match state.booking_service.cancel_booking(booking_id).await {
        Ok(booking) => Ok(Json(ApiResponse::success(BookingDto::from_domain(booking)))),
        Err(e) => Err((status_for(&e), Json(ApiResponse::error(e.to_string())))),
    }
}
