//! Vehicle HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use uuid::Uuid;

use crate::application::{AvailabilitySearch, BookingService, FleetService};
use crate::domain::DomainError;
use crate::interfaces::http::common::{status_for, ApiResponse, ValidatedJson};

use super::dto::*;

/// Application state for vehicle handlers.
#[derive(Clone)]
pub struct VehicleAppState {
    pub fleet_service: Arc<FleetService>,
    pub booking_service: Arc<BookingService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered", body = ApiResponse<VehicleDto>),
        (status = 422, description = "Invalid name, capacity or tyre count")
    )
)]
pub async fn register_vehicle(
    State(state): State<VehicleAppState>,
    ValidatedJson(request): ValidatedJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleDto>>), (StatusCode, Json<ApiResponse<VehicleDto>>)> {
    match state
        .fleet_service
        .register_vehicle(request.name, request.capacity_kg, request.tyres)
        .await
    {
        Ok(vehicle) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(VehicleDto::from_domain(vehicle))),
        )),
        Err(e) => Err((status_for(&e), Json(ApiResponse::error(e.to_string())))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    responses(
        (status = 200, description = "Active vehicles, newest first", body = ApiResponse<Vec<VehicleDto>>)
    )
)]
pub async fn list_vehicles(
    State(state): State<VehicleAppState>,
) -> Result<Json<ApiResponse<Vec<VehicleDto>>>, (StatusCode, Json<ApiResponse<Vec<VehicleDto>>>)> {
    match state.fleet_service.list_vehicles().await {
        Ok(vehicles) => Ok(Json(ApiResponse::success(
            vehicles.into_iter().map(VehicleDto::from_domain).collect(),
        ))),
        Err(e) => Err((status_for(&e), Json(ApiResponse::error(e.to_string())))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/available",
    tag = "Vehicles",
    params(AvailabilityParams),
    responses(
        (status = 200, description = "Vehicles free for the window", body = ApiResponse<AvailabilityDto>),
        (status = 400, description = "Invalid capacity, pincode or start time")
    )
)]
pub async fn search_available(
    State(state): State<VehicleAppState>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<ApiResponse<AvailabilityDto>>, (StatusCode, Json<ApiResponse<AvailabilityDto>>)> {
    let start_time = DateTime::parse_from_rfc3339(&params.start_time)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| {
            let err = DomainError::InvalidStartTime(e.to_string());
            (status_for(&err), Json(ApiResponse::error(err.to_string())))
        })?;

    let search = AvailabilitySearch {
        capacity_required: params.capacity_required,
        from_pincode: params.from_pincode,
        to_pincode: params.to_pincode,
        start_time,
    };

    match state.booking_service.search_available(search).await {
        Ok(availability) => Ok(Json(ApiResponse::success(AvailabilityDto::from_domain(
            availability,
        )))),
        Err(e) => Err((status_for(&e), Json(ApiResponse::error(e.to_string())))),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{vehicle_id}",
    tag = "Vehicles",
    params(("vehicle_id" = Uuid, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle deactivated", body = ApiResponse<VehicleDto>),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn deactivate_vehicle(
    State(state): State<VehicleAppState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleDto>>, (StatusCode, Json<ApiResponse<VehicleDto>>)> {
    match state.fleet_service.deactivate_vehicle(vehicle_id).await {
        Ok(vehicle) => Ok(Json(ApiResponse::success(VehicleDto::from_domain(vehicle)))),
        Err(e) => Err((status_for(&e), Json(ApiResponse::error(e.to_string())))),
    }
}
