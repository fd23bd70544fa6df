//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    routing::{delete, get},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{BookingService, FleetService};
use crate::interfaces::http::common::ApiResponse;

use super::modules::{bookings, health, vehicles};

/// Unified state for all routes. Axum extracts the specific handler state
/// via `FromRef`.
#[derive(Clone)]
pub struct AppRouterState {
    pub fleet_service: Arc<FleetService>,
    pub booking_service: Arc<BookingService>,
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<AppRouterState> for vehicles::VehicleAppState {
    fn from_ref(s: &AppRouterState) -> Self {
        vehicles::VehicleAppState {
            fleet_service: Arc::clone(&s.fleet_service),
            booking_service: Arc::clone(&s.booking_service),
        }
    }
}

impl FromRef<AppRouterState> for bookings::BookingAppState {
    fn from_ref(s: &AppRouterState) -> Self {
        bookings::BookingAppState {
            booking_service: Arc::clone(&s.booking_service),
        }
    }
}

impl FromRef<AppRouterState> for health::HealthState {
    fn from_ref(s: &AppRouterState) -> Self {
        health::HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Vehicles
        vehicles::handlers::register_vehicle,
        vehicles::handlers::list_vehicles,
        vehicles::handlers::search_available,
        vehicles::handlers::deactivate_vehicle,
        // Bookings
        bookings::handlers::create_booking,
        bookings::handlers::list_bookings,
        bookings::handlers::get_booking,
        bookings::handlers::cancel_booking,
    ),
    components(schemas(
        ApiResponse<vehicles::dto::VehicleDto>,
        vehicles::dto::CreateVehicleRequest,
        vehicles::dto::VehicleDto,
        vehicles::dto::AvailabilityDto,
        bookings::dto::CreateBookingRequest,
        bookings::dto::BookingDto,
        bookings::dto::ConflictDetails,
        bookings::dto::ConflictingBookingDto,
        health::handlers::HealthResponse,
        health::handlers::ComponentHealth,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Vehicles", description = "Fleet registration and availability search"),
        (name = "Bookings", description = "Vehicle bookings")
    ),
    info(
        title = "FleetLink API",
        description = "Logistics vehicle booking service"
    )
)]
struct ApiDoc;

/// Build the REST API router.
pub fn create_api_router(
    fleet_service: Arc<FleetService>,
    booking_service: Arc<BookingService>,
    db: DatabaseConnection,
) -> Router {
    let state = AppRouterState {
        fleet_service,
        booking_service,
        db,
        started_at: Arc::new(Instant::now()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::handlers::health_check))
        .route(
            "/api/v1/vehicles",
            get(vehicles::handlers::list_vehicles).post(vehicles::handlers::register_vehicle),
        )
        .route(
            "/api/v1/vehicles/available",
            get(vehicles::handlers::search_available),
        )
        .route(
            "/api/v1/vehicles/{vehicle_id}",
            delete(vehicles::handlers::deactivate_vehicle),
        )
        .route(
            "/api/v1/bookings",
            get(bookings::handlers::list_bookings).post(bookings::handlers::create_booking),
        )
        .route(
            "/api/v1/bookings/{booking_id}",
            get(bookings::handlers::get_booking).delete(bookings::handlers::cancel_booking),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
