//! API router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::*;
use crate::api::handlers::{dashboard, health, spots};
use crate::application::{SpotService, StatsService};

/// Unified state for every route. Axum extracts the specific handler
/// state via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub spots: Arc<SpotService>,
    pub stats: Arc<StatsService>,
}

impl FromRef<ApiState> for spots::SpotHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        spots::SpotHandlerState {
            spots: Arc::clone(&s.spots),
        }
    }
}

impl FromRef<ApiState> for dashboard::DashboardHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        dashboard::DashboardHandlerState {
            stats: Arc::clone(&s.stats),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Spots
        spots::list_spots,
        spots::create_spot,
        spots::get_spot,
        spots::update_spot,
        spots::delete_spot,
        spots::check_in,
        spots::check_out,
        spots::list_sessions,
        // Dashboard
        dashboard::dashboard_stats,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            SpotDto,
            SessionDto,
            CreateSpotRequest,
            UpdateSpotRequest,
            CheckInRequest,
            DashboardStatsDto,
            health::HealthResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service liveness probe for uptime monitoring."),
        (name = "Spots", description = "Parking spot CRUD and the occupancy lifecycle. Check-in is the only way into `occupied`; checkout bills the elapsed time at the spot's hourly rate and returns the spot to `available`."),
        (name = "Dashboard", description = "Aggregated lot statistics: spot counts per status and lifetime revenue from completed sessions."),
    ),
    info(
        title = "Parking Management API",
        version = "1.0.0",
        description = "REST API for managing a parking lot: spots, vehicle check-in/checkout with hourly billing, and dashboard statistics.

## Money

All monetary fields (`hourly_rate`, `total_fee`, `total_revenue`) are decimal amounts with two fractional digits. Fees are rounded up to the next cent.

## Errors

Failing endpoints return `{\"error\": \"description\"}` with status 400 (validation), 404 (not found), 409 (conflict or forbidden transition) or 500 (storage).",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(spots: Arc<SpotService>, stats: Arc<StatsService>) -> Router {
    let state = ApiState { spots, stats };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let spot_routes = Router::new()
        .route("/", get(spots::list_spots).post(spots::create_spot))
        .route(
            "/{id}",
            get(spots::get_spot)
                .put(spots::update_spot)
                .delete(spots::delete_spot),
        )
        .route("/{id}/checkin", post(spots::check_in))
        .route("/{id}/checkout", post(spots::check_out))
        .route("/{id}/sessions", get(spots::list_sessions));

    let dashboard_routes = Router::new().route("/stats", get(dashboard::dashboard_stats));

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .nest("/api/spots", spot_routes)
        .nest("/api/dashboard", dashboard_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ── Tests ──────────────────────────────────────────────────────
