//! Dashboard statistics endpoint

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::api::dto::{error_response, DashboardStatsDto, ErrorResponse};
use crate::application::StatsService;

/// State for dashboard routes
#[derive(Clone)]
pub struct DashboardHandlerState {
    pub stats: Arc<StatsService>,
}

/// Lot occupancy counts and lifetime revenue
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Current snapshot", body = DashboardStatsDto)
    )
)]
pub async fn dashboard_stats(
    State(state): State<DashboardHandlerState>,
) -> Result<Json<DashboardStatsDto>, (StatusCode, Json<ErrorResponse>)> {
    match state.stats.dashboard_stats().await {
        Ok(stats) => Ok(Json(DashboardStatsDto::from_domain(stats))),
        Err(e) => Err(error_response(&e)),
    }
}
