//! Parking spot REST API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::dto::{
    error_response, CheckInRequest, CreateSpotRequest, ErrorResponse, MessageResponse, SessionDto,
    SpotDto, SpotListQuery, UpdateSpotRequest,
};
use crate::application::SpotService;

/// State for all spot routes
#[derive(Clone)]
pub struct SpotHandlerState {
    pub spots: Arc<SpotService>,
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

/// List parking spots
///
/// Filters combine with AND; blank parameters are ignored.
#[utoipa::path(
    get,
    path = "/api/spots",
    tag = "Spots",
    params(SpotListQuery),
    responses(
        (status = 200, description = "Spots in creation order", body = Vec<SpotDto>),
        (status = 400, description = "Unknown status or spot_type value", body = ErrorResponse)
    )
)]
pub async fn list_spots(
    State(state): State<SpotHandlerState>,
    Query(query): Query<SpotListQuery>,
) -> Result<Json<Vec<SpotDto>>, ErrorReply> {
    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(e) => return Err(error_response(&e)),
    };
    match state.spots.list_spots(&filter).await {
        Ok(spots) => Ok(Json(spots.into_iter().map(SpotDto::from_domain).collect())),
        Err(e) => Err(error_response(&e)),
    }
}

/// Create a parking spot
#[utoipa::path(
    post,
    path = "/api/spots",
    tag = "Spots",
    request_body = CreateSpotRequest,
    responses(
        (status = 201, description = "Spot created", body = SpotDto),
        (status = 400, description = "Invalid field value", body = ErrorResponse),
        (status = 409, description = "Spot number already in use", body = ErrorResponse)
    )
)]
pub async fn create_spot(
    State(state): State<SpotHandlerState>,
    Json(req): Json<CreateSpotRequest>,
) -> Result<(StatusCode, Json<SpotDto>), ErrorReply> {
    let command = match req.into_command() {
        Ok(command) => command,
        Err(e) => return Err(error_response(&e)),
    };
    match state.spots.create_spot(command).await {
        Ok(spot) => Ok((StatusCode::CREATED, Json(SpotDto::from_domain(spot)))),
        Err(e) => Err(error_response(&e)),
    }
}

/// Get one parking spot by ID
#[utoipa::path(
    get,
    path = "/api/spots/{id}",
    tag = "Spots",
    params(("id" = Uuid, Path, description = "Spot ID")),
    responses(
        (status = 200, description = "Spot details", body = SpotDto),
        (status = 404, description = "Spot not found", body = ErrorResponse)
    )
)]
pub async fn get_spot(
    State(state): State<SpotHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SpotDto>, ErrorReply> {
    match state.spots.get_spot(id).await {
        Ok(spot) => Ok(Json(SpotDto::from_domain(spot))),
        Err(e) => Err(error_response(&e)),
    }
}

/// Update a parking spot
///
/// Partial update; omitted fields keep their value. Status may be set to
/// anything except `occupied` (check-in is the only path into it).
#[utoipa::path(
    put,
    path = "/api/spots/{id}",
    tag = "Spots",
    params(("id" = Uuid, Path, description = "Spot ID")),
    request_body = UpdateSpotRequest,
    responses(
        (status = 200, description = "Updated spot", body = SpotDto),
        (status = 400, description = "Invalid field value", body = ErrorResponse),
        (status = 404, description = "Spot not found", body = ErrorResponse),
        (status = 409, description = "Forbidden transition or duplicate number", body = ErrorResponse)
    )
)]
pub async fn update_spot(
    State(state): State<SpotHandlerState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSpotRequest>,
) -> Result<Json<SpotDto>, ErrorReply> {
    let update = match req.into_command() {
        Ok(update) => update,
        Err(e) => return Err(error_response(&e)),
    };
    match state.spots.update_spot(id, update).await {
        Ok(spot) => Ok(Json(SpotDto::from_domain(spot))),
        Err(e) => Err(error_response(&e)),
    }
}

/// Delete a parking spot
///
/// Completed session history is kept; an open session is discarded.
#[utoipa::path(
    delete,
    path = "/api/spots/{id}",
    tag = "Spots",
    params(("id" = Uuid, Path, description = "Spot ID")),
    responses(
        (status = 200, description = "Spot deleted", body = MessageResponse),
        (status = 404, description = "Spot not found", body = ErrorResponse)
    )
)]
pub async fn delete_spot(
    State(state): State<SpotHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ErrorReply> {
    match state.spots.delete_spot(id).await {
        Ok(()) => Ok(Json(MessageResponse {
            message: "Spot deleted successfully".to_string(),
        })),
        Err(e) => Err(error_response(&e)),
    }
}

/// Check a vehicle in
///
/// Moves an `available` spot to `occupied` and records the vehicle.
#[utoipa::path(
    post,
    path = "/api/spots/{id}/checkin",
    tag = "Spots",
    params(("id" = Uuid, Path, description = "Spot ID")),
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Occupied spot", body = SpotDto),
        (status = 400, description = "Blank vehicle license", body = ErrorResponse),
        (status = 404, description = "Spot not found", body = ErrorResponse),
        (status = 409, description = "Spot is not available", body = ErrorResponse)
    )
)]
pub async fn check_in(
    State(state): State<SpotHandlerState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CheckInRequest>,
) -> Result<Json<SpotDto>, ErrorReply> {
    match state.spots.check_in(id, req.into_command()).await {
        Ok(spot) => Ok(Json(SpotDto::from_domain(spot))),
        Err(e) => Err(error_response(&e)),
    }
}

/// Check the vehicle out
///
/// Bills the elapsed time, appends the session to the revenue ledger and
/// returns the vacated spot with `total_fee` set.
#[utoipa::path(
    post,
    path = "/api/spots/{id}/checkout",
    tag = "Spots",
    params(("id" = Uuid, Path, description = "Spot ID")),
    responses(
        (status = 200, description = "Vacated spot with the final fee", body = SpotDto),
        (status = 404, description = "Spot not found", body = ErrorResponse),
        (status = 409, description = "Spot is not occupied", body = ErrorResponse)
    )
)]
pub async fn check_out(
    State(state): State<SpotHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SpotDto>, ErrorReply> {
    match state.spots.check_out(id).await {
        Ok(spot) => Ok(Json(SpotDto::from_domain(spot))),
        Err(e) => Err(error_response(&e)),
    }
}

/// Completed sessions for one spot
///
/// Oldest first. History survives spot deletion, so an unknown ID
/// yields an empty list rather than 404.
#[utoipa::path(
    get,
    path = "/api/spots/{id}/sessions",
    tag = "Spots",
    params(("id" = Uuid, Path, description = "Spot ID")),
    responses(
        (status = 200, description = "Completed sessions", body = Vec<SessionDto>)
    )
)]
pub async fn list_sessions(
    State(state): State<SpotHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SessionDto>>, ErrorReply> {
    match state.spots.sessions_for_spot(id).await {
        Ok(sessions) => Ok(Json(
            sessions.into_iter().map(SessionDto::from_domain).collect(),
        )),
        Err(e) => Err(error_response(&e)),
    }
}
