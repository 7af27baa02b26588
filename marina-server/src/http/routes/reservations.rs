//! Reservation endpoints
//!
//! Thin wrappers over [`ReservationService`](crate::reservations::ReservationService):
//! parse the request, call the service, shape the response.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::{
    parse_berth, parse_reservation_id, ApiJson, BearerSession, ValidBerth,
};
use crate::models::{Reservation, ReservationPatch, ReservationRequest};
use crate::state::AppState;

/// Create reservation request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub client_name: Option<String>,
    pub boat_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Update reservation request; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    pub client_name: Option<String>,
    pub boat_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Plain confirmation body
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /catways/{id}/reservations - reservations on one catway
async fn list_for_berth(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
    ValidBerth(berth): ValidBerth,
) -> Result<Json<Vec<Reservation>>, ApiError> {
    Ok(Json(state.reservations.list_by_berth(berth).await?))
}

/// GET /catways/{id}/reservations/{rid}
async fn get_reservation(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
    Path((berth, id)): Path<(String, String)>,
) -> Result<Json<Reservation>, ApiError> {
    let berth = parse_berth(&berth)?;
    let id = parse_reservation_id(&id)?;
    Ok(Json(state.reservations.get_on_berth(berth, id).await?))
}

/// POST /catways/{id}/reservations
async fn create_reservation(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
    ValidBerth(berth): ValidBerth,
    ApiJson(req): ApiJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    // unknown catway is 404 whatever the body holds
    state.reservations.require_berth(berth).await?;

    let request = ReservationRequest::parse(
        berth,
        req.client_name.as_deref(),
        req.boat_name.as_deref(),
        req.start_date.as_deref(),
        req.end_date.as_deref(),
    )?;

    let reservation = state.reservations.propose_create(request).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// PUT /catways/{id}/reservations/{rid}
async fn update_reservation(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
    Path((berth, id)): Path<(String, String)>,
    ApiJson(req): ApiJson<UpdateReservationRequest>,
) -> Result<Json<Reservation>, ApiError> {
    let berth = parse_berth(&berth)?;
    let id = parse_reservation_id(&id)?;

    // 404 unless the reservation lives on the catway in the path
    state.reservations.get_on_berth(berth, id).await?;

    let patch = ReservationPatch::parse(
        req.client_name.as_deref(),
        req.boat_name.as_deref(),
        req.start_date.as_deref(),
        req.end_date.as_deref(),
    )?;
    Ok(Json(state.reservations.propose_update(id, patch).await?))
}

/// DELETE /catways/{id}/reservations/{rid}
async fn delete_reservation(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
    Path((berth, id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let berth = parse_berth(&berth)?;
    let id = parse_reservation_id(&id)?;

    state.reservations.get_on_berth(berth, id).await?;
    state.reservations.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "reservation deleted",
    }))
}

/// GET /reservations - every reservation, newest start first
async fn list_all(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
    Ok(Json(state.reservations.list_all().await?))
}

/// GET /reservations/current - reservations in progress today
async fn list_current(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
    let today = Utc::now().date_naive();
    Ok(Json(state.reservations.list_current(today).await?))
}

/// Reservation routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/catways/{id}/reservations",
            get(list_for_berth).post(create_reservation),
        )
        .route(
            "/catways/{id}/reservations/{rid}",
            get(get_reservation)
                .put(update_reservation)
                .delete(delete_reservation),
        )
        .route("/reservations", get(list_all))
        .route("/reservations/current", get(list_current))
}
