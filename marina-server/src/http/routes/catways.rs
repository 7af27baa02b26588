//! Catway endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::reservations::MessageResponse;
use crate::db::{BerthDirectory, BerthStore};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, BearerSession, ValidBerth};
use crate::models::{Berth, BerthState, NewBerth};
use crate::state::AppState;

/// Create catway request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCatwayRequest {
    pub catway_number: Option<i64>,
    pub catway_type: Option<String>,
    pub catway_state: Option<String>,
}

/// Update catway request; only the condition can change
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCatwayRequest {
    pub catway_state: Option<String>,
}

fn catway_not_found(number: impl ToString) -> ApiError {
    ApiError::NotFound {
        resource: "catway",
        id: number.to_string(),
    }
}

/// GET /catways - all catways by number
async fn list_catways(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Berth>>, ApiError> {
    Ok(Json(state.berths.list_berths().await?))
}

/// GET /catways/{id}
async fn get_catway(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
    ValidBerth(number): ValidBerth,
) -> Result<Json<Berth>, ApiError> {
    let berth = state
        .berths
        .find(number)
        .await?
        .ok_or_else(|| catway_not_found(number))?;
    Ok(Json(berth))
}

/// POST /catways
async fn create_catway(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateCatwayRequest>,
) -> Result<(StatusCode, Json<Berth>), ApiError> {
    let new = NewBerth::parse(
        req.catway_number,
        req.catway_type.as_deref(),
        req.catway_state.as_deref(),
    )?;
    let berth = state.berths.create_berth(new).await?;
    tracing::info!(catway = berth.catway_number, "catway created");
    Ok((StatusCode::CREATED, Json(berth)))
}

/// PUT /catways/{id} - change the condition text
async fn update_catway(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
    ValidBerth(number): ValidBerth,
    ApiJson(req): ApiJson<UpdateCatwayRequest>,
) -> Result<Json<Berth>, ApiError> {
    let new_state = BerthState::new(req.catway_state.as_deref().unwrap_or_default())?;
    let berth = state
        .berths
        .update_berth_state(number, new_state)
        .await?
        .ok_or_else(|| catway_not_found(number))?;
    Ok(Json(berth))
}

/// DELETE /catways/{id}
async fn delete_catway(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
    ValidBerth(number): ValidBerth,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.berths.delete_berth(number).await? {
        return Err(catway_not_found(number));
    }
    tracing::info!(catway = %number, "catway deleted");
    Ok(Json(MessageResponse {
        message: "catway deleted",
    }))
}

/// Catway routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/catways", get(list_catways).post(create_catway))
        .route(
            "/catways/{id}",
            get(get_catway).put(update_catway).delete(delete_catway),
        )
}
