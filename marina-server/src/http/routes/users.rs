//! Staff account endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::reservations::MessageResponse;
use crate::accounts::{self, AccountEdit};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, BearerSession};
use crate::models::{Password, User, ValidationError};
use crate::state::AppState;

/// Create user request
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Update user request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// GET /users
async fn list_users(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list_users().await?))
}

/// GET /users/{email}
async fn get_user(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(accounts::find_account(state.users.as_ref(), &email).await?))
}

/// POST /users - open registration
async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let password = Password::new(req.password.as_deref().unwrap_or_default())?;
    let user = accounts::create_account(
        state.users.as_ref(),
        state.hasher.as_ref(),
        req.username.as_deref().unwrap_or_default(),
        req.email.as_deref().unwrap_or_default(),
        password,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /users/{email}
async fn update_user(
    _auth: BearerSession,
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    // An empty password field means "keep the current one"
    let password = req
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(Password::new)
        .transpose()?;

    if req.username.is_none() && req.email.is_none() && password.is_none() {
        return Err(ValidationError::Empty { field: "update" }.into());
    }

    let edit = AccountEdit {
        username: req.username.as_deref(),
        email: req.email.as_deref(),
        password,
    };
    let user = accounts::update_account(
        state.users.as_ref(),
        state.hasher.as_ref(),
        &state.sessions,
        &email,
        edit,
    )
    .await?;
    Ok(Json(user))
}

/// DELETE /users/{email}
async fn delete_user(
    BearerSession(session): BearerSession,
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    accounts::delete_account(
        state.users.as_ref(),
        &state.sessions,
        &email,
        Some(&session.email),
    )
    .await?;
    Ok(Json(MessageResponse {
        message: "user deleted",
    }))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{email}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
