//! Login / logout endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reservations::MessageResponse;
use crate::auth::{self, token_from_header};
use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::models::User;
use crate::state::AppState;

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login response; the token is also sent in the `Authorization` header
#[derive(Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub user: User,
}

/// POST /login
async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let (session, user) = auth::login(
        state.users.as_ref(),
        state.hasher.as_ref(),
        &state.sessions,
        req.email.as_deref().unwrap_or_default(),
        req.password.as_deref().unwrap_or_default(),
    )
    .await?;

    let token = session.token.to_string();
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
        headers.insert(AUTHORIZATION, value);
    }

    let body = LoginResponse {
        message: "authentication succeeded",
        token,
        user,
    };
    Ok((headers, Json(body)).into_response())
}

/// GET /logout - revokes the presented token, if any
async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<MessageResponse> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_header)
        .and_then(|t| Uuid::parse_str(t).ok());

    if let Some(token) = token {
        state.sessions.revoke(token).await;
    }

    Json(MessageResponse {
        message: "logged out",
    })
}

/// Auth routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", get(logout))
}
