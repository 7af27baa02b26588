//! JSON API route handlers organized by resource

pub mod auth;
pub mod catways;
pub mod health;
pub mod reservations;
pub mod users;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Every JSON API route, un-nested
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(auth::router())
        .merge(catways::router())
        .merge(reservations::router())
        .merge(users::router())
}
