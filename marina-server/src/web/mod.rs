//! Server-rendered staff pages
//!
//! Form posts go through the same services and account operations as the
//! JSON API. Mutations redirect to a list page carrying `?success=` or
//! `?error=`; rejected forms are re-rendered with the entered values.

pub mod catways;
pub mod home;
pub mod reservations;
pub mod session;
pub mod users;
pub mod views;

use std::sync::Arc;

use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::http::ApiError;
use crate::state::AppState;

pub use session::{WebSession, SESSION_COOKIE};

/// Flash messages carried in the query string
#[derive(Debug, Default, Deserialize)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

pub(crate) fn redirect_with_success(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{}?success={}", path, urlencoding::encode(message)))
}

pub(crate) fn redirect_with_error(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{}?error={}", path, urlencoding::encode(message)))
}

/// Text safe to show on a page. Store failures are logged and replaced.
pub(crate) fn user_message(err: impl Into<ApiError>) -> String {
    let err = err.into();
    match &err {
        ApiError::Store(e) => tracing::error!("Store error: {}", e),
        ApiError::Hash(e) => tracing::error!("Hash error: {}", e),
        _ => {}
    }
    err.message()
}

/// Web page routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home::login_page))
        .route("/login", post(home::login))
        .route("/logout", get(home::logout))
        .route("/dashboard", get(home::dashboard))
        .route("/catways", get(catways::list))
        .route("/catways/add", get(catways::add_form).post(catways::add))
        .route("/catways/{id}/edit", get(catways::edit_form).post(catways::edit))
        .route("/catways/{id}/delete", post(catways::delete))
        .route("/reservations", get(reservations::list))
        .route(
            "/reservations/add",
            get(reservations::add_form).post(reservations::add),
        )
        .route(
            "/reservations/{id}/edit",
            get(reservations::edit_form).post(reservations::edit),
        )
        .route("/reservations/{id}/delete", post(reservations::delete))
        .route("/users", get(users::list))
        .route("/users/add", get(users::add_form).post(users::add))
        .route("/users/{email}/edit", get(users::edit_form).post(users::edit))
        .route("/users/{email}/delete", post(users::delete))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn redirects_encode_the_message() {
        let response = redirect_with_error("/reservations", "catway 3 & co").into_response();
        let location = response.headers()["location"].to_str().unwrap();
        assert_eq!(location, "/reservations?error=catway%203%20%26%20co");
    }
}
