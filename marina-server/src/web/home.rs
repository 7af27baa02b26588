//! Login, logout and the dashboard

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::session::{cleared_cookie, cookie_token, session_cookie};
use super::{redirect_with_error, redirect_with_success, user_message, views, Flash, WebSession};
use crate::auth;
use crate::db::BerthStore;
use crate::state::AppState;

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// GET /
pub async fn login_page(Query(flash): Query<Flash>) -> Html<String> {
    views::login_page(&flash)
}

/// POST /login - sets the session cookie and lands on the dashboard
pub async fn login(State(state): State<Arc<AppState>>, Form(form): Form<LoginForm>) -> Response {
    match auth::login(
        state.users.as_ref(),
        state.hasher.as_ref(),
        &state.sessions,
        &form.email,
        &form.password,
    )
    .await
    {
        Ok((session, _)) => {
            let max_age = (session.expires_at - Utc::now()).num_seconds().max(0);
            let cookie = session_cookie(&session.token.to_string(), max_age);
            ([(SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response()
        }
        Err(e) => redirect_with_error("/", &user_message(e)).into_response(),
    }
}

/// GET /logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> Response {
    if let Some(token) = cookie_token(&headers).and_then(|t| Uuid::parse_str(t).ok()) {
        state.sessions.revoke(token).await;
    }
    (
        [(SET_COOKIE, cleared_cookie())],
        redirect_with_success("/", "logged out"),
    )
        .into_response()
}

/// GET /dashboard
pub async fn dashboard(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
    Query(flash): Query<Flash>,
) -> Response {
    let today = Utc::now().date_naive();
    let loaded = async {
        let current = state.reservations.list_current(today).await?;
        let all = state.reservations.list_all().await?;
        let berths = state.berths.list_berths().await?;
        Ok::<_, crate::http::ApiError>((current, all.len(), berths.len()))
    }
    .await;

    match loaded {
        Ok((current, reservation_count, berth_count)) => views::dashboard(
            &session,
            &flash,
            today,
            &current,
            berth_count,
            reservation_count,
        )
        .into_response(),
        Err(e) => views::dashboard(
            &session,
            &Flash {
                success: None,
                error: Some(user_message(e)),
            },
            today,
            &[],
            0,
            0,
        )
        .into_response(),
    }
}
