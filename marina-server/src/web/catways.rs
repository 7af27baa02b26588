//! Catway pages

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::Deserialize;

use super::{redirect_with_error, redirect_with_success, user_message, views, Flash, WebSession};
use crate::db::{BerthDirectory, BerthStore};
use crate::http::ApiError;
use crate::models::{BerthNumber, BerthState, NewBerth, ValidationError};
use crate::state::AppState;

const LIST: &str = "/catways";

/// Catway form fields, kept as entered for re-rendering
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatwayForm {
    pub catway_number: Option<String>,
    pub catway_type: Option<String>,
    pub catway_state: Option<String>,
}

impl CatwayForm {
    fn parse(&self) -> Result<NewBerth, ValidationError> {
        let number = match self.catway_number.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| ValidationError::InvalidFormat {
                field: "catwayNumber",
                reason: "must be a whole number",
            })?),
        };
        NewBerth::parse(
            number,
            self.catway_type.as_deref(),
            self.catway_state.as_deref(),
        )
    }
}

/// GET /catways
pub async fn list(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
    Query(flash): Query<Flash>,
) -> Response {
    match state.berths.list_berths().await {
        Ok(berths) => views::catway_list(&session, &flash, &berths).into_response(),
        Err(e) => redirect_with_error("/dashboard", &user_message(e)).into_response(),
    }
}

/// GET /catways/add
pub async fn add_form(WebSession(session): WebSession) -> Response {
    views::catway_add_form(&session, &CatwayForm::default(), None).into_response()
}

/// POST /catways/add
pub async fn add(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
    Form(form): Form<CatwayForm>,
) -> Response {
    let created = match form.parse() {
        Ok(new) => state.berths.create_berth(new).await.map_err(ApiError::from),
        Err(e) => Err(e.into()),
    };

    match created {
        Ok(berth) => {
            tracing::info!(catway = berth.catway_number, "catway created");
            redirect_with_success(LIST, &format!("catway {} created", berth.catway_number))
                .into_response()
        }
        Err(e) => views::catway_add_form(&session, &form, Some(&user_message(e))).into_response(),
    }
}

/// GET /catways/{id}/edit
pub async fn edit_form(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let Ok(number) = BerthNumber::parse(&id) else {
        return redirect_with_error(LIST, "catway not found").into_response();
    };
    match state.berths.find(number).await {
        Ok(Some(berth)) => {
            views::catway_edit_form(&session, &berth, &berth.catway_state, None).into_response()
        }
        Ok(None) => redirect_with_error(LIST, "catway not found").into_response(),
        Err(e) => redirect_with_error(LIST, &user_message(e)).into_response(),
    }
}

/// POST /catways/{id}/edit
pub async fn edit(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<CatwayForm>,
) -> Response {
    let Ok(number) = BerthNumber::parse(&id) else {
        return redirect_with_error(LIST, "catway not found").into_response();
    };
    let entered = form.catway_state.clone().unwrap_or_default();

    let berth = match state.berths.find(number).await {
        Ok(Some(berth)) => berth,
        Ok(None) => return redirect_with_error(LIST, "catway not found").into_response(),
        Err(e) => return redirect_with_error(LIST, &user_message(e)).into_response(),
    };

    let new_state = match BerthState::new(&entered) {
        Ok(s) => s,
        Err(e) => {
            return views::catway_edit_form(&session, &berth, &entered, Some(&user_message(e)))
                .into_response()
        }
    };

    match state.berths.update_berth_state(number, new_state).await {
        Ok(Some(_)) => redirect_with_success(LIST, &format!("catway {} updated", number)).into_response(),
        Ok(None) => redirect_with_error(LIST, "catway not found").into_response(),
        Err(e) => views::catway_edit_form(&session, &berth, &entered, Some(&user_message(e)))
            .into_response(),
    }
}

/// POST /catways/{id}/delete
pub async fn delete(
    WebSession(_session): WebSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let Ok(number) = BerthNumber::parse(&id) else {
        return redirect_with_error(LIST, "catway not found").into_response();
    };
    match state.berths.delete_berth(number).await {
        Ok(true) => {
            tracing::info!(catway = %number, "catway deleted");
            redirect_with_success(LIST, &format!("catway {} deleted", number)).into_response()
        }
        Ok(false) => redirect_with_error(LIST, "catway not found").into_response(),
        Err(e) => redirect_with_error(LIST, &user_message(e)).into_response(),
    }
}
