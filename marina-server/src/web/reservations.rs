//! Reservation pages

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use uuid::Uuid;

use super::{redirect_with_error, redirect_with_success, user_message, views, Flash, WebSession};
use crate::db::BerthStore;
use crate::http::ApiError;
use crate::models::{BerthNumber, Reservation, ReservationPatch, ReservationRequest};
use crate::state::AppState;

const LIST: &str = "/reservations";

/// Reservation form fields, kept as entered for re-rendering
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationForm {
    pub catway_number: Option<String>,
    pub client_name: Option<String>,
    pub boat_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ReservationForm {
    fn from_stored(r: &Reservation) -> Self {
        Self {
            catway_number: Some(r.catway_number.to_string()),
            client_name: Some(r.client_name.clone()),
            boat_name: Some(r.boat_name.clone()),
            start_date: Some(r.start_date.format("%Y-%m-%d").to_string()),
            end_date: Some(r.end_date.format("%Y-%m-%d").to_string()),
        }
    }

    fn berth(&self) -> Result<BerthNumber, ApiError> {
        Ok(BerthNumber::parse(
            self.catway_number.as_deref().unwrap_or_default(),
        )?)
    }

    fn request(&self, berth: BerthNumber) -> Result<ReservationRequest, ApiError> {
        Ok(ReservationRequest::parse(
            berth,
            self.client_name.as_deref(),
            self.boat_name.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )?)
    }

    fn patch(&self) -> Result<ReservationPatch, ApiError> {
        Ok(ReservationPatch::parse(
            self.client_name.as_deref(),
            self.boat_name.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )?)
    }
}

fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// GET /reservations
pub async fn list(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
    Query(flash): Query<Flash>,
) -> Response {
    match state.reservations.list_all().await {
        Ok(all) => views::reservation_list(&session, &flash, &all).into_response(),
        Err(e) => redirect_with_error("/dashboard", &user_message(e)).into_response(),
    }
}

async fn render_add(
    state: &AppState,
    session: &crate::auth::Session,
    form: &ReservationForm,
    error: Option<&str>,
) -> Response {
    match state.berths.list_berths().await {
        Ok(berths) => views::reservation_add_form(session, &berths, form, error).into_response(),
        Err(e) => redirect_with_error(LIST, &user_message(e)).into_response(),
    }
}

/// GET /reservations/add
pub async fn add_form(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
) -> Response {
    render_add(&state, &session, &ReservationForm::default(), None).await
}

/// Catway lookup first, then the remaining fields, then the service.
async fn book(state: &AppState, form: &ReservationForm) -> Result<Reservation, ApiError> {
    let berth = form.berth()?;
    state.reservations.require_berth(berth).await?;
    let request = form.request(berth)?;
    Ok(state.reservations.propose_create(request).await?)
}

/// POST /reservations/add
pub async fn add(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
    Form(form): Form<ReservationForm>,
) -> Response {
    match book(&state, &form).await {
        Ok(r) => redirect_with_success(
            LIST,
            &format!("catway {} booked for {}", r.catway_number, r.client_name),
        )
        .into_response(),
        Err(e) => render_add(&state, &session, &form, Some(&user_message(e))).await,
    }
}

/// GET /reservations/{id}/edit
pub async fn edit_form(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return redirect_with_error(LIST, "reservation not found").into_response();
    };
    match state.reservations.get(id).await {
        Ok(r) => {
            views::reservation_edit_form(&session, &r, &ReservationForm::from_stored(&r), None)
                .into_response()
        }
        Err(e) => redirect_with_error(LIST, &user_message(e)).into_response(),
    }
}

/// POST /reservations/{id}/edit
pub async fn edit(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<ReservationForm>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return redirect_with_error(LIST, "reservation not found").into_response();
    };
    let existing = match state.reservations.get(id).await {
        Ok(r) => r,
        Err(e) => return redirect_with_error(LIST, &user_message(e)).into_response(),
    };

    let updated = match form.patch() {
        Ok(patch) => state
            .reservations
            .propose_update(id, patch)
            .await
            .map_err(ApiError::from),
        Err(e) => Err(e),
    };

    match updated {
        Ok(r) => redirect_with_success(
            LIST,
            &format!("reservation for {} updated", r.client_name),
        )
        .into_response(),
        Err(ApiError::NotFound { .. }) => {
            redirect_with_error(LIST, "reservation not found").into_response()
        }
        Err(e) => views::reservation_edit_form(&session, &existing, &form, Some(&user_message(e)))
            .into_response(),
    }
}

/// POST /reservations/{id}/delete
pub async fn delete(
    WebSession(_session): WebSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return redirect_with_error(LIST, "reservation not found").into_response();
    };
    match state.reservations.delete(id).await {
        Ok(()) => redirect_with_success(LIST, "reservation deleted").into_response(),
        Err(e) => redirect_with_error(LIST, &user_message(e)).into_response(),
    }
}
