//! Staff account pages

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::Deserialize;

use super::{redirect_with_error, redirect_with_success, user_message, views, Flash, WebSession};
use crate::accounts::{self, AccountEdit, AccountError};
use crate::models::{Password, ValidationError};
use crate::state::AppState;

const LIST: &str = "/users";

/// User form fields. Passwords are never echoed back into the form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl UserForm {
    /// Required, confirmed password for new accounts.
    fn new_password(&self) -> Result<Password, ValidationError> {
        Password::confirmed(
            self.password.as_deref().unwrap_or_default(),
            self.confirm_password.as_deref().unwrap_or_default(),
        )
    }

    /// Optional password change; blank keeps the current one.
    fn changed_password(&self) -> Result<Option<Password>, ValidationError> {
        match self.password.as_deref() {
            None | Some("") => Ok(None),
            Some(p) => Password::confirmed(p, self.confirm_password.as_deref().unwrap_or_default())
                .map(Some),
        }
    }
}

/// GET /users
pub async fn list(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
    Query(flash): Query<Flash>,
) -> Response {
    match state.users.list_users().await {
        Ok(users) => views::user_list(&session, &flash, &users).into_response(),
        Err(e) => redirect_with_error("/dashboard", &user_message(e)).into_response(),
    }
}

/// GET /users/add
pub async fn add_form(WebSession(session): WebSession) -> Response {
    views::user_add_form(&session, &UserForm::default(), None).into_response()
}

/// POST /users/add
pub async fn add(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
    Form(form): Form<UserForm>,
) -> Response {
    let created = match form.new_password() {
        Ok(password) => {
            accounts::create_account(
                state.users.as_ref(),
                state.hasher.as_ref(),
                form.username.as_deref().unwrap_or_default(),
                form.email.as_deref().unwrap_or_default(),
                password,
            )
            .await
        }
        Err(e) => Err(e.into()),
    };

    match created {
        Ok(user) => {
            redirect_with_success(LIST, &format!("user {} created", user.email)).into_response()
        }
        Err(e) => views::user_add_form(&session, &form, Some(&user_message(e))).into_response(),
    }
}

/// GET /users/{email}/edit
pub async fn edit_form(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Response {
    match accounts::find_account(state.users.as_ref(), &email).await {
        Ok(user) => {
            let form = UserForm {
                username: Some(user.username),
                email: Some(user.email.clone()),
                ..Default::default()
            };
            views::user_edit_form(&session, &user.email, &form, None).into_response()
        }
        Err(e) => redirect_with_error(LIST, &user_message(e)).into_response(),
    }
}

/// POST /users/{email}/edit
pub async fn edit(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Form(form): Form<UserForm>,
) -> Response {
    let updated = match form.changed_password() {
        Ok(password) => {
            let edit = AccountEdit {
                username: form.username.as_deref(),
                email: form.email.as_deref(),
                password,
            };
            accounts::update_account(
                state.users.as_ref(),
                state.hasher.as_ref(),
                &state.sessions,
                &email,
                edit,
            )
            .await
        }
        Err(e) => Err(e.into()),
    };

    match updated {
        Ok(user) => {
            redirect_with_success(LIST, &format!("user {} updated", user.email)).into_response()
        }
        Err(AccountError::NotFound(_)) => {
            redirect_with_error(LIST, "user not found").into_response()
        }
        Err(e) => {
            views::user_edit_form(&session, &email, &form, Some(&user_message(e))).into_response()
        }
    }
}

/// POST /users/{email}/delete - a user cannot delete themselves
pub async fn delete(
    WebSession(session): WebSession,
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Response {
    match accounts::delete_account(
        state.users.as_ref(),
        &state.sessions,
        &email,
        Some(&session.email),
    )
    .await
    {
        Ok(()) => redirect_with_success(LIST, &format!("user {} deleted", email)).into_response(),
        Err(e) => redirect_with_error(LIST, &user_message(e)).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accounts_need_matching_passwords() {
        let form = UserForm {
            password: Some("long-enough".into()),
            confirm_password: Some("long-enougH".into()),
            ..Default::default()
        };
        assert!(matches!(
            form.new_password(),
            Err(ValidationError::Mismatch { field: "password" })
        ));
    }

    #[test]
    fn blank_password_means_unchanged() {
        let form = UserForm {
            password: Some(String::new()),
            ..Default::default()
        };
        assert!(form.changed_password().unwrap().is_none());
    }
}
