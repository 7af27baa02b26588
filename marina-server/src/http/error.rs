//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! The `error` field is a stable machine-readable code; `message` is prose.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::accounts::AccountError;
use crate::auth::{AuthError, HashError};
use crate::db::StoreError;
use crate::models::ValidationError;
use crate::reservations::ReservationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Body missing, not JSON, or of the wrong shape (400)
    MalformedBody { message: String },

    /// End date not after start date (400)
    InvalidDateRange { message: String },

    /// Overlapping reservation on the same catway (400)
    Conflict { message: String },

    /// Unique key already taken (400)
    Duplicate { resource: &'static str, key: String },

    /// Missing, invalid or expired credentials (401)
    Unauthorized { message: String },

    /// Authenticated but not allowed (403)
    Forbidden { reason: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Store failure (500, logged)
    Store(StoreError),

    /// Credential hashing failure (500, logged)
    Hash(HashError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::MalformedBody { .. }
            | Self::InvalidDateRange { .. }
            | Self::Conflict { .. }
            | Self::Duplicate { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a user. Store failures stay generic.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::MalformedBody { message }
            | Self::InvalidDateRange { message }
            | Self::Conflict { message }
            | Self::Unauthorized { message } => message.clone(),
            Self::Duplicate { resource, key } => format!("{} '{}' already exists", resource, key),
            Self::Forbidden { reason } => reason.clone(),
            Self::NotFound { resource, id } => format!("{} '{}' not found", resource, id),
            Self::Store(_) | Self::Hash(_) => "an internal error occurred".to_owned(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::MalformedBody { .. } => "validation_error",
            Self::InvalidDateRange { .. } => "invalid_date_range",
            Self::Conflict { .. } => "conflicting_reservation",
            Self::Duplicate { .. } => "duplicate",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Forbidden { .. } => "forbidden",
            Self::NotFound { .. } => "not_found",
            Self::Store(_) | Self::Hash(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log the actual error, return generic message
        match &self {
            Self::Store(e) => tracing::error!("Store error: {}", e),
            Self::Hash(e) => tracing::error!("Hash error: {}", e),
            _ => {}
        }

        let body = json!({
            "error": self.code(),
            "message": self.message()
        });

        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "request body rejected");
        Self::MalformedBody {
            message: rejection.body_text(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate { resource, key } => Self::Duplicate { resource, key },
            StoreError::Overlap { .. } => Self::Conflict {
                message: e.to_string(),
            },
            StoreError::Sqlx(_) => Self::Store(e),
        }
    }
}

impl From<ReservationError> for ApiError {
    fn from(e: ReservationError) -> Self {
        match e {
            ReservationError::BerthNotFound(number) => Self::NotFound {
                resource: "catway",
                id: number.to_string(),
            },
            ReservationError::ReservationNotFound(id) => Self::NotFound {
                resource: "reservation",
                id: id.to_string(),
            },
            ReservationError::InvalidDateRange(range) => Self::InvalidDateRange {
                message: range.to_string(),
            },
            ReservationError::ConflictingReservation { .. } => Self::Conflict {
                message: e.to_string(),
            },
            ReservationError::Validation(v) => Self::Validation(v),
            ReservationError::Store(s) => Self::Store(s),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Store(s) => Self::Store(s),
            other => Self::Unauthorized {
                message: other.to_string(),
            },
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::Validation(v) => Self::Validation(v),
            AccountError::NotFound(email) => Self::NotFound {
                resource: "user",
                id: email,
            },
            AccountError::SelfDeletion => Self::Forbidden {
                reason: e.to_string(),
            },
            AccountError::Hash(h) => Self::Hash(h),
            AccountError::Store(s) => s.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::Empty { field: "clientName" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn conflict_is_400_with_stable_code() {
        let err = ApiError::from(ReservationError::ConflictingReservation {
            berth: 2,
            conflicting: None,
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "conflicting_reservation");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::NotFound {
            resource: "catway",
            id: "9".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn store_failure_does_not_leak() {
        let err = ApiError::from(StoreError::Sqlx(sqlx::Error::PoolTimedOut));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "an internal error occurred");
    }

    #[tokio::test]
    async fn auth_errors_are_401() {
        let response = ApiError::from(AuthError::MissingToken).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
