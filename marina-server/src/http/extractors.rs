//! Custom Axum extractors and path parsing helpers

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use super::error::ApiError;
use crate::auth::{token_from_header, AuthError, Session};
use crate::models::{BerthNumber, ValidationError};
use crate::state::AppState;

/// Caller authenticated with a bearer token
pub struct BearerSession(pub Session);

impl FromRequestParts<Arc<AppState>> for BearerSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(token_from_header)
            .ok_or(AuthError::MissingToken)?;

        let session = state.sessions.verify(token).await?;
        Ok(Self(session))
    }
}

/// JSON body whose rejections render as [`ApiError`] bodies
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Extract and validate a berth number from a single-segment path
pub struct ValidBerth(pub BerthNumber);

impl<S> FromRequestParts<S> for ValidBerth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "catway id" }))?;

        Ok(Self(parse_berth(&id)?))
    }
}

/// Parse a berth number path segment.
pub fn parse_berth(raw: &str) -> Result<BerthNumber, ApiError> {
    Ok(BerthNumber::parse(raw)?)
}

/// Parse a reservation id path segment.
///
/// Anything that is not a UUID cannot name a stored reservation, so it is
/// reported as not found rather than as a malformed request.
pub fn parse_reservation_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::NotFound {
        resource: "reservation",
        id: raw.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn berth_segments() {
        assert_eq!(parse_berth("4").unwrap().get(), 4);
        assert!(matches!(parse_berth("abc"), Err(ApiError::Validation(_))));
    }

    #[test]
    fn reservation_ids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_reservation_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_reservation_id("42"),
            Err(ApiError::NotFound { resource: "reservation", .. })
        ));
    }
}
