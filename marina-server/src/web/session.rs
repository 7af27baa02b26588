//! Cookie-carried sessions for the web pages

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::response::Redirect;

use super::redirect_with_error;
use crate::auth::Session;
use crate::state::AppState;

/// Name of the cookie holding the session token
pub const SESSION_COOKIE: &str = "marina_session";

/// Caller authenticated through the session cookie.
///
/// Missing or stale cookies redirect to the login page.
pub struct WebSession(pub Session);

impl FromRequestParts<Arc<AppState>> for WebSession {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie_token(&parts.headers)
            .ok_or_else(|| redirect_with_error("/", "please log in"))?;

        let session = state
            .sessions
            .verify(token)
            .await
            .map_err(|_| redirect_with_error("/", "your session has expired, please log in"))?;
        Ok(Self(session))
    }
}

/// Session token from the `Cookie` header, if present.
pub fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value opening a session
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    )
}

/// `Set-Cookie` value clearing the session
pub fn cleared_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_session_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; marina_session=abc-123; lang=fr"),
        );
        assert_eq!(cookie_token(&headers), Some("abc-123"));
    }

    #[test]
    fn empty_or_missing_cookie_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(cookie_token(&headers), None);
        headers.insert(COOKIE, HeaderValue::from_static("marina_session="));
        assert_eq!(cookie_token(&headers), None);
    }

    #[test]
    fn cookies_are_http_only() {
        assert!(session_cookie("t", 60).contains("HttpOnly; SameSite=Lax"));
        assert!(cleared_cookie().contains("Max-Age=0"));
    }
}
