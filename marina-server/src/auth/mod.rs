//! Staff authentication: credential checks and session tokens

pub mod password;
pub mod sessions;

pub use password::{BcryptHasher, CredentialHasher, HashError, DEFAULT_BCRYPT_COST};
pub use sessions::{Session, SessionStore, DEFAULT_SESSION_TTL_HOURS, MAX_SESSION_TTL_HOURS};

use crate::db::{StoreError, UserStore};
use crate::models::{Email, User};

/// Authentication error type
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing token")]
    MissingToken,

    #[error("invalid or expired token")]
    InvalidToken,

    /// Same message for unknown email and wrong password.
    #[error("incorrect email or password")]
    BadCredentials,

    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

/// Check `email` / `password` and open a session.
pub async fn login(
    users: &dyn UserStore,
    hasher: &dyn CredentialHasher,
    sessions: &SessionStore,
    email: &str,
    password: &str,
) -> Result<(Session, User), AuthError> {
    let email = Email::new(email).map_err(|_| AuthError::BadCredentials)?;

    let user = users
        .find_by_email(&email)
        .await?
        .ok_or(AuthError::BadCredentials)?;

    if !hasher.verify(password, &user.password_hash) {
        tracing::info!(email = %email.as_str(), "login refused");
        return Err(AuthError::BadCredentials);
    }

    let session = sessions.issue(&user).await;
    tracing::info!(email = %email.as_str(), "login");
    Ok((session, user))
}

/// Pull a token out of an `Authorization` header value: `Bearer <t>` or a bare token.
pub fn token_from_header(value: &str) -> Option<&str> {
    let value = value.trim();
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();
    (!token.is_empty()).then_some(token)
}
