//! Opaque session tokens shared by bearer auth and the web cookie

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::AuthError;
use crate::models::User;

/// Default lifetime of a session token
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Longest lifetime the server accepts for a session token (one leap year)
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

/// An authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// In-process token table
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    /// Issue a fresh token for `user`.
    pub async fn issue(&self, user: &User) -> Session {
        let session = Session {
            token: Uuid::new_v4(),
            user_id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            // saturate rather than overflow on an absurd ttl
            expires_at: Utc::now()
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(session.token, session.clone());
        session
    }

    /// Resolve a presented token to its session.
    pub async fn verify(&self, raw: &str) -> Result<Session, AuthError> {
        let token = Uuid::parse_str(raw.trim()).map_err(|_| AuthError::InvalidToken)?;

        let session = self
            .sessions
            .read()
            .await
            .get(&token)
            .cloned()
            .ok_or(AuthError::InvalidToken)?;

        if session.expires_at <= Utc::now() {
            self.sessions.write().await.remove(&token);
            return Err(AuthError::InvalidToken);
        }

        Ok(session)
    }

    /// Revoke one token. Unknown tokens are ignored.
    pub async fn revoke(&self, token: Uuid) {
        self.sessions.write().await.remove(&token);
    }

    /// Revoke every token held by `user_id` (account deleted or email changed).
    pub async fn revoke_user(&self, user_id: Uuid) {
        self.sessions
            .write()
            .await
            .retain(|_, s| s.user_id != user_id);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_SESSION_TTL_HOURS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "harbor".into(),
            email: "harbor@example.com".into(),
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn issued_token_verifies() {
        let store = SessionStore::default();
        let session = store.issue(&user()).await;
        let verified = store.verify(&session.token.to_string()).await.unwrap();
        assert_eq!(verified.email, "harbor@example.com");
    }

    #[tokio::test]
    async fn garbage_and_revoked_tokens_fail() {
        let store = SessionStore::default();
        assert!(matches!(
            store.verify("not-a-token").await,
            Err(AuthError::InvalidToken)
        ));

        let session = store.issue(&user()).await;
        store.revoke(session.token).await;
        assert!(store.verify(&session.token.to_string()).await.is_err());
    }

    #[tokio::test]
    async fn expired_tokens_fail() {
        let store = SessionStore::new(Duration::seconds(-1));
        let session = store.issue(&user()).await;
        assert!(matches!(
            store.verify(&session.token.to_string()).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn huge_ttl_saturates_instead_of_overflowing() {
        let store = SessionStore::new(Duration::max_value());
        let session = store.issue(&user()).await;
        assert_eq!(session.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(store.verify(&session.token.to_string()).await.is_ok());
    }

    #[tokio::test]
    async fn revoke_user_drops_all_their_tokens() {
        let store = SessionStore::default();
        let u = user();
        let a = store.issue(&u).await;
        let b = store.issue(&u).await;
        store.revoke_user(u.id).await;
        assert!(store.verify(&a.token.to_string()).await.is_err());
        assert!(store.verify(&b.token.to_string()).await.is_err());
    }
}
