//! Application state shared across handlers

use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;

use crate::auth::{BcryptHasher, CredentialHasher, SessionStore};
use crate::db::{BerthRepo, BerthStore, MemoryStore, ReservationRepo, UserRepo, UserStore};
use crate::reservations::ReservationService;

/// Shared application state
///
/// Every store is an explicitly constructed handle; handlers reach
/// persistence only through these fields.
#[derive(Clone)]
pub struct AppState {
    pub berths: Arc<dyn BerthStore>,
    pub reservations: ReservationService,
    pub users: Arc<dyn UserStore>,
    pub sessions: SessionStore,
    pub hasher: Arc<dyn CredentialHasher>,
}

impl AppState {
    /// State backed by the process-local [`MemoryStore`].
    pub fn in_memory(session_ttl: Duration) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            berths: store.clone(),
            reservations: ReservationService::new(store.clone(), store.clone()),
            users: store,
            sessions: SessionStore::new(session_ttl),
            hasher: Arc::new(BcryptHasher::default()),
        }
    }

    /// State backed by PostgreSQL repositories sharing `pool`.
    pub fn postgres(pool: PgPool, session_ttl: Duration) -> Self {
        let berths = Arc::new(BerthRepo::new(pool.clone()));
        let reservations = Arc::new(ReservationRepo::new(pool.clone()));
        Self {
            berths: berths.clone(),
            reservations: ReservationService::new(berths, reservations),
            users: Arc::new(UserRepo::new(pool)),
            sessions: SessionStore::new(session_ttl),
            hasher: Arc::new(BcryptHasher::default()),
        }
    }
}
