//! Reservation failure taxonomy

use uuid::Uuid;

use crate::db::StoreError;
use crate::models::{BerthNumber, InvalidDateRange, ValidationError};

/// Why a reservation operation was refused or failed
#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("catway {0} not found")]
    BerthNotFound(BerthNumber),

    #[error("reservation {0} not found")]
    ReservationNotFound(Uuid),

    #[error(transparent)]
    InvalidDateRange(#[from] InvalidDateRange),

    /// `conflicting` is absent when the store's own constraint caught it.
    #[error("catway {berth} is already reserved for this period")]
    ConflictingReservation {
        berth: i32,
        conflicting: Option<Uuid>,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("store failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ReservationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Overlap { berth } => Self::ConflictingReservation {
                berth,
                conflicting: None,
            },
            other => Self::Store(other),
        }
    }
}

impl ReservationError {
    /// Expected outcomes a caller can act on, as opposed to store failures.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_overlap_becomes_conflict() {
        let err = ReservationError::from(StoreError::Overlap { berth: 4 });
        assert!(matches!(
            err,
            ReservationError::ConflictingReservation {
                berth: 4,
                conflicting: None
            }
        ));
        assert!(err.is_rejection());
    }

    #[test]
    fn other_store_errors_stay_failures() {
        let err = ReservationError::from(StoreError::Sqlx(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, ReservationError::Store(_)));
        assert!(!err.is_rejection());
    }
}
