//! PostgreSQL repository implementations
//!
//! Each repository follows these patterns:
//! - Owns a clone of the pool (cheap, reference counted)
//! - Relies on DB constraints for uniqueness and overlap, mapping the
//!   violation codes onto [`StoreError`] instead of checking first

pub mod berths;
pub mod reservations;
pub mod users;

pub use berths::BerthRepo;
pub use reservations::ReservationRepo;
pub use users::UserRepo;

use super::StoreError;

/// unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// exclusion_violation
const EXCLUSION_VIOLATION: &str = "23P01";

fn has_code(err: &sqlx::Error, code: &str) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|c| c == code)
}

/// Map a unique violation to [`StoreError::Duplicate`].
pub(crate) fn duplicate_or(err: sqlx::Error, resource: &'static str, key: String) -> StoreError {
    if has_code(&err, UNIQUE_VIOLATION) {
        StoreError::Duplicate { resource, key }
    } else {
        StoreError::Sqlx(err)
    }
}

/// Map an exclusion violation to [`StoreError::Overlap`].
pub(crate) fn overlap_or(err: sqlx::Error, berth: i32) -> StoreError {
    if has_code(&err, EXCLUSION_VIOLATION) {
        StoreError::Overlap { berth }
    } else {
        StoreError::Sqlx(err)
    }
}
