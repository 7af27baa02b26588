//! Reservation conflict detection and validation

pub mod error;
pub mod locks;
pub mod overlap;
pub mod service;

pub use error::ReservationError;
pub use locks::BerthLocks;
pub use overlap::{find_conflict, overlaps};
pub use service::{ReservationResult, ReservationService};
