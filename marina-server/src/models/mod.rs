//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod berth;
pub mod dates;
pub mod reservation;
pub mod user;
pub mod validation;

pub use berth::{Berth, BerthKind, BerthNumber, BerthState, NewBerth, DEFAULT_BERTH_STATE};
pub use dates::{parse_date, parse_optional_date, DateRange, InvalidDateRange};
pub use reservation::{
    NewReservation, PartyName, Reservation, ReservationPatch, ReservationRequest,
    ReservationUpdate,
};
pub use user::{Email, NewUser, Password, User, UserChanges, Username};
pub use validation::ValidationError;
