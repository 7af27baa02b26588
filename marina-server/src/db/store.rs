//! Storage seams used by the reservation service and the HTTP layers
//!
//! Two implementations live next to this module: [`super::MemoryStore`]
//! for development and tests, and the PostgreSQL repositories in
//! [`super::repos`]. Every method is atomic for the single record it touches;
//! nothing here spans several records in one transaction.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    Berth, BerthNumber, BerthState, Email, NewBerth, NewReservation, NewUser, Reservation,
    ReservationUpdate, User, UserChanges,
};

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("{resource} '{key}' already exists")]
    Duplicate { resource: &'static str, key: String },

    /// The store itself refused an overlapping reservation.
    #[error("catway {berth} is already reserved for an overlapping period")]
    Overlap { berth: i32 },
}

/// Read-only view of valid berths
#[async_trait]
pub trait BerthDirectory: Send + Sync {
    async fn exists(&self, number: BerthNumber) -> Result<bool, StoreError>;

    async fn find(&self, number: BerthNumber) -> Result<Option<Berth>, StoreError>;
}

/// Berth administration
#[async_trait]
pub trait BerthStore: BerthDirectory {
    /// All berths ordered by number.
    async fn list_berths(&self) -> Result<Vec<Berth>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the number is taken.
    async fn create_berth(&self, berth: NewBerth) -> Result<Berth, StoreError>;

    async fn update_berth_state(
        &self,
        number: BerthNumber,
        state: BerthState,
    ) -> Result<Option<Berth>, StoreError>;

    async fn delete_berth(&self, number: BerthNumber) -> Result<bool, StoreError>;
}

/// The collection of existing reservations
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Every reservation, newest start date first.
    async fn list_all(&self) -> Result<Vec<Reservation>, StoreError>;

    /// Reservations on one berth, newest start date first.
    async fn list_by_berth(&self, berth: BerthNumber) -> Result<Vec<Reservation>, StoreError>;

    /// Reservations on one berth except `exclude`.
    async fn list_by_berth_excluding(
        &self,
        berth: BerthNumber,
        exclude: Uuid,
    ) -> Result<Vec<Reservation>, StoreError>;

    /// Reservations whose closed range contains `day`.
    async fn list_active_on(&self, day: NaiveDate) -> Result<Vec<Reservation>, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Reservation>, StoreError>;

    async fn insert(&self, reservation: NewReservation) -> Result<Reservation, StoreError>;

    async fn update_fields(
        &self,
        id: Uuid,
        update: ReservationUpdate,
    ) -> Result<Option<Reservation>, StoreError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Staff accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All accounts, most recently created first.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn update_user(
        &self,
        email: &Email,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError>;

    async fn delete_user(&self, email: &Email) -> Result<bool, StoreError>;
}
