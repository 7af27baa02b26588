//! In-memory store used when no database is configured, and by tests

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{BerthDirectory, BerthStore, ReservationStore, StoreError, UserStore};
use crate::models::{
    Berth, BerthNumber, BerthState, Email, NewBerth, NewReservation, NewUser, Reservation,
    ReservationUpdate, User, UserChanges,
};

#[derive(Default)]
struct Tables {
    berths: BTreeMap<i32, Berth>,
    reservations: HashMap<Uuid, Reservation>,
    users: HashMap<Uuid, User>,
}

/// Process-local store implementing every storage trait.
///
/// Uniqueness of berth numbers and emails is enforced here. Reservation
/// overlap is not: that is the reservation service's job.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut reservations: Vec<Reservation>) -> Vec<Reservation> {
    reservations.sort_by(|a, b| {
        b.start_date
            .cmp(&a.start_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    reservations
}

#[async_trait]
impl BerthDirectory for MemoryStore {
    async fn exists(&self, number: BerthNumber) -> Result<bool, StoreError> {
        Ok(self.tables.read().await.berths.contains_key(&number.get()))
    }

    async fn find(&self, number: BerthNumber) -> Result<Option<Berth>, StoreError> {
        Ok(self.tables.read().await.berths.get(&number.get()).cloned())
    }
}

#[async_trait]
impl BerthStore for MemoryStore {
    async fn list_berths(&self) -> Result<Vec<Berth>, StoreError> {
        Ok(self.tables.read().await.berths.values().cloned().collect())
    }

    async fn create_berth(&self, berth: NewBerth) -> Result<Berth, StoreError> {
        let mut tables = self.tables.write().await;
        let number = berth.number.get();
        if tables.berths.contains_key(&number) {
            return Err(StoreError::Duplicate {
                resource: "catway",
                key: number.to_string(),
            });
        }

        let now = Utc::now();
        let record = Berth {
            catway_number: number,
            catway_type: berth.kind,
            catway_state: berth.state.into_string(),
            created_at: now,
            updated_at: now,
        };
        tables.berths.insert(number, record.clone());
        Ok(record)
    }

    async fn update_berth_state(
        &self,
        number: BerthNumber,
        state: BerthState,
    ) -> Result<Option<Berth>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.berths.get_mut(&number.get()).map(|berth| {
            berth.catway_state = state.into_string();
            berth.updated_at = Utc::now().max(berth.updated_at);
            berth.clone()
        }))
    }

    async fn delete_berth(&self, number: BerthNumber) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.berths.remove(&number.get()).is_some())
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Reservation>, StoreError> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.reservations.values().cloned().collect()))
    }

    async fn list_by_berth(&self, berth: BerthNumber) -> Result<Vec<Reservation>, StoreError> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .reservations
                .values()
                .filter(|r| r.catway_number == berth.get())
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_berth_excluding(
        &self,
        berth: BerthNumber,
        exclude: Uuid,
    ) -> Result<Vec<Reservation>, StoreError> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .reservations
                .values()
                .filter(|r| r.catway_number == berth.get() && r.id != exclude)
                .cloned()
                .collect(),
        ))
    }

    async fn list_active_on(&self, day: NaiveDate) -> Result<Vec<Reservation>, StoreError> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .reservations
                .values()
                .filter(|r| r.start_date <= day && day <= r.end_date)
                .cloned()
                .collect(),
        ))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Reservation>, StoreError> {
        Ok(self.tables.read().await.reservations.get(&id).cloned())
    }

    async fn insert(&self, reservation: NewReservation) -> Result<Reservation, StoreError> {
        let now = Utc::now();
        let record = Reservation {
            id: Uuid::new_v4(),
            catway_number: reservation.berth.get(),
            client_name: reservation.client_name.into_string(),
            boat_name: reservation.boat_name.into_string(),
            start_date: reservation.range.start(),
            end_date: reservation.range.end(),
            created_at: now,
            updated_at: now,
        };

        self.tables
            .write()
            .await
            .reservations
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_fields(
        &self,
        id: Uuid,
        update: ReservationUpdate,
    ) -> Result<Option<Reservation>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.reservations.get_mut(&id).map(|r| {
            r.client_name = update.client_name;
            r.boat_name = update.boat_name;
            r.start_date = update.range.start();
            r.end_date = update.range.end();
            r.updated_at = Utc::now().max(r.updated_at);
            r.clone()
        }))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.reservations.remove(&id).is_some())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email == email.as_str())
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email.as_str()) {
            return Err(StoreError::Duplicate {
                resource: "user",
                key: user.email.as_str().to_owned(),
            });
        }

        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            username: user.username.as_str().to_owned(),
            email: user.email.as_str().to_owned(),
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_user(
        &self,
        email: &Email,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(id) = tables
            .users
            .values()
            .find(|u| u.email == email.as_str())
            .map(|u| u.id)
        else {
            return Ok(None);
        };

        if let Some(new_email) = &changes.email {
            let taken = tables
                .users
                .values()
                .any(|u| u.id != id && u.email == new_email.as_str());
            if taken {
                return Err(StoreError::Duplicate {
                    resource: "user",
                    key: new_email.as_str().to_owned(),
                });
            }
        }

        Ok(tables.users.get_mut(&id).map(|user| {
            if let Some(username) = changes.username {
                user.username = username.as_str().to_owned();
            }
            if let Some(email) = changes.email {
                user.email = email.as_str().to_owned();
            }
            if let Some(hash) = changes.password_hash {
                user.password_hash = hash;
            }
            user.updated_at = Utc::now().max(user.updated_at);
            user.clone()
        }))
    }

    async fn delete_user(&self, email: &Email) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|_, u| u.email != email.as_str());
        Ok(tables.users.len() < before)
    }
}
