//! Reservation repository
//!
//! The `reservations_no_overlap` exclusion constraint backs the service's
//! per-berth lock when several server processes share one database; a
//! violation comes back as [`StoreError::Overlap`].

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::overlap_or;
use crate::db::store::{ReservationStore, StoreError};
use crate::models::{BerthNumber, NewReservation, Reservation, ReservationUpdate};

const COLUMNS: &str =
    "id, catway_number, client_name, boat_name, start_date, end_date, created_at, updated_at";

/// Reservation repository
#[derive(Clone)]
pub struct ReservationRepo {
    pool: PgPool,
}

impl ReservationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for ReservationRepo {
    async fn list_all(&self) -> Result<Vec<Reservation>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM reservations ORDER BY start_date DESC, created_at DESC"
        );
        Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
    }

    async fn list_by_berth(&self, berth: BerthNumber) -> Result<Vec<Reservation>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM reservations WHERE catway_number = $1 \
             ORDER BY start_date DESC, created_at DESC"
        );
        Ok(sqlx::query_as(&sql)
            .bind(berth.get())
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_by_berth_excluding(
        &self,
        berth: BerthNumber,
        exclude: Uuid,
    ) -> Result<Vec<Reservation>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM reservations WHERE catway_number = $1 AND id <> $2 \
             ORDER BY start_date DESC, created_at DESC"
        );
        Ok(sqlx::query_as(&sql)
            .bind(berth.get())
            .bind(exclude)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_active_on(&self, day: NaiveDate) -> Result<Vec<Reservation>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM reservations WHERE start_date <= $1 AND end_date >= $1 \
             ORDER BY start_date DESC, created_at DESC"
        );
        Ok(sqlx::query_as(&sql).bind(day).fetch_all(&self.pool).await?)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Reservation>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM reservations WHERE id = $1");
        Ok(sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert(&self, reservation: NewReservation) -> Result<Reservation, StoreError> {
        let berth = reservation.berth.get();
        let sql = format!(
            r#"
            INSERT INTO reservations (catway_number, client_name, boat_name, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        );
        sqlx::query_as(&sql)
            .bind(berth)
            .bind(reservation.client_name.as_str())
            .bind(reservation.boat_name.as_str())
            .bind(reservation.range.start())
            .bind(reservation.range.end())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| overlap_or(e, berth))
    }

    async fn update_fields(
        &self,
        id: Uuid,
        update: ReservationUpdate,
    ) -> Result<Option<Reservation>, StoreError> {
        let sql = format!(
            r#"
            UPDATE reservations
            SET client_name = $2,
                boat_name = $3,
                start_date = $4,
                end_date = $5,
                updated_at = GREATEST(NOW(), updated_at)
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );
        let result = sqlx::query_as::<_, Reservation>(&sql)
            .bind(id)
            .bind(&update.client_name)
            .bind(&update.boat_name)
            .bind(update.range.start())
            .bind(update.range.end())
            .fetch_optional(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(row),
            Err(e) => {
                // berth is immutable, so look it up only for the error
                let berth = sqlx::query_as::<_, (i32,)>(
                    "SELECT catway_number FROM reservations WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .map_or(0, |(n,)| n);
                Err(overlap_or(e, berth))
            }
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
