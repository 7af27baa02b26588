//! Catway repository

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::duplicate_or;
use crate::db::store::{BerthDirectory, BerthStore, StoreError};
use crate::models::{Berth, BerthKind, BerthNumber, BerthState, NewBerth};

/// Catway repository
#[derive(Clone)]
pub struct BerthRepo {
    pool: PgPool,
}

impl BerthRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn berth_from_row(row: &PgRow) -> Result<Berth, StoreError> {
    let kind: String = row.try_get("catway_type")?;
    let catway_type = kind
        .parse::<BerthKind>()
        .map_err(|e| StoreError::Sqlx(sqlx::Error::Decode(Box::new(e))))?;

    Ok(Berth {
        catway_number: row.try_get("catway_number")?,
        catway_type,
        catway_state: row.try_get("catway_state")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl BerthDirectory for BerthRepo {
    async fn exists(&self, number: BerthNumber) -> Result<bool, StoreError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM catways WHERE catway_number = $1)")
                .bind(number.get())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists.0)
    }

    async fn find(&self, number: BerthNumber) -> Result<Option<Berth>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT catway_number, catway_type, catway_state, created_at, updated_at
            FROM catways
            WHERE catway_number = $1
            "#,
        )
        .bind(number.get())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(berth_from_row).transpose()
    }
}

#[async_trait]
impl BerthStore for BerthRepo {
    async fn list_berths(&self) -> Result<Vec<Berth>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT catway_number, catway_type, catway_state, created_at, updated_at
            FROM catways
            ORDER BY catway_number ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(berth_from_row).collect()
    }

    async fn create_berth(&self, berth: NewBerth) -> Result<Berth, StoreError> {
        let number = berth.number.get();
        let row = sqlx::query(
            r#"
            INSERT INTO catways (catway_number, catway_type, catway_state)
            VALUES ($1, $2, $3)
            RETURNING catway_number, catway_type, catway_state, created_at, updated_at
            "#,
        )
        .bind(number)
        .bind(berth.kind.as_str())
        .bind(berth.state.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_or(e, "catway", number.to_string()))?;

        berth_from_row(&row)
    }

    async fn update_berth_state(
        &self,
        number: BerthNumber,
        state: BerthState,
    ) -> Result<Option<Berth>, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE catways
            SET catway_state = $2, updated_at = GREATEST(NOW(), updated_at)
            WHERE catway_number = $1
            RETURNING catway_number, catway_type, catway_state, created_at, updated_at
            "#,
        )
        .bind(number.get())
        .bind(state.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(berth_from_row).transpose()
    }

    async fn delete_berth(&self, number: BerthNumber) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM catways WHERE catway_number = $1")
            .bind(number.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, migrations};

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_number_maps_to_duplicate() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        let repo = BerthRepo::new(pool);

        let number = BerthNumber::new(9_000 + i64::from(std::process::id() % 1_000)).unwrap();
        let _ = repo.delete_berth(number).await;

        let new = || NewBerth {
            number,
            kind: BerthKind::Short,
            state: BerthState::default(),
        };
        repo.create_berth(new()).await.expect("first insert");
        let err = repo.create_berth(new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        repo.delete_berth(number).await.unwrap();
    }
}
