//! Staff account repository

use async_trait::async_trait;
use sqlx::PgPool;

use super::duplicate_or;
use crate::db::store::{StoreError, UserStore};
use crate::models::{Email, NewUser, User, UserChanges};

/// Staff account repository
#[derive(Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepo {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(sqlx::query_as(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_or(e, "user", user.email.as_str().to_owned()))
    }

    async fn update_user(
        &self,
        email: &Email,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let new_email = changes.email.as_ref().map(|e| e.as_str().to_owned());

        sqlx::query_as(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                updated_at = GREATEST(NOW(), updated_at)
            WHERE email = $1
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(email.as_str())
        .bind(changes.username.as_ref().map(|u| u.as_str()))
        .bind(new_email.as_deref())
        .bind(changes.password_hash.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| duplicate_or(e, "user", new_email.clone().unwrap_or_default()))
    }

    async fn delete_user(&self, email: &Email) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
