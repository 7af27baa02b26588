//! Schema setup for catways, reservations and staff accounts
//!
//! Every statement is idempotent so `run` is safe on each startup.

use sqlx::PgPool;

/// Run all migrations
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running marina migrations...");

    // Needed for `catway_number WITH =` inside the GiST exclusion constraint
    sqlx::query("CREATE EXTENSION IF NOT EXISTS btree_gist")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS catways (
            catway_number INTEGER PRIMARY KEY CHECK (catway_number > 0),
            catway_type TEXT NOT NULL DEFAULT 'short' CHECK (catway_type IN ('long', 'short')),
            catway_state TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // '[]' makes the range closed on both ends: touching reservations conflict
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            catway_number INTEGER NOT NULL,
            client_name TEXT NOT NULL,
            boat_name TEXT NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT reservations_end_after_start CHECK (end_date > start_date),
            CONSTRAINT reservations_no_overlap EXCLUDE USING gist (
                catway_number WITH =,
                daterange(start_date, end_date, '[]') WITH &&
            )
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_reservations_start ON reservations (start_date DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Marina migrations complete");
    Ok(())
}
