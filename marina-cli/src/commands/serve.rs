//! `marina serve` - run the HTTP server
//!
//! Uses PostgreSQL when a database URL is given (migrations run on start),
//! otherwise a process-local in-memory store.

use anyhow::{ensure, Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use marina_server::auth::{DEFAULT_SESSION_TTL_HOURS, MAX_SESSION_TTL_HOURS};
use marina_server::db::{create_pool, migrations};
use marina_server::http::{run_server, ServerConfig};
use marina_server::AppState;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// PostgreSQL URL; without one, data lives in memory and is lost on exit
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Lifetime of login sessions, in hours
    #[arg(long, env = "MARINA_SESSION_TTL_HOURS", default_value_t = DEFAULT_SESSION_TTL_HOURS)]
    pub session_ttl_hours: i64,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    ensure!(
        args.session_ttl_hours > 0,
        "--session-ttl-hours must be positive (got {})",
        args.session_ttl_hours
    );
    ensure!(
        args.session_ttl_hours <= MAX_SESSION_TTL_HOURS,
        "--session-ttl-hours must be at most {} (got {})",
        MAX_SESSION_TTL_HOURS,
        args.session_ttl_hours
    );
    let ttl = chrono::Duration::try_hours(args.session_ttl_hours)
        .context("--session-ttl-hours is out of range")?;

    let state = match args.database_url.as_deref().filter(|url| !url.trim().is_empty()) {
        Some(url) => {
            let pool = create_pool(url)
                .await
                .context("Failed to create database pool")?;
            migrations::run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Using PostgreSQL store");
            AppState::postgres(pool, ttl)
        }
        None => {
            tracing::warn!("DATABASE_URL not set - using in-memory store, data will not persist");
            AppState::in_memory(ttl)
        }
    };

    tracing::info!("Starting marina server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Blocks until shutdown
    run_server(state, config).await.context("Server error")?;

    Ok(())
}
