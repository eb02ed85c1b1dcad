//! Postgres pool for the hosted database
//!
//! The hosted project exposes both a direct port and a transaction-mode
//! pooler (PgBouncer, port 6543). The pooler cannot keep prepared statements
//! across transactions, so the statement cache is turned off when it is used.

use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::str::FromStr;
use std::time::Duration;

use crate::config::Settings;

const TRANSACTION_POOLER_PORT: u16 = 6543;

pub async fn create_pool(settings: &Settings) -> Result<PgPool> {
    let mut connect_options = PgConnectOptions::from_str(&settings.database_url)
        .context("Invalid DATABASE_URL")?
        .application_name("agrom-backend");

    let via_pooler = connect_options.get_port() == TRANSACTION_POOLER_PORT;
    if via_pooler {
        connect_options = connect_options.statement_cache_capacity(0);
    }

    let pool = PgPoolOptions::new()
        .max_connections(settings.database_max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .connect_with(connect_options)
        .await
        .context("Failed to connect to PostgreSQL")?;

    tracing::info!(
        max_connections = settings.database_max_connections,
        via_pooler,
        "Database pool ready"
    );

    Ok(pool)
}

/// `SELECT 1` with a short deadline so /health never hangs on a dead pool
pub async fn health_check(pool: &PgPool) -> bool {
    let ping = sqlx::query("SELECT 1").fetch_one(pool);
    matches!(tokio::time::timeout(Duration::from_secs(2), ping).await, Ok(Ok(_)))
}
