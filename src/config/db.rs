// src/config/db.rs
// DOCUMENTATION: Database connection pool initialization
// PURPOSE: Setup the PostgreSQL pool backing PgStorage

use crate::config::Config;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Initialize PostgreSQL connection pool
/// DOCUMENTATION: Called once during startup when STORAGE_BACKEND is
/// postgres; the resulting pool is owned by PgStorage
pub async fn init_db_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    log::info!(
        "Connecting to PostgreSQL ({} max connections)",
        config.db_max_connections
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(1)
        // Timeout waiting for a connection from the pool
        .acquire_timeout(Duration::from_secs(config.db_connection_timeout))
        // Recycle idle connections after 10 minutes
        .idle_timeout(Duration::from_secs(600))
        .connect(&config.database_url)
        .await?;

    // Fail fast on a pool that cannot serve queries
    sqlx::query("SELECT 1").execute(&pool).await?;

    log::info!("Database pool ready");
    Ok(pool)
}
