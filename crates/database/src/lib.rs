//! SQLite persistence for the roster backend.
//!
//! Owns the schema, the connection pool, and the repositories the service
//! layer talks to. All timestamps are stored as RFC 3339 TEXT.

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::{run_migrations, MIGRATOR};

use anyhow::Result;
use roster_config::DatabaseConfig;
use sqlx::SqlitePool;

/// Connect to the configured database and bring the schema up to date.
pub async fn initialize_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    let pool = prepare_database(config).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
