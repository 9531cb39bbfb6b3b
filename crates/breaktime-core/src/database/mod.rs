//! Database module
//!
//! This module provides all database functionality including:
//! - Schema and migrations
//! - Model definitions
//! - Repository layer for exercises and the activity log

pub mod models;
pub mod repository;
pub mod schema;

pub use models::*;
pub use repository::Repository;
pub use schema::initialize_database;

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

/// Connections held by the pool the services share
const APP_POOL_CONNECTIONS: u32 = 5;

/// Open a pool of `connections` on the activity database, creating the file
/// if needed
async fn open_pool(db_path: &Path, connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Open the exercise and activity database at `db_path`.
///
/// On a single setup connection the schema is migrated and an empty
/// exercise library receives the default exercises. The shared pool is
/// opened once that connection is closed.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    tracing::info!("Opening activity database at: {:?}", db_path);

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let setup = open_pool(db_path, 1).await?;
    schema::run_migrations(&setup).await?;
    let seeded = schema::seed_default_exercises(&setup).await?;
    setup.close().await;

    if seeded > 0 {
        tracing::info!("New exercise library created with {} exercises", seeded);
    }

    let pool = open_pool(db_path, APP_POOL_CONNECTIONS).await?;
    tracing::info!("Activity database ready");

    Ok(pool)
}
