//! Database schema and migrations
//!
//! This module handles database initialization, schema migrations and
//! seeding of the default exercise library.

use crate::config::{MET_HIGH, MET_MODERATE};
use crate::error::Result;
use chrono::Utc;
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

/// Exercises seeded into an empty library: (name, seconds, MET, intensity)
const DEFAULT_EXERCISES: &[(&str, i64, f64, &str)] = &[
    ("Jumping jacks", 30, MET_MODERATE, "moderate"),
    ("Bodyweight squats", 45, MET_MODERATE, "moderate"),
    ("High knees", 30, MET_MODERATE, "moderate"),
    ("Marching in place", 60, MET_MODERATE, "moderate"),
    ("Wall sit", 45, MET_MODERATE, "moderate"),
    ("Arm circles", 30, MET_MODERATE, "moderate"),
    ("Half burpees", 30, MET_HIGH, "high"),
    ("Mountain climbers", 30, MET_HIGH, "high"),
    ("Overhead press", 45, MET_MODERATE, "moderate"),
    ("Band rows", 45, MET_MODERATE, "moderate"),
];

/// Initialize database with schema and default data
pub async fn initialize_database(pool: &SqlitePool) -> Result<()> {
    run_migrations(pool).await?;
    seed_default_exercises(pool).await?;
    Ok(())
}

/// Bring the schema up to the latest migration
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    tracing::info!("Initializing database schema");

    // Enable WAL mode for better performance and crash safety
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current_version: i32 = sqlx::query("SELECT COALESCE(MAX(version), 0) FROM migrations")
        .fetch_one(pool)
        .await?
        .get(0);

    tracing::info!("Current database version: {}", current_version);

    apply_migrations(pool, current_version).await?;

    tracing::info!("Database schema up to date");
    Ok(())
}

async fn apply_migrations(pool: &SqlitePool, current_version: i32) -> Result<()> {
    let migrations = get_migrations();

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Applying migration version {}", version);

            let mut tx = pool.begin().await?;

            for statement in sql.split(';').filter(|s| !s.trim().is_empty()) {
                sqlx::query(statement).execute(&mut *tx).await?;
            }

            sqlx::query("INSERT INTO migrations (version) VALUES (?)")
                .bind(version)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;

            tracing::info!("Migration version {} applied successfully", version);
        }
    }

    Ok(())
}

fn get_migrations() -> Vec<(i32, &'static str)> {
    vec![(1, include_str!("migrations/001_initial_schema.sql"))]
}

/// Fill an empty exercise library with the defaults.
///
/// Returns how many exercises were inserted; zero when the library
/// already has entries.
pub async fn seed_default_exercises(pool: &SqlitePool) -> Result<usize> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let now = Utc::now();

    for (name, duration, met, category) in DEFAULT_EXERCISES {
        sqlx::query(
            r#"
            INSERT INTO exercises (id, name, duration_seconds, met_value, category, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(*name)
        .bind(*duration)
        .bind(*met)
        .bind(*category)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!("Seeded {} default exercises", DEFAULT_EXERCISES.len());
    Ok(DEFAULT_EXERCISES.len())
}
