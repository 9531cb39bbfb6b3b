//! Repository layer for database operations
//!
//! This module provides CRUD operations for the exercise library and
//! append/query operations for the activity log.

use super::models::*;
use crate::error::{AppError, Result};
use crate::reminder::ReminderCategory;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ===== Exercises =====

    /// List the whole exercise library
    pub async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT * FROM exercises ORDER BY category ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(exercises)
    }

    /// Get an exercise by ID
    pub async fn get_exercise(&self, id: &str) -> Result<Exercise> {
        sqlx::query_as::<_, Exercise>("SELECT * FROM exercises WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::ExerciseNotFound(id.to_string()))
    }

    /// Add an exercise to the library
    pub async fn create_exercise(&self, req: CreateExerciseRequest) -> Result<Exercise> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let exercise = sqlx::query_as::<_, Exercise>(
            r#"
            INSERT INTO exercises (id, name, duration_seconds, met_value, category, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.name)
        .bind(req.duration_seconds)
        .bind(req.resolved_met_value())
        .bind(&req.category)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created exercise: {} ({})", exercise.name, id);
        Ok(exercise)
    }

    /// Update the provided fields of an exercise
    pub async fn update_exercise(&self, req: UpdateExerciseRequest) -> Result<Exercise> {
        let rows = sqlx::query(
            r#"
            UPDATE exercises SET
                name = COALESCE(?, name),
                duration_seconds = COALESCE(?, duration_seconds),
                met_value = COALESCE(?, met_value),
                category = COALESCE(?, category)
            WHERE id = ?
            "#,
        )
        .bind(&req.name)
        .bind(req.duration_seconds)
        .bind(req.met_value)
        .bind(&req.category)
        .bind(&req.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::ExerciseNotFound(req.id));
        }

        tracing::debug!("Updated exercise: {}", req.id);
        self.get_exercise(&req.id).await
    }

    /// Remove an exercise from the library
    pub async fn delete_exercise(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM exercises WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ExerciseNotFound(id.to_string()));
        }

        tracing::debug!("Deleted exercise: {}", id);
        Ok(())
    }

    // ===== Activity log =====

    /// Append an activity entry. Incomplete entries are recorded as skipped.
    pub async fn log_activity(
        &self,
        category: ReminderCategory,
        duration_seconds: i64,
        calories_burned: f64,
        completed: bool,
    ) -> Result<ActivityLog> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let log = sqlx::query_as::<_, ActivityLog>(
            r#"
            INSERT INTO activity_logs
                (id, activity_type, duration_seconds, calories_burned, completed, skipped, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(category.as_str())
        .bind(duration_seconds)
        .bind(calories_burned)
        .bind(completed)
        .bind(!completed)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(
            "Logged {} activity: {}s, {} kcal, completed={}",
            category,
            duration_seconds,
            calories_burned,
            completed
        );
        Ok(log)
    }

    /// Entries with `start <= timestamp < end`, oldest first
    pub async fn activities_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ActivityLog>> {
        let logs = sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT * FROM activity_logs
            WHERE timestamp >= ? AND timestamp < ?
            ORDER BY timestamp ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// Most recent entries, newest first
    pub async fn recent_activities(&self, limit: i64) -> Result<Vec<ActivityLog>> {
        let logs = sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT * FROM activity_logs ORDER BY timestamp DESC LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
