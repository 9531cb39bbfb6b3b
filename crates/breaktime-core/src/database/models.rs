//! Database models
//!
//! Rust structs representing database entities.
//! All models use serde for serialization to frontend.

use crate::calories::Intensity;
use crate::reminder::ExerciseItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An exercise in the user's library
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub duration_seconds: i64,
    pub met_value: f64,
    /// Intensity label, "moderate" or "high" for the defaults
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Exercise> for ExerciseItem {
    fn from(exercise: &Exercise) -> Self {
        Self {
            id: exercise.id.clone(),
            name: exercise.name.clone(),
            duration_seconds: u32::try_from(exercise.duration_seconds).unwrap_or(0),
            met_value: exercise.met_value,
        }
    }
}

/// Create exercise request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExerciseRequest {
    pub name: String,
    pub duration_seconds: i64,
    /// Derived from `category` when absent
    pub met_value: Option<f64>,
    pub category: String,
}

impl CreateExerciseRequest {
    /// Explicit MET value, or the preset for the intensity label
    pub fn resolved_met_value(&self) -> f64 {
        self.met_value
            .unwrap_or_else(|| Intensity::from_label(&self.category).met_value())
    }
}

/// Update exercise request
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExerciseRequest {
    pub id: String,
    pub name: Option<String>,
    pub duration_seconds: Option<i64>,
    pub met_value: Option<f64>,
    pub category: Option<String>,
}

/// One completed or skipped reminder
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLog {
    pub id: String,
    /// "stand", "exercise" or "gaze"
    pub activity_type: String,
    pub duration_seconds: i64,
    pub calories_burned: f64,
    pub completed: bool,
    pub skipped: bool,
    pub timestamp: DateTime<Utc>,
}

/// Aggregated activity for a single day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub stand_count: u32,
    pub stand_duration: i64,
    pub exercise_count: u32,
    pub exercise_duration: i64,
    pub exercise_calories: f64,
    pub exercise_skipped: u32,
    pub gaze_count: u32,
    pub gaze_duration: i64,
}

impl DailyStats {
    /// Fold a day's log entries into totals.
    /// Only completed entries count, except for the exercise skip tally.
    pub fn from_logs(logs: &[ActivityLog]) -> Self {
        let mut stats = Self::default();

        for log in logs {
            match (log.activity_type.as_str(), log.completed) {
                ("stand", true) => {
                    stats.stand_count += 1;
                    stats.stand_duration += log.duration_seconds;
                }
                ("exercise", true) => {
                    stats.exercise_count += 1;
                    stats.exercise_duration += log.duration_seconds;
                    stats.exercise_calories += log.calories_burned;
                }
                ("exercise", false) if log.skipped => {
                    stats.exercise_skipped += 1;
                }
                ("gaze", true) => {
                    stats.gaze_count += 1;
                    stats.gaze_duration += log.duration_seconds;
                }
                _ => {}
            }
        }

        stats
    }
}

/// Calories burned on one day, labelled for charting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCalories {
    /// "MM-DD"
    pub date: String,
    pub calories: f64,
}
