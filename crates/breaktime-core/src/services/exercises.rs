//! Exercises service
//!
//! CRUD over the exercise library, and the in-memory snapshot the reminder
//! engine samples from.

use crate::config::MAX_EXERCISE_DURATION_SECONDS;
use crate::database::{CreateExerciseRequest, Exercise, Repository, UpdateExerciseRequest};
use crate::error::{AppError, Result};
use crate::reminder::{ExerciseCatalog, ExerciseItem};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Snapshot of the exercise library used to pick reminder exercises
pub struct ExerciseLibrary {
    exercises: Vec<ExerciseItem>,
    rng: StdRng,
}

impl ExerciseLibrary {
    pub fn new(exercises: Vec<ExerciseItem>) -> Self {
        Self::with_rng(exercises, StdRng::from_entropy())
    }

    pub fn with_rng(exercises: Vec<ExerciseItem>, rng: StdRng) -> Self {
        Self { exercises, rng }
    }

    pub fn from_exercises(exercises: &[Exercise]) -> Self {
        Self::new(exercises.iter().map(ExerciseItem::from).collect())
    }

    /// Replace the snapshot, keeping the random source
    pub fn replace(&mut self, exercises: Vec<ExerciseItem>) {
        self.exercises = exercises;
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

impl ExerciseCatalog for ExerciseLibrary {
    /// Distinct exercises in random order; the whole library when
    /// `count` exceeds its size
    fn random_exercises(&mut self, count: usize) -> Vec<ExerciseItem> {
        self.exercises
            .choose_multiple(&mut self.rng, count)
            .cloned()
            .collect()
    }
}

/// Service for managing the exercise library
#[derive(Clone)]
pub struct ExercisesService {
    repo: Repository,
}

impl ExercisesService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        self.repo.list_exercises().await
    }

    pub async fn get_exercise(&self, id: &str) -> Result<Exercise> {
        self.repo.get_exercise(id).await
    }

    pub async fn create_exercise(&self, req: CreateExerciseRequest) -> Result<Exercise> {
        validate_fields(Some(&req.name), Some(req.duration_seconds), req.met_value)?;
        tracing::info!("Creating exercise: {}", req.name);
        self.repo.create_exercise(req).await
    }

    pub async fn update_exercise(&self, req: UpdateExerciseRequest) -> Result<Exercise> {
        validate_fields(req.name.as_deref(), req.duration_seconds, req.met_value)?;
        tracing::info!("Updating exercise: {}", req.id);
        self.repo.update_exercise(req).await
    }

    pub async fn delete_exercise(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting exercise: {}", id);
        self.repo.delete_exercise(id).await
    }

    /// Load the current library for the reminder engine
    pub async fn load_library(&self) -> Result<ExerciseLibrary> {
        let exercises = self.repo.list_exercises().await?;
        Ok(ExerciseLibrary::from_exercises(&exercises))
    }
}

fn validate_fields(name: Option<&str>, duration: Option<i64>, met: Option<f64>) -> Result<()> {
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(AppError::Generic("Exercise name must not be empty".to_string()));
        }
    }
    if let Some(duration) = duration {
        if duration <= 0 || duration > MAX_EXERCISE_DURATION_SECONDS {
            return Err(AppError::Generic(format!(
                "Exercise duration must be between 1 and {} seconds",
                MAX_EXERCISE_DURATION_SECONDS
            )));
        }
    }
    if let Some(met) = met {
        if met.is_nan() || met <= 0.0 {
            return Err(AppError::Generic("MET value must be positive".to_string()));
        }
    }
    Ok(())
}
