//! Exercise library commands
//!
//! Every change reloads the snapshot used by exercise reminders.

use crate::app::AppState;
use breaktime_core::database::{CreateExerciseRequest, Exercise, UpdateExerciseRequest};
use breaktime_core::error::Result;
use breaktime_core::reminder::ExerciseItem;
use tauri::State;

#[tauri::command]
pub async fn list_exercises(state: State<'_, AppState>) -> Result<Vec<Exercise>> {
    state.exercises_service.list_exercises().await
}

#[tauri::command]
pub async fn create_exercise(
    state: State<'_, AppState>,
    request: CreateExerciseRequest,
) -> Result<Exercise> {
    let exercise = state.exercises_service.create_exercise(request).await?;
    reload_library(&state).await?;
    Ok(exercise)
}

#[tauri::command]
pub async fn update_exercise(
    state: State<'_, AppState>,
    request: UpdateExerciseRequest,
) -> Result<Exercise> {
    let exercise = state.exercises_service.update_exercise(request).await?;
    reload_library(&state).await?;
    Ok(exercise)
}

#[tauri::command]
pub async fn delete_exercise(state: State<'_, AppState>, id: String) -> Result<()> {
    state.exercises_service.delete_exercise(&id).await?;
    reload_library(&state).await
}

async fn reload_library(state: &AppState) -> Result<()> {
    let exercises = state.exercises_service.list_exercises().await?;
    let items = exercises.iter().map(ExerciseItem::from).collect();
    state.reminders_service.reload_exercises(items).await;
    Ok(())
}
