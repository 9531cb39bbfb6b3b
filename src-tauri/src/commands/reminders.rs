//! Reminder-related commands
//!
//! Status queries, per-category and global pause/resume, and the
//! completion/skip feedback sent by the reminder window.

use crate::app::AppState;
use crate::tray;
use breaktime_core::database::ActivityLog;
use breaktime_core::error::Result;
use breaktime_core::reminder::{ExerciseItem, ReminderCategory};
use breaktime_core::services::ReminderStatus;
use tauri::State;

/// Current state of every reminder category
#[tauri::command]
pub async fn get_reminder_status(state: State<'_, AppState>) -> Result<ReminderStatus> {
    Ok(state.reminders_service.status().await)
}

/// Stop one category until it is resumed
#[tauri::command]
pub async fn pause_reminder(state: State<'_, AppState>, category: ReminderCategory) -> Result<()> {
    state.reminders_service.pause(category).await;
    Ok(())
}

/// Re-arm one category with a fresh delay
#[tauri::command]
pub async fn resume_reminder(
    state: State<'_, AppState>,
    category: ReminderCategory,
) -> Result<()> {
    state.reminders_service.resume(category).await
}

#[tauri::command]
pub async fn pause_all_reminders(app: tauri::AppHandle, state: State<'_, AppState>) -> Result<()> {
    state.reminders_service.pause_all().await;
    tray::set_paused(&app, true);
    Ok(())
}

#[tauri::command]
pub async fn resume_all_reminders(app: tauri::AppHandle, state: State<'_, AppState>) -> Result<()> {
    state.reminders_service.resume_all().await;
    tray::set_paused(&app, false);
    Ok(())
}

/// Record that the user finished a reminder
#[tauri::command]
pub async fn complete_reminder(
    state: State<'_, AppState>,
    category: ReminderCategory,
) -> Result<ActivityLog> {
    state.reminders_service.complete(category).await
}

/// Record that the user skipped an exercise reminder
#[tauri::command]
pub async fn skip_exercise(state: State<'_, AppState>) -> Result<ActivityLog> {
    state.reminders_service.skip_exercise().await
}

/// Exercises offered by the latest exercise reminder
#[tauri::command]
pub async fn get_current_exercises(state: State<'_, AppState>) -> Result<Vec<ExerciseItem>> {
    Ok(state.reminders_service.current_exercises().await)
}
