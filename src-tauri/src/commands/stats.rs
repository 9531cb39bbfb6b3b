//! Activity statistics commands

use crate::app::AppState;
use crate::config::{DEFAULT_RECENT_ACTIVITY_LIMIT, MAX_RECENT_ACTIVITY_LIMIT};
use breaktime_core::database::{ActivityLog, DailyCalories, DailyStats};
use breaktime_core::error::Result;
use tauri::State;

/// Totals for the current local day
#[tauri::command]
pub async fn get_today_stats(state: State<'_, AppState>) -> Result<DailyStats> {
    state.activity_service.today_stats().await
}

/// Latest activity entries, newest first
#[tauri::command]
pub async fn get_recent_activities(
    state: State<'_, AppState>,
    limit: Option<u32>,
) -> Result<Vec<ActivityLog>> {
    let limit = limit
        .unwrap_or(DEFAULT_RECENT_ACTIVITY_LIMIT)
        .min(MAX_RECENT_ACTIVITY_LIMIT);
    state.activity_service.recent(limit).await
}

/// Calories per day for the last week, today first
#[tauri::command]
pub async fn get_calories_last_7_days(state: State<'_, AppState>) -> Result<Vec<DailyCalories>> {
    state.activity_service.calories_last_7_days().await
}
