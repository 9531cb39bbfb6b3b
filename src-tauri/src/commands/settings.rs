//! Settings-related commands
//!
//! Commands for reminder, user profile and behavior settings, plus
//! autostart. Reminder changes are applied to the running engine.

use crate::app::AppState;
use breaktime_core::error::{AppError, Result};
use breaktime_core::services::{AppSettings, BehaviorSettings, ReminderSettings, UserSettings};
use std::sync::atomic::Ordering;
use tauri::State;

/// Get all settings
#[tauri::command]
pub async fn get_settings(state: State<'_, AppState>) -> Result<AppSettings> {
    state.settings_service.load().await
}

/// Validate, persist and apply reminder settings.
/// Armed timers keep their delay; the next arm uses the new values.
#[tauri::command]
pub async fn update_reminder_settings(
    state: State<'_, AppState>,
    reminders: ReminderSettings,
) -> Result<()> {
    state
        .settings_service
        .update_reminders(reminders.clone())
        .await?;
    state.reminders_service.apply_settings(reminders).await;
    Ok(())
}

/// Validate, persist and apply the user profile
#[tauri::command]
pub async fn update_user_settings(state: State<'_, AppState>, user: UserSettings) -> Result<()> {
    state.settings_service.update_user(user.clone()).await?;
    state.reminders_service.set_weight(user.weight_kg).await;
    Ok(())
}

#[tauri::command]
pub async fn update_behavior_settings(
    state: State<'_, AppState>,
    behavior: BehaviorSettings,
) -> Result<()> {
    state
        .settings_service
        .update_behavior(behavior.clone())
        .await?;
    state
        .minimize_to_tray
        .store(behavior.minimize_to_tray, Ordering::Relaxed);
    Ok(())
}

// ===== Autostart Settings =====

/// Check if application autostart is enabled (Windows only)
#[tauri::command]
pub fn get_autostart_state() -> Result<bool> {
    #[cfg(target_os = "windows")]
    {
        crate::platform::check_autostart_state()
            .map_err(|e| AppError::Generic(format!("Failed to check autostart state: {}", e)))
    }
    #[cfg(not(target_os = "windows"))]
    {
        Ok(false)
    }
}

/// Enable or disable application autostart (Windows only)
#[tauri::command]
pub async fn set_autostart(enabled: bool) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        let result = if enabled {
            crate::platform::enable_autostart()
        } else {
            crate::platform::disable_autostart()
        };
        result.map_err(|e| AppError::Generic(format!("Failed to update autostart: {}", e)))
    }
    #[cfg(not(target_os = "windows"))]
    {
        let _ = enabled;
        Err(AppError::Generic(
            "Autostart is only supported on Windows".to_string(),
        ))
    }
}
