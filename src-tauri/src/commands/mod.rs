//! Tauri commands exposed to the frontend
//!
//! This module organizes commands into logical submodules:
//! - `reminders`: Reminder status, control and feedback
//! - `settings`: Application settings and autostart
//! - `exercises`: Exercise library CRUD
//! - `stats`: Activity statistics

pub mod exercises;
pub mod reminders;
pub mod settings;
pub mod stats;

use crate::app::AppState;
use breaktime_core::error::Result;
use tauri::State;

// Re-export all commands for convenient registration in main.rs
pub use exercises::*;
pub use reminders::*;
pub use settings::*;
pub use stats::*;

/// Get application information
#[tauri::command]
pub async fn get_app_info(state: State<'_, AppState>) -> Result<AppInfo> {
    Ok(AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_data_dir: state.app_data_dir.to_string_lossy().to_string(),
    })
}

/// Application information structure
#[derive(serde::Serialize)]
pub struct AppInfo {
    pub version: String,
    pub app_data_dir: String,
}
