//! Window management for the reminder dialog and dashboard

use crate::config::{
    MAIN_WINDOW_LABEL, REMINDER_WINDOW_HEIGHT, REMINDER_WINDOW_LABEL, REMINDER_WINDOW_WIDTH,
};
use breaktime_core::reminder::ReminderCategory;
use tauri::webview::Color;
use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

/// Dark background color to prevent white flash when opening windows
const WINDOW_BACKGROUND_COLOR: Color = Color(26, 26, 26, 255);

/// Show and focus the dashboard window
pub fn show_main_window(app: &AppHandle) {
    if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        let _ = window.unminimize();
        let _ = window.show();
        let _ = window.set_focus();
    }
}

/// Open the reminder dialog for `category`, or bring an open one forward.
/// Returns whether a new window was created.
pub fn show_reminder_window(app: &AppHandle, category: ReminderCategory) -> tauri::Result<bool> {
    if let Some(window) = app.get_webview_window(REMINDER_WINDOW_LABEL) {
        // An open dialog picks up the new reminder from the emitted event
        tracing::debug!("Focusing existing reminder window for {}", category);
        let _ = window.unminimize();
        let _ = window.show();
        let _ = window.set_focus();
        return Ok(false);
    }

    let url = format!("reminder.html?category={}", category);
    WebviewWindowBuilder::new(app, REMINDER_WINDOW_LABEL, WebviewUrl::App(url.into()))
        .title("Time for a break")
        .inner_size(REMINDER_WINDOW_WIDTH, REMINDER_WINDOW_HEIGHT)
        .resizable(false)
        .always_on_top(true)
        .center()
        .focused(true)
        .background_color(WINDOW_BACKGROUND_COLOR)
        .build()?;

    tracing::info!("Reminder window opened for {}", category);
    Ok(true)
}
