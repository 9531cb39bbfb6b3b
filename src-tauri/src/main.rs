// Breaktime - desktop break reminders
// Entry point and application setup

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod commands;
mod config;
mod events;
#[cfg(target_os = "windows")]
mod platform;
mod tray;
mod window;

use std::sync::atomic::Ordering;
use tauri::{Manager, WindowEvent};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "breaktime=debug,breaktime_core=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Breaktime");

    tauri::Builder::default()
        .plugin(tauri_plugin_notification::init())
        .setup(|app| {
            tracing::info!("Running app setup");
            app::setup(app)?;
            Ok(())
        })
        .on_window_event(|window, event| {
            if let WindowEvent::CloseRequested { api, .. } = event {
                if window.label() != config::MAIN_WINDOW_LABEL {
                    return;
                }
                let hide = window
                    .try_state::<app::AppState>()
                    .is_some_and(|state| state.minimize_to_tray.load(Ordering::Relaxed));
                if hide {
                    api.prevent_close();
                    let _ = window.hide();
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_app_info,
            commands::get_reminder_status,
            commands::pause_reminder,
            commands::resume_reminder,
            commands::pause_all_reminders,
            commands::resume_all_reminders,
            commands::complete_reminder,
            commands::skip_exercise,
            commands::get_current_exercises,
            commands::get_settings,
            commands::update_reminder_settings,
            commands::update_user_settings,
            commands::update_behavior_settings,
            commands::get_autostart_state,
            commands::set_autostart,
            commands::list_exercises,
            commands::create_exercise,
            commands::update_exercise,
            commands::delete_exercise,
            commands::get_today_stats,
            commands::get_recent_activities,
            commands::get_calories_last_7_days,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
