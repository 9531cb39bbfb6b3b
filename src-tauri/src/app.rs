//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::events::DesktopNotifier;
use crate::tray;
use breaktime_core::database::{create_pool, Repository};
use breaktime_core::error::{AppError, Result};
use breaktime_core::reminder::Expiry;
use breaktime_core::services::{
    ActivityService, AppSettings, ExercisesService, RemindersService, SettingsService,
};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tauri::{App, Manager};
use tauri_plugin_notification::NotificationExt;
use tokio::sync::mpsc::UnboundedReceiver;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub settings_service: SettingsService,
    pub exercises_service: ExercisesService,
    pub activity_service: ActivityService,
    pub reminders_service: RemindersService,
    /// Mirrors `behavior.minimize_to_tray` for the close handler
    pub minimize_to_tray: Arc<AtomicBool>,
}

impl AppState {
    /// Open storage, load settings and build every service
    async fn initialize(
        app_data_dir: PathBuf,
    ) -> Result<(Self, AppSettings, UnboundedReceiver<Expiry>)> {
        let pool = create_pool(&app_data_dir.join("breaktime.db")).await?;
        let repo = Repository::new(pool);

        let settings_service = SettingsService::new(app_data_dir.clone());
        let settings = settings_service.load().await?;

        let exercises_service = ExercisesService::new(repo.clone());
        let activity_service = ActivityService::new(repo);
        let library = exercises_service.load_library().await?;
        tracing::info!("Loaded {} exercises", library.len());

        let (reminders_service, expiries) = RemindersService::with_tokio_timers(
            &settings,
            library,
            activity_service.clone(),
        );

        let state = Self {
            app_data_dir,
            settings_service,
            exercises_service,
            activity_service,
            reminders_service,
            minimize_to_tray: Arc::new(AtomicBool::new(settings.behavior.minimize_to_tray)),
        };

        Ok((state, settings, expiries))
    }
}

/// Application setup - called once on startup
pub fn setup(app: &mut App) -> Result<()> {
    tracing::info!("Initializing application");

    let app_data_dir = app
        .path()
        .app_data_dir()
        .map_err(|e| AppError::Generic(format!("Failed to get app data dir: {}", e)))?;

    tracing::info!("App data directory: {:?}", app_data_dir);
    std::fs::create_dir_all(&app_data_dir)?;

    let (state, settings, expiries) =
        tauri::async_runtime::block_on(AppState::initialize(app_data_dir))?;

    // Subscribe before the first timer can be armed
    let reminders = state.reminders_service.clone();
    let notifier = DesktopNotifier::new(app.handle().clone());
    tauri::async_runtime::spawn(async move {
        reminders.subscribe(Box::new(notifier)).await;
        reminders.start_scheduler(expiries);
    });

    app.manage(state);

    tray::setup(app)
        .map_err(|e| AppError::Generic(format!("Failed to create tray icon: {}", e)))?;

    if settings.behavior.show_startup_notification {
        if let Err(e) = app
            .notification()
            .builder()
            .title("Breaktime")
            .body("Break reminders are running in the tray.")
            .show()
        {
            tracing::warn!("Failed to show startup notification: {}", e);
        }
    }

    tracing::info!("Application initialized successfully");

    Ok(())
}
