//! System tray icon and menu
//!
//! - Pause/Resume all reminders
//! - Show the dashboard
//! - Quit

use crate::app::AppState;
use crate::window;
use tauri::{
    menu::{Menu, MenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    App, AppHandle, Manager, Wry,
};

const PAUSE_LABEL: &str = "Pause reminders";
const RESUME_LABEL: &str = "Resume reminders";

/// Menu entries whose text follows the reminder state
struct TrayMenu {
    toggle: MenuItem<Wry>,
}

pub fn setup(app: &App) -> tauri::Result<()> {
    let toggle = MenuItem::with_id(app, "toggle", PAUSE_LABEL, true, None::<&str>)?;
    let show = MenuItem::with_id(app, "show", "Show Breaktime", true, None::<&str>)?;
    let quit = MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?;

    let menu = Menu::with_items(app, &[&toggle, &show, &quit])?;

    let mut builder = TrayIconBuilder::new()
        .tooltip("Breaktime")
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| match event.id().as_ref() {
            "toggle" => toggle_reminders(app),
            "show" => window::show_main_window(app),
            "quit" => {
                tracing::info!("Quit requested via tray menu");
                app.exit(0);
            }
            _ => {}
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                window::show_main_window(tray.app_handle());
            }
        });

    if let Some(icon) = app.default_window_icon() {
        builder = builder.icon(icon.clone());
    }

    builder.build(app)?;
    app.manage(TrayMenu { toggle });

    Ok(())
}

/// Flip between paused and running from the tray
fn toggle_reminders(app: &AppHandle) {
    let reminders = app.state::<AppState>().reminders_service.clone();
    let app = app.clone();

    tauri::async_runtime::spawn(async move {
        let paused = if reminders.is_paused().await {
            reminders.resume_all().await;
            false
        } else {
            reminders.pause_all().await;
            true
        };
        set_paused(&app, paused);
    });
}

/// Update the toggle entry to match the reminder state
pub fn set_paused(app: &AppHandle, paused: bool) {
    let Some(menu) = app.try_state::<TrayMenu>() else {
        return;
    };
    let label = if paused { RESUME_LABEL } else { PAUSE_LABEL };
    if let Err(e) = menu.toggle.set_text(label) {
        tracing::warn!("Failed to update tray menu: {}", e);
    }
}
