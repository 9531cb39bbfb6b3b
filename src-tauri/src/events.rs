//! Forwards fired reminders to the desktop
//!
//! Each fire is emitted to the frontend as a typed event, announced with a
//! system notification, and surfaced in the reminder window.

use crate::window;
use breaktime_core::reminder::{ReminderEvent, ReminderObserver};
use tauri::{AppHandle, Emitter};
use tauri_plugin_notification::NotificationExt;

pub struct DesktopNotifier {
    app: AppHandle,
}

impl DesktopNotifier {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn notify(&self, event: &ReminderEvent) {
        let (title, body) = notification_text(event);

        if let Err(e) = self
            .app
            .notification()
            .builder()
            .title(title)
            .body(body)
            .show()
        {
            tracing::error!("Failed to send notification: {}", e);
        }
    }
}

impl ReminderObserver for DesktopNotifier {
    fn reminder_fired(&self, event: &ReminderEvent) {
        if let Err(e) = self.app.emit(event.event_name(), event.clone()) {
            tracing::error!("Failed to emit {}: {}", event.event_name(), e);
        }

        self.notify(event);

        // Windows must be built on the main thread
        let app = self.app.clone();
        let category = event.category();
        let scheduled = self.app.run_on_main_thread(move || {
            if let Err(e) = window::show_reminder_window(&app, category) {
                tracing::error!("Failed to open reminder window: {}", e);
            }
        });
        if let Err(e) = scheduled {
            tracing::error!("Failed to schedule reminder window: {}", e);
        }
    }
}

fn notification_text(event: &ReminderEvent) -> (&'static str, String) {
    match event {
        ReminderEvent::Stand(fired) => (
            "Time to stand up",
            format!("Stand and stretch for {} seconds.", fired.duration_seconds),
        ),
        ReminderEvent::Gaze(fired) => (
            "Rest your eyes",
            format!(
                "Look at something far away for {} seconds.",
                fired.duration_seconds
            ),
        ),
        ReminderEvent::Exercise(fired) => {
            let names: Vec<&str> = fired.items.iter().map(|item| item.name.as_str()).collect();
            let title = if fired.escalated {
                "You have skipped a few, let's move"
            } else {
                "Exercise break"
            };
            (title, names.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breaktime_core::reminder::{
        ExerciseItem, ExerciseReminderFired, GazeReminderFired, StandReminderFired,
    };

    #[test]
    fn test_notification_text_per_category() {
        let (title, body) =
            notification_text(&ReminderEvent::Stand(StandReminderFired { duration_seconds: 90 }));
        assert_eq!(title, "Time to stand up");
        assert!(body.contains("90"));

        let (_, body) =
            notification_text(&ReminderEvent::Gaze(GazeReminderFired { duration_seconds: 20 }));
        assert!(body.contains("20"));
    }

    #[test]
    fn test_exercise_notification_lists_items() {
        let item = |name: &str| ExerciseItem {
            id: name.to_string(),
            name: name.to_string(),
            duration_seconds: 30,
            met_value: 6.0,
        };
        let event = ReminderEvent::Exercise(ExerciseReminderFired {
            items: vec![item("Squats"), item("Wall sit")],
            escalated: true,
        });

        let (title, body) = notification_text(&event);
        assert_ne!(title, "Exercise break");
        assert_eq!(body, "Squats, Wall sit");
    }
}
