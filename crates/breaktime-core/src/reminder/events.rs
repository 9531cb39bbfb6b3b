//! Events emitted to the UI layer when a reminder fires

use super::ReminderCategory;
use serde::{Deserialize, Serialize};

/// One exercise offered by an exercise reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseItem {
    pub id: String,
    pub name: String,
    pub duration_seconds: u32,
    pub met_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandReminderFired {
    pub duration_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseReminderFired {
    pub items: Vec<ExerciseItem>,
    /// Stricter dialog variant after repeated skips
    pub escalated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GazeReminderFired {
    pub duration_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum ReminderEvent {
    Stand(StandReminderFired),
    Exercise(ExerciseReminderFired),
    Gaze(GazeReminderFired),
}

impl ReminderEvent {
    pub fn category(&self) -> ReminderCategory {
        match self {
            ReminderEvent::Stand(_) => ReminderCategory::Stand,
            ReminderEvent::Exercise(_) => ReminderCategory::Exercise,
            ReminderEvent::Gaze(_) => ReminderCategory::Gaze,
        }
    }

    /// Name used when forwarding the event to the frontend
    pub fn event_name(&self) -> &'static str {
        match self {
            ReminderEvent::Stand(_) => "stand-reminder",
            ReminderEvent::Exercise(_) => "exercise-reminder",
            ReminderEvent::Gaze(_) => "gaze-reminder",
        }
    }
}

/// Receives fired reminders. Delivery is fire-and-forget: the dispatcher
/// does not wait for the user to respond.
pub trait ReminderObserver: Send {
    fn reminder_fired(&self, event: &ReminderEvent);
}
