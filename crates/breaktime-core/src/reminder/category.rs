//! Reminder categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three kinds of break reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderCategory {
    Stand,
    Exercise,
    Gaze,
}

impl ReminderCategory {
    pub const ALL: [ReminderCategory; 3] = [
        ReminderCategory::Stand,
        ReminderCategory::Exercise,
        ReminderCategory::Gaze,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReminderCategory::Stand => "stand",
            ReminderCategory::Exercise => "exercise",
            ReminderCategory::Gaze => "gaze",
        }
    }
}

impl fmt::Display for ReminderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stand" => Ok(ReminderCategory::Stand),
            "exercise" => Ok(ReminderCategory::Exercise),
            "gaze" => Ok(ReminderCategory::Gaze),
            other => Err(format!(
                "Unknown reminder category '{}'. Use 'stand', 'exercise' or 'gaze'",
                other
            )),
        }
    }
}
