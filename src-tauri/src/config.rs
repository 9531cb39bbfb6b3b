//! Shell configuration constants
//!
//! Window dimensions and labels used by the desktop shell. Scheduling
//! limits live in `breaktime_core::config`.

// ===== Window Labels =====

/// Label of the dashboard window declared in tauri.conf.json
pub const MAIN_WINDOW_LABEL: &str = "main";

/// Label of the window shown when a reminder fires
pub const REMINDER_WINDOW_LABEL: &str = "reminder";

// ===== Reminder Window Dimensions =====

/// Width of the reminder window in logical pixels
pub const REMINDER_WINDOW_WIDTH: f64 = 420.0;
/// Height of the reminder window in logical pixels
pub const REMINDER_WINDOW_HEIGHT: f64 = 360.0;

// ===== Statistics =====

/// Activity entries returned when the caller gives no limit
pub const DEFAULT_RECENT_ACTIVITY_LIMIT: u32 = 20;

/// Upper bound on requested recent activity entries
pub const MAX_RECENT_ACTIVITY_LIMIT: u32 = 500;
