//! Application configuration constants
//!
//! Central location for scheduling constants, default values,
//! and validation boundaries used throughout the application.

// ===== Scheduling =====

/// Lower bound of any drawn reminder interval in minutes.
/// `average - offset` is clamped up to this value.
pub const MIN_INTERVAL_MINUTES: u32 = 5;

/// Advisory cooldown window after a reminder fires
pub const COOLDOWN_SECONDS: i64 = 120;

/// Consecutive exercise skips after which the next exercise reminder escalates
pub const DEFAULT_ESCALATION_THRESHOLD: u32 = 2;

// ===== Reminder Defaults =====

pub const DEFAULT_GLOBAL_OFFSET_MINUTES: u32 = 15;

pub const DEFAULT_STAND_INTERVAL_MINUTES: u32 = 45;
pub const DEFAULT_STAND_DURATION_SECONDS: u32 = 90;

pub const DEFAULT_EXERCISE_INTERVAL_MINUTES: u32 = 60;
pub const DEFAULT_EXERCISE_DURATION_SECONDS: u32 = 120;

pub const DEFAULT_GAZE_INTERVAL_MINUTES: u32 = 75;
pub const DEFAULT_GAZE_DURATION_SECONDS: u32 = 60;

/// Number of exercises offered by a single exercise reminder
pub const DEFAULT_EXERCISES_PER_REMINDER: u32 = 1;

// ===== Reminder Settings Limits =====

/// Shortest average interval a user may configure
pub const MIN_AVERAGE_INTERVAL_MINUTES: u32 = 5;

/// Longest average interval a user may configure (4 hours)
pub const MAX_AVERAGE_INTERVAL_MINUTES: u32 = 240;

/// Largest random offset around the average (2 hours)
pub const MAX_GLOBAL_OFFSET_MINUTES: u32 = 120;

/// Shortest countdown shown in a reminder dialog
pub const MIN_DURATION_SECONDS: u32 = 5;

/// Longest countdown shown in a reminder dialog (1 hour)
pub const MAX_DURATION_SECONDS: u32 = 3600;

pub const MIN_ESCALATION_THRESHOLD: u32 = 1;
pub const MAX_ESCALATION_THRESHOLD: u32 = 10;

pub const MAX_EXERCISES_PER_REMINDER: u32 = 10;

// ===== User Profile =====

/// Body weight used for calorie estimates until the user sets one
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

pub const MIN_WEIGHT_KG: f64 = 20.0;
pub const MAX_WEIGHT_KG: f64 = 300.0;

// ===== Exercise Library =====

/// Longest duration a single exercise may have (1 hour)
pub const MAX_EXERCISE_DURATION_SECONDS: i64 = 3600;

// ===== Calorie Estimation =====

/// MET value for moderate office exercises (squats, lunges, planks)
pub const MET_MODERATE: f64 = 6.0;

/// MET value for high intensity exercises (jumping jacks, burpees)
pub const MET_HIGH: f64 = 8.0;
