//! Services module
//!
//! Business logic services that coordinate between commands and repository.

pub mod activity;
pub mod exercises;
pub mod reminders;
pub mod settings;

pub use activity::ActivityService;
pub use exercises::{ExerciseLibrary, ExercisesService};
pub use reminders::{CategoryStatus, ReminderStatus, RemindersService};
pub use settings::{
    AppSettings, BehaviorSettings, CategorySettings, ReminderSettings, SettingsService,
    UserSettings,
};
