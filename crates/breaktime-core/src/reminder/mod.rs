//! Reminder engine
//!
//! - `interval`: randomized delays, one armed timer per category
//! - `cooldown`: advisory last-fire bookkeeping
//! - `escalation`: consecutive exercise skip policy
//! - `dispatch`: ties the above together and emits events
//! - `timer`: clock and timer primitives the engine runs on

pub mod category;
pub mod cooldown;
pub mod dispatch;
pub mod escalation;
pub mod events;
pub mod interval;
pub mod timer;

pub use category::ReminderCategory;
pub use cooldown::CooldownTracker;
pub use dispatch::{ExerciseCatalog, ReminderConfig, ReminderConfigSource, ReminderDispatch};
pub use escalation::{EscalationPolicy, EscalationState};
pub use events::{
    ExerciseItem, ExerciseReminderFired, GazeReminderFired, ReminderEvent, ReminderObserver,
    StandReminderFired,
};
pub use interval::IntervalScheduler;
pub use timer::{Clock, Expiry, SystemClock, TimerDriver, TokioTimerDriver};
