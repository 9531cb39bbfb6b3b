//! Cooldown tracker
//!
//! Remembers when each category last fired. Query-only: nothing here
//! prevents a reminder from firing.

use super::ReminderCategory;
use crate::config::COOLDOWN_SECONDS;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct CooldownTracker {
    last_fire: HashMap<ReminderCategory, DateTime<Utc>>,
    window: Duration,
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::with_window(Duration::seconds(COOLDOWN_SECONDS))
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            last_fire: HashMap::new(),
            window,
        }
    }

    pub fn record_fire(&mut self, category: ReminderCategory, now: DateTime<Utc>) {
        self.last_fire.insert(category, now);
    }

    pub fn last_fire(&self, category: ReminderCategory) -> Option<DateTime<Utc>> {
        self.last_fire.get(&category).copied()
    }

    /// `Some(category)` checks one category, `None` checks whether any is cooling down
    pub fn is_in_cooldown(&self, category: Option<ReminderCategory>, now: DateTime<Utc>) -> bool {
        match category {
            Some(category) => self
                .last_fire
                .get(&category)
                .is_some_and(|last| now < *last + self.window),
            None => self.last_fire.values().any(|last| now < *last + self.window),
        }
    }

    /// Seconds left in the cooldown window, never negative.
    ///
    /// Without a category, the longest remaining window across categories.
    pub fn remaining_seconds(&self, category: Option<ReminderCategory>, now: DateTime<Utc>) -> f64 {
        let remaining = |last: &DateTime<Utc>| {
            let left = *last + self.window - now;
            (left.num_milliseconds() as f64 / 1000.0).max(0.0)
        };

        match category {
            Some(category) => self.last_fire.get(&category).map_or(0.0, remaining),
            None => self.last_fire.values().map(remaining).fold(0.0, f64::max),
        }
    }
}
