//! Reminder dispatch
//!
//! Ties the interval scheduler, cooldown tracker and escalation policy
//! together. Owns all of their state; collaborators (configuration,
//! exercise catalog, UI observers) are injected at construction.

use super::cooldown::CooldownTracker;
use super::escalation::EscalationPolicy;
use super::events::{
    ExerciseItem, ExerciseReminderFired, GazeReminderFired, ReminderEvent, ReminderObserver,
    StandReminderFired,
};
use super::interval::IntervalScheduler;
use super::timer::{Clock, Expiry, TimerDriver};
use super::ReminderCategory;
use crate::config::DEFAULT_EXERCISES_PER_REMINDER;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Per-category scheduling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub enabled: bool,
    pub average_interval_minutes: u32,
    pub duration_seconds: u32,
}

/// Read-only view of the user's reminder configuration.
///
/// Values are read at every arm, so a change is picked up by the next
/// scheduled timer without touching the ones already armed.
pub trait ReminderConfigSource: Send {
    fn reminder_config(&self, category: ReminderCategory) -> ReminderConfig;

    fn global_offset_minutes(&self) -> u32;

    fn exercises_per_reminder(&self) -> usize {
        DEFAULT_EXERCISES_PER_REMINDER as usize
    }
}

/// Supplies the exercises offered by an exercise reminder
pub trait ExerciseCatalog: Send {
    fn random_exercises(&mut self, count: usize) -> Vec<ExerciseItem>;
}

pub struct ReminderDispatch<S, C, T: TimerDriver> {
    config: S,
    catalog: C,
    scheduler: IntervalScheduler<T>,
    cooldown: CooldownTracker,
    escalation: EscalationPolicy,
    clock: Arc<dyn Clock>,
    observers: Vec<Box<dyn ReminderObserver>>,
    active: HashSet<ReminderCategory>,
    last_exercise_set: Vec<ExerciseItem>,
}

impl<S, C, T> ReminderDispatch<S, C, T>
where
    S: ReminderConfigSource,
    C: ExerciseCatalog,
    T: TimerDriver,
{
    pub fn new(config: S, catalog: C, scheduler: IntervalScheduler<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            catalog,
            scheduler,
            cooldown: CooldownTracker::new(),
            escalation: EscalationPolicy::default(),
            clock,
            observers: Vec::new(),
            active: HashSet::new(),
            last_exercise_set: Vec::new(),
        }
    }

    pub fn with_escalation(mut self, escalation: EscalationPolicy) -> Self {
        self.escalation = escalation;
        self
    }

    pub fn subscribe(&mut self, observer: Box<dyn ReminderObserver>) {
        self.observers.push(observer);
    }

    // ===== Control surface =====

    /// Arm every enabled category
    pub fn start_all(&mut self) {
        for category in ReminderCategory::ALL {
            if self.config.reminder_config(category).enabled {
                self.schedule(category);
            }
        }
        tracing::info!("Reminders started: {:?}", self.active_categories());
    }

    /// Cancel every category regardless of state
    pub fn stop_all(&mut self) {
        self.scheduler.cancel_all();
        self.active.clear();
        tracing::info!("All reminders stopped");
    }

    pub fn pause(&mut self, category: ReminderCategory) {
        self.scheduler.cancel(category);
        if self.active.remove(&category) {
            tracing::info!("{} reminder paused", category);
        }
    }

    /// Re-arm a category with a freshly drawn delay.
    ///
    /// # Panics
    /// If the category is disabled in the configuration.
    pub fn resume(&mut self, category: ReminderCategory) {
        self.schedule(category);
        tracing::info!("{} reminder resumed", category);
    }

    pub fn is_active(&self, category: ReminderCategory) -> bool {
        self.active.contains(&category)
    }

    pub fn active_categories(&self) -> Vec<ReminderCategory> {
        ReminderCategory::ALL
            .into_iter()
            .filter(|category| self.active.contains(category))
            .collect()
    }

    // ===== Firing =====

    /// Route a timer expiry to [`Self::on_fire`] unless it is stale.
    /// Returns whether the reminder fired.
    pub fn handle_expiry(&mut self, expiry: Expiry) -> bool {
        if !self.scheduler.claim(expiry) {
            tracing::debug!(
                "Ignoring stale {} expiry (generation {})",
                expiry.category,
                expiry.generation
            );
            return false;
        }
        self.on_fire(expiry.category);
        true
    }

    /// Record the fire, emit the category's event and re-arm immediately
    pub fn on_fire(&mut self, category: ReminderCategory) {
        self.cooldown.record_fire(category, self.clock.now());
        tracing::info!("{} reminder fired", category);

        match self.build_event(category) {
            Some(event) => self.notify(&event),
            None => tracing::warn!("Exercise catalog is empty, {} reminder not shown", category),
        }

        if self.config.reminder_config(category).enabled {
            self.schedule(category);
        } else {
            // Disabled since it was armed; stay quiet until resumed
            self.scheduler.cancel(category);
            self.active.remove(&category);
            tracing::info!("{} reminder disabled, not re-armed", category);
        }
    }

    fn build_event(&mut self, category: ReminderCategory) -> Option<ReminderEvent> {
        let config = self.config.reminder_config(category);

        match category {
            ReminderCategory::Stand => Some(ReminderEvent::Stand(StandReminderFired {
                duration_seconds: config.duration_seconds,
            })),
            ReminderCategory::Gaze => Some(ReminderEvent::Gaze(GazeReminderFired {
                duration_seconds: config.duration_seconds,
            })),
            ReminderCategory::Exercise => {
                let count = self.config.exercises_per_reminder();
                let items = self.catalog.random_exercises(count);
                if items.is_empty() {
                    return None;
                }
                self.last_exercise_set = items.clone();
                Some(ReminderEvent::Exercise(ExerciseReminderFired {
                    items,
                    escalated: self.escalation.should_escalate(),
                }))
            }
        }
    }

    fn notify(&self, event: &ReminderEvent) {
        for observer in &self.observers {
            observer.reminder_fired(event);
        }
    }

    fn schedule(&mut self, category: ReminderCategory) {
        let config = self.config.reminder_config(category);
        assert!(
            config.enabled,
            "{} reminder is disabled and must not be scheduled",
            category
        );

        let due_at = self.scheduler.schedule_next(
            category,
            config.average_interval_minutes,
            self.config.global_offset_minutes(),
            self.clock.now(),
        );
        self.active.insert(category);
        tracing::info!("Next {} reminder due at {}", category, due_at);
    }

    // ===== Feedback from the UI =====

    pub fn on_exercise_skipped(&mut self) {
        self.escalation.record_skip();
    }

    pub fn on_exercise_completed(&mut self) {
        self.escalation.record_complete();
    }

    // ===== Queries =====

    pub fn is_in_cooldown(&self, category: Option<ReminderCategory>) -> bool {
        self.cooldown.is_in_cooldown(category, self.clock.now())
    }

    pub fn cooldown_remaining(&self, category: Option<ReminderCategory>) -> f64 {
        self.cooldown.remaining_seconds(category, self.clock.now())
    }

    pub fn next_fire_at(&self, category: ReminderCategory) -> Option<DateTime<Utc>> {
        self.scheduler.due_at(category)
    }

    /// Exercises offered by the most recent exercise reminder
    pub fn last_exercise_set(&self) -> &[ExerciseItem] {
        &self.last_exercise_set
    }

    pub fn escalation(&self) -> &EscalationPolicy {
        &self.escalation
    }

    pub fn escalation_mut(&mut self) -> &mut EscalationPolicy {
        &mut self.escalation
    }

    pub fn config(&self) -> &S {
        &self.config
    }

    /// Swap the configuration. Armed timers keep their delay.
    pub fn replace_config(&mut self, config: S) -> S {
        std::mem::replace(&mut self.config, config)
    }

    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    pub fn scheduler(&self) -> &IntervalScheduler<T> {
        &self.scheduler
    }
}
