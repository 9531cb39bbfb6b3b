//! Reminders service
//!
//! Owns the reminder engine and drives it from timer expiries.
//! Every engine call is made while holding the engine lock, so fires,
//! user feedback and settings changes are serialized.

use super::activity::ActivityService;
use super::exercises::ExerciseLibrary;
use super::settings::{AppSettings, ReminderSettings};
use crate::calories::calculate_calories;
use crate::database::ActivityLog;
use crate::error::{AppError, Result};
use crate::reminder::{
    Clock, EscalationPolicy, ExerciseItem, Expiry, IntervalScheduler, ReminderCategory,
    ReminderConfigSource, ReminderDispatch, ReminderObserver, SystemClock, TimerDriver,
    TokioTimerDriver,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

type Engine<T> = ReminderDispatch<ReminderSettings, ExerciseLibrary, T>;

struct EngineState<T: TimerDriver> {
    dispatch: Engine<T>,
    weight_kg: f64,
    /// Set by `pause_all`, cleared by `resume_all`
    paused: bool,
    /// Categories paused one at a time, kept paused across `resume_all`
    held: HashSet<ReminderCategory>,
}

impl<T: TimerDriver> EngineState<T> {
    /// Arm every enabled category the user has not paused individually
    fn arm_all(&mut self) {
        self.dispatch.stop_all();
        self.dispatch.start_all();
        for category in &self.held {
            self.dispatch.pause(*category);
        }
    }
}

/// Snapshot of one category for the UI
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStatus {
    pub category: ReminderCategory,
    pub enabled: bool,
    pub active: bool,
    pub next_fire_at: Option<DateTime<Utc>>,
    pub cooldown_remaining_seconds: f64,
}

/// Snapshot of the whole engine for the UI
#[derive(Debug, Clone, Serialize)]
pub struct ReminderStatus {
    pub paused: bool,
    pub escalated: bool,
    pub consecutive_skips: u32,
    pub categories: Vec<CategoryStatus>,
}

/// Reminders service with background fire loop
pub struct RemindersService<T: TimerDriver = TokioTimerDriver> {
    state: Arc<Mutex<EngineState<T>>>,
    activity: ActivityService,
}

impl<T: TimerDriver> Clone for RemindersService<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            activity: self.activity.clone(),
        }
    }
}

impl RemindersService<TokioTimerDriver> {
    /// Build a service on tokio timers, returning the expiry receiver to
    /// pass to [`RemindersService::start_scheduler`]
    pub fn with_tokio_timers(
        settings: &AppSettings,
        library: ExerciseLibrary,
        activity: ActivityService,
    ) -> (Self, mpsc::UnboundedReceiver<Expiry>) {
        let (driver, rx) = TokioTimerDriver::new();
        let service = Self::new(settings, library, driver, Arc::new(SystemClock), activity);
        (service, rx)
    }
}

impl<T> RemindersService<T>
where
    T: TimerDriver + 'static,
{
    pub fn new(
        settings: &AppSettings,
        library: ExerciseLibrary,
        driver: T,
        clock: Arc<dyn Clock>,
        activity: ActivityService,
    ) -> Self {
        let reminders = settings.reminders.clone();
        let escalation = EscalationPolicy::new(reminders.escalation_threshold);
        let dispatch = ReminderDispatch::new(reminders, library, IntervalScheduler::new(driver), clock)
            .with_escalation(escalation);

        Self {
            state: Arc::new(Mutex::new(EngineState {
                dispatch,
                weight_kg: settings.user.weight_kg,
                paused: false,
                held: HashSet::new(),
            })),
            activity,
        }
    }

    /// Register an observer for fired reminders
    pub async fn subscribe(&self, observer: Box<dyn ReminderObserver>) {
        self.state.lock().await.dispatch.subscribe(observer);
    }

    /// Arm every enabled category and start the fire loop.
    ///
    /// `expiries` must be the receiver paired with this service's timer
    /// driver. Must be called from within a tokio runtime.
    pub fn start_scheduler(self, mut expiries: mpsc::UnboundedReceiver<Expiry>) {
        tokio::spawn(async move {
            tracing::info!("Starting reminders scheduler");

            {
                let mut state = self.state.lock().await;
                if !state.paused {
                    state.arm_all();
                }
            }

            while let Some(expiry) = expiries.recv().await {
                self.handle_expiry(expiry).await;
            }

            tracing::info!("Reminder timer channel closed, scheduler stopped");
        });
    }

    /// Deliver one timer expiry to the engine. Returns whether it fired.
    pub async fn handle_expiry(&self, expiry: Expiry) -> bool {
        self.state.lock().await.dispatch.handle_expiry(expiry)
    }

    // ===== Feedback =====

    /// Log a completed reminder.
    ///
    /// Exercise completions are credited with the duration and calories
    /// of the most recently offered exercise set and reset escalation.
    pub async fn complete(&self, category: ReminderCategory) -> Result<ActivityLog> {
        let (duration, calories) = {
            let mut state = self.state.lock().await;
            let weight_kg = state.weight_kg;
            let dispatch = &mut state.dispatch;

            match category {
                ReminderCategory::Exercise => {
                    dispatch.on_exercise_completed();
                    exercise_totals(dispatch.last_exercise_set(), weight_kg)
                }
                _ => (dispatch.config().reminder_config(category).duration_seconds, 0.0),
            }
        };

        tracing::info!(
            "{} reminder completed: {}s, {} kcal",
            category,
            duration,
            calories
        );
        self.activity.log(category, duration, calories, true).await
    }

    /// Log a skipped exercise reminder and count it towards escalation
    pub async fn skip_exercise(&self) -> Result<ActivityLog> {
        {
            let mut state = self.state.lock().await;
            state.dispatch.on_exercise_skipped();
            tracing::info!(
                "Exercise reminder skipped ({} in a row)",
                state.dispatch.escalation().consecutive_skips()
            );
        }

        self.activity
            .log(ReminderCategory::Exercise, 0, 0.0, false)
            .await
    }

    // ===== Configuration =====

    /// Swap in new reminder settings.
    ///
    /// Categories that became enabled are armed and categories that became
    /// disabled are paused. Enabling a category also lifts its individual
    /// pause. Timers already armed keep their delay.
    pub async fn apply_settings(&self, settings: ReminderSettings) {
        let mut state = self.state.lock().await;
        let paused = state.paused;
        let EngineState { dispatch, held, .. } = &mut *state;

        dispatch
            .escalation_mut()
            .set_threshold(settings.escalation_threshold);
        let previous = dispatch.replace_config(settings);

        for category in ReminderCategory::ALL {
            let was_enabled = previous.reminder_config(category).enabled;
            let enabled = dispatch.config().reminder_config(category).enabled;

            if !enabled && dispatch.is_active(category) {
                dispatch.pause(category);
            } else if enabled && !was_enabled {
                held.remove(&category);
                if !paused {
                    dispatch.resume(category);
                }
            }
        }

        tracing::info!("Reminder settings applied");
    }

    pub async fn set_weight(&self, weight_kg: f64) {
        self.state.lock().await.weight_kg = weight_kg;
    }

    /// Replace the exercise snapshot offered by future reminders
    pub async fn reload_exercises(&self, exercises: Vec<ExerciseItem>) {
        let count = exercises.len();
        self.state.lock().await.dispatch.catalog_mut().replace(exercises);
        tracing::debug!("Exercise library reloaded ({} exercises)", count);
    }

    // ===== Control =====

    /// Pause one category until it is resumed on its own
    pub async fn pause(&self, category: ReminderCategory) {
        let mut state = self.state.lock().await;
        state.held.insert(category);
        state.dispatch.pause(category);
    }

    /// Re-arm one category. Fails if it is disabled or everything is paused.
    pub async fn resume(&self, category: ReminderCategory) -> Result<()> {
        let mut state = self.state.lock().await;

        if state.paused {
            return Err(AppError::Generic(
                "Reminders are paused, resume all first".to_string(),
            ));
        }
        if !state.dispatch.config().reminder_config(category).enabled {
            return Err(AppError::InvalidSettings(format!(
                "{} reminder is disabled",
                category
            )));
        }

        state.held.remove(&category);
        state.dispatch.resume(category);
        Ok(())
    }

    pub async fn pause_all(&self) {
        let mut state = self.state.lock().await;
        state.paused = true;
        state.dispatch.stop_all();
    }

    /// Lift the global pause. Categories paused individually stay paused.
    pub async fn resume_all(&self) {
        let mut state = self.state.lock().await;
        state.paused = false;
        state.arm_all();
    }

    pub async fn is_paused(&self) -> bool {
        self.state.lock().await.paused
    }

    /// Exercises offered by the most recent exercise reminder
    pub async fn current_exercises(&self) -> Vec<ExerciseItem> {
        self.state.lock().await.dispatch.last_exercise_set().to_vec()
    }

    pub async fn status(&self) -> ReminderStatus {
        let state = self.state.lock().await;
        let dispatch = &state.dispatch;

        let categories = ReminderCategory::ALL
            .into_iter()
            .map(|category| CategoryStatus {
                category,
                enabled: dispatch.config().reminder_config(category).enabled,
                active: dispatch.is_active(category),
                next_fire_at: dispatch.next_fire_at(category),
                cooldown_remaining_seconds: dispatch.cooldown_remaining(Some(category)),
            })
            .collect();

        ReminderStatus {
            paused: state.paused,
            escalated: dispatch.escalation().should_escalate(),
            consecutive_skips: dispatch.escalation().consecutive_skips(),
            categories,
        }
    }
}

/// Total seconds and calories of an exercise set
fn exercise_totals(items: &[ExerciseItem], weight_kg: f64) -> (u32, f64) {
    let duration: u64 = items
        .iter()
        .map(|item| u64::from(item.duration_seconds))
        .sum();
    let duration = u32::try_from(duration).unwrap_or(u32::MAX);
    let calories: f64 = items
        .iter()
        .map(|item| calculate_calories(item.met_value, weight_kg, item.duration_seconds))
        .sum();
    (duration, (calories * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{initialize_database, Repository};
    use crate::reminder::testing::{FakeTimerDriver, ManualClock, RecordingObserver};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::time::Duration;

    struct Harness {
        service: RemindersService<FakeTimerDriver>,
        driver: FakeTimerDriver,
        events: RecordingObserver,
        activity: ActivityService,
    }

    fn library() -> ExerciseLibrary {
        let items = (0..3)
            .map(|i| ExerciseItem {
                id: format!("ex-{}", i),
                name: format!("Exercise {}", i),
                duration_seconds: 30,
                met_value: 6.0,
            })
            .collect();
        ExerciseLibrary::with_rng(items, StdRng::seed_from_u64(5))
    }

    async fn harness() -> Harness {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        initialize_database(&pool).await.unwrap();
        let activity = ActivityService::new(Repository::new(pool));

        let driver = FakeTimerDriver::default();
        let events = RecordingObserver::default();
        let service = RemindersService::new(
            &AppSettings::default(),
            library(),
            driver.clone(),
            Arc::new(ManualClock::default()),
            activity.clone(),
        );
        service.subscribe(Box::new(events.clone())).await;

        Harness {
            service,
            driver,
            events,
            activity,
        }
    }

    async fn start(h: &Harness) {
        h.service.state.lock().await.dispatch.start_all();
    }

    async fn fire(h: &Harness, category: ReminderCategory) {
        let expiry = h.driver.elapse(category).unwrap();
        assert!(h.service.handle_expiry(expiry).await);
    }

    #[tokio::test]
    async fn test_complete_exercise_logs_calories() {
        let h = harness().await;
        start(&h).await;
        fire(&h, ReminderCategory::Exercise).await;

        assert_eq!(h.service.current_exercises().await.len(), 1);
        let log = h.service.complete(ReminderCategory::Exercise).await.unwrap();

        // 6 MET × 70 kg × 30 s
        assert_eq!(log.duration_seconds, 30);
        assert_eq!(log.calories_burned, 3.5);
        assert!(log.completed);
    }

    #[tokio::test]
    async fn test_complete_stand_uses_configured_duration() {
        let h = harness().await;

        let log = h.service.complete(ReminderCategory::Stand).await.unwrap();

        assert_eq!(log.activity_type, "stand");
        assert_eq!(log.duration_seconds, 90);
        assert_eq!(log.calories_burned, 0.0);
    }

    #[tokio::test]
    async fn test_skips_escalate_next_exercise() {
        let h = harness().await;
        start(&h).await;

        h.service.skip_exercise().await.unwrap();
        h.service.skip_exercise().await.unwrap();
        assert!(h.service.status().await.escalated);

        fire(&h, ReminderCategory::Exercise).await;
        h.service.complete(ReminderCategory::Exercise).await.unwrap();
        fire(&h, ReminderCategory::Exercise).await;

        let flags: Vec<bool> = h
            .events
            .events()
            .iter()
            .filter_map(|event| match event {
                crate::reminder::ReminderEvent::Exercise(fired) => Some(fired.escalated),
                _ => None,
            })
            .collect();
        assert_eq!(flags, vec![true, false]);

        let stats = h.activity.today_stats().await.unwrap();
        assert_eq!(stats.exercise_skipped, 2);
        assert_eq!(stats.exercise_count, 1);
    }

    #[tokio::test]
    async fn test_apply_settings_toggles_categories() {
        let h = harness().await;
        start(&h).await;

        let mut settings = ReminderSettings::default();
        settings.gaze.enabled = false;
        h.service.apply_settings(settings.clone()).await;

        let status = h.service.status().await;
        assert!(!status.categories[2].active);
        assert!(h.driver.pending_for(ReminderCategory::Gaze).is_empty());

        settings.gaze.enabled = true;
        h.service.apply_settings(settings).await;

        assert!(h.service.status().await.categories[2].active);
        assert_eq!(h.driver.pending_for(ReminderCategory::Gaze).len(), 1);
    }

    #[tokio::test]
    async fn test_apply_settings_keeps_armed_timers() {
        let h = harness().await;
        start(&h).await;
        let before = h.driver.pending_for(ReminderCategory::Stand);

        let mut settings = ReminderSettings::default();
        settings.stand.interval_avg = 200;
        h.service.apply_settings(settings).await;

        assert_eq!(h.driver.pending_for(ReminderCategory::Stand), before);
    }

    #[tokio::test]
    async fn test_apply_settings_updates_threshold() {
        let h = harness().await;

        let mut settings = ReminderSettings::default();
        settings.escalation_threshold = 1;
        h.service.apply_settings(settings).await;
        h.service.skip_exercise().await.unwrap();

        assert!(h.service.status().await.escalated);
    }

    #[tokio::test]
    async fn test_pause_all_and_resume_all() {
        let h = harness().await;
        start(&h).await;

        h.service.pause_all().await;
        assert!(h.service.is_paused().await);
        assert_eq!(h.driver.pending_count(), 0);
        assert!(h.service.resume(ReminderCategory::Stand).await.is_err());

        h.service.resume_all().await;
        assert!(!h.service.is_paused().await);
        assert_eq!(h.driver.pending_count(), 3);
    }

    #[tokio::test]
    async fn test_resume_all_keeps_individual_pauses() {
        let h = harness().await;
        start(&h).await;

        h.service.pause(ReminderCategory::Gaze).await;
        h.service.pause_all().await;
        h.service.resume_all().await;

        let status = h.service.status().await;
        assert!(status.categories[0].active);
        assert!(status.categories[1].active);
        assert!(!status.categories[2].active);
        assert!(h.driver.pending_for(ReminderCategory::Gaze).is_empty());

        h.service.resume(ReminderCategory::Gaze).await.unwrap();
        h.service.resume_all().await;
        assert!(h.service.status().await.categories[2].active);
        assert_eq!(h.driver.pending_count(), 3);
    }

    #[test]
    fn test_exercise_totals_do_not_overflow() {
        let items: Vec<ExerciseItem> = (0..2)
            .map(|i| ExerciseItem {
                id: format!("ex-{}", i),
                name: format!("Exercise {}", i),
                duration_seconds: 3_000_000_000,
                met_value: 6.0,
            })
            .collect();

        let (duration, calories) = exercise_totals(&items, 70.0);

        assert_eq!(duration, u32::MAX);
        assert!(calories > 0.0);
    }

    #[tokio::test]
    async fn test_resume_disabled_category_is_rejected() {
        let h = harness().await;

        let mut settings = ReminderSettings::default();
        settings.stand.enabled = false;
        h.service.apply_settings(settings).await;

        let result = h.service.resume(ReminderCategory::Stand).await;
        assert!(matches!(result, Err(AppError::InvalidSettings(_))));
        assert!(h.driver.pending_for(ReminderCategory::Stand).is_empty());
    }

    #[tokio::test]
    async fn test_status_reports_cooldown() {
        let h = harness().await;
        start(&h).await;
        fire(&h, ReminderCategory::Stand).await;

        let status = h.service.status().await;
        assert_eq!(status.categories[0].category, ReminderCategory::Stand);
        assert_eq!(status.categories[0].cooldown_remaining_seconds, 120.0);
        assert_eq!(status.categories[1].cooldown_remaining_seconds, 0.0);
        assert!(status.categories[0].next_fire_at.is_some());
    }

    #[tokio::test]
    async fn test_reload_exercises_empty_library() {
        let h = harness().await;
        start(&h).await;

        h.service.reload_exercises(Vec::new()).await;
        fire(&h, ReminderCategory::Exercise).await;

        assert!(h.events.events().is_empty());
        assert_eq!(h.driver.pending_for(ReminderCategory::Exercise).len(), 1);
    }

    #[tokio::test]
    async fn test_scheduler_loop_delivers_expiries() {
        let h = harness().await;
        let (tx, rx) = mpsc::unbounded_channel();
        h.service.clone().start_scheduler(rx);

        for _ in 0..100 {
            if h.driver.pending_count() == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(h.driver.pending_count(), 3);

        let expiry = h.driver.elapse(ReminderCategory::Stand).unwrap();
        tx.send(expiry).unwrap();

        for _ in 0..100 {
            if !h.events.events().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(h.events.events().len(), 1);
        assert_eq!(h.events.events()[0].event_name(), "stand-reminder");
    }
}
