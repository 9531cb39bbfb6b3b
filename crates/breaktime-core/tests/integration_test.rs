//! Integration tests for Breaktime
//!
//! These tests verify end-to-end functionality including:
//! - Database creation, migrations and seeding on disk
//! - Settings persistence
//! - A full reminder cycle from timer expiry to activity statistics

use breaktime_core::database::{create_pool, CreateExerciseRequest, Repository};
use breaktime_core::reminder::{
    Expiry, ReminderCategory, ReminderEvent, ReminderObserver, SystemClock, TimerDriver,
};
use breaktime_core::services::{
    ActivityService, ExercisesService, RemindersService, SettingsService,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Helper to create a test database with schema
async fn create_test_db() -> (Repository, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let pool = create_pool(&db_path).await.unwrap();
    let repo = Repository::new(pool);

    (repo, temp_dir)
}

/// Timer driver that keeps armed expiries until the test delivers them
#[derive(Clone, Default)]
struct ManualTimers {
    armed: Arc<Mutex<Vec<(u64, Expiry, Duration)>>>,
    next: Arc<Mutex<u64>>,
}

impl ManualTimers {
    fn take(&self, category: ReminderCategory) -> Option<Expiry> {
        let mut armed = self.armed.lock().unwrap();
        let index = armed.iter().position(|(_, e, _)| e.category == category)?;
        Some(armed.remove(index).1)
    }

    fn delay_for(&self, category: ReminderCategory) -> Option<Duration> {
        let armed = self.armed.lock().unwrap();
        armed
            .iter()
            .find(|(_, e, _)| e.category == category)
            .map(|(_, _, d)| *d)
    }
}

impl TimerDriver for ManualTimers {
    type Handle = u64;

    fn arm(&mut self, expiry: Expiry, delay: Duration) -> u64 {
        let mut next = self.next.lock().unwrap();
        *next += 1;
        self.armed.lock().unwrap().push((*next, expiry, delay));
        *next
    }

    fn cancel(&mut self, handle: u64) {
        self.armed.lock().unwrap().retain(|(id, _, _)| *id != handle);
    }
}

#[derive(Clone, Default)]
struct Collector(Arc<Mutex<Vec<ReminderEvent>>>);

impl ReminderObserver for Collector {
    fn reminder_fired(&self, event: &ReminderEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

#[tokio::test]
async fn test_database_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("breaktime.db");

    {
        let pool = create_pool(&db_path).await.unwrap();
        let service = ExercisesService::new(Repository::new(pool.clone()));
        service
            .create_exercise(CreateExerciseRequest {
                name: "Lunges".to_string(),
                duration_seconds: 40,
                met_value: Some(8.0),
                category: "high".to_string(),
            })
            .await
            .unwrap();
        pool.close().await;
    }

    let pool = create_pool(&db_path).await.unwrap();
    let exercises = Repository::new(pool).list_exercises().await.unwrap();

    // Defaults are seeded once, the custom exercise persists
    assert_eq!(exercises.len(), 11);
    assert!(exercises.iter().any(|e| e.name == "Lunges"));
}

#[tokio::test]
async fn test_full_reminder_cycle() {
    let (repo, temp) = create_test_db().await;
    let settings_service = SettingsService::new(temp.path().to_path_buf());
    let settings = settings_service.load().await.unwrap();

    let exercises = ExercisesService::new(repo.clone());
    let activity = ActivityService::new(repo);
    let timers = ManualTimers::default();
    let events = Collector::default();

    let service = RemindersService::new(
        &settings,
        exercises.load_library().await.unwrap(),
        timers.clone(),
        Arc::new(SystemClock),
        activity.clone(),
    );
    service.subscribe(Box::new(events.clone())).await;
    service.resume_all().await;

    // Stand delay falls within 45 ± 15 minutes
    let delay = timers.delay_for(ReminderCategory::Stand).unwrap();
    assert!(delay >= Duration::from_secs(30 * 60));
    assert!(delay <= Duration::from_secs(60 * 60));

    let expiry = timers.take(ReminderCategory::Exercise).unwrap();
    assert!(service.handle_expiry(expiry).await);
    // Delivering the same expiry twice is ignored
    assert!(!service.handle_expiry(expiry).await);

    let fired = events.0.lock().unwrap().clone();
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].event_name(), "exercise-reminder");

    let log = service.complete(ReminderCategory::Exercise).await.unwrap();
    assert!(log.calories_burned > 0.0);
    service.skip_exercise().await.unwrap();

    let stats = activity.today_stats().await.unwrap();
    assert_eq!(stats.exercise_count, 1);
    assert_eq!(stats.exercise_skipped, 1);
    assert_eq!(stats.exercise_calories, log.calories_burned);

    let week = activity.calories_last_7_days().await.unwrap();
    assert_eq!(week.len(), 7);
    assert_eq!(week[0].calories, log.calories_burned);

    let status = service.status().await;
    assert!(status.categories.iter().all(|c| c.active));
    assert!(status.categories[1].cooldown_remaining_seconds > 0.0);
}

#[tokio::test]
async fn test_settings_changes_reach_running_engine() {
    let (repo, temp) = create_test_db().await;
    let settings_service = SettingsService::new(temp.path().to_path_buf());
    let settings = settings_service.load().await.unwrap();

    let timers = ManualTimers::default();
    let service = RemindersService::new(
        &settings,
        ExercisesService::new(repo.clone()).load_library().await.unwrap(),
        timers.clone(),
        Arc::new(SystemClock),
        ActivityService::new(repo),
    );
    service.resume_all().await;

    let mut reminders = settings_service.get_reminders().await.unwrap();
    reminders.stand.enabled = false;
    settings_service
        .update_reminders(reminders.clone())
        .await
        .unwrap();
    service.apply_settings(reminders).await;

    assert!(timers.delay_for(ReminderCategory::Stand).is_none());
    assert!(timers.delay_for(ReminderCategory::Gaze).is_some());

    let status = service.status().await;
    assert!(!status.categories[0].enabled);
    assert!(!status.categories[0].active);
}
