//! Interval scheduler
//!
//! Draws a randomized delay for a category and keeps at most one armed
//! timer per category. Arming always cancels the previous timer first.

use super::timer::{Expiry, TimerDriver};
use super::ReminderCategory;
use crate::config::MIN_INTERVAL_MINUTES;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::time::Duration;

/// Inclusive `(min, max)` minute range for an average and offset.
///
/// The lower bound never drops below [`MIN_INTERVAL_MINUTES`]; an inverted
/// range collapses to a single value instead of failing.
pub fn interval_bounds(average_minutes: u32, offset_minutes: u32) -> (u32, u32) {
    let min = average_minutes
        .saturating_sub(offset_minutes)
        .max(MIN_INTERVAL_MINUTES);
    let max = average_minutes.saturating_add(offset_minutes).max(min);
    (min, max)
}

/// Draw a whole number of minutes uniformly from the interval range
pub fn draw_interval_minutes<R: Rng + ?Sized>(
    rng: &mut R,
    average_minutes: u32,
    offset_minutes: u32,
) -> u32 {
    let (min, max) = interval_bounds(average_minutes, offset_minutes);
    rng.gen_range(min..=max)
}

pub fn minutes_to_delay(minutes: u32) -> Duration {
    Duration::from_millis(u64::from(minutes) * 60 * 1000)
}

struct ArmedTimer<H> {
    generation: u64,
    handle: H,
    due_at: DateTime<Utc>,
}

/// Per-category arena of armed timers
pub struct IntervalScheduler<T: TimerDriver> {
    driver: T,
    rng: StdRng,
    armed: HashMap<ReminderCategory, ArmedTimer<T::Handle>>,
    next_generation: u64,
}

impl<T: TimerDriver> IntervalScheduler<T> {
    pub fn new(driver: T) -> Self {
        Self::with_rng(driver, StdRng::from_entropy())
    }

    /// Use a caller-supplied generator (seeded in tests)
    pub fn with_rng(driver: T, rng: StdRng) -> Self {
        Self {
            driver,
            rng,
            armed: HashMap::new(),
            next_generation: 1,
        }
    }

    /// Arm a fresh randomized timer for `category`, replacing any pending one.
    ///
    /// Returns the time the new timer is due.
    pub fn schedule_next(
        &mut self,
        category: ReminderCategory,
        average_minutes: u32,
        offset_minutes: u32,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        self.cancel(category);

        let minutes = draw_interval_minutes(&mut self.rng, average_minutes, offset_minutes);
        let delay = minutes_to_delay(minutes);
        let generation = self.next_generation;
        self.next_generation += 1;

        let handle = self.driver.arm(
            Expiry {
                category,
                generation,
            },
            delay,
        );
        let due_at = now + chrono::Duration::minutes(i64::from(minutes));

        self.armed.insert(
            category,
            ArmedTimer {
                generation,
                handle,
                due_at,
            },
        );

        tracing::debug!(
            "Armed {} reminder in {} minutes (generation {})",
            category,
            minutes,
            generation
        );
        due_at
    }

    /// Cancel the pending timer for `category`.
    /// Returns whether one was pending.
    pub fn cancel(&mut self, category: ReminderCategory) -> bool {
        match self.armed.remove(&category) {
            Some(armed) => {
                self.driver.cancel(armed.handle);
                tracing::debug!("Cancelled {} reminder timer", category);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for category in ReminderCategory::ALL {
            self.cancel(category);
        }
    }

    /// Accept an expiry if it belongs to the live timer of its category.
    ///
    /// The timer is spent afterwards and no longer counted as armed.
    /// Expiries from cancelled or replaced timers are rejected.
    pub fn claim(&mut self, expiry: Expiry) -> bool {
        match self.armed.get(&expiry.category) {
            Some(armed) if armed.generation == expiry.generation => {
                self.armed.remove(&expiry.category);
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self, category: ReminderCategory) -> bool {
        self.armed.contains_key(&category)
    }

    pub fn due_at(&self, category: ReminderCategory) -> Option<DateTime<Utc>> {
        self.armed.get(&category).map(|armed| armed.due_at)
    }

    pub fn driver(&self) -> &T {
        &self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::testing::FakeTimerDriver;
    use std::collections::HashSet;

    fn seeded_scheduler() -> (IntervalScheduler<FakeTimerDriver>, FakeTimerDriver) {
        let driver = FakeTimerDriver::default();
        let scheduler = IntervalScheduler::with_rng(driver.clone(), StdRng::seed_from_u64(42));
        (scheduler, driver)
    }

    #[test]
    fn test_interval_bounds() {
        assert_eq!(interval_bounds(45, 15), (30, 60));
        // Lower bound clamps to the floor
        assert_eq!(interval_bounds(10, 15), (5, 25));
        // Offset larger than average and zero-width ranges never invert
        assert_eq!(interval_bounds(3, 0), (5, 5));
        assert_eq!(interval_bounds(0, 2), (5, 5));
    }

    #[test]
    fn test_draws_cover_whole_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();

        for _ in 0..10_000 {
            let minutes = draw_interval_minutes(&mut rng, 20, 5);
            assert!((15..=25).contains(&minutes), "drew {}", minutes);
            seen.insert(minutes);
        }

        assert_eq!(seen.len(), 11, "every minute in [15, 25] should appear");
    }

    #[test]
    fn test_stand_defaults_stay_in_window() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let minutes = draw_interval_minutes(&mut rng, 45, 15);
            assert!((30..=60).contains(&minutes));
        }
    }

    #[test]
    fn test_degenerate_range_draws_single_value() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(draw_interval_minutes(&mut rng, 3, 0), 5);
        }
    }

    #[test]
    fn test_minutes_to_delay() {
        assert_eq!(minutes_to_delay(1), Duration::from_millis(60_000));
        assert_eq!(minutes_to_delay(30), Duration::from_millis(1_800_000));
    }

    #[test]
    fn test_schedule_next_replaces_pending_timer() {
        let (mut scheduler, driver) = seeded_scheduler();
        let now = Utc::now();

        scheduler.schedule_next(ReminderCategory::Stand, 45, 15, now);
        scheduler.schedule_next(ReminderCategory::Stand, 45, 15, now);

        assert_eq!(driver.pending_for(ReminderCategory::Stand).len(), 1);
        assert_eq!(driver.cancelled_count(), 1);
        assert!(scheduler.is_armed(ReminderCategory::Stand));
    }

    #[test]
    fn test_delay_and_due_time_agree() {
        let (mut scheduler, driver) = seeded_scheduler();
        let now = Utc::now();

        let due = scheduler.schedule_next(ReminderCategory::Gaze, 75, 15, now);
        let (_, delay) = driver.pending_for(ReminderCategory::Gaze)[0];

        let minutes = (due - now).num_minutes();
        assert!((60..=90).contains(&minutes));
        assert_eq!(delay, minutes_to_delay(minutes as u32));
        assert_eq!(scheduler.due_at(ReminderCategory::Gaze), Some(due));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (mut scheduler, driver) = seeded_scheduler();
        scheduler.schedule_next(ReminderCategory::Exercise, 60, 15, Utc::now());

        assert!(scheduler.cancel(ReminderCategory::Exercise));
        assert!(!scheduler.cancel(ReminderCategory::Exercise));
        assert_eq!(driver.cancelled_count(), 1);
        assert_eq!(driver.pending_count(), 0);
    }

    #[test]
    fn test_claim_rejects_stale_expiry() {
        let (mut scheduler, driver) = seeded_scheduler();
        let now = Utc::now();

        scheduler.schedule_next(ReminderCategory::Stand, 45, 15, now);
        let (stale, _) = driver.pending_for(ReminderCategory::Stand)[0];
        scheduler.schedule_next(ReminderCategory::Stand, 45, 15, now);
        let (live, _) = driver.pending_for(ReminderCategory::Stand)[0];

        assert!(!scheduler.claim(stale));
        assert!(scheduler.claim(live));
        assert!(!scheduler.is_armed(ReminderCategory::Stand));
        // A second delivery of the same expiry is also stale
        assert!(!scheduler.claim(live));
    }

    #[test]
    fn test_categories_are_independent() {
        let (mut scheduler, driver) = seeded_scheduler();
        let now = Utc::now();

        for category in ReminderCategory::ALL {
            scheduler.schedule_next(category, 45, 15, now);
        }
        scheduler.cancel(ReminderCategory::Exercise);

        assert_eq!(driver.pending_count(), 2);
        assert!(scheduler.is_armed(ReminderCategory::Stand));
        assert!(!scheduler.is_armed(ReminderCategory::Exercise));
        assert!(scheduler.is_armed(ReminderCategory::Gaze));

        scheduler.cancel_all();
        assert_eq!(driver.pending_count(), 0);
    }
}
