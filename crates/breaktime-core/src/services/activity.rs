//! Activity service
//!
//! Records completed and skipped reminders and answers the statistics
//! queries shown on the dashboard. Days are local calendar days.

use crate::database::{ActivityLog, DailyCalories, DailyStats, Repository};
use crate::error::Result;
use crate::reminder::ReminderCategory;
use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Service for the activity log and derived statistics
#[derive(Clone)]
pub struct ActivityService {
    repo: Repository,
}

impl ActivityService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Append one activity entry
    pub async fn log(
        &self,
        category: ReminderCategory,
        duration_seconds: u32,
        calories_burned: f64,
        completed: bool,
    ) -> Result<ActivityLog> {
        self.repo
            .log_activity(
                category,
                i64::from(duration_seconds),
                calories_burned,
                completed,
            )
            .await
    }

    /// Totals for the current local day
    pub async fn today_stats(&self) -> Result<DailyStats> {
        self.stats_on(Local::now().date_naive()).await
    }

    /// Totals for one local day
    pub async fn stats_on(&self, date: NaiveDate) -> Result<DailyStats> {
        let logs = self.activities_between(date, date).await?;
        Ok(DailyStats::from_logs(&logs))
    }

    /// Most recent entries, newest first
    pub async fn recent(&self, limit: u32) -> Result<Vec<ActivityLog>> {
        self.repo.recent_activities(i64::from(limit)).await
    }

    /// Entries from the start of `first` through the end of `last`
    pub async fn activities_between(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<ActivityLog>> {
        let start = start_of_day(first);
        let end = start_of_day(last.checked_add_days(Days::new(1)).unwrap_or(last));
        self.repo.activities_between(start, end).await
    }

    /// Calories burned by completed exercises on one local day
    pub async fn calories_on(&self, date: NaiveDate) -> Result<f64> {
        let stats = self.stats_on(date).await?;
        Ok((stats.exercise_calories * 10.0).round() / 10.0)
    }

    /// Calories for the last seven days, today first
    pub async fn calories_last_7_days(&self) -> Result<Vec<DailyCalories>> {
        self.calories_for_week_ending(Local::now().date_naive()).await
    }

    async fn calories_for_week_ending(&self, today: NaiveDate) -> Result<Vec<DailyCalories>> {
        let mut days = Vec::with_capacity(7);

        for offset in 0..7 {
            let Some(date) = today.checked_sub_days(Days::new(offset)) else {
                break;
            };
            days.push(DailyCalories {
                date: date.format("%m-%d").to_string(),
                calories: self.calories_on(date).await?,
            });
        }

        Ok(days)
    }
}

/// Local midnight of `date` as a UTC instant
fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // Midnight skipped by a DST transition
        None => Utc.from_utc_datetime(&midnight),
    }
}
