//! Settings service
//!
//! Manages application settings persistence using JSON file storage.

use crate::config::*;
use crate::error::{AppError, Result};
use crate::reminder::{ReminderCategory, ReminderConfig, ReminderConfigSource};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// Schedule for one reminder category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Average minutes between reminders
    pub interval_avg: u32,
    /// Countdown shown in the reminder dialog, in seconds
    pub duration: u32,
    /// Legacy fixed range, folded into `interval_avg` on load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_max: Option<u32>,
}

fn default_true() -> bool {
    true
}

impl CategorySettings {
    fn new(interval_avg: u32, duration: u32) -> Self {
        Self {
            enabled: true,
            interval_avg,
            duration,
            interval_min: None,
            interval_max: None,
        }
    }

    fn has_legacy_range(&self) -> bool {
        self.interval_min.is_some() || self.interval_max.is_some()
    }

    /// Midpoint of the legacy range, using `fallback` for a missing bound
    fn legacy_midpoint(&self, fallback: (u32, u32)) -> u32 {
        let min = u64::from(self.interval_min.unwrap_or(fallback.0));
        let max = u64::from(self.interval_max.unwrap_or(fallback.1));
        // The mean of two u32 values always fits in a u32
        ((min + max) / 2) as u32
    }
}

/// A category block as written on disk, where any field may be missing
#[derive(Deserialize)]
struct StoredCategory {
    enabled: Option<bool>,
    interval_avg: Option<u32>,
    duration: Option<u32>,
    interval_min: Option<u32>,
    interval_max: Option<u32>,
}

impl StoredCategory {
    /// Fill missing fields from the category's own defaults
    fn or_defaults(self, defaults: CategorySettings) -> CategorySettings {
        CategorySettings {
            enabled: self.enabled.unwrap_or(defaults.enabled),
            interval_avg: self.interval_avg.unwrap_or(defaults.interval_avg),
            duration: self.duration.unwrap_or(defaults.duration),
            interval_min: self.interval_min,
            interval_max: self.interval_max,
        }
    }
}

fn stand_settings<'de, D>(deserializer: D) -> std::result::Result<CategorySettings, D::Error>
where
    D: Deserializer<'de>,
{
    StoredCategory::deserialize(deserializer).map(|stored| stored.or_defaults(default_stand()))
}

fn exercise_settings<'de, D>(deserializer: D) -> std::result::Result<CategorySettings, D::Error>
where
    D: Deserializer<'de>,
{
    StoredCategory::deserialize(deserializer).map(|stored| stored.or_defaults(default_exercise()))
}

fn gaze_settings<'de, D>(deserializer: D) -> std::result::Result<CategorySettings, D::Error>
where
    D: Deserializer<'de>,
{
    StoredCategory::deserialize(deserializer).map(|stored| stored.or_defaults(default_gaze()))
}

fn default_stand() -> CategorySettings {
    CategorySettings::new(DEFAULT_STAND_INTERVAL_MINUTES, DEFAULT_STAND_DURATION_SECONDS)
}

fn default_exercise() -> CategorySettings {
    CategorySettings::new(
        DEFAULT_EXERCISE_INTERVAL_MINUTES,
        DEFAULT_EXERCISE_DURATION_SECONDS,
    )
}

fn default_gaze() -> CategorySettings {
    CategorySettings::new(DEFAULT_GAZE_INTERVAL_MINUTES, DEFAULT_GAZE_DURATION_SECONDS)
}

/// Reminder scheduling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderSettings {
    /// Random spread applied around every category's average
    #[serde(default = "default_global_offset")]
    pub global_offset_minutes: u32,
    #[serde(default = "default_stand", deserialize_with = "stand_settings")]
    pub stand: CategorySettings,
    #[serde(default = "default_exercise", deserialize_with = "exercise_settings")]
    pub exercise: CategorySettings,
    #[serde(default = "default_gaze", deserialize_with = "gaze_settings")]
    pub gaze: CategorySettings,
    /// Consecutive exercise skips before the stricter dialog is used
    #[serde(default = "default_escalation_threshold")]
    pub escalation_threshold: u32,
    #[serde(default = "default_exercises_per_reminder")]
    pub exercises_per_reminder: u32,
}

fn default_global_offset() -> u32 {
    DEFAULT_GLOBAL_OFFSET_MINUTES
}

fn default_escalation_threshold() -> u32 {
    DEFAULT_ESCALATION_THRESHOLD
}

fn default_exercises_per_reminder() -> u32 {
    DEFAULT_EXERCISES_PER_REMINDER
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            global_offset_minutes: default_global_offset(),
            stand: default_stand(),
            exercise: default_exercise(),
            gaze: default_gaze(),
            escalation_threshold: default_escalation_threshold(),
            exercises_per_reminder: default_exercises_per_reminder(),
        }
    }
}

impl ReminderSettings {
    pub fn category(&self, category: ReminderCategory) -> &CategorySettings {
        match category {
            ReminderCategory::Stand => &self.stand,
            ReminderCategory::Exercise => &self.exercise,
            ReminderCategory::Gaze => &self.gaze,
        }
    }

    pub fn category_mut(&mut self, category: ReminderCategory) -> &mut CategorySettings {
        match category {
            ReminderCategory::Stand => &mut self.stand,
            ReminderCategory::Exercise => &mut self.exercise,
            ReminderCategory::Gaze => &mut self.gaze,
        }
    }

    /// Convert the old `interval_min`/`interval_max` layout.
    ///
    /// Each category's average becomes the midpoint of its old range, and
    /// the global offset becomes half the width of the old stand range.
    /// Returns whether anything changed.
    pub fn migrate_legacy(&mut self) -> bool {
        if !ReminderCategory::ALL
            .iter()
            .any(|c| self.category(*c).has_legacy_range())
        {
            return false;
        }

        let stand_min = self.stand.interval_min.unwrap_or(30);
        let stand_max = self.stand.interval_max.unwrap_or(60);
        self.global_offset_minutes = stand_max.saturating_sub(stand_min) / 2;

        for (category, fallback) in [
            (ReminderCategory::Stand, (30, 60)),
            (ReminderCategory::Exercise, (45, 75)),
            (ReminderCategory::Gaze, (60, 90)),
        ] {
            let settings = self.category_mut(category);
            settings.interval_avg = settings.legacy_midpoint(fallback);
            settings.interval_min = None;
            settings.interval_max = None;
        }

        tracing::info!(
            "Migrated legacy reminder ranges (offset {} minutes)",
            self.global_offset_minutes
        );
        true
    }

    /// Check every value against the configured limits
    pub fn validate(&self) -> Result<()> {
        if !offset_in_range(self.global_offset_minutes) {
            return Err(AppError::InvalidSettings(format!(
                "Global offset must be at most {} minutes",
                MAX_GLOBAL_OFFSET_MINUTES
            )));
        }

        for category in ReminderCategory::ALL {
            let settings = self.category(category);

            if !interval_in_range(settings.interval_avg) {
                return Err(AppError::InvalidSettings(format!(
                    "{} interval must be between {} and {} minutes",
                    category, MIN_AVERAGE_INTERVAL_MINUTES, MAX_AVERAGE_INTERVAL_MINUTES
                )));
            }

            if !duration_in_range(settings.duration) {
                return Err(AppError::InvalidSettings(format!(
                    "{} duration must be between {} and {} seconds",
                    category, MIN_DURATION_SECONDS, MAX_DURATION_SECONDS
                )));
            }
        }

        if !threshold_in_range(self.escalation_threshold) {
            return Err(AppError::InvalidSettings(format!(
                "Escalation threshold must be between {} and {}",
                MIN_ESCALATION_THRESHOLD, MAX_ESCALATION_THRESHOLD
            )));
        }

        if !per_reminder_in_range(self.exercises_per_reminder) {
            return Err(AppError::InvalidSettings(format!(
                "Exercises per reminder must be between 1 and {}",
                MAX_EXERCISES_PER_REMINDER
            )));
        }

        Ok(())
    }

    /// Put every out-of-range value back to its default.
    ///
    /// Used on values read from disk, which never went through `validate`.
    /// Returns whether anything changed.
    pub fn reset_invalid(&mut self) -> bool {
        let defaults = Self::default();
        let mut changed = false;

        if !offset_in_range(self.global_offset_minutes) {
            tracing::warn!(
                "Stored global offset {} is out of range, using default",
                self.global_offset_minutes
            );
            self.global_offset_minutes = defaults.global_offset_minutes;
            changed = true;
        }

        for category in ReminderCategory::ALL {
            let fallback = defaults.category(category);
            let settings = self.category_mut(category);

            if !interval_in_range(settings.interval_avg) {
                tracing::warn!(
                    "Stored {} interval {} is out of range, using default",
                    category,
                    settings.interval_avg
                );
                settings.interval_avg = fallback.interval_avg;
                changed = true;
            }

            if !duration_in_range(settings.duration) {
                tracing::warn!(
                    "Stored {} duration {} is out of range, using default",
                    category,
                    settings.duration
                );
                settings.duration = fallback.duration;
                changed = true;
            }
        }

        if !threshold_in_range(self.escalation_threshold) {
            tracing::warn!(
                "Stored escalation threshold {} is out of range, using default",
                self.escalation_threshold
            );
            self.escalation_threshold = defaults.escalation_threshold;
            changed = true;
        }

        if !per_reminder_in_range(self.exercises_per_reminder) {
            tracing::warn!(
                "Stored exercises per reminder {} is out of range, using default",
                self.exercises_per_reminder
            );
            self.exercises_per_reminder = defaults.exercises_per_reminder;
            changed = true;
        }

        changed
    }
}

fn offset_in_range(minutes: u32) -> bool {
    minutes <= MAX_GLOBAL_OFFSET_MINUTES
}

fn interval_in_range(minutes: u32) -> bool {
    (MIN_AVERAGE_INTERVAL_MINUTES..=MAX_AVERAGE_INTERVAL_MINUTES).contains(&minutes)
}

fn duration_in_range(seconds: u32) -> bool {
    (MIN_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&seconds)
}

fn threshold_in_range(threshold: u32) -> bool {
    (MIN_ESCALATION_THRESHOLD..=MAX_ESCALATION_THRESHOLD).contains(&threshold)
}

fn per_reminder_in_range(count: u32) -> bool {
    (1..=MAX_EXERCISES_PER_REMINDER).contains(&count)
}

impl ReminderConfigSource for ReminderSettings {
    fn reminder_config(&self, category: ReminderCategory) -> ReminderConfig {
        let settings = self.category(category);
        ReminderConfig {
            enabled: settings.enabled,
            average_interval_minutes: settings.interval_avg,
            duration_seconds: settings.duration,
        }
    }

    fn global_offset_minutes(&self) -> u32 {
        self.global_offset_minutes
    }

    fn exercises_per_reminder(&self) -> usize {
        self.exercises_per_reminder as usize
    }
}

/// User profile used for calorie estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default = "default_weight")]
    pub weight_kg: f64,
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT_KG
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            weight_kg: default_weight(),
        }
    }
}

impl UserSettings {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&self.weight_kg) {
            return Err(AppError::InvalidSettings(format!(
                "Weight must be between {} and {} kg",
                MIN_WEIGHT_KG, MAX_WEIGHT_KG
            )));
        }
        Ok(())
    }

    /// Reset an out-of-range stored weight. Returns whether it changed.
    pub fn reset_invalid(&mut self) -> bool {
        if self.validate().is_ok() {
            return false;
        }
        tracing::warn!(
            "Stored weight {} kg is out of range, using default",
            self.weight_kg
        );
        self.weight_kg = DEFAULT_WEIGHT_KG;
        true
    }
}

/// Behavior settings for the desktop shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSettings {
    /// Whether closing the main window hides it to the tray
    #[serde(default = "default_true")]
    pub minimize_to_tray: bool,
    /// Whether to show a notification when reminders start
    #[serde(default = "default_true")]
    pub show_startup_notification: bool,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            minimize_to_tray: true,
            show_startup_notification: true,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub reminders: ReminderSettings,
    #[serde(default)]
    pub user: UserSettings,
    #[serde(default)]
    pub behavior: BehaviorSettings,
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join("settings.json"),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let mut settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Generic(format!("Failed to parse settings: {}", e)))?;

        let migrated = settings.reminders.migrate_legacy();
        let reset = settings.reminders.reset_invalid() | settings.user.reset_invalid();

        if migrated || reset {
            self.save(&settings).await?;
        }

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Generic(format!("Failed to serialize settings: {}", e)))?;

        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Get reminder settings
    pub async fn get_reminders(&self) -> Result<ReminderSettings> {
        let settings = self.load().await?;
        Ok(settings.reminders)
    }

    /// Validate and store reminder settings
    pub async fn update_reminders(&self, reminders: ReminderSettings) -> Result<()> {
        reminders.validate()?;
        let mut settings = self.load().await?;
        settings.reminders = reminders;
        self.save(&settings).await?;
        Ok(())
    }

    /// Get user profile settings
    pub async fn get_user(&self) -> Result<UserSettings> {
        let settings = self.load().await?;
        Ok(settings.user)
    }

    /// Validate and store user profile settings
    pub async fn update_user(&self, user: UserSettings) -> Result<()> {
        user.validate()?;
        let mut settings = self.load().await?;
        settings.user = user;
        self.save(&settings).await?;
        Ok(())
    }

    /// Get behavior settings
    pub async fn get_behavior(&self) -> Result<BehaviorSettings> {
        let settings = self.load().await?;
        Ok(settings.behavior)
    }

    /// Update behavior settings
    pub async fn update_behavior(&self, behavior: BehaviorSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.behavior = behavior;
        self.save(&settings).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (SettingsService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let service = SettingsService::new(temp_dir.path().to_path_buf());
        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_default_settings_created_on_load() {
        let (service, temp) = create_test_service();

        let settings = service.load().await.unwrap();

        assert!(temp.path().join("settings.json").exists());
        assert_eq!(settings.reminders.global_offset_minutes, 15);
        assert_eq!(settings.reminders.stand.interval_avg, 45);
        assert_eq!(settings.reminders.stand.duration, 90);
        assert_eq!(settings.reminders.exercise.interval_avg, 60);
        assert_eq!(settings.reminders.exercise.duration, 120);
        assert_eq!(settings.reminders.gaze.interval_avg, 75);
        assert_eq!(settings.reminders.gaze.duration, 60);
        assert_eq!(settings.reminders.escalation_threshold, 2);
        assert_eq!(settings.user.weight_kg, 70.0);
    }

    #[tokio::test]
    async fn test_reminder_settings_get_and_update() {
        let (service, _temp) = create_test_service();

        let mut reminders = service.get_reminders().await.unwrap();
        reminders.gaze.enabled = false;
        reminders.global_offset_minutes = 10;
        service.update_reminders(reminders).await.unwrap();

        let loaded = service.get_reminders().await.unwrap();
        assert!(!loaded.gaze.enabled);
        assert_eq!(loaded.global_offset_minutes, 10);
    }

    #[tokio::test]
    async fn test_invalid_update_is_rejected() {
        let (service, _temp) = create_test_service();

        let mut reminders = ReminderSettings::default();
        reminders.exercise.interval_avg = 1;

        let result = service.update_reminders(reminders).await;
        assert!(matches!(result, Err(AppError::InvalidSettings(_))));

        // Nothing was written
        let loaded = service.get_reminders().await.unwrap();
        assert_eq!(loaded.exercise.interval_avg, 60);
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_path_buf();

        {
            let service = SettingsService::new(path.clone());
            service
                .update_user(UserSettings { weight_kg: 82.5 })
                .await
                .unwrap();
        }

        {
            let service = SettingsService::new(path);
            let user = service.get_user().await.unwrap();
            assert_eq!(user.weight_kg, 82.5);
        }
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let (service, temp) = create_test_service();
        std::fs::write(
            temp.path().join("settings.json"),
            r#"{"reminders": {"stand": {"enabled": false}}}"#,
        )
        .unwrap();

        let settings = service.load().await.unwrap();

        assert!(!settings.reminders.stand.enabled);
        assert_eq!(settings.reminders.exercise.interval_avg, 60);
        assert!(settings.behavior.minimize_to_tray);
    }

    #[tokio::test]
    async fn test_partial_category_uses_its_own_defaults() {
        let (service, temp) = create_test_service();
        std::fs::write(
            temp.path().join("settings.json"),
            r#"{"reminders": {"exercise": {"enabled": false}, "gaze": {"duration": 30}}}"#,
        )
        .unwrap();

        let reminders = service.load().await.unwrap().reminders;

        assert!(!reminders.exercise.enabled);
        assert_eq!(reminders.exercise.interval_avg, 60);
        assert_eq!(reminders.exercise.duration, 120);
        assert!(reminders.gaze.enabled);
        assert_eq!(reminders.gaze.interval_avg, 75);
        assert_eq!(reminders.gaze.duration, 30);
        assert_eq!(reminders.stand.duration, 90);
    }

    #[tokio::test]
    async fn test_out_of_range_stored_values_reset() {
        let (service, temp) = create_test_service();
        let path = temp.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{
                "reminders": {
                    "escalation_threshold": 0,
                    "exercises_per_reminder": 0,
                    "global_offset_minutes": 500,
                    "stand": {"interval_avg": 1, "duration": 45}
                },
                "user": {"weight_kg": 0.0}
            }"#,
        )
        .unwrap();

        let settings = service.load().await.unwrap();

        assert!(settings.reminders.validate().is_ok());
        assert_eq!(settings.reminders.escalation_threshold, 2);
        assert_eq!(settings.reminders.exercises_per_reminder, 1);
        assert_eq!(settings.reminders.global_offset_minutes, 15);
        assert_eq!(settings.reminders.stand.interval_avg, 45);
        // Valid values next to invalid ones are kept
        assert_eq!(settings.reminders.stand.duration, 45);
        assert_eq!(settings.user.weight_kg, 70.0);

        // The repaired file is written back
        let saved: AppSettings =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, settings);
    }

    #[tokio::test]
    async fn test_legacy_ranges_migrated_and_saved() {
        let (service, temp) = create_test_service();
        let path = temp.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{
                "reminders": {
                    "stand": {"enabled": true, "interval_min": 30, "interval_max": 60, "duration": 90},
                    "exercise": {"enabled": true, "interval_min": 40, "interval_max": 80, "duration": 120},
                    "gaze": {"enabled": true, "interval_min": 20, "interval_max": 40, "duration": 20}
                }
            }"#,
        )
        .unwrap();

        let settings = service.load().await.unwrap();

        assert_eq!(settings.reminders.global_offset_minutes, 15);
        assert_eq!(settings.reminders.stand.interval_avg, 45);
        assert_eq!(settings.reminders.exercise.interval_avg, 60);
        assert_eq!(settings.reminders.gaze.interval_avg, 30);
        assert!(settings.reminders.stand.interval_min.is_none());

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(!saved.contains("interval_min"));
    }

    #[test]
    fn test_legacy_midpoint_of_huge_range() {
        let mut reminders = ReminderSettings::default();
        reminders.stand.interval_min = Some(u32::MAX);
        reminders.stand.interval_max = Some(u32::MAX);

        assert!(reminders.migrate_legacy());
        assert_eq!(reminders.stand.interval_avg, u32::MAX);
        assert_eq!(reminders.global_offset_minutes, 0);

        assert!(reminders.validate().is_err());
        assert!(reminders.reset_invalid());
        assert_eq!(reminders.stand.interval_avg, 45);
        assert!(reminders.validate().is_ok());
    }

    #[test]
    fn test_reminder_config_source() {
        let settings = ReminderSettings::default();

        let stand = settings.reminder_config(ReminderCategory::Stand);
        assert!(stand.enabled);
        assert_eq!(stand.average_interval_minutes, 45);
        assert_eq!(stand.duration_seconds, 90);
        assert_eq!(settings.global_offset_minutes(), 15);
        assert_eq!(settings.exercises_per_reminder(), 1);
    }

    #[test]
    fn test_user_weight_validation() {
        assert!(UserSettings { weight_kg: 70.0 }.validate().is_ok());
        assert!(UserSettings { weight_kg: 5.0 }.validate().is_err());
    }
}
