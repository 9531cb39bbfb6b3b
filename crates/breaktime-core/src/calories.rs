//! Calorie estimation
//!
//! calories = MET × weight (kg) × duration (hours), rounded to one decimal.

use crate::config::{MET_HIGH, MET_MODERATE};

/// Exercise intensity presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intensity {
    Moderate,
    High,
}

impl Intensity {
    pub fn met_value(self) -> f64 {
        match self {
            Intensity::Moderate => MET_MODERATE,
            Intensity::High => MET_HIGH,
        }
    }

    /// Map a free-form intensity label to a preset.
    /// Anything unrecognised counts as moderate.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" | "high intensity" | "vigorous" | "高" | "高强度" | "中高强度" => {
                Intensity::High
            }
            _ => Intensity::Moderate,
        }
    }
}

/// Estimate burned calories (kcal)
pub fn calculate_calories(met_value: f64, weight_kg: f64, duration_seconds: u32) -> f64 {
    let hours = f64::from(duration_seconds) / 3600.0;
    let calories = met_value * weight_kg * hours;
    (calories * 10.0).round() / 10.0
}
