//! Escalation ("punishment") policy for skipped exercise reminders
//!
//! Consecutive skips are counted; once the count reaches the threshold the
//! next exercise reminder is flagged as escalated. Any completion resets it.

use crate::config::DEFAULT_ESCALATION_THRESHOLD;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EscalationState {
    Normal,
    Escalated,
}

#[derive(Debug, Clone)]
pub struct EscalationPolicy {
    consecutive_skips: u32,
    threshold: u32,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ESCALATION_THRESHOLD)
    }
}

impl EscalationPolicy {
    pub fn new(threshold: u32) -> Self {
        Self {
            consecutive_skips: 0,
            threshold,
        }
    }

    pub fn record_skip(&mut self) {
        self.consecutive_skips = self.consecutive_skips.saturating_add(1);
        tracing::debug!(
            "Exercise skipped ({} consecutive, threshold {})",
            self.consecutive_skips,
            self.threshold
        );
    }

    pub fn record_complete(&mut self) {
        if self.consecutive_skips > 0 {
            tracing::debug!("Exercise completed, skip streak of {} reset", self.consecutive_skips);
        }
        self.consecutive_skips = 0;
    }

    pub fn should_escalate(&self) -> bool {
        self.consecutive_skips >= self.threshold
    }

    pub fn state(&self) -> EscalationState {
        if self.should_escalate() {
            EscalationState::Escalated
        } else {
            EscalationState::Normal
        }
    }

    pub fn consecutive_skips(&self) -> u32 {
        self.consecutive_skips
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Change the threshold; the current skip streak is kept
    pub fn set_threshold(&mut self, threshold: u32) {
        self.threshold = threshold;
    }
}
