//! Clock and timer primitives
//!
//! The engine never sleeps itself. It asks a [`TimerDriver`] to deliver an
//! [`Expiry`] after a delay and reads wall-clock time through a [`Clock`],
//! so tests can substitute both.

use super::ReminderCategory;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Message delivered when an armed timer runs out.
///
/// `generation` identifies the arm that produced it; an expiry whose
/// generation no longer matches the scheduler's record is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub category: ReminderCategory,
    pub generation: u64,
}

/// Single-shot, cancelable delay primitive
pub trait TimerDriver: Send {
    type Handle: Send + 'static;

    /// Deliver `expiry` once `delay` has elapsed
    fn arm(&mut self, expiry: Expiry, delay: Duration) -> Self::Handle;

    /// Cancel a pending delivery. Cancelling a spent timer is a no-op.
    fn cancel(&mut self, handle: Self::Handle);
}

/// Timer driver backed by tokio tasks.
///
/// Each arm spawns a task that sleeps and then sends the expiry into a
/// channel; cancelling aborts the task. Must be armed from within a tokio
/// runtime.
pub struct TokioTimerDriver {
    tx: mpsc::UnboundedSender<Expiry>,
}

impl TokioTimerDriver {
    /// Create a driver and the receiving end its expiries are delivered to
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Expiry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl TimerDriver for TokioTimerDriver {
    type Handle = JoinHandle<()>;

    fn arm(&mut self, expiry: Expiry, delay: Duration) -> Self::Handle {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(expiry).is_err() {
                tracing::debug!("Expiry for {} dropped, receiver closed", expiry.category);
            }
        })
    }

    fn cancel(&mut self, handle: Self::Handle) {
        handle.abort();
    }
}
