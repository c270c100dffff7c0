//! Cancellable deadlines on the simulation clock
//!
//! Every delayed action in the game (respawn pause, combo idle reset, effect
//! expiry) is a `Timer` polled by the tick. Cancelling clears the deadline, so
//! nothing scheduled before a restart can fire after it.

use serde::{Deserialize, Serialize};

/// A one-shot deadline in simulation milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    deadline_ms: Option<f64>,
}

impl Timer {
    /// A timer already scheduled `delay_ms` after `now_ms`
    pub fn after(now_ms: f64, delay_ms: f64) -> Self {
        Self {
            deadline_ms: Some(now_ms + delay_ms),
        }
    }

    /// (Re)schedule, replacing any pending deadline
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64) {
        self.deadline_ms = Some(now_ms + delay_ms);
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Milliseconds left before the deadline (0 once elapsed)
    pub fn remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.deadline_ms.map(|d| (d - now_ms).max(0.0))
    }

    pub fn is_due(&self, now_ms: f64) -> bool {
        matches!(self.deadline_ms, Some(d) if now_ms >= d)
    }

    /// Returns true exactly once when the deadline has passed, then disarms
    pub fn fire(&mut self, now_ms: f64) -> bool {
        if self.is_due(now_ms) {
            self.deadline_ms = None;
            true
        } else {
            false
        }
    }
}
