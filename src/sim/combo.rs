//! Combo streak tracking
//!
//! Consecutive block destructions inside the idle window build a combo; any
//! hit past the first pays `level * combo_bonus` on top of the base score.

use super::timer::Timer;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Combo {
    pub count: u32,
    /// Idle deadline; firing resets the streak
    idle: Timer,
}

impl Combo {
    /// Count a hit at `now_ms` and return the bonus it earns
    pub fn register_hit(&mut self, now_ms: f64, window_ms: f64, bonus_per_level: u64) -> u64 {
        self.count += 1;
        self.idle.schedule(now_ms, window_ms);
        if self.count > 1 {
            u64::from(self.count) * bonus_per_level
        } else {
            0
        }
    }

    /// Reset the streak if the idle window has elapsed
    pub fn update(&mut self, now_ms: f64) -> bool {
        if self.idle.fire(now_ms) {
            log::trace!("Combo of {} expired", self.count);
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.idle.cancel();
    }

    pub fn remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.idle.remaining_ms(now_ms)
    }
}
