use serde::{Deserialize, Serialize};

/// Countdown timer for fuses, lifetimes and cooldowns.
///
/// The unit of time is seconds.
#[derive(Copy, Clone, Default, PartialEq, Debug, Serialize, Deserialize)]
pub struct Timer {
    remaining: f32,
    total: f32,
}

impl Timer {
    pub fn new(seconds: f32) -> Self {
        let seconds = seconds.max(0.0);
        Timer {
            remaining: seconds,
            total: seconds,
        }
    }

    /// Advance the timer by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.remaining -= dt.max(0.0);
    }

    pub fn is_done(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    /// Fraction of the starting time still left, 1.0 for a fresh timer and
    /// 0.0 for a done one.
    pub fn fraction_left(&self) -> f32 {
        if self.total <= 0.0 {
            0.0
        } else {
            (self.remaining / self.total).clamp(0.0, 1.0)
        }
    }
}
