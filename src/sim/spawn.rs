//! Ball spawn countdown
//!
//! The countdown is replenished additively: overshoot past zero is carried
//! into the next interval, so long-run cadence stays at one ball per
//! interval even when frames jitter.

use serde::{Deserialize, Serialize};

/// Countdown until the next automatic ball launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTimer {
    interval_ms: i64,
    remaining_ms: i64,
}

impl SpawnTimer {
    pub fn new(interval_ms: i64) -> Self {
        Self {
            interval_ms,
            remaining_ms: interval_ms,
        }
    }

    /// Restart the countdown from a full interval
    pub fn reset(&mut self) {
        self.remaining_ms = self.interval_ms;
    }

    /// Count down by `elapsed_ms`.
    ///
    /// Returns `true` when the countdown went negative, in which case one
    /// interval has been added back.
    pub fn update(&mut self, elapsed_ms: i64) -> bool {
        self.remaining_ms -= elapsed_ms;
        if self.remaining_ms < 0 {
            self.remaining_ms += self.interval_ms;
            true
        } else {
            false
        }
    }

    pub fn remaining_ms(&self) -> i64 {
        self.remaining_ms
    }

    pub fn interval_ms(&self) -> i64 {
        self.interval_ms
    }
}
