//! Job poller timing.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Fixed poll interval plus a wall-clock ceiling across the whole poll sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct PollerConfig {
    /// Delay before each status check, in milliseconds
    #[validate(range(min = 1_u64))]
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Give up (TIMEOUT) once this much time has passed since submission
    #[validate(range(min = 1_u64))]
    #[serde(default = "default_ceiling_ms")]
    pub ceiling_ms: u64,
}

const fn default_interval_ms() -> u64 {
    10_000
}

const fn default_ceiling_ms() -> u64 {
    10 * 60 * 1000
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self { interval_ms: default_interval_ms(), ceiling_ms: default_ceiling_ms() }
    }
}

impl PollerConfig {
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub const fn ceiling(&self) -> Duration {
        Duration::from_millis(self.ceiling_ms)
    }
}
