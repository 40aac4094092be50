// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Exponential backoff policy for stream reconnection.

use std::time::Duration;

/// Largest exponent applied, keeps the shift well inside `u32`.
const MAX_EXPONENT: u32 = 16;

/// Reconnect policy: `delay = base_delay * 2^attempt`, capped at
/// `max_delay`, for at most `max_attempts` consecutive failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff {
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
            max_attempts: 5,
        }
    }
}

impl Backoff {
    /// Delay to wait after the `attempt`-th consecutive failure.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.min(MAX_EXPONENT);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Whether `attempts` consecutive failures reach the ceiling.
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        attempts >= self.max_attempts
    }

    /// Delays that will be waited before giving up, in order.
    pub fn schedule(&self) -> Vec<Duration> {
        (1..self.max_attempts).map(|a| self.delay_for(a)).collect()
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
