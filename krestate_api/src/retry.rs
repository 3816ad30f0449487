//! Retry policy with bounded exponential backoff.

use std::time::Duration;

/// Bounded exponential backoff applied to transient fetch failures.
///
/// Only timeouts and connection errors are retried; HTTP status errors and
/// payload-decode errors are surfaced immediately. Attempts are sequential
/// with the computed delay in between; duplicate parallel attempts are
/// never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for the backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt (1-based): doubles per
    /// attempt from `initial_delay`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(30);
        self.initial_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }
}
