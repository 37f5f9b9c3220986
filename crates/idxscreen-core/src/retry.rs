//! Retry policy for transient fetch failures.
//!
//! The orchestrator retries a retryable fetch at most `max_retries` times
//! (default: once) with exponential backoff and optional jitter. Anything
//! beyond that is a skip, never a run failure.

use std::time::Duration;

use crate::data_source::FetchError;

/// Backoff schedule applied between fetch attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            base: Duration::from_millis(500),
            multiplier: 2.0,
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Whether a failed attempt (0-based) should be retried.
    pub fn should_retry(&self, attempt: u32, error: &FetchError) -> bool {
        error.retryable() && attempt < self.max_retries
    }

    /// Delay before the retry following `attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let scale = self.multiplier.powi(attempt as i32);
        let seconds = self.base.as_secs_f64() * scale;
        let capped = seconds.min(self.max_delay.as_secs_f64());
        let mut delay = Duration::from_secs_f64(capped);

        if self.jitter {
            // +/- 50% of the capped delay.
            let half_ms = (delay.as_millis() as f64 * 0.5) as u64;
            let offset = fastrand::u64(0..=half_ms.saturating_mul(2));
            let total_ms = delay.as_millis() as i64 + offset as i64 - half_ms as i64;
            delay = Duration::from_millis(total_ms.max(0) as u64);
        }

        delay
    }
}
