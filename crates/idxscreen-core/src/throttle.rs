//! Upstream request pacing.
//!
//! A politeness limiter in front of the fetch path, replacing ad-hoc
//! sleeps: the run orchestrator awaits rate budget before every upstream
//! call so a large universe never hammers the provider.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Default polite request budget against the chart API.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 120;

/// Shared rate gate for per-instrument fetches.
#[derive(Clone)]
pub struct FetchPacer {
    limiter: Option<Arc<DirectRateLimiter>>,
}

impl FetchPacer {
    /// No pacing. Used for offline runs and tests.
    pub fn unlimited() -> Self {
        Self { limiter: None }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self {
            limiter: Some(Arc::new(RateLimiter::direct(quota_per_minute(limit)))),
        }
    }

    /// Waits until one request of budget is available.
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// Non-blocking probe, used by tests and diagnostics.
    pub fn try_acquire(&self) -> bool {
        match &self.limiter {
            Some(limiter) => limiter.check().is_ok(),
            None => true,
        }
    }
}

impl Default for FetchPacer {
    fn default() -> Self {
        Self::per_minute(DEFAULT_REQUESTS_PER_MINUTE)
    }
}

fn quota_per_minute(limit: u32) -> Quota {
    let safe_limit = limit.max(1);
    let burst = NonZeroU32::new(safe_limit).expect("safe limit must be non-zero");

    let seconds_per_cell = (60.0 / f64::from(safe_limit)).max(0.001);
    let period = Duration::from_secs_f64(seconds_per_cell);

    Quota::with_period(period)
        .expect("period is always greater than zero")
        .allow_burst(burst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_pacer_always_has_budget() {
        let pacer = FetchPacer::unlimited();
        for _ in 0..1_000 {
            assert!(pacer.try_acquire());
        }
    }

    #[test]
    fn bounded_pacer_exhausts_its_burst() {
        let pacer = FetchPacer::per_minute(2);
        assert!(pacer.try_acquire());
        assert!(pacer.try_acquire());
        assert!(!pacer.try_acquire());
    }
}
