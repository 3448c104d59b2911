//! Fixed-interval request pacing against one target service.
//!
//! Permits are spaced `60s / max_per_minute` apart. The last-permit timestamp
//! is read, slept on and updated under a single lock, so concurrent callers
//! queue behind each other and the aggregate rate bound holds. Arrival order
//! is not guaranteed.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::error::EngineError;
use crate::telemetry::metrics;

const WINDOW: Duration = Duration::from_secs(60);

/// Shared pacing state for one target service.
#[derive(Debug)]
pub struct RateLimiter {
    max_per_minute: u32,
    interval: Duration,
    last_permit: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter granting at most `max_per_minute` permits per minute.
    ///
    /// Zero is rejected as `InvalidConfiguration`.
    pub fn new(max_per_minute: u32) -> Result<Self, EngineError> {
        if max_per_minute == 0 {
            return Err(EngineError::invalid(
                "max_requests_per_minute",
                "maxRequestsPerMinute must be > 0",
            ));
        }
        Ok(Self {
            max_per_minute,
            interval: WINDOW / max_per_minute,
            last_permit: Mutex::new(None),
        })
    }

    pub fn max_per_minute(&self) -> u32 {
        self.max_per_minute
    }

    /// Minimum spacing between two permits.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn remaining(&self, last: Option<Instant>, now: Instant) -> Duration {
        match last {
            Some(at) => self.interval.saturating_sub(now.saturating_duration_since(at)),
            None => Duration::ZERO,
        }
    }

    /// Wait until a permit is available. Returns how long this caller slept.
    ///
    /// The first call never waits. Only the calling task is suspended.
    pub async fn acquire(&self) -> Duration {
        let mut last = self.last_permit.lock().await;
        let wait = self.remaining(*last, Instant::now());
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        *last = Some(Instant::now());
        drop(last);

        metrics::record_rate_limit_wait(wait);
        wait
    }

    /// Blocking variant of [`acquire`](Self::acquire) for plain threads.
    ///
    /// Shares the same critical section as the async path. Must not be called
    /// from inside an async runtime.
    pub fn blocking_acquire(&self) -> Duration {
        let mut last = self.last_permit.blocking_lock();
        let wait = self.remaining(*last, Instant::now());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        *last = Some(Instant::now());
        drop(last);

        metrics::record_rate_limit_wait(wait);
        wait
    }
}
