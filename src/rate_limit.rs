//! Rate limiting for external collaborators
//!
//! Token bucket pacing for batch classification and the hosted-model call
//! budget. Replaces fixed inter-item sleeps: the budget is configurable and
//! decoupled from the cascade logic. Each limiter is per-process, per-batch
//! usage is the caller's choice.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// A token bucket rate limiter expressed in requests per minute
#[derive(Debug)]
pub struct RateLimiter {
    /// Tokens available in the bucket
    tokens: f64,
    /// Maximum tokens (bucket capacity)
    max_tokens: f64,
    /// Tokens added per second
    refill_rate: f64,
    /// Last time tokens were updated
    last_update: Instant,
    /// Whether rate limiting is enabled (false if budget is 0/unlimited)
    enabled: bool,
}

impl RateLimiter {
    /// Create a limiter allowing `requests_per_minute` acquisitions.
    /// A budget of 0 disables limiting entirely.
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let enabled = requests_per_minute > 0;
        // Allow a burst of one request, refilled at the per-minute rate.
        let max_tokens = if enabled { 1.0 } else { f64::INFINITY };

        Self {
            tokens: max_tokens,
            max_tokens,
            refill_rate: requests_per_minute as f64 / 60.0,
            last_update: Instant::now(),
            enabled,
        }
    }

    fn refill(&mut self) {
        if !self.enabled {
            return;
        }

        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        self.last_update = now;
    }

    /// Try to acquire a token, returning time to wait if not available
    pub fn try_acquire(&mut self) -> Option<Duration> {
        if !self.enabled {
            return None;
        }

        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            None
        } else {
            let wait_secs = (1.0 - self.tokens) / self.refill_rate;
            Some(Duration::from_secs_f64(wait_secs))
        }
    }

    /// Acquire a token, waiting if necessary. Re-checks after each sleep in
    /// case other tasks consumed tokens in the meantime.
    pub async fn acquire(&mut self) {
        loop {
            match self.try_acquire() {
                None => return,
                Some(wait_duration) => {
                    debug!("Rate limiter waiting {:?} for token", wait_duration);
                    sleep(wait_duration).await;
                }
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Thread-safe rate limiter wrapper shared across tasks
#[derive(Debug, Clone)]
pub struct SharedRateLimiter {
    inner: Arc<Mutex<RateLimiter>>,
}

impl SharedRateLimiter {
    /// Create a shared limiter with the given per-minute budget (0 = unlimited)
    pub fn per_minute(requests_per_minute: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimiter::per_minute(requests_per_minute))),
        }
    }

    /// Acquire a token, waiting if necessary
    pub async fn acquire(&self) {
        let mut limiter = self.inner.lock().await;
        limiter.acquire().await;
    }

    /// Check if rate limiting is enabled
    pub async fn is_enabled(&self) -> bool {
        let limiter = self.inner.lock().await;
        limiter.is_enabled()
    }
}
