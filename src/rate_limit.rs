//! Request-rate throttling for signing-key lookups.
//!
//! Policy: **delay, never reject**. A lookup that would exceed the budget is
//! suspended until the bucket refills enough to cover it, so callers see
//! slower responses under pressure rather than errors. The budget throttles
//! lookup rate across all `kid`s of one client; it is not a per-key
//! concurrency limit.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::{self, Instant};
use tracing::debug;

use crate::error::JwksError;
use crate::jwk::SigningKey;
use crate::resolver::SigningKeyLookup;

/// Token bucket with continuous refill and reservation-order grants.
///
/// The bucket starts full, so a budget of `B` grants `B` immediate lookups.
/// A caller that finds the bucket empty reserves the next refill slot (the
/// level goes negative, forming a virtual queue) and sleeps until its slot;
/// slots are spaced `interval / B` apart, which bounds every caller's
/// incremental wait and keeps grants in reservation order, so concurrent
/// callers cannot starve.
struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    tokens: f64,
    refilled_at: Instant,
}

impl TokenBucket {
    fn new(budget: u32, interval: Duration) -> Self {
        let capacity = f64::from(budget.max(1));
        Self {
            capacity,
            refill_per_sec: capacity / interval.as_secs_f64(),
            tokens: capacity,
            refilled_at: Instant::now(),
        }
    }

    /// Take one token, returning how long the caller must wait before
    /// proceeding. Zero when a token was available immediately.
    fn reserve(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.refilled_at).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.refilled_at = now;

        self.tokens -= 1.0;
        if self.tokens >= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(-self.tokens / self.refill_per_sec)
        }
    }
}

/// Decorates a lookup with a shared requests-per-minute budget.
pub struct RateLimitedLookup<L> {
    inner: L,
    bucket: Mutex<TokenBucket>,
}

impl<L> std::fmt::Debug for RateLimitedLookup<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitedLookup").finish_non_exhaustive()
    }
}

impl<L> RateLimitedLookup<L> {
    /// Wrap `inner` with a budget of `requests_per_minute` lookups per
    /// minute. A budget of 0 is clamped to 1.
    pub fn new(inner: L, requests_per_minute: u32) -> Self {
        Self {
            inner,
            bucket: Mutex::new(TokenBucket::new(
                requests_per_minute,
                Duration::from_secs(60),
            )),
        }
    }
}

#[async_trait]
impl<L: SigningKeyLookup> SigningKeyLookup for RateLimitedLookup<L> {
    async fn get_signing_key(&self, kid: &str) -> Result<SigningKey, JwksError> {
        // reserve under the lock, sleep outside it
        let wait = self.bucket.lock().reserve(Instant::now());
        if !wait.is_zero() {
            debug!(
                %kid,
                wait_ms = wait.as_millis() as u64,
                "rate limit budget exhausted, delaying lookup"
            );
            time::sleep(wait).await;
        }
        self.inner.get_signing_key(kid).await
    }
}
