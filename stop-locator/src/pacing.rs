//! Request pacing for external providers.
//!
//! Both providers are metered per request, so calls are spaced out rather
//! than fired back to back. A [`Pacer`] is a GCRA limiter with a burst of
//! one; clones share the same limiter, so every holder of a clone is
//! throttled together.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared minimum-interval throttle.
#[derive(Clone)]
pub struct Pacer {
    /// `None` when unpaced.
    limiter: Option<Arc<DirectLimiter>>,
}

impl Pacer {
    /// Create a pacer that allows one call per `interval`. A zero interval
    /// never waits.
    pub fn new(interval: Duration) -> Self {
        let limiter = Quota::with_period(interval).map(|quota| Arc::new(RateLimiter::direct(quota)));
        Self { limiter }
    }

    /// A pacer that never waits.
    pub fn unpaced() -> Self {
        Self { limiter: None }
    }

    /// Wait until a slot is free, then claim it.
    ///
    /// The first call returns immediately. Each later call returns no
    /// sooner than one interval after the previous slot.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl fmt::Debug for Pacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pacer")
            .field("paced", &self.limiter.is_some())
            .finish()
    }
}
