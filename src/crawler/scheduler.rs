//! Request pacing
//!
//! The walker calls its throttle once per node, after the node's whole
//! subtree has been processed. The production throttle is a fixed delay.

use crate::catalog::Code;
use std::time::Duration;

/// Pacing hook invoked by the walker when it is done with a node
#[allow(async_fn_in_trait)]
pub trait Throttle {
    /// Called once for every processed node, in post-order
    async fn pause(&mut self, code: &Code);
}

/// Fixed delay between catalog requests
///
/// A zero delay disables throttling entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// A limiter that never waits
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleeps for the configured delay
    pub async fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }
        tokio::time::sleep(self.delay).await;
    }
}

impl Throttle for RateLimiter {
    async fn pause(&mut self, code: &Code) {
        tracing::trace!("Pausing {:?} after code '{}'", self.delay, code);
        self.wait().await;
    }
}
