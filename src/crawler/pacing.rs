//! Request pacing policies
//!
//! The crawler pauses once after every discussion visit. The policy is a
//! trait so the delay can be configured, and tests can observe pauses
//! without real time passing.

use async_trait::async_trait;
use std::time::Duration;

/// Pause applied between discussion visits
#[async_trait(?Send)]
pub trait Pacer {
    /// Waits before the next request may be issued
    async fn pause(&self);
}

/// Sleeps for a fixed duration on every pause
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait(?Send)]
impl Pacer for FixedDelay {
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait(?Send)]
impl Pacer for NoDelay {
    async fn pause(&self) {}
}
