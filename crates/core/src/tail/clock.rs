//! Wall-clock and delay abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Abstracts wall-clock time and the delay primitive so tail sessions
/// can be driven deterministically in tests.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current UTC wall-clock time.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Wait for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// The production clock: `chrono` time and tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
