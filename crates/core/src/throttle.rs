//! Per-upstream request throttling.
//!
//! Each upstream client owns one [`Throttle`]. It bounds the number of in-flight requests with a
//! semaphore and keeps consecutive request start times at least `spacing` apart. Requests that
//! fail are not retried.

use crate::config::SafetyConfig;
use crate::{SafetyError, SafetyResult};
use std::future::Future;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::Instant;

#[derive(Debug)]
pub struct Throttle {
    permits: Semaphore,
    spacing: Duration,
    next_start: Mutex<Option<Instant>>,
}

impl Throttle {
    /// Creates a throttle allowing `max_in_flight` concurrent requests (minimum 1).
    pub fn new(max_in_flight: usize, spacing: Duration) -> Self {
        Self {
            permits: Semaphore::new(max_in_flight.max(1)),
            spacing,
            next_start: Mutex::new(None),
        }
    }

    pub fn from_config(cfg: &SafetyConfig) -> Self {
        Self::new(cfg.max_concurrent_requests(), cfg.request_spacing())
    }

    /// Runs `request` once a permit and a start slot are available.
    ///
    /// # Errors
    ///
    /// Returns whatever `request` returns, or `SafetyError::Transport` if the throttle has been
    /// closed.
    pub async fn run<F, T>(&self, request: F) -> SafetyResult<T>
    where
        F: Future<Output = SafetyResult<T>>,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| SafetyError::Transport("request throttle closed".into()))?;

        self.wait_for_slot().await;
        request.await
    }

    async fn wait_for_slot(&self) {
        if self.spacing.is_zero() {
            return;
        }

        let slot = {
            let mut next_start = self.next_start.lock().await;
            let now = Instant::now();
            let slot = match *next_start {
                Some(next) if next > now => next,
                _ => now,
            };
            *next_start = Some(slot + self.spacing);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}
