//! Pacing policies
//!
//! The dispatch loop is intentionally serial with human-like pauses:
//! a uniformly random delay after every send and a longer jittered
//! pause between batches. Both are real wall-clock sleeps.

use std::time::Duration;

use rand::Rng;
use tracing::info;

use crate::config::{BATCH_PAUSE, MAX_DELAY, MIN_DELAY};
use crate::traits::PacingPolicy;

/// Production pacing with randomized delays
#[derive(Debug, Clone)]
pub struct RandomizedPacing {
    min_delay: Duration,
    max_delay: Duration,
    batch_pause: Duration,
    batch_jitter: Duration,
}

impl Default for RandomizedPacing {
    fn default() -> Self {
        Self {
            min_delay: MIN_DELAY,
            max_delay: MAX_DELAY,
            batch_pause: BATCH_PAUSE,
            batch_jitter: Duration::from_secs(10),
        }
    }
}

impl RandomizedPacing {
    pub fn new(
        min_delay: Duration,
        max_delay: Duration,
        batch_pause: Duration,
        batch_jitter: Duration,
    ) -> Self {
        Self {
            min_delay,
            max_delay,
            batch_pause,
            batch_jitter,
        }
    }
}

#[async_trait::async_trait]
impl PacingPolicy for RandomizedPacing {
    async fn pause_between_sends(&self) {
        // RNG handle must not be held across the await point
        let delay = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.min_delay.as_secs_f64()..=self.max_delay.as_secs_f64())
        };
        tokio::time::sleep(Duration::from_secs_f64(delay)).await;
    }

    async fn pause_between_batches(&self) {
        let pause = {
            let mut rng = rand::thread_rng();
            let jitter = self.batch_jitter.as_secs() as i64;
            let offset = rng.gen_range(-jitter..=jitter);
            (self.batch_pause.as_secs() as i64 + offset).max(0) as u64
        };
        info!("⏸️ Pausing for {pause} seconds between batches...");
        tokio::time::sleep(Duration::from_secs(pause)).await;
    }
}

/// Zero-delay policy for tests
#[derive(Debug, Clone, Default)]
pub struct NoPacing;

#[async_trait::async_trait]
impl PacingPolicy for NoPacing {
    async fn pause_between_sends(&self) {}

    async fn pause_between_batches(&self) {}
}
