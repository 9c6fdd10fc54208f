//! Minimum spacing between outbound requests to the same service.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// Spaces calls to [`Pacer::wait`] at least `min_interval` apart, with
/// ±25% jitter on each gap. The first call never waits.
pub(crate) struct Pacer {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    pub(crate) fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Reserves the next slot and sleeps until it arrives. The lock is only
    /// held while computing the slot, never across the sleep.
    pub(crate) async fn wait(&self) {
        let slot = {
            let mut next_slot = self
                .next_slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            let slot = next_slot.map_or(now, |at| at.max(now));
            *next_slot = Some(slot + jittered(self.min_interval));
            slot
        };

        if slot > Instant::now() {
            tracing::debug!(
                delay_ms = slot.saturating_duration_since(Instant::now()).as_millis(),
                "pacing request"
            );
            tokio::time::sleep_until(slot).await;
        }
    }
}

/// Scales `base` by a random factor in `[0.75, 1.25)`.
fn jittered(base: Duration) -> Duration {
    if base.is_zero() {
        return base;
    }
    base.mul_f64(rand::random::<f64>() * 0.5 + 0.75)
}
