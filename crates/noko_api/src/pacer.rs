//! Async request pacing so bursts of calls stay under the API rate limit.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Spaces consecutive requests at least `spacing` apart. Clones share the same schedule.
#[derive(Clone, Debug)]
pub struct RequestPacer {
    spacing: Duration,
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl RequestPacer {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            next_slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Waits for the next free slot and reserves the one after it.
    pub async fn acquire(&self) {
        let mut slot = self.next_slot.lock().await;
        let now = Instant::now();
        if let Some(ready_at) = *slot {
            if ready_at > now {
                tracing::trace!(wait_ms = (ready_at - now).as_millis() as u64, "pacing request");
                sleep_until(ready_at).await;
            }
        }
        *slot = Some(Instant::now() + self.spacing);
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }
}
