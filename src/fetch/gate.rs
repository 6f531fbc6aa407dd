//! Request pacing
//!
//! The original plugin slept for a fixed interval before every request.
//! Here that is an explicit gate object owned by the fetcher and injected at
//! construction, so tests run with a zero-delay gate without touching any
//! fetch logic.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Minimum-interval gate applied before every outbound request
///
/// The gate remembers the instant of the previous request and makes the next
/// caller await the remainder of the interval. Callers are serialized through
/// the internal lock, which is exactly the pacing discipline the site asks
/// for: one request per interval, process-wide.
#[derive(Debug)]
pub struct RateGate {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateGate {
    /// Creates a gate enforcing the given minimum interval between requests
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Creates a gate that never waits, for tests
    pub fn unthrottled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Waits until the minimum interval since the previous request has passed
    ///
    /// Returns immediately on the first request or when the interval has
    /// already elapsed. The wait is a plain await on the calling task, not a
    /// background scheduler.
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }
}
