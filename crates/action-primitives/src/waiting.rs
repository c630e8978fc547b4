//! Bounded polling used by every wait in the workspace.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::types::Timeouts;

/// Polls a probe until it is satisfied or the bound elapses.
///
/// The probe always runs at least once, even with a zero bound, and runs one
/// last time at the deadline so a condition met during the final sleep is not
/// missed.
#[derive(Debug, Clone, Copy)]
pub struct Waiter {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Waiter {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    pub fn with_timeouts(bound: Duration, timeouts: &Timeouts) -> Self {
        Self::new(bound, timeouts.poll_interval)
    }

    /// Wait until `probe` yields `Some`, returning the value, or `None` on timeout.
    pub async fn until_some<T, F, Fut>(&self, mut probe: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        let deadline = Instant::now() + self.timeout;
        let mut probes = 0u32;
        loop {
            probes += 1;
            if let Some(value) = probe().await {
                debug!(probes, "wait satisfied");
                return Some(value);
            }
            let now = Instant::now();
            if now >= deadline {
                debug!(probes, timeout_ms = self.timeout.as_millis() as u64, "wait timed out");
                return None;
            }
            sleep(self.interval.min(deadline - now)).await;
        }
    }

    /// Wait until `probe` yields `true`. Returns whether it did before timeout.
    pub async fn until<F, Fut>(&self, mut probe: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        self.until_some(|| {
            let fut = probe();
            async move { fut.await.then_some(()) }
        })
        .await
        .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn probes_at_least_once_with_zero_bound() {
        let calls = AtomicU32::new(0);
        let waiter = Waiter::new(Duration::ZERO, Duration::from_millis(5));
        let met = waiter
            .until(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                false
            })
            .await;
        assert!(!met);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn returns_first_value() {
        let calls = AtomicU32::new(0);
        let waiter = Waiter::new(Duration::from_secs(1), Duration::from_millis(1));
        let value = waiter
            .until_some(|| async {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                (n >= 3).then_some(n)
            })
            .await;
        assert_eq!(value, Some(3));
    }

    #[tokio::test]
    async fn times_out() {
        let waiter = Waiter::new(Duration::from_millis(20), Duration::from_millis(5));
        let started = Instant::now();
        assert!(!waiter.until(|| async { false }).await);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
