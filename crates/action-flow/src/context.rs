//! Browsing context baseline owned by one scenario

use crate::errors::FlowError;
use action_gate::same_page;
use action_primitives::{Timeouts, Waiter};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};
use waypoint_core_types::ContextHandle;
use webdriver_adapter::BrowserDriver;

const READY: &str = "complete";

/// Open contexts and the origin a scenario started from.
///
/// Captured at scenario start and used to put the session back before the
/// scenario returns, so the next scenario starts from the same baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowsingContextSet {
    pub origin: ContextHandle,
    pub origin_url: String,
    pub baseline: BTreeSet<ContextHandle>,
}

impl BrowsingContextSet {
    /// Snapshot the session as it is now.
    pub async fn capture(driver: &dyn BrowserDriver) -> Result<Self, FlowError> {
        let origin = driver.current_context().await?;
        let origin_url = driver.current_url().await?;
        let baseline = driver.open_contexts().await?.into_iter().collect();
        debug!(origin = %origin, url = %origin_url, "Captured browsing context baseline");
        Ok(Self {
            origin,
            origin_url,
            baseline,
        })
    }

    /// Contexts open now that were not part of the baseline
    pub fn extras(&self, open: &[ContextHandle]) -> Vec<ContextHandle> {
        open.iter()
            .filter(|handle| !self.baseline.contains(handle))
            .cloned()
            .collect()
    }

    /// Return the session to the baseline.
    ///
    /// Steps:
    /// 1. Close every context opened since capture
    /// 2. Focus the origin context
    /// 3. If the origin left its URL, go back and wait for the URL and a
    ///    complete document; navigate directly if that does not happen
    /// 4. Check that the open contexts and focus match the baseline
    pub async fn restore(
        &self,
        driver: &dyn BrowserDriver,
        timeouts: &Timeouts,
    ) -> Result<(), FlowError> {
        let open = driver.open_contexts().await?;
        for handle in self.extras(&open) {
            debug!(handle = %handle, "Closing extra context");
            driver.switch_to(&handle).await?;
            driver.close_current().await?;
        }
        driver.switch_to(&self.origin).await?;

        let url = driver.current_url().await?;
        if !same_page(&url, &self.origin_url) {
            driver.back().await?;
            if !self.wait_for_origin(driver, timeouts).await {
                warn!(
                    url = %self.origin_url,
                    "Back navigation did not return to origin, navigating directly"
                );
                driver.navigate(&self.origin_url).await?;
                if !self.wait_for_origin(driver, timeouts).await {
                    return Err(FlowError::RestoreFailed(format!(
                        "origin {} did not load",
                        self.origin_url
                    )));
                }
            }
        }

        let open: BTreeSet<ContextHandle> = driver.open_contexts().await?.into_iter().collect();
        let focused = driver.current_context().await?;
        if open != self.baseline || focused != self.origin {
            return Err(FlowError::RestoreFailed(format!(
                "expected {} contexts focused on {}, found {} focused on {}",
                self.baseline.len(),
                self.origin,
                open.len(),
                focused
            )));
        }

        info!(origin = %self.origin, url = %self.origin_url, "Browsing contexts restored");
        Ok(())
    }

    async fn wait_for_origin(&self, driver: &dyn BrowserDriver, timeouts: &Timeouts) -> bool {
        Waiter::new(timeouts.navigation, timeouts.poll_interval)
            .until(|| async move {
                let at_origin = matches!(
                    driver.current_url().await,
                    Ok(url) if same_page(&url, &self.origin_url)
                );
                at_origin && matches!(driver.ready_state().await.as_deref(), Ok(READY))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extras_excludes_baseline() {
        let set = BrowsingContextSet {
            origin: ContextHandle::new("tab-1"),
            origin_url: "https://shop.example.com/".into(),
            baseline: [ContextHandle::new("tab-1")].into_iter().collect(),
        };
        let open = vec![ContextHandle::new("tab-1"), ContextHandle::new("tab-2")];
        assert_eq!(set.extras(&open), vec![ContextHandle::new("tab-2")]);
    }
}
