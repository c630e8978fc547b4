//! Navigation observer: same-tab vs new-tab detection after a trigger

use crate::{errors::GateError, types::NavigationOutcome};
use action_primitives::{Timeouts, Waiter};
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};
use waypoint_core_types::ContextHandle;
use webdriver_adapter::BrowserDriver;

const BLANK_PAGE: &str = "about:blank";

/// What a single poll after the trigger saw first
enum Detected {
    NewContext(ContextHandle),
    UrlChanged(String),
}

/// Observes the effect of an action that may navigate.
pub struct NavigationObserver {
    driver: Arc<dyn BrowserDriver>,
    timeouts: Timeouts,
}

impl NavigationObserver {
    pub fn new(driver: Arc<dyn BrowserDriver>, timeouts: Timeouts) -> Self {
        Self { driver, timeouts }
    }

    /// Run `trigger` and report where it led.
    ///
    /// Steps:
    /// 1. Focus `origin` and record its URL
    /// 2. Run the trigger; its error ends the observation
    /// 3. Poll until a context outside `prior` exists or the origin URL changes,
    ///    checking contexts first so a new tab wins a tie
    /// 4. For a new tab, switch to it and let its URL settle past `about:blank`
    ///
    /// Returns the trigger's value with the outcome. `NoNavigation` is an
    /// ordinary outcome when neither condition is met within the bound.
    pub async fn observe<F, Fut, T, E>(
        &self,
        trigger: F,
        origin: &ContextHandle,
        prior: &BTreeSet<ContextHandle>,
    ) -> Result<(T, NavigationOutcome), GateError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        E: Into<GateError>,
    {
        let driver = self.driver.as_ref();
        if driver.current_context().await? != *origin {
            driver.switch_to(origin).await?;
        }
        let before = driver.current_url().await?;

        let value = trigger().await.map_err(Into::into)?;

        let bound = self.timeouts.navigation;
        let deadline = Instant::now() + bound;
        let detected = Waiter::new(bound, self.timeouts.poll_interval)
            .until_some(|| {
                let before = before.as_str();
                async move {
                    match self.poll_once(prior, before).await {
                        Ok(Some(found)) => Some(Ok(found)),
                        Ok(None) => None,
                        Err(err) => Some(Err(err)),
                    }
                }
            })
            .await
            .transpose()?;

        let outcome = match detected {
            Some(Detected::NewContext(handle)) => {
                driver.switch_to(&handle).await?;
                let remaining = deadline.saturating_duration_since(Instant::now());
                let url = self.settle_new_tab(remaining).await?;
                NavigationOutcome::NewTab { handle, url }
            }
            Some(Detected::UrlChanged(url)) => NavigationOutcome::SameTab { url },
            None => NavigationOutcome::NoNavigation,
        };

        info!(
            origin = %origin,
            from = %before,
            outcome = %outcome,
            "Navigation observed"
        );
        Ok((value, outcome))
    }

    async fn poll_once(
        &self,
        prior: &BTreeSet<ContextHandle>,
        before: &str,
    ) -> Result<Option<Detected>, GateError> {
        let contexts = self.driver.open_contexts().await?;
        if let Some(handle) = contexts.into_iter().find(|h| !prior.contains(h)) {
            debug!(handle = %handle, "New browsing context detected");
            return Ok(Some(Detected::NewContext(handle)));
        }

        let url = self.driver.current_url().await?;
        if url != before {
            debug!(url = %url, "URL change detected");
            return Ok(Some(Detected::UrlChanged(url)));
        }
        Ok(None)
    }

    /// Poll the focused tab until it leaves `about:blank`; on timeout the last
    /// URL read is returned as is.
    async fn settle_new_tab(&self, bound: Duration) -> Result<String, GateError> {
        let settled = Waiter::new(bound, self.timeouts.poll_interval)
            .until_some(|| async move {
                match self.driver.current_url().await {
                    Ok(url) if is_blank(&url) => None,
                    Ok(url) => Some(Ok(url)),
                    Err(err) => Some(Err(err)),
                }
            })
            .await
            .transpose()?;

        match settled {
            Some(url) => Ok(url),
            None => Ok(self.driver.current_url().await?),
        }
    }
}

fn is_blank(url: &str) -> bool {
    let url = url.trim();
    url.is_empty() || url == BLANK_PAGE
}
