//! Element resolver with fallback chain orchestration

use crate::{
    errors::LocatorError,
    strategies::evaluate_strategy,
    types::{LocatorSpec, NotFound, Resolution},
};
use action_primitives::{ResolvedElement, Timeouts, Waiter};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use webdriver_adapter::BrowserDriver;

/// Element resolver trait
#[async_trait]
pub trait ElementResolver: Send + Sync {
    /// One pass over the fallback chain. No side effects on the page.
    async fn resolve(
        &self,
        spec: &LocatorSpec,
        scope: Option<&ResolvedElement>,
    ) -> Result<Resolution, LocatorError>;

    /// Repeat full `resolve` passes until one finds an element or `timeout`
    /// elapses. A locator without strategies returns `NotFound` immediately.
    async fn resolve_within(
        &self,
        spec: &LocatorSpec,
        scope: Option<&ResolvedElement>,
        timeout: Duration,
    ) -> Result<Resolution, LocatorError>;
}

/// Default element resolver implementation
pub struct DefaultElementResolver {
    driver: Arc<dyn BrowserDriver>,
    poll_interval: Duration,
}

impl DefaultElementResolver {
    pub fn new(driver: Arc<dyn BrowserDriver>, timeouts: &Timeouts) -> Self {
        Self {
            driver,
            poll_interval: timeouts.poll_interval,
        }
    }
}

#[async_trait]
impl ElementResolver for DefaultElementResolver {
    async fn resolve(
        &self,
        spec: &LocatorSpec,
        scope: Option<&ResolvedElement>,
    ) -> Result<Resolution, LocatorError> {
        let mut attempts = Vec::with_capacity(spec.strategies.len());
        let scope_id = scope.map(|s| &s.element);

        // Try each strategy in declaration order
        for strategy in &spec.strategies {
            debug!(locator = %spec, strategy = %strategy, "Trying strategy");
            let outcome = evaluate_strategy(self.driver.as_ref(), strategy, scope_id).await?;
            attempts.push(outcome.attempt);

            if let Some(element) = outcome.element {
                info!(
                    locator = %spec,
                    strategy = %strategy,
                    fallbacks = attempts.len() - 1,
                    "Resolved element"
                );
                return Ok(Resolution::Found(ResolvedElement::new(
                    element,
                    strategy.clone(),
                    spec.label.clone(),
                )));
            }
        }

        // All strategies exhausted
        debug!(locator = %spec, attempted = attempts.len(), "All strategies exhausted");
        Ok(Resolution::NotFound(NotFound {
            label: spec.label.clone(),
            attempts,
        }))
    }

    async fn resolve_within(
        &self,
        spec: &LocatorSpec,
        scope: Option<&ResolvedElement>,
        timeout: Duration,
    ) -> Result<Resolution, LocatorError> {
        if spec.is_empty() {
            return self.resolve(spec, scope).await;
        }

        let waiter = Waiter::new(timeout, self.poll_interval);
        let found = waiter
            .until_some(|| async move {
                match self.resolve(spec, scope).await {
                    Ok(Resolution::Found(el)) => Some(Ok(el)),
                    Ok(Resolution::NotFound(_)) => None,
                    Err(err) => Some(Err(err)),
                }
            })
            .await;

        match found {
            Some(Ok(el)) => Ok(Resolution::Found(el)),
            Some(Err(err)) => Err(err),
            None => {
                info!(
                    locator = %spec,
                    timeout_ms = timeout.as_millis() as u64,
                    "Element not found in time"
                );
                // One more pass for the diagnostics of the final attempt
                self.resolve(spec, scope).await
            }
        }
    }
}
