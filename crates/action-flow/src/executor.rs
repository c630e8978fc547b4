//! Scenario executor implementation

use crate::errors::FlowError;
use crate::types::{FormScenario, ScenarioReport, SweepReport};
use action_gate::{NavigationObserver, SubmissionProbe};
use action_locator::{DefaultElementResolver, ElementResolver, LocatorSpec, Resolution};
use action_primitives::{
    ActionDispatcher, ActionReport, DefaultActionDispatcher, ResolvedElement, Timeouts,
};
use async_trait::async_trait;
use std::sync::Arc;
use waypoint_core_types::Strategy;
use webdriver_adapter::BrowserDriver;

/// Composite scenario calls exposed to test suites
#[async_trait]
pub trait ScenarioExecutor: Send + Sync {
    /// Single resolution pass over the locator's strategies
    async fn resolve(&self, spec: &LocatorSpec) -> Result<Resolution, FlowError>;

    async fn perform_click(&self, el: &ResolvedElement) -> Result<ActionReport, FlowError>;

    async fn perform_type(&self, el: &ResolvedElement, text: &str) -> Result<ActionReport, FlowError>;

    /// Click a link, verify its destination is external and matches
    /// `expected` (if given), then restore the browsing contexts.
    async fn verify_external_link(
        &self,
        el: &ResolvedElement,
        expected: Option<&str>,
    ) -> Result<ScenarioReport, FlowError>;

    /// Resolve the link first; an absent link is skipped.
    async fn verify_external_link_spec(
        &self,
        spec: &LocatorSpec,
        expected: Option<&str>,
    ) -> Result<ScenarioReport, FlowError>;

    /// Fill the form, submit it and check the expected branch.
    async fn submit_form_and_expect(
        &self,
        scenario: &FormScenario,
    ) -> Result<ScenarioReport, FlowError>;

    /// Open `page_url` and run the external-link flow for every distinct
    /// external link on it.
    async fn verify_all_external_links(&self, page_url: &str) -> Result<SweepReport, FlowError>;
}

/// Default scenario executor implementation
pub struct DefaultScenarioExecutor {
    pub(crate) driver: Arc<dyn BrowserDriver>,
    pub(crate) resolver: Arc<dyn ElementResolver>,
    pub(crate) dispatcher: Arc<dyn ActionDispatcher>,
    pub(crate) observer: NavigationObserver,
    pub(crate) probe: SubmissionProbe,
    pub(crate) timeouts: Timeouts,
    pub(crate) application_origin: Option<String>,
}

impl DefaultScenarioExecutor {
    /// Executor with the default resolver and dispatcher over `driver`
    pub fn new(driver: Arc<dyn BrowserDriver>, timeouts: Timeouts) -> Self {
        let resolver: Arc<dyn ElementResolver> =
            Arc::new(DefaultElementResolver::new(driver.clone(), &timeouts));
        let dispatcher: Arc<dyn ActionDispatcher> =
            Arc::new(DefaultActionDispatcher::new(driver.clone(), timeouts));
        Self::with_components(driver, resolver, dispatcher, timeouts)
    }

    pub fn with_components(
        driver: Arc<dyn BrowserDriver>,
        resolver: Arc<dyn ElementResolver>,
        dispatcher: Arc<dyn ActionDispatcher>,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            observer: NavigationObserver::new(driver.clone(), timeouts),
            probe: SubmissionProbe::new(driver.clone(), resolver.clone(), timeouts),
            driver,
            resolver,
            dispatcher,
            timeouts,
            application_origin: None,
        }
    }

    /// Classify destinations against this origin instead of the page under test
    pub fn with_application_origin(mut self, origin: impl Into<String>) -> Self {
        self.application_origin = Some(origin.into());
        self
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Resolve with the flow bound, for elements that render late
    pub(crate) async fn resolve_bounded(&self, spec: &LocatorSpec) -> Result<Resolution, FlowError> {
        Ok(self
            .resolver
            .resolve_within(spec, None, self.timeouts.wait)
            .await?)
    }

    /// URL of the focused context, if it can still be read
    pub(crate) async fn final_url(&self) -> Option<String> {
        self.driver.current_url().await.ok()
    }
}

/// Strategies of the locator up to and including the one that won
pub(crate) fn chain_until(spec: &LocatorSpec, winner: &Strategy) -> Vec<Strategy> {
    match spec.strategies.iter().position(|s| s == winner) {
        Some(index) => spec.strategies[..=index].to_vec(),
        None => vec![winner.clone()],
    }
}

#[async_trait]
impl ScenarioExecutor for DefaultScenarioExecutor {
    async fn resolve(&self, spec: &LocatorSpec) -> Result<Resolution, FlowError> {
        Ok(self.resolver.resolve(spec, None).await?)
    }

    async fn perform_click(&self, el: &ResolvedElement) -> Result<ActionReport, FlowError> {
        Ok(self.dispatcher.perform_click(el).await?)
    }

    async fn perform_type(&self, el: &ResolvedElement, text: &str) -> Result<ActionReport, FlowError> {
        Ok(self.dispatcher.perform_type(el, text).await?)
    }

    async fn verify_external_link(
        &self,
        el: &ResolvedElement,
        expected: Option<&str>,
    ) -> Result<ScenarioReport, FlowError> {
        self.run_external_link(el, expected).await
    }

    async fn verify_external_link_spec(
        &self,
        spec: &LocatorSpec,
        expected: Option<&str>,
    ) -> Result<ScenarioReport, FlowError> {
        self.run_external_link_spec(spec, expected).await
    }

    async fn submit_form_and_expect(
        &self,
        scenario: &FormScenario,
    ) -> Result<ScenarioReport, FlowError> {
        self.run_form_submission(scenario).await
    }

    async fn verify_all_external_links(&self, page_url: &str) -> Result<SweepReport, FlowError> {
        self.run_sweep(page_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_until_winner() {
        let spec = LocatorSpec::button("Send");
        let chain = chain_until(&spec, &Strategy::free_text_in("button", "Send"));
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0], Strategy::attribute("type", "submit"));
    }
}
