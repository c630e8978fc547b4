//! External-link flow: click, observe, classify, restore

use crate::context::BrowsingContextSet;
use crate::errors::FlowError;
use crate::executor::{chain_until, DefaultScenarioExecutor};
use crate::types::{LinkFlowState, ScenarioOutcome, ScenarioReport, SkipReason};
use action_gate::{classify, NavigationOutcome};
use action_locator::{LocatorSpec, Resolution};
use action_primitives::{ResolvedElement, Waiter};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Whether an `href` attribute leads anywhere worth verifying.
///
/// Empty and fragment-only hrefs, and `javascript:`, `mailto:` and `tel:`
/// links, are ineligible.
pub fn is_followable(href: Option<&str>) -> bool {
    let Some(href) = href.map(str::trim) else {
        return false;
    };
    let lowered = href.to_ascii_lowercase();
    !(lowered.is_empty()
        || lowered.starts_with('#')
        || ["javascript:", "mailto:", "tel:"]
            .iter()
            .any(|scheme| lowered.starts_with(scheme)))
}

fn scenario_name(el: &ResolvedElement) -> String {
    if el.label.is_empty() {
        format!("external link via {}", el.strategy)
    } else {
        format!("external link '{}'", el.label)
    }
}

impl DefaultScenarioExecutor {
    /// Run the flow on a resolved link. Restoration always runs, whatever the
    /// verification result or error.
    pub(crate) async fn run_external_link(
        &self,
        el: &ResolvedElement,
        expected: Option<&str>,
    ) -> Result<ScenarioReport, FlowError> {
        let started = Instant::now();
        let contexts = BrowsingContextSet::capture(self.driver.as_ref()).await?;

        let result = self.link_flow(&contexts, el, expected).await;
        let restored = contexts.restore(self.driver.as_ref(), &self.timeouts).await;
        debug!(state = ?LinkFlowState::Restored, ok = restored.is_ok(), "Link flow state");

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match (result, restored) {
            (Ok(report), Ok(())) => {
                info!(
                    scenario = %report.name,
                    outcome = %report.outcome,
                    elapsed_ms,
                    "External link scenario finished"
                );
                Ok(report.with_elapsed(elapsed_ms))
            }
            (Ok(_), Err(restore_err)) => Err(restore_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(restore_err)) => {
                warn!(error = %restore_err, "Restoration failed after scenario error");
                Err(err)
            }
        }
    }

    pub(crate) async fn run_external_link_spec(
        &self,
        spec: &LocatorSpec,
        expected: Option<&str>,
    ) -> Result<ScenarioReport, FlowError> {
        let started = Instant::now();
        match self.resolve_bounded(spec).await? {
            Resolution::NotFound(not_found) => {
                info!(locator = %spec, "Link not found, skipping");
                Ok(
                    ScenarioReport::new(
                        format!("external link '{}'", spec),
                        ScenarioOutcome::Skipped(SkipReason::Absent),
                    )
                    .with_strategies(not_found.strategies())
                    .with_final_url(self.final_url().await)
                    .with_elapsed(started.elapsed().as_millis() as u64),
                )
            }
            Resolution::Found(el) => {
                let mut report = self.run_external_link(&el, expected).await?;
                report.strategies_attempted = chain_until(spec, &el.strategy);
                report.elapsed_ms = started.elapsed().as_millis() as u64;
                Ok(report)
            }
        }
    }

    async fn link_flow(
        &self,
        contexts: &BrowsingContextSet,
        el: &ResolvedElement,
        expected: Option<&str>,
    ) -> Result<ScenarioReport, FlowError> {
        let driver = self.driver.as_ref();
        let name = scenario_name(el);
        let strategies = vec![el.strategy.clone()];
        debug!(state = ?LinkFlowState::Idle, scenario = %name, "Link flow state");

        let raw_href = driver.attribute(&el.element, "href").await?;
        if !is_followable(raw_href.as_deref()) {
            info!(scenario = %name, href = ?raw_href, "Link is not followable, skipping");
            return Ok(
                ScenarioReport::new(name, ScenarioOutcome::Skipped(SkipReason::Ineligible))
                    .with_strategies(strategies)
                    .with_final_url(self.final_url().await),
            );
        }
        let href = driver
            .property(&el.element, "href")
            .await?
            .or(raw_href)
            .unwrap_or_default();

        debug!(state = ?LinkFlowState::Triggered, href = %href, "Link flow state");
        let (_, navigation) = self
            .observer
            .observe(
                || self.dispatcher.perform_click(el),
                &contexts.origin,
                &contexts.baseline,
            )
            .await?;
        debug!(state = ?LinkFlowState::Observed, navigation = %navigation, "Link flow state");

        let Some(destination) = navigation.destination().map(str::to_string) else {
            let mut report = ScenarioReport::new(
                name,
                ScenarioOutcome::Failed(format!("clicking {} did not navigate", href)),
            )
            .with_strategies(strategies)
            .with_final_url(self.final_url().await);
            report.navigation = Some(NavigationOutcome::NoNavigation);
            return Ok(report);
        };

        let url = self.settle_destination(destination, expected).await;
        let origin = self
            .application_origin
            .clone()
            .unwrap_or_else(|| contexts.origin_url.clone());
        let verdict = classify(&url, &origin, expected);
        debug!(state = ?LinkFlowState::Verified, url = %url, "Link flow state");

        let outcome = if verdict.registrable_domain.is_empty() {
            ScenarioOutcome::Failed(format!("destination {} is not a valid URL", url))
        } else if !verdict.is_external {
            ScenarioOutcome::Failed(format!("destination {} is internal to {}", url, origin))
        } else if !verdict.matches_expected {
            ScenarioOutcome::Failed(format!(
                "destination {} does not contain '{}'",
                url,
                expected.unwrap_or_default()
            ))
        } else {
            ScenarioOutcome::Passed
        };

        let mut report = ScenarioReport::new(name, outcome)
            .with_strategies(strategies)
            .with_final_url(Some(url));
        report.verdict = Some(verdict);
        report.navigation = Some(navigation);
        Ok(report)
    }

    /// Wait for the focused context's URL to contain the expected fragment;
    /// on timeout the last URL read is used.
    async fn settle_destination(&self, destination: String, expected: Option<&str>) -> String {
        let fragment = match expected.map(str::trim) {
            None | Some("") => return destination,
            Some(fragment) => fragment.to_lowercase(),
        };
        if destination.to_lowercase().contains(&fragment) {
            return destination;
        }

        let settled = Waiter::new(self.timeouts.navigation, self.timeouts.poll_interval)
            .until_some(|| {
                let fragment = fragment.as_str();
                async move {
                    match self.driver.current_url().await {
                        Ok(url) if url.to_lowercase().contains(fragment) => Some(url),
                        _ => None,
                    }
                }
            })
            .await;
        match settled {
            Some(url) => url,
            None => self.final_url().await.unwrap_or(destination),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_followable_hrefs() {
        assert!(is_followable(Some("https://twitter.com/foo")));
        assert!(is_followable(Some("/about")));
        assert!(!is_followable(None));
        assert!(!is_followable(Some("  ")));
        assert!(!is_followable(Some("#top")));
        assert!(!is_followable(Some("JavaScript:void(0)")));
        assert!(!is_followable(Some("mailto:team@example.com")));
        assert!(!is_followable(Some("tel:+15555555")));
    }
}
