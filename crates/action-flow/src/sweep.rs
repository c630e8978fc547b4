//! Page-wide external link sweep

use crate::errors::FlowError;
use crate::executor::DefaultScenarioExecutor;
use crate::external_link::is_followable;
use crate::types::{ScenarioOutcome, ScenarioReport, SweepReport};
use action_gate::{classify, domain_of};
use action_locator::LocatorSpec;
use action_primitives::Waiter;
use std::collections::HashSet;
use tracing::{info, warn};
use url::Url;
use waypoint_core_types::Strategy;
use webdriver_adapter::Query;

/// One distinct external link found on the page
#[derive(Debug, Clone)]
struct LinkTarget {
    /// `href` attribute as written, used to re-resolve the link
    raw: String,
    /// Absolute URL the link points to
    absolute: String,
}

impl DefaultScenarioExecutor {
    /// Steps:
    /// 1. Open the page and wait for a complete document
    /// 2. Collect every `a` whose href is http(s) and external, first
    ///    occurrence of each href only
    /// 3. For each, re-resolve by exact href and run the external-link flow
    ///    with the destination's registrable domain as the expectation
    ///
    /// A hard error on one link is recorded as its failure; restoration
    /// failures end the sweep since the session baseline is lost.
    pub(crate) async fn run_sweep(&self, page_url: &str) -> Result<SweepReport, FlowError> {
        self.driver.navigate(page_url).await?;
        let loaded = Waiter::new(self.timeouts.navigation, self.timeouts.poll_interval)
            .until(|| async move {
                matches!(self.driver.ready_state().await.as_deref(), Ok("complete"))
            })
            .await;
        if !loaded {
            warn!(url = %page_url, "Page did not report a complete document");
        }

        let application_origin = self
            .application_origin
            .clone()
            .unwrap_or_else(|| page_url.to_string());
        let targets = self.collect_external_links(&application_origin).await?;
        info!(url = %page_url, links = targets.len(), "Sweeping external links");

        let mut links = Vec::with_capacity(targets.len());
        for target in targets {
            let spec = LocatorSpec::new(
                target.absolute.clone(),
                vec![Strategy::attribute("href", &target.raw)],
            );
            let expected = domain_of(&target.absolute);
            match self
                .run_external_link_spec(&spec, expected.as_deref())
                .await
            {
                Ok(report) => links.push(report),
                Err(err @ FlowError::RestoreFailed(_)) => return Err(err),
                Err(err) => {
                    warn!(href = %target.absolute, error = %err, "Link scenario errored");
                    links.push(
                        ScenarioReport::new(
                            format!("external link '{}'", spec),
                            ScenarioOutcome::Failed(err.to_string()),
                        )
                        .with_strategies(spec.strategies.clone())
                        .with_final_url(self.final_url().await),
                    );
                }
            }
        }

        let report = SweepReport {
            page_url: page_url.to_string(),
            application_origin,
            links,
        };
        info!(
            url = %page_url,
            passed = report.passed(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Sweep finished"
        );
        Ok(report)
    }

    async fn collect_external_links(
        &self,
        application_origin: &str,
    ) -> Result<Vec<LinkTarget>, FlowError> {
        let anchors = self
            .driver
            .find_all(&Query::Tag("a".to_string()), None)
            .await?;

        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for anchor in anchors {
            let Some(raw) = self.driver.attribute(&anchor, "href").await? else {
                continue;
            };
            if !is_followable(Some(&raw)) {
                continue;
            }
            let Some(absolute) = self.driver.property(&anchor, "href").await? else {
                continue;
            };
            let is_http = Url::parse(&absolute)
                .map(|url| matches!(url.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !is_http || !classify(&absolute, application_origin, None).is_external {
                continue;
            }
            if seen.insert(absolute.clone()) {
                targets.push(LinkTarget { raw, absolute });
            }
        }
        Ok(targets)
    }
}
