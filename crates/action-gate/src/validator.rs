//! Submission probe: polls the page for the first post-submit signal

use crate::{
    conditions::{SubmissionOutcome, SubmissionSignals},
    errors::GateError,
};
use action_locator::{ElementResolver, LocatorSpec, Resolution};
use action_primitives::{ResolvedElement, Timeouts, Waiter};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;
use webdriver_adapter::BrowserDriver;

/// Watches for the result of a form submission.
pub struct SubmissionProbe {
    driver: Arc<dyn BrowserDriver>,
    resolver: Arc<dyn ElementResolver>,
    timeouts: Timeouts,
}

impl SubmissionProbe {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        resolver: Arc<dyn ElementResolver>,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            driver,
            resolver,
            timeouts,
        }
    }

    /// Wait for the first submission signal.
    ///
    /// Steps:
    /// 1. Each poll checks the error indicators, then native validity of the
    ///    validated fields, then the success indicators
    /// 2. Without success indicators, leaving the form page ends the wait as
    ///    `Navigated`
    /// 3. Once the indicator bound elapses, the URL decides between
    ///    `UrlRetained` and `Navigated`
    pub async fn await_outcome(
        &self,
        form_url: &str,
        signals: &SubmissionSignals,
    ) -> Result<SubmissionOutcome, GateError> {
        let observed = Waiter::new(self.timeouts.indicator, self.timeouts.poll_interval)
            .until_some(|| async move {
                self.poll_once(form_url, signals).await.transpose()
            })
            .await
            .transpose()?;

        let outcome = match observed {
            Some(outcome) => outcome,
            None => {
                let url = self.driver.current_url().await?;
                if same_page(&url, form_url) {
                    SubmissionOutcome::UrlRetained { url }
                } else {
                    SubmissionOutcome::Navigated { url }
                }
            }
        };

        info!(form_url = %form_url, outcome = %outcome, "Submission outcome");
        Ok(outcome)
    }

    async fn poll_once(
        &self,
        form_url: &str,
        signals: &SubmissionSignals,
    ) -> Result<Option<SubmissionOutcome>, GateError> {
        if let Some(el) = self.first_visible(&signals.error).await? {
            return Ok(Some(SubmissionOutcome::ErrorIndicator {
                strategy: el.strategy,
                label: el.label,
            }));
        }

        for spec in &signals.validated_fields {
            if let Resolution::Found(field) = self.resolver.resolve(spec, None).await? {
                if !self.driver.check_validity(&field.element).await? {
                    debug!(field = %spec.label, "Field fails native validation");
                    return Ok(Some(SubmissionOutcome::NativeInvalid {
                        field: spec.label.clone(),
                    }));
                }
            }
        }

        if let Some(el) = self.first_visible(&signals.success).await? {
            return Ok(Some(SubmissionOutcome::SuccessIndicator {
                strategy: el.strategy,
                label: el.label,
            }));
        }

        if signals.success.is_empty() {
            let url = self.driver.current_url().await?;
            if !same_page(&url, form_url) {
                return Ok(Some(SubmissionOutcome::Navigated { url }));
            }
        }
        Ok(None)
    }

    async fn first_visible(
        &self,
        specs: &[LocatorSpec],
    ) -> Result<Option<ResolvedElement>, GateError> {
        for spec in specs {
            if let Resolution::Found(el) = self.resolver.resolve(spec, None).await? {
                return Ok(Some(el));
            }
        }
        Ok(None)
    }
}

/// Two URLs name the same page when they agree up to the fragment and a
/// trailing slash.
pub fn same_page(a: &str, b: &str) -> bool {
    fn normalize(raw: &str) -> String {
        match Url::parse(raw.trim()) {
            Ok(mut url) => {
                url.set_fragment(None);
                url.as_str().trim_end_matches('/').to_string()
            }
            Err(_) => raw.trim().trim_end_matches('/').to_string(),
        }
    }
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_page_ignores_fragment_and_slash() {
        assert!(same_page(
            "https://demo.example.com/contact/#form",
            "https://demo.example.com/contact"
        ));
        assert!(!same_page(
            "https://demo.example.com/contact?sent=1",
            "https://demo.example.com/contact"
        ));
    }
}
