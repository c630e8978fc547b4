//! Form-submission flow: fill, submit, check

use crate::errors::FlowError;
use crate::executor::{chain_until, DefaultScenarioExecutor};
use crate::types::{FieldValue, FormFlowState, FormScenario, ScenarioOutcome, ScenarioReport, SkipReason};
use action_locator::Resolution;
use action_primitives::ResolvedElement;
use std::time::Instant;
use tracing::{debug, info};
use waypoint_core_types::Strategy;

impl DefaultScenarioExecutor {
    /// Steps:
    /// 1. Resolve and populate each field; absent optional fields are skipped
    /// 2. Resolve and click the submit control
    /// 3. Wait for the first submission signal and judge it against the
    ///    expected branch
    ///
    /// An absent required field or submit control skips the scenario.
    pub(crate) async fn run_form_submission(
        &self,
        scenario: &FormScenario,
    ) -> Result<ScenarioReport, FlowError> {
        let started = Instant::now();
        let form_url = self.driver.current_url().await?;
        let mut strategies: Vec<Strategy> = Vec::new();
        debug!(state = ?FormFlowState::Idle, scenario = %scenario.name, "Form flow state");

        for field in &scenario.fields {
            match self.resolve_bounded(&field.locator).await? {
                Resolution::Found(el) => {
                    strategies.extend(chain_until(&field.locator, &el.strategy));
                    self.fill(&el, &field.value).await?;
                }
                Resolution::NotFound(not_found) if field.optional => {
                    debug!(field = %field.locator, "Optional field absent, skipping");
                    strategies.extend(not_found.strategies());
                }
                Resolution::NotFound(not_found) => {
                    info!(scenario = %scenario.name, field = %field.locator, "Required field absent");
                    strategies.extend(not_found.strategies());
                    return Ok(self
                        .skipped(scenario, strategies, started)
                        .await);
                }
            }
        }
        debug!(state = ?FormFlowState::Filled, fields = scenario.fields.len(), "Form flow state");

        let submit = match self.resolve_bounded(&scenario.submit).await? {
            Resolution::Found(el) => el,
            Resolution::NotFound(not_found) => {
                info!(scenario = %scenario.name, submit = %scenario.submit, "Submit control absent");
                strategies.extend(not_found.strategies());
                return Ok(self.skipped(scenario, strategies, started).await);
            }
        };
        strategies.extend(chain_until(&scenario.submit, &submit.strategy));
        self.dispatcher.perform_click(&submit).await?;
        debug!(state = ?FormFlowState::Submitted, "Form flow state");

        let submission = self.probe.await_outcome(&form_url, &scenario.signals).await?;
        debug!(state = ?FormFlowState::Checked, outcome = %submission, "Form flow state");

        let outcome = if scenario.expect.accepts(&submission) {
            ScenarioOutcome::Passed
        } else {
            ScenarioOutcome::Failed(format!(
                "expected {}, observed {}",
                scenario.expect, submission
            ))
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            scenario = %scenario.name,
            outcome = %outcome,
            elapsed_ms,
            "Form scenario finished"
        );
        let mut report = ScenarioReport::new(&scenario.name, outcome)
            .with_strategies(strategies)
            .with_final_url(self.final_url().await)
            .with_elapsed(elapsed_ms);
        report.submission = Some(submission);
        Ok(report)
    }

    async fn fill(&self, el: &ResolvedElement, value: &FieldValue) -> Result<(), FlowError> {
        match value {
            FieldValue::Text(text) => {
                self.dispatcher.perform_type(el, text).await?;
            }
            FieldValue::Checked(wanted) => {
                if self.driver.is_selected(&el.element).await? != *wanted {
                    self.dispatcher.perform_click(el).await?;
                }
            }
        }
        Ok(())
    }

    async fn skipped(
        &self,
        scenario: &FormScenario,
        strategies: Vec<Strategy>,
        started: Instant,
    ) -> ScenarioReport {
        ScenarioReport::new(&scenario.name, ScenarioOutcome::Skipped(SkipReason::Absent))
            .with_strategies(strategies)
            .with_final_url(self.final_url().await)
            .with_elapsed(started.elapsed().as_millis() as u64)
    }
}
