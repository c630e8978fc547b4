//! Core types for scenario orchestration

use action_gate::{DomainVerdict, Expectation, NavigationOutcome, SubmissionOutcome, SubmissionSignals};
use action_locator::LocatorSpec;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use waypoint_core_types::{ScenarioId, Strategy};

/// Why a scenario was skipped rather than judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// The locator looked and found nothing
    Absent,
    /// The element was found but there is nothing to verify on it
    Ineligible,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Absent => write!(f, "absent"),
            SkipReason::Ineligible => write!(f, "ineligible"),
        }
    }
}

/// Verdict of one composite scenario call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "camelCase")]
pub enum ScenarioOutcome {
    Passed,
    Failed(String),
    Skipped(SkipReason),
}

impl ScenarioOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, ScenarioOutcome::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ScenarioOutcome::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ScenarioOutcome::Skipped(_))
    }
}

impl fmt::Display for ScenarioOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioOutcome::Passed => write!(f, "PASSED"),
            ScenarioOutcome::Failed(reason) => write!(f, "FAILED: {}", reason),
            ScenarioOutcome::Skipped(reason) => write!(f, "SKIPPED ({})", reason),
        }
    }
}

/// Report of one composite scenario call, with enough context to diagnose
/// markup drift without re-running.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub id: ScenarioId,
    pub name: String,
    pub outcome: ScenarioOutcome,
    pub strategies_attempted: Vec<Strategy>,
    pub final_url: Option<String>,
    pub verdict: Option<DomainVerdict>,
    pub navigation: Option<NavigationOutcome>,
    pub submission: Option<SubmissionOutcome>,
    pub elapsed_ms: u64,
}

impl ScenarioReport {
    pub fn new(name: impl Into<String>, outcome: ScenarioOutcome) -> Self {
        Self {
            id: ScenarioId::new(),
            name: name.into(),
            outcome,
            strategies_attempted: Vec::new(),
            final_url: None,
            verdict: None,
            navigation: None,
            submission: None,
            elapsed_ms: 0,
        }
    }

    pub fn with_strategies(mut self, strategies: Vec<Strategy>) -> Self {
        self.strategies_attempted = strategies;
        self
    }

    pub fn with_final_url(mut self, url: Option<String>) -> Self {
        self.final_url = url;
        self
    }

    pub fn with_elapsed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {} ({} ms)", self.name, self.outcome, self.elapsed_ms)?;
        if !self.strategies_attempted.is_empty() {
            let chain: Vec<String> = self.strategies_attempted.iter().map(|s| s.to_string()).collect();
            writeln!(f, "  strategies: {}", chain.join(" -> "))?;
        }
        if let Some(navigation) = &self.navigation {
            writeln!(f, "  navigation: {}", navigation)?;
        }
        if let Some(verdict) = &self.verdict {
            writeln!(
                f,
                "  domain: {} (external: {}, matches expected: {})",
                verdict.registrable_domain, verdict.is_external, verdict.matches_expected
            )?;
        }
        if let Some(submission) = &self.submission {
            writeln!(f, "  submission: {}", submission)?;
        }
        if let Some(url) = &self.final_url {
            writeln!(f, "  final url: {}", url)?;
        }
        Ok(())
    }
}

/// Value to put into a form field
///
/// Deserializes from a boolean (`Checked`) or from a string or bare number
/// (`Text`), so `zip: 90210` needs no quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Clear, then type
    Text(String),
    /// Click only when the selection state differs
    Checked(bool),
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldValueVisitor;

        impl<'de> Visitor<'de> for FieldValueVisitor {
            type Value = FieldValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, a number or a boolean")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<FieldValue, E> {
                Ok(FieldValue::Checked(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<FieldValue, E> {
                Ok(FieldValue::Text(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<FieldValue, E> {
                Ok(FieldValue::Text(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<FieldValue, E> {
                Ok(FieldValue::Text(value.to_string()))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<FieldValue, E> {
                Ok(FieldValue::Text(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<FieldValue, E> {
                Ok(FieldValue::Text(value))
            }
        }

        deserializer.deserialize_any(FieldValueVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub locator: LocatorSpec,
    pub value: FieldValue,
    /// Absent optional fields are skipped instead of ending the flow
    #[serde(default)]
    pub optional: bool,
}

impl FormField {
    pub fn text(locator: LocatorSpec, value: impl Into<String>) -> Self {
        Self {
            locator,
            value: FieldValue::Text(value.into()),
            optional: false,
        }
    }

    pub fn checked(locator: LocatorSpec, checked: bool) -> Self {
        Self {
            locator,
            value: FieldValue::Checked(checked),
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Form-submission scenario: fill, submit, check for the expected branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormScenario {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
    pub submit: LocatorSpec,
    #[serde(default)]
    pub signals: SubmissionSignals,
    pub expect: Expectation,
}

/// Per-link results of a page-wide external link sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub page_url: String,
    pub application_origin: String,
    pub links: Vec<ScenarioReport>,
}

impl SweepReport {
    pub fn passed(&self) -> usize {
        self.links.iter().filter(|r| r.outcome.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.links.iter().filter(|r| r.outcome.is_failed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.links.iter().filter(|r| r.outcome.is_skipped()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "External links on {} ({} passed, {} failed, {} skipped)",
            self.page_url,
            self.passed(),
            self.failed(),
            self.skipped()
        )?;
        for link in &self.links {
            write!(f, "{}", link)?;
        }
        Ok(())
    }
}

/// States of the external-link flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFlowState {
    Idle,
    Triggered,
    Observed,
    Verified,
    Restored,
}

/// States of the form-submission flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFlowState {
    Idle,
    Filled,
    Submitted,
    Checked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serde_shape() {
        let json = serde_json::to_value(ScenarioOutcome::Skipped(SkipReason::Ineligible)).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["detail"], "ineligible");

        let json = serde_json::to_value(ScenarioOutcome::Passed).unwrap();
        assert_eq!(json["status"], "passed");
    }

    #[test]
    fn test_bare_numbers_are_typed_as_text() {
        let field: FormField = serde_yaml::from_str(
            "locator:\n  label: zip\n  strategies: []\nvalue: 90210\n",
        )
        .unwrap();
        assert_eq!(field.value, FieldValue::Text("90210".into()));

        let value: FieldValue = serde_yaml::from_str("-3").unwrap();
        assert_eq!(value, FieldValue::Text("-3".into()));
        let value: FieldValue = serde_yaml::from_str("2.5").unwrap();
        assert_eq!(value, FieldValue::Text("2.5".into()));
        let value: FieldValue = serde_yaml::from_str("'007'").unwrap();
        assert_eq!(value, FieldValue::Text("007".into()));
        let value: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(value, FieldValue::Checked(true));

        assert!(serde_yaml::from_str::<FieldValue>("[1, 2]").is_err());
    }

    #[test]
    fn test_form_scenario_from_yaml() {
        let yaml = r#"
name: contact form rejects bad email
fields:
  - locator:
      label: email
      strategies:
        - kind: attribute
          name: name
          value: email
    value: not-an-email
  - locator:
      label: newsletter
      strategies:
        - kind: labelText
          text: Subscribe
    value: true
    optional: true
submit:
  label: send
  strategies:
    - kind: attribute
      name: type
      value: submit
expect: validationError
"#;
        let scenario: FormScenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.fields[0].value, FieldValue::Text("not-an-email".into()));
        assert_eq!(scenario.fields[1].value, FieldValue::Checked(true));
        assert!(scenario.fields[1].optional);
        assert_eq!(scenario.expect, Expectation::ValidationError);
        assert!(scenario.signals.error.is_empty());
    }
}
