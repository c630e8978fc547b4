//! Submission signals and the outcomes they produce

use action_locator::LocatorSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use waypoint_core_types::Strategy;

/// Where to look for the result of a form submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionSignals {
    /// Indicators that the submission was accepted
    pub success: Vec<LocatorSpec>,
    /// Indicators that the submission was rejected
    pub error: Vec<LocatorSpec>,
    /// Fields whose native constraint validation is checked
    pub validated_fields: Vec<LocatorSpec>,
}

/// Expected branch of a form submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Expectation {
    Success,
    ValidationError,
}

impl Expectation {
    /// Whether `outcome` satisfies this expectation
    pub fn accepts(&self, outcome: &SubmissionOutcome) -> bool {
        match self {
            Expectation::Success => matches!(
                outcome,
                SubmissionOutcome::SuccessIndicator { .. } | SubmissionOutcome::Navigated { .. }
            ),
            Expectation::ValidationError => matches!(
                outcome,
                SubmissionOutcome::ErrorIndicator { .. }
                    | SubmissionOutcome::NativeInvalid { .. }
                    | SubmissionOutcome::UrlRetained { .. }
            ),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Success => write!(f, "success"),
            Expectation::ValidationError => write!(f, "validationError"),
        }
    }
}

/// First signal observed after a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SubmissionOutcome {
    ErrorIndicator { strategy: Strategy, label: String },
    NativeInvalid { field: String },
    SuccessIndicator { strategy: Strategy, label: String },
    UrlRetained { url: String },
    Navigated { url: String },
}

impl SubmissionOutcome {
    pub fn url(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::UrlRetained { url } | SubmissionOutcome::Navigated { url } => {
                Some(url)
            }
            _ => None,
        }
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionOutcome::ErrorIndicator { strategy, label } => {
                write!(f, "error indicator '{}' via {}", label, strategy)
            }
            SubmissionOutcome::NativeInvalid { field } => {
                write!(f, "field '{}' reports invalid", field)
            }
            SubmissionOutcome::SuccessIndicator { strategy, label } => {
                write!(f, "success indicator '{}' via {}", label, strategy)
            }
            SubmissionOutcome::UrlRetained { url } => write!(f, "stayed on {}", url),
            SubmissionOutcome::Navigated { url } => write!(f, "navigated to {}", url),
        }
    }
}
