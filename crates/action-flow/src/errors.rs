//! Scenario execution error types

use action_gate::GateError;
use action_locator::LocatorError;
use action_primitives::ActionError;
use thiserror::Error;
use webdriver_adapter::AdapterError;

/// Scenario execution errors
///
/// Only conditions that end a scenario abnormally are errors; absent elements,
/// ineligible links and failed verifications are reported as outcomes.
#[derive(Debug, Error)]
pub enum FlowError {
    /// An action on a resolved element failed
    #[error("Action failed: {0}")]
    Action(#[from] ActionError),

    /// Element resolution failed at the session level
    #[error("Locator error: {0}")]
    Locator(String),

    /// Observation after an action failed
    #[error("Gate error: {0}")]
    Gate(String),

    /// Browser session error outside any component
    #[error("Driver error: {0}")]
    Driver(String),

    /// The browsing contexts could not be returned to their baseline
    #[error("Restoration failed: {0}")]
    RestoreFailed(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FlowError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            FlowError::Action(err) => err.is_retryable(),
            FlowError::Driver(_) | FlowError::Gate(_) => true,
            FlowError::Locator(_) | FlowError::RestoreFailed(_) | FlowError::Internal(_) => false,
        }
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            FlowError::Action(err) => err.severity(),
            FlowError::Locator(_) | FlowError::Gate(_) => 2,
            FlowError::Driver(_) => 2,
            FlowError::RestoreFailed(_) | FlowError::Internal(_) => 3,
        }
    }
}

impl From<LocatorError> for FlowError {
    fn from(err: LocatorError) -> Self {
        FlowError::Locator(err.to_string())
    }
}

impl From<GateError> for FlowError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Trigger(action) => FlowError::Action(action),
            other => FlowError::Gate(other.to_string()),
        }
    }
}

impl From<AdapterError> for FlowError {
    fn from(err: AdapterError) -> Self {
        FlowError::Driver(err.to_string())
    }
}
