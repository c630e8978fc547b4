//! Error types for the gate

use action_locator::LocatorError;
use action_primitives::ActionError;
use thiserror::Error;
use webdriver_adapter::AdapterError;

/// Gate error enumeration
///
/// Absence of navigation or of an indicator is an outcome, not an error;
/// these variants cover the trigger failing and the session misbehaving.
#[derive(Debug, Error, Clone)]
pub enum GateError {
    /// The triggering action failed
    #[error("Trigger failed: {0}")]
    Trigger(#[from] ActionError),

    /// Resolving an indicator failed
    #[error("Locator error: {0}")]
    Locator(#[from] LocatorError),

    /// WebDriver communication error
    #[error("Driver error: {0}")]
    Driver(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GateError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            GateError::Trigger(err) => err.is_retryable(),
            GateError::Locator(err) => err.is_retryable(),
            GateError::Driver(_) => true,
            GateError::Internal(_) => false,
        }
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            GateError::Internal(_) => 3,
            GateError::Trigger(err) => err.severity(),
            GateError::Locator(err) => err.severity(),
            GateError::Driver(_) => 2,
        }
    }
}

impl From<AdapterError> for GateError {
    fn from(err: AdapterError) -> Self {
        GateError::Driver(err.to_string())
    }
}
