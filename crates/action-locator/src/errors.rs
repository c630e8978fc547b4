//! Error types for locator system

use thiserror::Error;
use webdriver_adapter::{AdapterError, AdapterErrorKind};

/// Locator error enumeration
///
/// Exhausting every strategy is not an error: it is reported as
/// `Resolution::NotFound`. These variants cover the browser session itself
/// being unusable.
#[derive(Debug, Error, Clone)]
pub enum LocatorError {
    /// The focused browsing context is gone
    #[error("No browsing context: {0}")]
    NoContext(String),

    /// WebDriver communication error
    #[error("Driver error: {0}")]
    Driver(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LocatorError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, LocatorError::Driver(_))
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            LocatorError::Internal(_) => 3,
            LocatorError::NoContext(_) | LocatorError::Driver(_) => 2,
        }
    }

    /// Whether an adapter failure concerns one strategy only (a bad query, a
    /// match that went away). Anything else means the session cannot be
    /// trusted and must propagate.
    pub fn is_strategy_local(err: &AdapterError) -> bool {
        matches!(
            err.kind,
            AdapterErrorKind::InvalidQuery
                | AdapterErrorKind::StaleElement
                | AdapterErrorKind::TargetNotFound
        )
    }
}

impl From<AdapterError> for LocatorError {
    fn from(err: AdapterError) -> Self {
        match err.kind {
            AdapterErrorKind::NoSuchContext => LocatorError::NoContext(err.to_string()),
            AdapterErrorKind::Internal => LocatorError::Internal(err.to_string()),
            _ => LocatorError::Driver(err.to_string()),
        }
    }
}
