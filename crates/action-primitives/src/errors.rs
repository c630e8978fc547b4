//! Error types for action primitives

use thiserror::Error;
use webdriver_adapter::{AdapterError, AdapterErrorKind};

/// Failures of a dispatched action.
///
/// `Intercepted` and `NotEditable` end the current scenario step; the rest
/// describe driver-level trouble surfaced while preparing or performing it.
#[derive(Debug, Error, Clone)]
pub enum ActionError {
    /// Click was intercepted by an overlapping element and the direct
    /// invocation fallback failed as well
    #[error("Click intercepted: {0}")]
    Intercepted(String),

    /// Target could not be cleared or typed into
    #[error("Element not editable: {0}")]
    NotEditable(String),

    /// Element cannot be interacted with (hidden, detached from layout)
    #[error("Element not interactable: {0}")]
    NotInteractable(String),

    /// Element handle outlived its document
    #[error("Stale element: {0}")]
    Stale(String),

    /// WebDriver communication or protocol error
    #[error("Driver error: {0}")]
    Driver(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActionError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, ActionError::Stale(_) | ActionError::Driver(_))
    }

    /// Get error severity level (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            ActionError::Internal(_) => 3,
            ActionError::Intercepted(_) | ActionError::NotEditable(_) | ActionError::Driver(_) => 2,
            ActionError::NotInteractable(_) | ActionError::Stale(_) => 1,
        }
    }
}

impl From<AdapterError> for ActionError {
    fn from(err: AdapterError) -> Self {
        let message = err.to_string();
        match err.kind {
            AdapterErrorKind::ClickIntercepted => ActionError::Intercepted(message),
            AdapterErrorKind::NotInteractable => ActionError::NotInteractable(message),
            AdapterErrorKind::StaleElement | AdapterErrorKind::TargetNotFound => {
                ActionError::Stale(message)
            }
            AdapterErrorKind::NavTimeout
            | AdapterErrorKind::Io
            | AdapterErrorKind::NoSuchContext => ActionError::Driver(message),
            AdapterErrorKind::InvalidQuery | AdapterErrorKind::Internal => {
                ActionError::Internal(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_kinds_map_onto_action_errors() {
        let err: ActionError = AdapterError::new(AdapterErrorKind::StaleElement).into();
        assert!(matches!(err, ActionError::Stale(_)));
        assert!(err.is_retryable());

        let err: ActionError = AdapterError::new(AdapterErrorKind::ClickIntercepted)
            .with_hint("overlay")
            .into();
        assert_eq!(err.to_string(), "Click intercepted: element click intercepted: overlay");
        assert_eq!(err.severity(), 2);
    }
}
