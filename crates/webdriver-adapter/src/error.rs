use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// High-level error categories surfaced by the adapter.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdapterErrorKind {
    #[error("navigation timed out")]
    NavTimeout,
    #[error("webdriver i/o failure")]
    Io,
    #[error("target element not found")]
    TargetNotFound,
    #[error("stale element reference")]
    StaleElement,
    #[error("element click intercepted")]
    ClickIntercepted,
    #[error("element not interactable")]
    NotInteractable,
    #[error("no such browsing context")]
    NoSuchContext,
    #[error("invalid query")]
    InvalidQuery,
    #[error("internal error")]
    Internal,
}

/// Enriched error metadata passed back to higher layers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdapterError {
    pub kind: AdapterErrorKind,
    pub hint: Option<String>,
    pub retriable: bool,
    pub data: Option<serde_json::Value>,
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(hint) = &self.hint {
            write!(f, ": {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for AdapterError {}

impl AdapterError {
    pub fn new(kind: AdapterErrorKind) -> Self {
        Self {
            kind,
            hint: None,
            retriable: false,
            data: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn retriable(mut self, flag: bool) -> Self {
        self.retriable = flag;
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_stale(&self) -> bool {
        self.kind == AdapterErrorKind::StaleElement
    }

    pub fn is_intercepted(&self) -> bool {
        self.kind == AdapterErrorKind::ClickIntercepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_hint() {
        let err = AdapterError::new(AdapterErrorKind::ClickIntercepted).with_hint("div.overlay");
        assert_eq!(err.to_string(), "element click intercepted: div.overlay");
        assert!(err.is_intercepted());
        assert!(!err.retriable);
    }
}
