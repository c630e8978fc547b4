//! Core types for the gate

use serde::{Deserialize, Serialize};
use std::fmt;
use waypoint_core_types::ContextHandle;

/// What an action that might navigate actually did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NavigationOutcome {
    /// The origin context now shows a different URL
    SameTab { url: String },

    /// A new browsing context appeared; focus has been moved to it
    NewTab { handle: ContextHandle, url: String },

    /// Neither happened within the bound
    NoNavigation,
}

impl NavigationOutcome {
    /// URL of the destination, if there is one
    pub fn destination(&self) -> Option<&str> {
        match self {
            NavigationOutcome::SameTab { url } | NavigationOutcome::NewTab { url, .. } => {
                Some(url)
            }
            NavigationOutcome::NoNavigation => None,
        }
    }

    pub fn is_new_tab(&self) -> bool {
        matches!(self, NavigationOutcome::NewTab { .. })
    }
}

impl fmt::Display for NavigationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationOutcome::SameTab { url } => write!(f, "same tab -> {}", url),
            NavigationOutcome::NewTab { handle, url } => {
                write!(f, "new tab {} -> {}", handle, url)
            }
            NavigationOutcome::NoNavigation => write!(f, "no navigation"),
        }
    }
}

/// Classification of a destination URL against the application under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainVerdict {
    pub is_external: bool,
    pub registrable_domain: String,
    pub matches_expected: bool,
}

impl DomainVerdict {
    /// Verdict for a URL that could not be parsed
    pub fn malformed() -> Self {
        Self {
            is_external: true,
            registrable_domain: String::new(),
            matches_expected: false,
        }
    }

    /// External and, when an expectation was given, matching it
    pub fn is_verified_external(&self) -> bool {
        self.is_external && self.matches_expected
    }
}
