//! Core data types for action primitives

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use waypoint_core_types::{ElementId, Strategy};

/// A live UI control plus the strategy that found it.
///
/// Only valid for the document it was resolved in; any navigation
/// invalidates it and the element has to be resolved again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedElement {
    pub element: ElementId,
    pub strategy: Strategy,
    /// Logical name of the target ("submit button"), for diagnostics
    pub label: String,
}

impl ResolvedElement {
    pub fn new(element: ElementId, strategy: Strategy, label: impl Into<String>) -> Self {
        Self {
            element,
            strategy,
            label: label.into(),
        }
    }
}

impl fmt::Display for ResolvedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} via {}", self.label, self.strategy)
    }
}

/// Bounds for every polling wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Element resolution and general waits
    pub wait: Duration,

    /// Sleep between two probes of a poll loop
    pub poll_interval: Duration,

    /// Waiting for an element to become interactable before acting
    pub interactable: Duration,

    /// Waiting for navigation, tab opening and restoration
    pub navigation: Duration,

    /// Waiting for a post-submit indicator
    pub indicator: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            wait: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
            interactable: Duration::from_secs(10),
            navigation: Duration::from_secs(10),
            indicator: Duration::from_secs(10),
        }
    }
}

impl Timeouts {
    /// Same bound for every wait, useful for tests.
    pub fn uniform(bound: Duration, poll_interval: Duration) -> Self {
        Self {
            wait: bound,
            poll_interval,
            interactable: bound,
            navigation: bound,
            indicator: bound,
        }
    }
}

/// Action applied to a resolved element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Action {
    Click,
    Type(String),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Click => "click",
            Action::Type(_) => "type",
        }
    }
}

/// Outcome record of one successful action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReport {
    /// Unique identifier for this action
    pub action_id: String,

    /// `click` or `type`
    pub action: String,

    /// Strategy that located the target
    pub strategy: Strategy,

    /// When the action started
    pub started_at: DateTime<Utc>,

    /// Total latency in milliseconds
    pub latency_ms: u64,

    /// True when the click went through the direct-invocation fallback
    pub fallback_used: bool,

    /// True when the interactable wait timed out and the action went ahead anyway
    pub forced: bool,
}

impl ActionReport {
    pub fn new(action_id: String, action: &Action, el: &ResolvedElement, started_at: DateTime<Utc>) -> Self {
        Self {
            action_id,
            action: action.name().to_string(),
            strategy: el.strategy.clone(),
            started_at,
            latency_ms: 0,
            fallback_used: false,
            forced: false,
        }
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}
