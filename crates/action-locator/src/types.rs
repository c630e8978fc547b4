//! Core types for locator system

use action_primitives::ResolvedElement;
use serde::{Deserialize, Serialize};
use std::fmt;
use waypoint_core_types::Strategy;

/// Ordered list of strategies for one logical target.
///
/// Strategies are tried in declaration order; the first one that yields a
/// visible, enabled element wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorSpec {
    /// Logical name of the target, for diagnostics
    #[serde(default)]
    pub label: String,

    pub strategies: Vec<Strategy>,
}

impl LocatorSpec {
    pub fn new(label: impl Into<String>, strategies: Vec<Strategy>) -> Self {
        Self {
            label: label.into(),
            strategies,
        }
    }

    /// Append a fallback strategy
    pub fn or(mut self, strategy: Strategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Element with `name="value"`
    pub fn attribute(name: &str, value: &str) -> Self {
        Self::new(
            format!("[{}='{}']", name, value),
            vec![Strategy::attribute(name, value)],
        )
    }

    pub fn by_id(id: &str) -> Self {
        Self::new(format!("#{}", id), vec![Strategy::attribute("id", id)])
    }

    pub fn by_name(name: &str) -> Self {
        Self::new(
            format!("[name='{}']", name),
            vec![Strategy::attribute("name", name)],
        )
    }

    /// Submit control: `type=submit`, then a button with the text, then the
    /// text anywhere.
    pub fn button(text: &str) -> Self {
        Self::new(
            format!("{} button", text),
            vec![
                Strategy::attribute("type", "submit"),
                Strategy::free_text_in("button", text),
                Strategy::free_text(text),
            ],
        )
    }

    /// Form field: by name, id or placeholder, then by its label.
    pub fn field(label: &str) -> Self {
        let key = label.trim().to_lowercase().replace(' ', "_");
        Self::new(
            format!("{} field", label),
            vec![
                Strategy::attribute("name", &key),
                Strategy::attribute("id", &key),
                Strategy::attribute("placeholder", label),
                Strategy::label_text(label),
            ],
        )
    }

    /// Link with the exact `href`, then a link showing `text`.
    pub fn link_to(href: &str, text: &str) -> Self {
        Self::new(
            format!("link to {}", href),
            vec![
                Strategy::attribute("href", href),
                Strategy::free_text_in("a", text),
            ],
        )
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl fmt::Display for LocatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label.is_empty() {
            write!(f, "<unnamed locator>")
        } else {
            write!(f, "{}", self.label)
        }
    }
}

/// Diagnostics for one strategy evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyAttempt {
    pub strategy: Strategy,

    /// Number of elements the strategy matched
    pub matched: usize,

    /// Whether one of the matches was visible and enabled
    pub usable: bool,

    /// Failure evaluating the strategy, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl fmt::Display for StrategyAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(error) => write!(f, "{} (error: {})", self.strategy, error),
            None if self.matched == 0 => write!(f, "{} (no match)", self.strategy),
            None => write!(
                f,
                "{} ({} match(es), none visible and enabled)",
                self.strategy, self.matched
            ),
        }
    }
}

/// Every strategy was exhausted without a usable element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotFound {
    pub label: String,
    pub attempts: Vec<StrategyAttempt>,
}

impl NotFound {
    /// The strategies tried, in order.
    pub fn strategies(&self) -> Vec<Strategy> {
        self.attempts.iter().map(|a| a.strategy.clone()).collect()
    }
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} not found", self.label)?;
        if self.attempts.is_empty() {
            return write!(f, " (no strategies)");
        }
        let tried: Vec<String> = self.attempts.iter().map(|a| a.to_string()).collect();
        write!(f, "; tried {}", tried.join(", "))
    }
}

/// Result of resolving a [`LocatorSpec`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ResolvedElement),
    NotFound(NotFound),
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn found(&self) -> Option<&ResolvedElement> {
        match self {
            Resolution::Found(el) => Some(el),
            Resolution::NotFound(_) => None,
        }
    }

    pub fn into_found(self) -> Option<ResolvedElement> {
        match self {
            Resolution::Found(el) => Some(el),
            Resolution::NotFound(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_chain_order() {
        let spec = LocatorSpec::button("Send");
        assert_eq!(spec.strategies[0], Strategy::attribute("type", "submit"));
        assert_eq!(spec.strategies[1], Strategy::free_text_in("button", "Send"));
        assert_eq!(spec.strategies.len(), 3);
    }

    #[test]
    fn test_field_chain_ends_with_label() {
        let spec = LocatorSpec::field("First Name");
        assert_eq!(spec.strategies[0], Strategy::attribute("name", "first_name"));
        assert_eq!(spec.strategies[2], Strategy::attribute("placeholder", "First Name"));
        assert_eq!(spec.strategies[3], Strategy::label_text("First Name"));
    }

    #[test]
    fn test_not_found_display() {
        let not_found = NotFound {
            label: "sort control".into(),
            attempts: vec![
                StrategyAttempt {
                    strategy: Strategy::attribute("id", "sort"),
                    matched: 0,
                    usable: false,
                    error: None,
                },
                StrategyAttempt {
                    strategy: Strategy::role("combobox"),
                    matched: 2,
                    usable: false,
                    error: None,
                },
            ],
        };
        assert_eq!(
            not_found.to_string(),
            "sort control not found; tried attribute[id='sort'] (no match), \
             role:combobox (2 match(es), none visible and enabled)"
        );
    }
}
