use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

/// Error raised when a textual strategy descriptor cannot be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrategyParseError {
    #[error("unknown strategy kind '{0}'")]
    UnknownKind(String),
    #[error("strategy '{kind}' is missing its {part}")]
    Missing { kind: String, part: &'static str },
}

/// Handle of a browsing context (tab or window) as reported by the driver.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ContextHandle(pub String);

impl ContextHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to a live element registered by the driver.
///
/// Only meaningful for the document it was found in; drivers report it stale
/// once that document navigates away.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one scenario run, used to correlate log lines.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ScenarioId(pub String);

impl ScenarioId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ScenarioId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One way of locating a UI element.
///
/// Strategies are plain descriptors: they carry no page state and are
/// evaluated by the driver against the current document.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde-full",
    serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Strategy {
    /// Element carrying `name="value"`.
    Attribute { name: String, value: String },

    /// Element with the given ARIA role, explicit or implied by its tag.
    Role { role: String },

    /// Form control associated with a label containing `text`.
    LabelText { text: String },

    /// Element (optionally restricted to `tag`) whose text contains `text`.
    FreeText { text: String, tag: Option<String> },
}

impl Strategy {
    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Strategy::Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn role(role: impl Into<String>) -> Self {
        Strategy::Role { role: role.into() }
    }

    pub fn label_text(text: impl Into<String>) -> Self {
        Strategy::LabelText { text: text.into() }
    }

    pub fn free_text(text: impl Into<String>) -> Self {
        Strategy::FreeText {
            text: text.into(),
            tag: None,
        }
    }

    pub fn free_text_in(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Strategy::FreeText {
            text: text.into(),
            tag: Some(tag.into()),
        }
    }

    /// Short kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Strategy::Attribute { .. } => "attribute",
            Strategy::Role { .. } => "role",
            Strategy::LabelText { .. } => "labelText",
            Strategy::FreeText { .. } => "freeText",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Attribute { name, value } => write!(f, "attribute[{}='{}']", name, value),
            Strategy::Role { role } => write!(f, "role:{}", role),
            Strategy::LabelText { text } => write!(f, "label:'{}'", text),
            Strategy::FreeText { text, tag: None } => write!(f, "text:'{}'", text),
            Strategy::FreeText {
                text,
                tag: Some(tag),
            } => write!(f, "text:{}:'{}'", tag, text),
        }
    }
}

/// Parses the compact command-line form:
/// `attr:name=value`, `role:button`, `label:Email`, `text:Sign in`, `text:a:Sign in`.
impl FromStr for Strategy {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = s.split_once(':').ok_or_else(|| StrategyParseError::Missing {
            kind: s.to_string(),
            part: "value",
        })?;
        let missing = |part| StrategyParseError::Missing {
            kind: kind.to_string(),
            part,
        };

        match kind {
            "attr" | "attribute" => {
                let (name, value) = rest.split_once('=').ok_or_else(|| missing("value"))?;
                if name.is_empty() {
                    return Err(missing("attribute name"));
                }
                Ok(Strategy::attribute(name, value))
            }
            "role" if !rest.is_empty() => Ok(Strategy::role(rest)),
            "label" if !rest.is_empty() => Ok(Strategy::label_text(rest)),
            "text" => match rest.split_once(':') {
                Some((tag, text))
                    if !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric()) =>
                {
                    Ok(Strategy::free_text_in(tag, text))
                }
                _ if !rest.is_empty() => Ok(Strategy::free_text(rest)),
                _ => Err(missing("text")),
            },
            "role" => Err(missing("role")),
            "label" => Err(missing("text")),
            other => Err(StrategyParseError::UnknownKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_display() {
        assert_eq!(
            Strategy::attribute("type", "submit").to_string(),
            "attribute[type='submit']"
        );
        assert_eq!(Strategy::role("button").to_string(), "role:button");
        assert_eq!(Strategy::free_text_in("a", "Home").to_string(), "text:a:'Home'");
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(
            "attr:id=email".parse::<Strategy>().unwrap(),
            Strategy::attribute("id", "email")
        );
        assert_eq!(
            "text:a:Sign in".parse::<Strategy>().unwrap(),
            Strategy::free_text_in("a", "Sign in")
        );
        assert_eq!(
            "text:Sign in".parse::<Strategy>().unwrap(),
            Strategy::free_text("Sign in")
        );
        assert_eq!(
            "label:E-mail".parse::<Strategy>().unwrap(),
            Strategy::label_text("E-mail")
        );
    }

    #[test]
    fn test_strategy_parse_errors() {
        assert!(matches!(
            "xpath://a".parse::<Strategy>(),
            Err(StrategyParseError::UnknownKind(_))
        ));
        assert!("role:".parse::<Strategy>().is_err());
        assert!("attr:=x".parse::<Strategy>().is_err());
        assert!("button".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_element_ids_are_unique() {
        assert_ne!(ElementId::new(), ElementId::new());
    }

    #[cfg(feature = "serde-full")]
    #[test]
    fn test_strategy_serde_shape() {
        let json = serde_json::to_value(Strategy::label_text("Email")).unwrap();
        assert_eq!(json["kind"], "labelText");
        assert_eq!(json["text"], "Email");

        let parsed: Strategy =
            serde_json::from_str(r#"{"kind":"freeText","text":"Sign in","tag":"a"}"#).unwrap();
        assert_eq!(parsed, Strategy::free_text_in("a", "Sign in"));
    }
}
