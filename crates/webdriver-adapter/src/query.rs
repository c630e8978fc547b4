//! Element queries and their XPath compilation.
//!
//! Every strategy compiles to a single XPath expression (a union where several
//! markup shapes qualify) so a driver returns matches in document order.

use serde::{Deserialize, Serialize};
use waypoint_core_types::Strategy;

use crate::error::{AdapterError, AdapterErrorKind};

/// What a driver should look for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Query {
    /// A single locating strategy.
    Strategy(Strategy),
    /// Every element with the given tag name.
    Tag(String),
}

impl From<Strategy> for Query {
    fn from(strategy: Strategy) -> Self {
        Query::Strategy(strategy)
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Query::Strategy(strategy) => write!(f, "{}", strategy),
            Query::Tag(tag) => write!(f, "tag:{}", tag),
        }
    }
}

const FORM_CONTROL: &str = "self::input or self::textarea or self::select";

/// Tags whose role is implied when no explicit `role` attribute is present.
pub fn implicit_role(tag: &str, input_type: Option<&str>, has_href: bool) -> Option<&'static str> {
    match tag {
        "button" => Some("button"),
        "a" if has_href => Some("link"),
        "textarea" => Some("textbox"),
        "select" => Some("combobox"),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some("heading"),
        "input" => match input_type.unwrap_or("text") {
            "submit" | "button" | "reset" | "image" => Some("button"),
            "checkbox" => Some("checkbox"),
            "radio" => Some("radio"),
            "text" | "email" | "tel" | "url" => Some("textbox"),
            _ => None,
        },
        _ => None,
    }
}

/// Quote `value` as an XPath string literal.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        let parts: Vec<String> = value
            .split('\'')
            .map(|part| format!("'{}'", part))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

fn invalid(what: &str, value: &str) -> AdapterError {
    AdapterError::new(AdapterErrorKind::InvalidQuery).with_hint(format!("{} '{}'", what, value))
}

fn implicit_role_xpath(p: &str, role: &str) -> Option<String> {
    let inputs = |types: &[&str]| {
        let cond: Vec<String> = types.iter().map(|t| format!("@type='{}'", t)).collect();
        format!("{p}input[{}][not(@role)]", cond.join(" or "))
    };
    let expr = match role {
        "button" => format!(
            "{p}button[not(@role)] | {}",
            inputs(&["submit", "button", "reset", "image"])
        ),
        "link" => format!("{p}a[@href][not(@role)]"),
        "textbox" => format!(
            "{p}textarea[not(@role)] | {p}input[not(@type) or @type='text' or @type='email' or @type='tel' or @type='url'][not(@role)]"
        ),
        "checkbox" => inputs(&["checkbox"]),
        "radio" => inputs(&["radio"]),
        "combobox" => format!("{p}select[not(@role)]"),
        "heading" => format!(
            "{p}*[self::h1 or self::h2 or self::h3 or self::h4 or self::h5 or self::h6][not(@role)]"
        ),
        _ => return None,
    };
    Some(expr)
}

impl Query {
    /// Compile into an XPath expression, relative to a scope element when `scoped`.
    pub fn to_xpath(&self, scoped: bool) -> Result<String, AdapterError> {
        let p = if scoped { ".//" } else { "//" };
        match self {
            Query::Tag(tag) => {
                if !is_xml_name(tag) {
                    return Err(invalid("tag name", tag));
                }
                Ok(format!("{p}{tag}"))
            }
            Query::Strategy(Strategy::Attribute { name, value }) => {
                if !is_xml_name(name) {
                    return Err(invalid("attribute name", name));
                }
                Ok(format!("{p}*[@{name}={}]", xpath_literal(value)))
            }
            Query::Strategy(Strategy::Role { role }) => {
                let lit = xpath_literal(role);
                let explicit = format!("{p}*[@role={lit}]");
                Ok(match implicit_role_xpath(p, role) {
                    Some(implicit) => format!("{explicit} | {implicit}"),
                    None => explicit,
                })
            }
            Query::Strategy(Strategy::LabelText { text }) => {
                let label = format!("label[contains(normalize-space(.), {})]", xpath_literal(text));
                Ok([
                    format!("{p}*[@id = //{label}/@for]"),
                    format!("{p}{label}//*[{FORM_CONTROL}]"),
                    format!("{p}{label}/following::*[{FORM_CONTROL}][1]"),
                    format!("{p}*[@aria-label][contains(@aria-label, {})]", xpath_literal(text)),
                ]
                .join(" | "))
            }
            Query::Strategy(Strategy::FreeText { text, tag }) => {
                let lit = xpath_literal(text);
                match tag {
                    Some(tag) => {
                        if !is_xml_name(tag) {
                            return Err(invalid("tag name", tag));
                        }
                        Ok(format!(
                            "{p}{tag}[contains(normalize-space(.), {lit}) or contains(@value, {lit})]"
                        ))
                    }
                    None => Ok(format!(
                        "{p}*[text()[contains(normalize-space(.), {lit})] or contains(@value, {lit})]"
                    )),
                }
            }
        }
    }
}
