//! Form scenario files consumed by `waypoint form`
//!
//! ```yaml
//! url: https://demo.example.com/contact
//! name: contact form
//! fields:
//!   - locator: { label: "Email field", strategies: [...] }
//!     value: ada@example.com
//! submit: { label: "Send button", strategies: [...] }
//! signals:
//!   success: [...]
//! expect: success
//! ```

use action_flow::{FormField, FormScenario};
use action_gate::{Expectation, SubmissionSignals};
use action_locator::LocatorSpec;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormScenarioFile {
    /// Page holding the form
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Vec<FormField>,
    pub submit: LocatorSpec,
    #[serde(default)]
    pub signals: SubmissionSignals,
    pub expect: Expectation,
}

impl FormScenarioFile {
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse scenario file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: Self = serde_yaml::from_str(content)?;
        if file.submit.is_empty() {
            anyhow::bail!("submit locator has no strategies");
        }
        Ok(file)
    }

    /// Split into the page to open and the scenario to run there
    pub fn into_scenario(self) -> (String, FormScenario) {
        let name = self
            .name
            .unwrap_or_else(|| format!("form at {}", self.url));
        let scenario = FormScenario {
            name,
            fields: self.fields,
            submit: self.submit,
            signals: self.signals,
            expect: self.expect,
        };
        (self.url, scenario)
    }
}
