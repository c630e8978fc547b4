//! Report rendering and process status for the `waypoint` commands

use action_flow::{ScenarioOutcome, SweepReport};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Display;

use crate::cli::output::OutputFormat;

/// Result of a command, mapped onto the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Passed,
    Failed,
    Skipped,
}

impl CommandStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            CommandStatus::Passed => 0,
            CommandStatus::Failed => 1,
            CommandStatus::Skipped => 2,
        }
    }

    pub fn from_outcome(outcome: &ScenarioOutcome) -> Self {
        match outcome {
            ScenarioOutcome::Passed => CommandStatus::Passed,
            ScenarioOutcome::Failed(_) => CommandStatus::Failed,
            ScenarioOutcome::Skipped(_) => CommandStatus::Skipped,
        }
    }

    /// A sweep fails as soon as one link failed; skipped links do not count
    pub fn from_sweep(report: &SweepReport) -> Self {
        if report.has_failures() {
            CommandStatus::Failed
        } else {
            CommandStatus::Passed
        }
    }
}

/// Format a report for stdout
pub fn render<T>(value: &T, format: OutputFormat) -> Result<String>
where
    T: Serialize + Display,
{
    match format {
        OutputFormat::Human => Ok(value.to_string()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to serialize report as JSON")
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).context("Failed to serialize report as YAML")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_flow::{ScenarioReport, SkipReason};

    #[test]
    fn test_exit_codes() {
        assert_eq!(CommandStatus::from_outcome(&ScenarioOutcome::Passed).exit_code(), 0);
        assert_eq!(
            CommandStatus::from_outcome(&ScenarioOutcome::Failed("boom".into())).exit_code(),
            1
        );
        assert_eq!(
            CommandStatus::from_outcome(&ScenarioOutcome::Skipped(SkipReason::Absent)).exit_code(),
            2
        );
    }

    #[test]
    fn test_sweep_status_ignores_skips() {
        let mut report = SweepReport {
            page_url: "https://shop.example.com/".into(),
            application_origin: "https://shop.example.com/".into(),
            links: vec![ScenarioReport::new(
                "external link 'https://x.com/'",
                ScenarioOutcome::Skipped(SkipReason::Ineligible),
            )],
        };
        assert_eq!(CommandStatus::from_sweep(&report), CommandStatus::Passed);

        report.links.push(ScenarioReport::new(
            "external link 'https://y.com/'",
            ScenarioOutcome::Failed("did not navigate".into()),
        ));
        assert_eq!(CommandStatus::from_sweep(&report), CommandStatus::Failed);
    }

    #[test]
    fn test_render_json() {
        let report = ScenarioReport::new("contact form", ScenarioOutcome::Passed);
        let json = render(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "contact form");
        assert_eq!(value["outcome"]["status"], "passed");
    }
}
