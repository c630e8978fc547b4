use std::fmt;
use std::sync::Arc;

use action_flow::{DefaultScenarioExecutor, ScenarioExecutor};
use action_locator::{LocatorSpec, NotFound, Resolution};
use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use waypoint_core_types::Strategy;
use webdriver_adapter::BrowserDriver;

use crate::report::{render, CommandStatus};

use super::context::CliContext;
use super::runtime::{connect, disconnect};

#[derive(Args, Clone, Debug)]
pub struct LocateArgs {
    /// Page to resolve on
    pub page_url: String,

    /// Strategy in compact form (`attr:name=email`, `role:button`,
    /// `label:Email`, `text:Sign in`, `text:a:Sign in`); repeat for fallbacks
    #[arg(short, long = "strategy", value_name = "STRATEGY", required = true)]
    pub strategies: Vec<Strategy>,

    /// Logical name used in diagnostics
    #[arg(long, default_value = "target")]
    pub label: String,
}

/// What a single resolution pass produced
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateReport {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_strategy: Option<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_found: Option<NotFound>,
}

impl LocateReport {
    pub fn from_resolution(label: String, resolution: Resolution) -> Self {
        match resolution {
            Resolution::Found(el) => Self {
                label,
                winning_strategy: Some(el.strategy),
                not_found: None,
            },
            Resolution::NotFound(missing) => Self {
                label,
                winning_strategy: None,
                not_found: Some(missing),
            },
        }
    }

    pub fn is_found(&self) -> bool {
        self.winning_strategy.is_some()
    }
}

impl fmt::Display for LocateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.winning_strategy, &self.not_found) {
            (Some(strategy), _) => write!(f, "{} found via {}", self.label, strategy),
            (None, Some(missing)) => write!(f, "{}", missing),
            (None, None) => write!(f, "{} not found", self.label),
        }
    }
}

pub async fn run_locate(
    driver: Arc<dyn BrowserDriver>,
    args: &LocateArgs,
    ctx: &CliContext,
) -> Result<LocateReport> {
    if args.strategies.is_empty() {
        bail!("At least one --strategy is required");
    }
    driver
        .navigate(&args.page_url)
        .await
        .with_context(|| format!("Failed to open {}", args.page_url))?;

    let spec = LocatorSpec::new(args.label.clone(), args.strategies.clone());
    let executor = DefaultScenarioExecutor::new(driver, ctx.config().timeouts());
    let resolution = executor
        .resolve(&spec)
        .await
        .with_context(|| format!("Resolving {} failed", spec))?;
    Ok(LocateReport::from_resolution(args.label.clone(), resolution))
}

pub async fn cmd_locate(args: LocateArgs, ctx: &CliContext) -> Result<CommandStatus> {
    let adapter = connect(ctx.config()).await?;
    let result = run_locate(adapter.clone(), &args, ctx).await;
    disconnect(&adapter).await;

    let report = result?;
    println!("{}", render(&report, ctx.output())?);
    Ok(if report.is_found() {
        CommandStatus::Passed
    } else {
        CommandStatus::Skipped
    })
}
