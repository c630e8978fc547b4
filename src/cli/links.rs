use std::sync::Arc;

use action_flow::{DefaultScenarioExecutor, ScenarioExecutor, SweepReport};
use anyhow::{Context, Result};
use clap::Args;
use webdriver_adapter::BrowserDriver;

use crate::report::{render, CommandStatus};

use super::context::CliContext;
use super::runtime::{connect, disconnect};

#[derive(Args, Clone, Debug)]
pub struct LinksArgs {
    /// Page whose external links are verified
    pub page_url: String,

    /// Application origin (defaults to the configured one, then the page)
    #[arg(long)]
    pub origin: Option<String>,
}

/// Run the sweep on an existing session
pub async fn run_links(
    driver: Arc<dyn BrowserDriver>,
    args: &LinksArgs,
    ctx: &CliContext,
) -> Result<SweepReport> {
    let mut executor = DefaultScenarioExecutor::new(driver, ctx.config().timeouts());
    if let Some(origin) = ctx.application_origin(args.origin.as_deref()) {
        executor = executor.with_application_origin(origin);
    }
    executor
        .verify_all_external_links(&args.page_url)
        .await
        .with_context(|| format!("External link sweep of {} failed", args.page_url))
}

pub async fn cmd_links(args: LinksArgs, ctx: &CliContext) -> Result<CommandStatus> {
    let adapter = connect(ctx.config()).await?;
    let result = run_links(adapter.clone(), &args, ctx).await;
    disconnect(&adapter).await;

    let report = result?;
    println!("{}", render(&report, ctx.output())?);
    Ok(CommandStatus::from_sweep(&report))
}
