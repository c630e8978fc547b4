use std::path::PathBuf;
use std::sync::Arc;

use action_flow::{DefaultScenarioExecutor, ScenarioExecutor, ScenarioReport};
use action_primitives::Waiter;
use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};
use webdriver_adapter::BrowserDriver;

use crate::report::{render, CommandStatus};
use crate::scenario_file::FormScenarioFile;

use super::context::CliContext;
use super::runtime::{connect, disconnect};

#[derive(Args, Clone, Debug)]
pub struct FormArgs {
    /// Scenario file (YAML)
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,
}

/// Open the form page and run the scenario on an existing session
pub async fn run_form(
    driver: Arc<dyn BrowserDriver>,
    file: FormScenarioFile,
    ctx: &CliContext,
) -> Result<ScenarioReport> {
    let timeouts = ctx.config().timeouts();
    let (url, scenario) = file.into_scenario();

    info!(url = %url, scenario = %scenario.name, "Opening form page");
    driver
        .navigate(&url)
        .await
        .with_context(|| format!("Failed to open {}", url))?;
    let loaded = Waiter::new(timeouts.navigation, timeouts.poll_interval)
        .until(|| {
            let driver = driver.clone();
            async move { matches!(driver.ready_state().await.as_deref(), Ok("complete")) }
        })
        .await;
    if !loaded {
        warn!(url = %url, "Page did not report a complete document");
    }

    let executor = DefaultScenarioExecutor::new(driver, timeouts);
    executor
        .submit_form_and_expect(&scenario)
        .await
        .with_context(|| format!("Scenario '{}' aborted", scenario.name))
}

pub async fn cmd_form(args: FormArgs, ctx: &CliContext) -> Result<CommandStatus> {
    let file = FormScenarioFile::load(&args.scenario).await?;
    let adapter = connect(ctx.config()).await?;
    let result = run_form(adapter.clone(), file, ctx).await;
    disconnect(&adapter).await;

    let report = result?;
    println!("{}", render(&report, ctx.output())?);
    Ok(CommandStatus::from_outcome(&report.outcome))
}
