use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info};

use crate::config::WaypointConfig;

use super::context::CliContext;
use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::init_logging;

/// Steps:
/// 1. Parse arguments and load configuration
/// 2. Install logging at the effective level
/// 3. Dispatch the command and exit with its status
pub async fn run() -> Result<()> {
    let cli = CliArgs::parse();

    let loaded = WaypointConfig::load(cli.config.as_deref()).await?;
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| loaded.config.log_level.clone());
    init_logging(&level, cli.debug, cli.log_format)?;

    info!("Starting waypoint v{}", env!("CARGO_PKG_VERSION"));
    let ctx = CliContext::new(loaded.config, loaded.path, cli.output_format());
    match ctx.config_path() {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("No configuration file found, using defaults"),
    }

    match dispatch(&cli, &ctx).await {
        Ok(status) => {
            debug!(?status, "Command completed");
            let code = status.exit_code();
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {:#}", err);
            Err(err)
        }
    }
}
