use super::classify::cmd_classify;
use super::env::CliArgs;
use super::form::cmd_form;
use super::links::cmd_links;
use super::locate::cmd_locate;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use crate::report::CommandStatus;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<CommandStatus> {
    match cli.command.clone() {
        Commands::Classify(args) => cmd_classify(args, ctx).await,
        Commands::Links(args) => cmd_links(args, ctx).await,
        Commands::Form(args) => cmd_form(args, ctx).await,
        Commands::Locate(args) => cmd_locate(args, ctx).await,
    }
}
