use action_gate::{classify, DomainVerdict};
use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use crate::report::CommandStatus;

use super::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct ClassifyArgs {
    /// Destination URL to classify
    pub url: String,

    /// Application origin (defaults to the configured one)
    #[arg(long)]
    pub origin: Option<String>,

    /// Fragment the destination URL must contain (case-insensitive)
    #[arg(long)]
    pub expect: Option<String>,
}

pub fn run_classify(args: &ClassifyArgs, ctx: &CliContext) -> Result<DomainVerdict> {
    let Some(origin) = ctx.application_origin(args.origin.as_deref()) else {
        bail!("No application origin: pass --origin or set application_origin in the config");
    };
    let verdict = classify(&args.url, &origin, args.expect.as_deref());
    info!(
        url = %args.url,
        origin = %origin,
        domain = %verdict.registrable_domain,
        external = verdict.is_external,
        "Classified destination"
    );
    Ok(verdict)
}

/// Always prints JSON; the verdict has no other rendering
pub async fn cmd_classify(args: ClassifyArgs, ctx: &CliContext) -> Result<CommandStatus> {
    let verdict = run_classify(&args, ctx)?;
    let json = serde_json::to_string_pretty(&verdict).context("Failed to serialize verdict")?;
    println!("{}", json);
    Ok(CommandStatus::Passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::OutputFormat;
    use crate::config::WaypointConfig;

    fn args(url: &str, origin: Option<&str>, expect: Option<&str>) -> ClassifyArgs {
        ClassifyArgs {
            url: url.into(),
            origin: origin.map(str::to_string),
            expect: expect.map(str::to_string),
        }
    }

    #[test]
    fn test_flag_origin_beats_config() {
        let config = WaypointConfig {
            application_origin: Some("https://twitter.com/".into()),
            ..WaypointConfig::default()
        };
        let ctx = CliContext::new(config, None, OutputFormat::Json);

        let from_config = run_classify(&args("https://twitter.com/foo", None, None), &ctx).unwrap();
        assert!(!from_config.is_external);

        let from_flag = run_classify(
            &args("https://twitter.com/foo", Some("https://shop.example.com/"), Some("twitter")),
            &ctx,
        )
        .unwrap();
        assert!(from_flag.is_verified_external());
    }

    #[test]
    fn test_missing_origin_is_an_error() {
        let ctx = CliContext::new(WaypointConfig::default(), None, OutputFormat::Human);
        assert!(run_classify(&args("https://twitter.com/foo", None, None), &ctx).is_err());
    }
}
