use clap::Parser;
use std::path::PathBuf;

use super::commands::Commands;
use super::output::{LogFormat, OutputFormat};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (overrides the configured one)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Log line format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Report format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    pub output: OutputFormat,

    /// Shorthand for `--output json`
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl CliArgs {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::Commands;

    #[test]
    fn test_json_shorthand_wins() {
        let args = CliArgs::parse_from([
            "waypoint",
            "classify",
            "https://twitter.com/foo",
            "--origin",
            "https://shop.example.com/",
            "--json",
        ]);
        assert_eq!(args.output_format(), OutputFormat::Json);
        assert!(matches!(args.command, Commands::Classify(_)));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from([
            "waypoint",
            "links",
            "https://shop.example.com/",
            "--log-format",
            "json",
            "-l",
            "warn",
        ]);
        assert_eq!(args.log_format, LogFormat::Json);
        assert_eq!(args.log_level.as_deref(), Some("warn"));
        assert_eq!(args.output_format(), OutputFormat::Human);
    }
}
