use std::path::{Path, PathBuf};

use crate::config::WaypointConfig;

use super::output::OutputFormat;

pub struct CliContext {
    config: WaypointConfig,
    config_path: Option<PathBuf>,
    output: OutputFormat,
}

impl CliContext {
    pub fn new(config: WaypointConfig, config_path: Option<PathBuf>, output: OutputFormat) -> Self {
        Self {
            config,
            config_path,
            output,
        }
    }

    pub fn config(&self) -> &WaypointConfig {
        &self.config
    }

    /// File the configuration came from; `None` when running on defaults
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    /// Origin flag if given, else the configured one
    pub fn application_origin(&self, flag: Option<&str>) -> Option<String> {
        flag.map(str::to_string)
            .or_else(|| self.config.application_origin.clone())
            .filter(|origin| !origin.trim().is_empty())
    }
}
