//! Configuration management module
//!
//! `WaypointConfig` is read from YAML. Lookup order:
//! 1. `--config <path>` (must exist)
//! 2. `./config/waypoint.yaml`
//! 3. `<config dir>/waypoint/config.yaml`
//! 4. built-in defaults
//!
//! Environment overrides are applied last.

use action_primitives::Timeouts;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use webdriver_adapter::{Browser, WebDriverConfig};

pub const ENV_WEBDRIVER_URL: &str = "WAYPOINT_WEBDRIVER_URL";
pub const ENV_BROWSER: &str = "WAYPOINT_BROWSER";
pub const ENV_HEADLESS: &str = "WAYPOINT_HEADLESS";
pub const ENV_WAIT_MS: &str = "WAYPOINT_WAIT_MS";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Poll bounds in milliseconds
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    pub wait_ms: u64,
    pub poll_interval_ms: u64,
    pub interactable_ms: u64,
    pub navigation_ms: u64,
    pub indicator_ms: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            wait_ms: 10_000,
            poll_interval_ms: 250,
            interactable_ms: 10_000,
            navigation_ms: 10_000,
            indicator_ms: 10_000,
        }
    }
}

impl TimeoutSettings {
    pub fn to_timeouts(&self) -> Timeouts {
        Timeouts {
            wait: Duration::from_millis(self.wait_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            interactable: Duration::from_millis(self.interactable_ms),
            navigation: Duration::from_millis(self.navigation_ms),
            indicator: Duration::from_millis(self.indicator_ms),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointConfig {
    pub webdriver_url: String,
    pub browser: Browser,
    pub headless: bool,
    /// Origin destinations are classified against; the page under test when unset
    pub application_origin: Option<String>,
    pub timeouts: TimeoutSettings,
    pub log_level: String,
}

impl Default for WaypointConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            browser: Browser::Firefox,
            headless: true,
            application_origin: None,
            timeouts: TimeoutSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

/// Configuration together with where it came from
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    pub config: WaypointConfig,
    /// File the configuration was read from; `None` for built-in defaults
    pub path: Option<PathBuf>,
}

impl WaypointConfig {
    /// Load configuration following the lookup order, then apply the
    /// environment overrides.
    pub async fn load(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        let mut loaded = match explicit {
            Some(path) => LoadedConfig {
                config: Self::from_file(path).await?,
                path: Some(path.to_path_buf()),
            },
            None => {
                let mut found = None;
                for candidate in Self::default_paths() {
                    if fs::try_exists(&candidate).await.unwrap_or(false) {
                        found = Some(candidate);
                        break;
                    }
                }
                match found {
                    Some(path) => LoadedConfig {
                        config: Self::from_file(&path).await?,
                        path: Some(path),
                    },
                    None => LoadedConfig {
                        config: Self::default(),
                        path: None,
                    },
                }
            }
        };
        loaded.config.apply_env_overrides()?;
        Ok(loaded)
    }

    /// Implicit config locations, highest priority first
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config/waypoint.yaml")];
        if let Some(mut dir) = dirs::config_dir() {
            dir.push("waypoint");
            dir.push("config.yaml");
            paths.push(dir);
        }
        paths
    }

    pub async fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `WAYPOINT_*` variables from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| env::var(var).ok())
    }

    /// Apply overrides from any variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_WEBDRIVER_URL).filter(|v| !v.trim().is_empty()) {
            self.webdriver_url = url.trim().to_string();
        }
        if let Some(value) = lookup(ENV_BROWSER) {
            self.browser = value.parse().map_err(|reason| ConfigError::InvalidEnv {
                var: ENV_BROWSER,
                value: value.clone(),
                reason,
            })?;
        }
        if let Some(value) = lookup(ENV_HEADLESS) {
            self.headless = parse_bool(&value).ok_or_else(|| ConfigError::InvalidEnv {
                var: ENV_HEADLESS,
                value: value.clone(),
                reason: "expected true/false".to_string(),
            })?;
        }
        if let Some(value) = lookup(ENV_WAIT_MS) {
            self.timeouts.wait_ms =
                value
                    .trim()
                    .parse()
                    .map_err(|err: std::num::ParseIntError| ConfigError::InvalidEnv {
                        var: ENV_WAIT_MS,
                        value: value.clone(),
                        reason: err.to_string(),
                    })?;
        }
        Ok(())
    }

    pub fn webdriver(&self) -> WebDriverConfig {
        WebDriverConfig {
            webdriver_url: self.webdriver_url.clone(),
            browser: self.browser,
            headless: self.headless,
            ..WebDriverConfig::default()
        }
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts.to_timeouts()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
