//! Waypoint command-line harness
//!
//! Exposes modules for integration testing

pub mod cli;
pub mod config;
pub mod report;
pub mod scenario_file;

pub use config::{ConfigError, LoadedConfig, TimeoutSettings, WaypointConfig};
pub use report::CommandStatus;
pub use scenario_file::FormScenarioFile;
