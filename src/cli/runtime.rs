use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use webdriver_adapter::WebDriverAdapter;

use crate::config::WaypointConfig;

use super::output::LogFormat;

/// Install the global subscriber. `RUST_LOG` wins over `level`; `debug`
/// forces the debug level. Logs go to stderr so reports own stdout.
pub fn init_logging(level: &str, debug: bool, format: LogFormat) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    installed.map_err(|err| anyhow!("Failed to install log subscriber: {}", err))
}

/// Open a WebDriver session for the configured browser
pub async fn connect(config: &WaypointConfig) -> Result<Arc<WebDriverAdapter>> {
    info!(
        url = %config.webdriver_url,
        browser = ?config.browser,
        headless = config.headless,
        "Connecting to WebDriver"
    );
    let adapter = WebDriverAdapter::connect(config.webdriver())
        .await
        .with_context(|| format!("Failed to open a session at {}", config.webdriver_url))?;
    Ok(Arc::new(adapter))
}

/// End the session; a failure here never masks the command's own result
pub async fn disconnect(adapter: &WebDriverAdapter) {
    match adapter.close().await {
        Ok(()) => debug!("WebDriver session closed"),
        Err(err) => warn!(error = %err, "Failed to close WebDriver session"),
    }
}
