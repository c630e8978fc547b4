use serial_test::serial;
use std::env;
use std::time::Duration;
use waypoint_cli::config::{
    ConfigError, WaypointConfig, ENV_BROWSER, ENV_HEADLESS, ENV_WAIT_MS, ENV_WEBDRIVER_URL,
};
use webdriver_adapter::Browser;

fn clear_env() {
    for var in [ENV_WEBDRIVER_URL, ENV_BROWSER, ENV_HEADLESS, ENV_WAIT_MS] {
        env::remove_var(var);
    }
}

#[tokio::test]
#[serial]
async fn explicit_file_is_loaded() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("waypoint.yaml");
    std::fs::write(
        &path,
        "webdriver_url: http://grid:4444\nbrowser: chrome\nheadless: false\napplication_origin: https://shop.example.com/\ntimeouts:\n  wait_ms: 2000\n  poll_interval_ms: 50\n",
    )
    .unwrap();

    let loaded = WaypointConfig::load(Some(&path)).await.unwrap();
    assert_eq!(loaded.path.as_deref(), Some(path.as_path()));
    let config = loaded.config;
    assert_eq!(config.browser, Browser::Chrome);
    assert!(!config.headless);
    assert_eq!(config.application_origin.as_deref(), Some("https://shop.example.com/"));

    let timeouts = config.timeouts();
    assert_eq!(timeouts.wait, Duration::from_millis(2000));
    assert_eq!(timeouts.poll_interval, Duration::from_millis(50));
    assert_eq!(timeouts.navigation, Duration::from_millis(10_000));

    let webdriver = config.webdriver();
    assert_eq!(webdriver.webdriver_url, "http://grid:4444");
    assert_eq!(webdriver.browser, Browser::Chrome);
}

#[tokio::test]
#[serial]
async fn environment_overrides_file_values() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("waypoint.yaml");
    std::fs::write(&path, "webdriver_url: http://grid:4444\nheadless: true\n").unwrap();

    env::set_var(ENV_WEBDRIVER_URL, "http://localhost:9515");
    env::set_var(ENV_HEADLESS, "off");
    env::set_var(ENV_WAIT_MS, "750");
    let loaded = WaypointConfig::load(Some(&path)).await;
    clear_env();

    let config = loaded.unwrap().config;
    assert_eq!(config.webdriver_url, "http://localhost:9515");
    assert!(!config.headless);
    assert_eq!(config.timeouts.wait_ms, 750);
}

#[tokio::test]
#[serial]
async fn invalid_environment_value_is_rejected() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("waypoint.yaml");
    std::fs::write(&path, "{}\n").unwrap();

    env::set_var(ENV_WAIT_MS, "soon");
    let loaded = WaypointConfig::load(Some(&path)).await;
    clear_env();

    assert!(matches!(
        loaded,
        Err(ConfigError::InvalidEnv { var: ENV_WAIT_MS, .. })
    ));
}

#[tokio::test]
#[serial]
async fn missing_or_malformed_files_are_errors() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();

    let missing = WaypointConfig::load(Some(&dir.path().join("nope.yaml"))).await;
    assert!(matches!(missing, Err(ConfigError::Read { .. })));

    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "timeouts: [1, 2").unwrap();
    let broken = WaypointConfig::load(Some(&path)).await;
    assert!(matches!(broken, Err(ConfigError::Parse { .. })));
}
