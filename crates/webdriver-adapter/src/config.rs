use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::str::FromStr;
use std::time::Duration;

/// Browser behind the WebDriver endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Firefox,
    Chrome,
}

impl FromStr for Browser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firefox" | "gecko" => Ok(Browser::Firefox),
            "chrome" | "chromium" => Ok(Browser::Chrome),
            other => Err(format!("unsupported browser '{}'", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct WebDriverConfig {
    pub webdriver_url: String,
    pub browser: Browser,
    pub headless: bool,
    pub page_load_timeout: Duration,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            browser: Browser::Firefox,
            headless: true,
            page_load_timeout: Duration::from_secs(30),
        }
    }
}

impl WebDriverConfig {
    /// W3C capabilities for the session request.
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        match self.browser {
            Browser::Firefox => {
                caps.insert("browserName".into(), json!("firefox"));
                let args: Vec<&str> = if self.headless { vec!["-headless"] } else { vec![] };
                caps.insert("moz:firefoxOptions".into(), json!({ "args": args }));
            }
            Browser::Chrome => {
                caps.insert("browserName".into(), json!("chrome"));
                let args: Vec<&str> = if self.headless {
                    vec!["--headless=new", "--disable-gpu"]
                } else {
                    vec![]
                };
                caps.insert("goog:chromeOptions".into(), json!({ "args": args }));
            }
        }
        caps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_flags_per_browser() {
        let firefox = WebDriverConfig::default().capabilities();
        assert_eq!(firefox["moz:firefoxOptions"]["args"][0], "-headless");

        let chrome = WebDriverConfig {
            browser: Browser::Chrome,
            headless: false,
            ..Default::default()
        }
        .capabilities();
        assert_eq!(chrome["browserName"], "chrome");
        assert!(chrome["goog:chromeOptions"]["args"].as_array().unwrap().is_empty());
    }

    #[test]
    fn parses_browser_names() {
        assert_eq!("Chrome".parse::<Browser>().unwrap(), Browser::Chrome);
        assert!("safari".parse::<Browser>().is_err());
    }
}
