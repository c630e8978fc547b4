//! W3C WebDriver binding (geckodriver / chromedriver) via fantoccini.

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::wd::WindowHandle;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::Value;
use tracing::{debug, info};
use waypoint_core_types::{ContextHandle, ElementId};

use crate::config::WebDriverConfig;
use crate::driver::BrowserDriver;
use crate::error::{AdapterError, AdapterErrorKind};
use crate::query::Query;
use crate::registry::ElementRegistry;

const SCROLL_SCRIPT: &str =
    "arguments[0].scrollIntoView({block: 'center', inline: 'center', behavior: 'instant'});";
const CLICK_SCRIPT: &str = "arguments[0].click();";
const VALIDITY_SCRIPT: &str = "const el = arguments[0]; \
    return typeof el.checkValidity === 'function' ? el.checkValidity() : true;";
const OBSCURED_SCRIPT: &str = "const el = arguments[0]; \
    const r = el.getBoundingClientRect(); \
    if (r.width === 0 || r.height === 0) { return false; } \
    const top = document.elementFromPoint(r.left + r.width / 2, r.top + r.height / 2); \
    return !!top && top !== el && !el.contains(top);";
const READY_STATE_SCRIPT: &str = "return document.readyState;";

/// Map a fantoccini command failure onto the adapter taxonomy.
pub fn map_cmd_error(err: CmdError) -> AdapterError {
    let hint = err.to_string();
    let kind = match &err {
        CmdError::Standard(wd) => match wd.error {
            ErrorStatus::ElementClickIntercepted => AdapterErrorKind::ClickIntercepted,
            ErrorStatus::ElementNotInteractable | ErrorStatus::InvalidElementState => {
                AdapterErrorKind::NotInteractable
            }
            ErrorStatus::StaleElementReference => AdapterErrorKind::StaleElement,
            ErrorStatus::NoSuchWindow => AdapterErrorKind::NoSuchContext,
            ErrorStatus::NoSuchElement => AdapterErrorKind::TargetNotFound,
            ErrorStatus::InvalidSelector => AdapterErrorKind::InvalidQuery,
            ErrorStatus::Timeout => AdapterErrorKind::NavTimeout,
            ErrorStatus::InvalidSessionId | ErrorStatus::SessionNotCreated => {
                AdapterErrorKind::Io
            }
            _ => AdapterErrorKind::Internal,
        },
        CmdError::Lost(_) | CmdError::Failed(_) => AdapterErrorKind::Io,
        _ => AdapterErrorKind::Internal,
    };
    let retriable = matches!(err, CmdError::Lost(_) | CmdError::Failed(_))
        || kind == AdapterErrorKind::ClickIntercepted;
    AdapterError::new(kind).with_hint(hint).retriable(retriable)
}

/// Driver backed by a live WebDriver session.
pub struct WebDriverAdapter {
    client: Client,
    config: WebDriverConfig,
    elements: ElementRegistry<Element>,
}

impl WebDriverAdapter {
    /// Open a new session against `config.webdriver_url`.
    pub async fn connect(config: WebDriverConfig) -> Result<Self, AdapterError> {
        let client = ClientBuilder::native()
            .capabilities(config.capabilities())
            .connect(&config.webdriver_url)
            .await
            .map_err(|err| {
                AdapterError::new(AdapterErrorKind::Io)
                    .with_hint(format!(
                        "failed to connect to WebDriver at {}: {}",
                        config.webdriver_url, err
                    ))
                    .retriable(true)
            })?;
        info!(
            webdriver_url = %config.webdriver_url,
            browser = ?config.browser,
            headless = config.headless,
            "WebDriver session started"
        );
        Ok(Self {
            client,
            config,
            elements: ElementRegistry::new(),
        })
    }

    /// End the session and close the browser.
    pub async fn close(&self) -> Result<(), AdapterError> {
        self.elements.clear();
        self.client.clone().close().await.map_err(map_cmd_error)
    }

    fn element(&self, id: &ElementId) -> Result<Element, AdapterError> {
        self.elements.get(id).ok_or_else(|| {
            AdapterError::new(AdapterErrorKind::StaleElement)
                .with_hint(format!("element {} no longer registered", id))
        })
    }

    async fn script_on(&self, id: &ElementId, script: &str) -> Result<Value, AdapterError> {
        let element = self.element(id)?;
        let arg = serde_json::to_value(&element).map_err(|err| {
            AdapterError::new(AdapterErrorKind::Internal).with_hint(err.to_string())
        })?;
        self.client
            .execute(script, vec![arg])
            .await
            .map_err(map_cmd_error)
    }
}

#[async_trait]
impl BrowserDriver for WebDriverAdapter {
    async fn navigate(&self, url: &str) -> Result<(), AdapterError> {
        debug!(url, "navigate");
        self.elements.clear();
        match tokio::time::timeout(self.config.page_load_timeout, self.client.goto(url)).await {
            Ok(result) => result.map_err(map_cmd_error),
            Err(_) => Err(AdapterError::new(AdapterErrorKind::NavTimeout)
                .with_hint(url.to_string())
                .retriable(true)),
        }
    }

    async fn current_url(&self) -> Result<String, AdapterError> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(map_cmd_error)
    }

    async fn back(&self) -> Result<(), AdapterError> {
        self.elements.clear();
        self.client.back().await.map_err(map_cmd_error)
    }

    async fn find_all(
        &self,
        query: &Query,
        scope: Option<&ElementId>,
    ) -> Result<Vec<ElementId>, AdapterError> {
        let xpath = query.to_xpath(scope.is_some())?;
        debug!(%query, xpath = %xpath, "find_all");
        let found = match scope {
            Some(scope) => self.element(scope)?.find_all(Locator::XPath(&xpath)).await,
            None => self.client.find_all(Locator::XPath(&xpath)).await,
        }
        .map_err(map_cmd_error)?;
        Ok(found.into_iter().map(|el| self.elements.insert(el)).collect())
    }

    async fn is_visible(&self, el: &ElementId) -> Result<bool, AdapterError> {
        self.element(el)?.is_displayed().await.map_err(map_cmd_error)
    }

    async fn is_enabled(&self, el: &ElementId) -> Result<bool, AdapterError> {
        self.element(el)?.is_enabled().await.map_err(map_cmd_error)
    }

    async fn is_selected(&self, el: &ElementId) -> Result<bool, AdapterError> {
        self.element(el)?.is_selected().await.map_err(map_cmd_error)
    }

    async fn scroll_into_view(&self, el: &ElementId) -> Result<(), AdapterError> {
        self.script_on(el, SCROLL_SCRIPT).await.map(|_| ())
    }

    async fn click(&self, el: &ElementId) -> Result<(), AdapterError> {
        self.element(el)?.click().await.map_err(map_cmd_error)
    }

    async fn js_click(&self, el: &ElementId) -> Result<(), AdapterError> {
        self.script_on(el, CLICK_SCRIPT).await.map(|_| ())
    }

    async fn clear(&self, el: &ElementId) -> Result<(), AdapterError> {
        self.element(el)?.clear().await.map_err(map_cmd_error)
    }

    async fn send_keys(&self, el: &ElementId, text: &str) -> Result<(), AdapterError> {
        self.element(el)?.send_keys(text).await.map_err(map_cmd_error)
    }

    async fn attribute(&self, el: &ElementId, name: &str) -> Result<Option<String>, AdapterError> {
        self.element(el)?.attr(name).await.map_err(map_cmd_error)
    }

    async fn property(&self, el: &ElementId, name: &str) -> Result<Option<String>, AdapterError> {
        self.element(el)?.prop(name).await.map_err(map_cmd_error)
    }

    async fn text(&self, el: &ElementId) -> Result<String, AdapterError> {
        self.element(el)?.text().await.map_err(map_cmd_error)
    }

    async fn check_validity(&self, el: &ElementId) -> Result<bool, AdapterError> {
        let value = self.script_on(el, VALIDITY_SCRIPT).await?;
        Ok(value.as_bool().unwrap_or(true))
    }

    async fn is_obscured(&self, el: &ElementId) -> Result<bool, AdapterError> {
        let value = self.script_on(el, OBSCURED_SCRIPT).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn open_contexts(&self) -> Result<Vec<ContextHandle>, AdapterError> {
        let handles = self.client.windows().await.map_err(map_cmd_error)?;
        Ok(handles
            .into_iter()
            .map(|handle| ContextHandle(String::from(handle)))
            .collect())
    }

    async fn current_context(&self) -> Result<ContextHandle, AdapterError> {
        let handle = self.client.window().await.map_err(map_cmd_error)?;
        Ok(ContextHandle(String::from(handle)))
    }

    async fn switch_to(&self, handle: &ContextHandle) -> Result<(), AdapterError> {
        let window = WindowHandle::try_from(handle.0.clone()).map_err(|_| {
            AdapterError::new(AdapterErrorKind::NoSuchContext)
                .with_hint(format!("invalid window handle '{}'", handle))
        })?;
        // Handles of the target window's document stay valid across a switch
        self.client
            .switch_to_window(window)
            .await
            .map_err(map_cmd_error)
    }

    async fn close_current(&self) -> Result<(), AdapterError> {
        self.client.close_window().await.map_err(map_cmd_error)
    }

    async fn ready_state(&self) -> Result<String, AdapterError> {
        let value = self
            .client
            .execute(READY_STATE_SCRIPT, vec![])
            .await
            .map_err(map_cmd_error)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fantoccini::error::WebDriver;

    fn standard(status: ErrorStatus) -> AdapterError {
        map_cmd_error(CmdError::Standard(WebDriver::new(status, "from driver")))
    }

    #[test]
    fn element_statuses_keep_their_kind() {
        assert_eq!(standard(ErrorStatus::NoSuchElement).kind, AdapterErrorKind::TargetNotFound);
        assert_eq!(standard(ErrorStatus::NoSuchWindow).kind, AdapterErrorKind::NoSuchContext);
        assert_eq!(
            standard(ErrorStatus::StaleElementReference).kind,
            AdapterErrorKind::StaleElement
        );
        let intercepted = standard(ErrorStatus::ElementClickIntercepted);
        assert_eq!(intercepted.kind, AdapterErrorKind::ClickIntercepted);
        assert!(intercepted.retriable);
    }

    #[test]
    fn dead_session_is_an_io_failure() {
        for status in [ErrorStatus::InvalidSessionId, ErrorStatus::SessionNotCreated] {
            let err = standard(status);
            assert_eq!(err.kind, AdapterErrorKind::Io);
            assert!(!err.retriable);
        }
        assert_eq!(standard(ErrorStatus::UnknownError).kind, AdapterErrorKind::Internal);
    }
}
