use async_trait::async_trait;
use waypoint_core_types::{ContextHandle, ElementId};

use crate::error::AdapterError;
use crate::query::Query;

/// Capability surface consumed from a browser-automation driver.
///
/// Element handles are only valid for the document they were found in.
/// Implementations report `StaleElement` for handles that outlived a
/// navigation.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Load `url` in the current browsing context.
    async fn navigate(&self, url: &str) -> Result<(), AdapterError>;

    /// URL of the document in the current browsing context.
    async fn current_url(&self) -> Result<String, AdapterError>;

    /// Go back one entry in the current context's history.
    async fn back(&self) -> Result<(), AdapterError>;

    /// All elements matching `query`, in document order, optionally only
    /// descendants of `scope`.
    async fn find_all(
        &self,
        query: &Query,
        scope: Option<&ElementId>,
    ) -> Result<Vec<ElementId>, AdapterError>;

    async fn is_visible(&self, el: &ElementId) -> Result<bool, AdapterError>;
    async fn is_enabled(&self, el: &ElementId) -> Result<bool, AdapterError>;
    async fn is_selected(&self, el: &ElementId) -> Result<bool, AdapterError>;

    /// Scroll so the element sits in the centre of the viewport.
    async fn scroll_into_view(&self, el: &ElementId) -> Result<(), AdapterError>;

    /// Pointer click.
    async fn click(&self, el: &ElementId) -> Result<(), AdapterError>;

    /// Direct `element.click()` invocation that bypasses hit testing.
    async fn js_click(&self, el: &ElementId) -> Result<(), AdapterError>;

    async fn clear(&self, el: &ElementId) -> Result<(), AdapterError>;
    async fn send_keys(&self, el: &ElementId, text: &str) -> Result<(), AdapterError>;

    async fn attribute(&self, el: &ElementId, name: &str) -> Result<Option<String>, AdapterError>;

    /// DOM property; `href` yields the absolute URL.
    async fn property(&self, el: &ElementId, name: &str) -> Result<Option<String>, AdapterError>;

    /// Rendered text of the element.
    async fn text(&self, el: &ElementId) -> Result<String, AdapterError>;

    /// Native constraint validation (`checkValidity()`).
    async fn check_validity(&self, el: &ElementId) -> Result<bool, AdapterError>;

    /// Whether another element covers the element's centre point.
    async fn is_obscured(&self, el: &ElementId) -> Result<bool, AdapterError>;

    async fn open_contexts(&self) -> Result<Vec<ContextHandle>, AdapterError>;
    async fn current_context(&self) -> Result<ContextHandle, AdapterError>;
    async fn switch_to(&self, handle: &ContextHandle) -> Result<(), AdapterError>;

    /// Close the current context. Focus must be moved explicitly afterwards.
    async fn close_current(&self) -> Result<(), AdapterError>;

    /// `document.readyState` of the current document.
    async fn ready_state(&self) -> Result<String, AdapterError>;
}
