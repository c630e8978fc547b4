//! Action dispatcher implementation
//!
//! Two actions are dispatched against resolved elements:
//! 1. click - scroll, wait until interactable, pointer click with one direct-invocation retry
//! 2. type - scroll, wait until editable, clear then inject the payload

mod click;
mod scroll;
mod type_text;

pub use click::*;
pub use scroll::*;
pub use type_text::*;

use async_trait::async_trait;
use std::sync::Arc;
use webdriver_adapter::BrowserDriver;

use crate::{
    errors::ActionError,
    types::{Action, ActionReport, ResolvedElement, Timeouts},
};

/// Dispatcher trait
///
/// Every action:
/// - Brings the element to the viewport centre
/// - Waits (bounded) for it to become interactable
/// - Performs the action, mutating application state
/// - Reports strategy, latency and whether a fallback was needed
#[async_trait]
pub trait ActionDispatcher: Send + Sync {
    /// Perform `action` on `el`
    async fn perform(
        &self,
        el: &ResolvedElement,
        action: &Action,
    ) -> Result<ActionReport, ActionError>;

    /// Click an element
    async fn perform_click(&self, el: &ResolvedElement) -> Result<ActionReport, ActionError> {
        self.perform(el, &Action::Click).await
    }

    /// Replace an element's content with `text`
    async fn perform_type(
        &self,
        el: &ResolvedElement,
        text: &str,
    ) -> Result<ActionReport, ActionError> {
        self.perform(el, &Action::Type(text.to_string())).await
    }
}

/// Default dispatcher over a [`BrowserDriver`]
pub struct DefaultActionDispatcher {
    /// Browser driver the actions go through
    driver: Arc<dyn BrowserDriver>,

    /// Bounds for the interactable waits
    timeouts: Timeouts,
}

impl DefaultActionDispatcher {
    pub fn new(driver: Arc<dyn BrowserDriver>, timeouts: Timeouts) -> Self {
        Self { driver, timeouts }
    }

    /// Get reference to the browser driver
    pub fn driver(&self) -> &Arc<dyn BrowserDriver> {
        &self.driver
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }
}

#[async_trait]
impl ActionDispatcher for DefaultActionDispatcher {
    async fn perform(
        &self,
        el: &ResolvedElement,
        action: &Action,
    ) -> Result<ActionReport, ActionError> {
        match action {
            Action::Click => click::execute_click(self, el).await,
            Action::Type(text) => type_text::execute_type_text(self, el, text).await,
        }
    }
}
