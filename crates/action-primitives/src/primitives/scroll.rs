//! Scroll-into-view and interactability waits shared by click and type

use crate::{
    errors::ActionError, primitives::DefaultActionDispatcher, types::ResolvedElement,
    waiting::Waiter,
};
use tracing::{debug, warn};
use webdriver_adapter::AdapterError;

/// What an element has to satisfy before it is acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Visible, enabled and not covered by another element
    Clickable,
    /// Visible and enabled
    Editable,
}

/// Scroll the element to the centre of the viewport.
pub async fn scroll_into_view(
    dispatcher: &DefaultActionDispatcher,
    el: &ResolvedElement,
) -> Result<(), ActionError> {
    debug!(element = %el, "Scrolling into view");
    dispatcher
        .driver()
        .scroll_into_view(&el.element)
        .await
        .map_err(ActionError::from)
}

async fn probe(
    dispatcher: &DefaultActionDispatcher,
    el: &ResolvedElement,
    readiness: Readiness,
) -> Result<bool, AdapterError> {
    let driver = dispatcher.driver();
    if !driver.is_visible(&el.element).await? || !driver.is_enabled(&el.element).await? {
        return Ok(false);
    }
    match readiness {
        Readiness::Clickable => Ok(!driver.is_obscured(&el.element).await?),
        Readiness::Editable => Ok(true),
    }
}

/// Wait, up to the interactable bound, for `readiness` to hold.
///
/// Returns `Ok(true)` when it held and `Ok(false)` on timeout; the caller
/// decides whether to act anyway. A stale element ends the wait early.
pub async fn wait_until_ready(
    dispatcher: &DefaultActionDispatcher,
    el: &ResolvedElement,
    readiness: Readiness,
) -> Result<bool, ActionError> {
    let waiter = Waiter::with_timeouts(dispatcher.timeouts().interactable, dispatcher.timeouts());
    let outcome = waiter
        .until_some(|| async move {
            match probe(dispatcher, el, readiness).await {
                Ok(true) => Some(Ok(())),
                Ok(false) => None,
                Err(err) if err.is_stale() => Some(Err(ActionError::from(err))),
                Err(err) => {
                    debug!(element = %el, error = %err, "Readiness probe failed");
                    None
                }
            }
        })
        .await;

    match outcome {
        Some(Ok(())) => Ok(true),
        Some(Err(err)) => Err(err),
        None => {
            warn!(
                element = %el,
                readiness = ?readiness,
                timeout_ms = dispatcher.timeouts().interactable.as_millis() as u64,
                "Element did not become ready in time; acting anyway"
            );
            Ok(false)
        }
    }
}
