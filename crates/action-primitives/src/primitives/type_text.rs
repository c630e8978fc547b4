//! Type text primitive - Replace the content of an editable element

use crate::{
    errors::ActionError,
    primitives::{scroll_into_view, wait_until_ready, DefaultActionDispatcher, Readiness},
    types::{Action, ActionReport, ResolvedElement},
};
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info};

/// Execute type_text primitive
///
/// Steps:
/// 1. Scroll the element to the viewport centre
/// 2. Wait until it is visible and enabled; act anyway on timeout
/// 3. Clear existing content
/// 4. Inject the text
/// 5. Generate action report
///
/// No retry: any failure clearing or typing is `NotEditable`.
pub async fn execute_type_text(
    dispatcher: &DefaultActionDispatcher,
    el: &ResolvedElement,
    text: &str,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();
    let action_id = uuid::Uuid::new_v4().to_string();

    info!(
        action_id = %action_id,
        element = %el.label,
        strategy = %el.strategy,
        text_length = text.len(),
        "Executing type_text primitive"
    );

    // 1-2. Bring into view and wait for it
    scroll_into_view(dispatcher, el).await?;
    let ready = wait_until_ready(dispatcher, el, Readiness::Editable).await?;

    // 3. Clear
    let not_editable = |step: &str, err: webdriver_adapter::AdapterError| {
        ActionError::NotEditable(format!("{} ({} failed: {})", el, step, err))
    };
    debug!(action_id = %action_id, "Clearing existing content");
    dispatcher
        .driver()
        .clear(&el.element)
        .await
        .map_err(|err| not_editable("clear", err))?;

    // 4. Type
    if !text.is_empty() {
        debug!(action_id = %action_id, "Typing {} characters", text.chars().count());
        dispatcher
            .driver()
            .send_keys(&el.element, text)
            .await
            .map_err(|err| not_editable("type", err))?;
    }

    // 5. Generate report
    let latency_ms = start_instant.elapsed().as_millis() as u64;
    info!(
        action_id = %action_id,
        latency_ms = latency_ms,
        "Type text completed successfully"
    );
    let mut report = ActionReport::new(
        action_id,
        &Action::Type(text.to_string()),
        el,
        started_at,
    );
    report.forced = !ready;
    Ok(report.with_latency(latency_ms))
}
