//! Click primitive - Click element with a direct-invocation fallback

use crate::{
    errors::ActionError,
    primitives::{scroll_into_view, wait_until_ready, DefaultActionDispatcher, Readiness},
    types::{Action, ActionReport, ResolvedElement},
};
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Execute click primitive
///
/// Steps:
/// 1. Scroll the element to the viewport centre
/// 2. Wait until it is clickable (visible, enabled, not obscured); act anyway on timeout
/// 3. Pointer click
/// 4. If intercepted by an overlapping element, retry once via direct invocation
/// 5. Generate action report
pub async fn execute_click(
    dispatcher: &DefaultActionDispatcher,
    el: &ResolvedElement,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();
    let action_id = uuid::Uuid::new_v4().to_string();

    info!(
        action_id = %action_id,
        element = %el.label,
        strategy = %el.strategy,
        "Executing click primitive"
    );

    // 1-2. Bring into view and wait for it
    scroll_into_view(dispatcher, el).await?;
    let ready = wait_until_ready(dispatcher, el, Readiness::Clickable).await?;

    // 3. Pointer click
    let mut report = ActionReport::new(action_id.clone(), &Action::Click, el, started_at);
    report.forced = !ready;
    debug!(action_id = %action_id, "Executing pointer click");
    match dispatcher.driver().click(&el.element).await {
        Ok(()) => {}
        Err(err) if err.is_intercepted() => {
            // 4. One direct retry
            warn!(
                action_id = %action_id,
                element = %el.label,
                error = %err,
                "Click intercepted; retrying via direct invocation"
            );
            dispatcher
                .driver()
                .js_click(&el.element)
                .await
                .map_err(|retry_err| {
                    ActionError::Intercepted(format!(
                        "{} ({}; direct invocation: {})",
                        el, err, retry_err
                    ))
                })?;
            report.fallback_used = true;
        }
        Err(err) => return Err(err.into()),
    }

    // 5. Generate report
    let latency_ms = start_instant.elapsed().as_millis() as u64;
    info!(
        action_id = %action_id,
        latency_ms = latency_ms,
        fallback_used = report.fallback_used,
        "Click completed successfully"
    );
    Ok(report.with_latency(latency_ms))
}
