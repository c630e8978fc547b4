//! Evaluation of a single locating strategy
//!
//! A strategy is evaluated in full (every match is fetched) and succeeds only
//! when one of its matches is visible and enabled; the first such match in
//! document order is taken.

use crate::{errors::LocatorError, types::StrategyAttempt};
use tracing::debug;
use waypoint_core_types::{ElementId, Strategy};
use webdriver_adapter::{AdapterError, BrowserDriver, Query};

/// Outcome of evaluating one strategy
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    /// First visible and enabled match, if any
    pub element: Option<ElementId>,
    pub attempt: StrategyAttempt,
}

async fn is_usable(driver: &dyn BrowserDriver, el: &ElementId) -> Result<bool, AdapterError> {
    Ok(driver.is_visible(el).await? && driver.is_enabled(el).await?)
}

/// Evaluate `strategy`, optionally restricted to descendants of `scope`.
///
/// Strategy-level failures (an invalid query, a match going stale or
/// vanishing while being inspected) are recorded on the attempt and treated as
/// "found nothing"; every other failure is returned as an error.
pub async fn evaluate_strategy(
    driver: &dyn BrowserDriver,
    strategy: &Strategy,
    scope: Option<&ElementId>,
) -> Result<StrategyOutcome, LocatorError> {
    let mut attempt = StrategyAttempt {
        strategy: strategy.clone(),
        matched: 0,
        usable: false,
        error: None,
    };

    let matches = match driver.find_all(&Query::from(strategy.clone()), scope).await {
        Ok(matches) => matches,
        Err(err) if !LocatorError::is_strategy_local(&err) => return Err(err.into()),
        Err(err) => {
            debug!(strategy = %strategy, error = %err, "Strategy query failed");
            attempt.error = Some(err.to_string());
            return Ok(StrategyOutcome {
                element: None,
                attempt,
            });
        }
    };
    attempt.matched = matches.len();

    for candidate in matches {
        match is_usable(driver, &candidate).await {
            Ok(true) => {
                attempt.usable = true;
                return Ok(StrategyOutcome {
                    element: Some(candidate),
                    attempt,
                });
            }
            Ok(false) => {}
            Err(err) if !LocatorError::is_strategy_local(&err) => return Err(err.into()),
            Err(err) => {
                debug!(strategy = %strategy, error = %err, "Skipping match that failed inspection");
            }
        }
    }

    debug!(
        strategy = %strategy,
        matched = attempt.matched,
        "Strategy found no visible and enabled element"
    );
    Ok(StrategyOutcome {
        element: None,
        attempt,
    })
}
