use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use action_gate::{GateError, NavigationObserver, NavigationOutcome};
use action_primitives::{
    ActionDispatcher, ActionError, DefaultActionDispatcher, ResolvedElement, Timeouts,
};
use tokio_test::{assert_err, assert_ok};
use waypoint_core_types::{ContextHandle, Strategy};
use webdriver_adapter::stub::{ClickBehavior, StubBrowser, StubElement};
use webdriver_adapter::{BrowserDriver, Query};

const SHOP: &str = "https://shop.example.com/";

fn timeouts() -> Timeouts {
    Timeouts::uniform(Duration::from_millis(40), Duration::from_millis(5))
}

fn shop() -> Arc<StubBrowser> {
    Arc::new(StubBrowser::new(SHOP).page(
        SHOP,
        vec![
            StubElement::link("twitter", "https://twitter.com/foo", "Twitter").attr("target", "_blank"),
            StubElement::link("about", "/about", "About us"),
            StubElement::new("filter", "button").text("Filter"),
        ],
    ))
}

async fn element(browser: &StubBrowser, text: &str) -> ResolvedElement {
    let strategy = Strategy::free_text(text);
    let ids = browser
        .find_all(&Query::from(strategy.clone()), None)
        .await
        .unwrap();
    ResolvedElement::new(ids[0].clone(), strategy, text)
}

async fn baseline(browser: &StubBrowser) -> (ContextHandle, BTreeSet<ContextHandle>) {
    let origin = browser.current_context().await.unwrap();
    let prior = browser.open_contexts().await.unwrap().into_iter().collect();
    (origin, prior)
}

#[tokio::test]
async fn new_tab_is_detected_and_focused_after_blank_settles() {
    let browser = shop();
    let dispatcher = DefaultActionDispatcher::new(browser.clone(), timeouts());
    let observer = NavigationObserver::new(browser.clone(), timeouts());
    let link = element(&browser, "Twitter").await;
    let (origin, prior) = baseline(&browser).await;

    let (_, outcome) = assert_ok!(
        observer
            .observe(|| dispatcher.perform_click(&link), &origin, &prior)
            .await
    );

    match &outcome {
        NavigationOutcome::NewTab { handle, url } => {
            assert_ne!(handle, &origin);
            assert_eq!(url, "https://twitter.com/foo");
            assert_eq!(browser.focused().as_ref(), Some(handle));
        }
        other => panic!("expected NewTab, got {other:?}"),
    }
    assert_eq!(browser.tab_count(), 2);
}

#[tokio::test]
async fn same_tab_url_change_is_detected() {
    let browser = shop();
    let dispatcher = DefaultActionDispatcher::new(browser.clone(), timeouts());
    let observer = NavigationObserver::new(browser.clone(), timeouts());
    let link = element(&browser, "About us").await;
    let (origin, prior) = baseline(&browser).await;

    let (_, outcome) = assert_ok!(
        observer
            .observe(|| dispatcher.perform_click(&link), &origin, &prior)
            .await
    );
    assert_eq!(
        outcome,
        NavigationOutcome::SameTab {
            url: "https://shop.example.com/about".into()
        }
    );
    assert_eq!(browser.focused(), Some(origin));
}

#[tokio::test]
async fn no_navigation_is_an_outcome_not_an_error() {
    let browser = shop();
    let dispatcher = DefaultActionDispatcher::new(browser.clone(), timeouts());
    let observer = NavigationObserver::new(browser.clone(), timeouts());
    let button = element(&browser, "Filter").await;
    let (origin, prior) = baseline(&browser).await;

    let (report, outcome) = assert_ok!(
        observer
            .observe(|| dispatcher.perform_click(&button), &origin, &prior)
            .await
    );
    assert_eq!(outcome, NavigationOutcome::NoNavigation);
    assert!(!report.fallback_used);
}

#[tokio::test]
async fn trigger_failure_propagates() {
    let browser = shop();
    let observer = NavigationObserver::new(browser.clone(), timeouts());
    let (origin, prior) = baseline(&browser).await;

    let err = assert_err!(
        observer
            .observe(
                || async { Err::<(), _>(ActionError::Intercepted("overlay".into())) },
                &origin,
                &prior
            )
            .await
    );
    assert!(matches!(err, GateError::Trigger(ActionError::Intercepted(_))));
}

#[tokio::test]
async fn observation_refocuses_origin_first() {
    let browser = shop();
    let dispatcher = DefaultActionDispatcher::new(browser.clone(), timeouts());
    let observer = NavigationObserver::new(browser.clone(), timeouts());
    let twitter = element(&browser, "Twitter").await;
    let (origin, prior) = baseline(&browser).await;
    observer
        .observe(|| dispatcher.perform_click(&twitter), &origin, &prior)
        .await
        .unwrap();

    // Focus is on the new tab; a second observation with the grown baseline
    // returns to the origin before watching it.
    let grown: BTreeSet<ContextHandle> = browser.open_contexts().await.unwrap().into_iter().collect();
    let (_, outcome) = observer
        .observe(|| async { Ok::<_, ActionError>(()) }, &origin, &grown)
        .await
        .unwrap();
    assert_eq!(outcome, NavigationOutcome::NoNavigation);
    assert_eq!(browser.focused(), Some(origin));
}

#[tokio::test]
async fn new_tab_wins_over_origin_url_change() {
    let browser = Arc::new(StubBrowser::new(SHOP).page(
        SHOP,
        vec![StubElement::new("share", "button")
            .text("Share")
            .on_click(ClickBehavior::OpenTabAndNavigate(
                "https://twitter.com/share".into(),
                "/shared".into(),
            ))],
    ));
    let dispatcher = DefaultActionDispatcher::new(browser.clone(), timeouts());
    let observer = NavigationObserver::new(browser.clone(), timeouts());
    let share = element(&browser, "Share").await;
    let (origin, prior) = baseline(&browser).await;

    let (_, outcome) = assert_ok!(
        observer
            .observe(|| dispatcher.perform_click(&share), &origin, &prior)
            .await
    );

    match &outcome {
        NavigationOutcome::NewTab { handle, url } => {
            assert_ne!(handle, &origin);
            assert_eq!(url, "https://twitter.com/share");
        }
        other => panic!("expected NewTab, got {other:?}"),
    }
    assert_eq!(browser.tab_count(), 2);
}
