use std::sync::Arc;
use std::time::Duration;

use action_flow::{DefaultScenarioExecutor, FlowError, ScenarioExecutor, ScenarioOutcome, SkipReason};
use action_primitives::Timeouts;
use tokio_test::{assert_err, assert_ok};
use waypoint_core_types::ContextHandle;
use webdriver_adapter::stub::{ClickBehavior, StubBrowser, StubElement};

const HOME: &str = "https://shop.example.com/";

fn timeouts() -> Timeouts {
    Timeouts::uniform(Duration::from_millis(40), Duration::from_millis(5))
}

fn storefront() -> Arc<StubBrowser> {
    Arc::new(StubBrowser::new("about:blank").page(
        HOME,
        vec![
            StubElement::link("top", "#top", "Back to top"),
            StubElement::link("about", "/about", "About"),
            StubElement::link("blog", "https://blog.example.com/", "Blog"),
            StubElement::link("twitter", "https://twitter.com/shop", "Twitter").attr("target", "_blank"),
            StubElement::link("facebook", "https://www.facebook.com/shop", "Facebook"),
            StubElement::link("mail", "mailto:help@example.com", "Help"),
            StubElement::link("twitter-footer", "https://twitter.com/shop", "Follow us")
                .attr("target", "_blank"),
            StubElement::link("github", "https://github.com/shop", "Source").hidden(),
            StubElement::link("broken", "https://status.vendor.io/", "Status")
                .on_click(ClickBehavior::Nothing),
        ],
    ))
}

#[tokio::test]
async fn sweep_checks_each_distinct_external_link() {
    let browser = storefront();
    let exec = DefaultScenarioExecutor::new(browser.clone(), timeouts());

    let report = assert_ok!(exec.verify_all_external_links(HOME).await);

    let names: Vec<&str> = report.links.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "external link 'https://twitter.com/shop'",
            "external link 'https://www.facebook.com/shop'",
            "external link 'https://github.com/shop'",
            "external link 'https://status.vendor.io/'",
        ]
    );
    assert_eq!(report.passed(), 2);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.failed(), 1);
    assert!(report.has_failures());
    assert_eq!(report.links[2].outcome, ScenarioOutcome::Skipped(SkipReason::Absent));

    assert_eq!(browser.tab_count(), 1);
    assert_eq!(browser.focused(), Some(ContextHandle::new("tab-1")));
    assert_eq!(browser.url_now().as_deref(), Some(HOME));
}

#[tokio::test]
async fn sweep_uses_destination_domain_as_expectation() {
    let browser = storefront();
    let exec = DefaultScenarioExecutor::new(browser.clone(), timeouts());

    let report = exec.verify_all_external_links(HOME).await.unwrap();
    let facebook = &report.links[1];
    let verdict = facebook.verdict.as_ref().unwrap();
    assert_eq!(verdict.registrable_domain, "facebook.com");
    assert!(verdict.matches_expected);
    assert_eq!(report.application_origin, HOME);
}

#[tokio::test]
async fn failed_restoration_ends_the_sweep() {
    let browser = Arc::new(
        StubBrowser::new("about:blank")
            .page(
                HOME,
                vec![
                    StubElement::link("facebook", "https://www.facebook.com/shop", "Facebook"),
                    StubElement::link("twitter", "https://twitter.com/shop", "Twitter")
                        .attr("target", "_blank"),
                ],
            )
            .loading(HOME),
    );
    let exec = DefaultScenarioExecutor::new(browser.clone(), timeouts());

    let err = assert_err!(exec.verify_all_external_links(HOME).await);

    assert!(matches!(err, FlowError::RestoreFailed(_)));
    assert_eq!(browser.call_count("click:facebook"), 1);
    assert_eq!(browser.call_count("click:twitter"), 0);
}
