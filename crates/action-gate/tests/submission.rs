use std::sync::Arc;
use std::time::Duration;

use action_gate::{Expectation, SubmissionOutcome, SubmissionProbe, SubmissionSignals};
use action_locator::{DefaultElementResolver, LocatorSpec};
use action_primitives::Timeouts;
use tokio_test::assert_ok;
use waypoint_core_types::Strategy;
use webdriver_adapter::stub::{ClickBehavior, StubBrowser, StubElement};
use webdriver_adapter::{BrowserDriver, Query};

const FORM: &str = "https://demo.example.com/contact";
const THANKS: &str = "https://demo.example.com/thanks";

fn timeouts() -> Timeouts {
    Timeouts::uniform(Duration::from_millis(40), Duration::from_millis(5))
}

fn probe(browser: Arc<StubBrowser>) -> SubmissionProbe {
    let t = timeouts();
    let resolver = Arc::new(DefaultElementResolver::new(browser.clone(), &t));
    SubmissionProbe::new(browser, resolver, t)
}

fn contact_form(email: StubElement, submit: ClickBehavior) -> Arc<StubBrowser> {
    Arc::new(
        StubBrowser::new(FORM)
            .page(
                FORM,
                vec![
                    email,
                    StubElement::new("send", "button")
                        .attr("type", "submit")
                        .text("Send")
                        .on_click(submit),
                    StubElement::new("error", "div")
                        .attr("class", "alert-danger")
                        .text("Please fix the errors")
                        .hidden(),
                ],
            )
            .page(
                THANKS,
                vec![StubElement::new("done", "h1").text("Thank you for your message")],
            ),
    )
}

fn signals() -> SubmissionSignals {
    SubmissionSignals {
        success: vec![LocatorSpec::new(
            "thank-you banner",
            vec![Strategy::free_text("Thank you")],
        )],
        error: vec![LocatorSpec::attribute("class", "alert-danger")],
        validated_fields: vec![LocatorSpec::by_name("email")],
    }
}

async fn submit(browser: &StubBrowser) {
    let ids = browser
        .find_all(&Query::from(Strategy::attribute("type", "submit")), None)
        .await
        .unwrap();
    browser.click(&ids[0]).await.unwrap();
}

#[tokio::test]
async fn invalid_email_reports_native_invalid() {
    let browser = contact_form(
        StubElement::input("email", "email").attr("value", "not-an-email"),
        ClickBehavior::Nothing,
    );
    submit(&browser).await;

    let outcome = assert_ok!(probe(browser).await_outcome(FORM, &signals()).await);
    assert_eq!(outcome, SubmissionOutcome::NativeInvalid { field: "[name='email']".into() });
    assert!(Expectation::ValidationError.accepts(&outcome));
}

#[tokio::test]
async fn visible_error_indicator_wins_over_validity() {
    let browser = contact_form(
        StubElement::input("email", "email").attr("value", "bad"),
        ClickBehavior::Reveal(vec!["error".into()]),
    );
    submit(&browser).await;

    let outcome = assert_ok!(probe(browser).await_outcome(FORM, &signals()).await);
    assert!(matches!(outcome, SubmissionOutcome::ErrorIndicator { .. }));
}

#[tokio::test]
async fn unchanged_url_after_bound_is_retention() {
    let browser = contact_form(
        StubElement::input("email", "email").attr("value", "a@b.c"),
        ClickBehavior::Nothing,
    );
    submit(&browser).await;

    let outcome = assert_ok!(probe(browser).await_outcome(FORM, &signals()).await);
    assert_eq!(outcome, SubmissionOutcome::UrlRetained { url: FORM.into() });
    assert!(!Expectation::Success.accepts(&outcome));
}

#[tokio::test]
async fn success_indicator_on_destination_page() {
    let browser = contact_form(
        StubElement::input("email", "email").attr("value", "a@b.c"),
        ClickBehavior::Navigate(THANKS.into()),
    );
    submit(&browser).await;

    let outcome = assert_ok!(probe(browser).await_outcome(FORM, &signals()).await);
    match &outcome {
        SubmissionOutcome::SuccessIndicator { strategy, .. } => {
            assert_eq!(strategy, &Strategy::free_text("Thank you"));
        }
        other => panic!("expected success indicator, got {other:?}"),
    }
    assert!(Expectation::Success.accepts(&outcome));
}

#[tokio::test]
async fn leaving_the_form_without_success_specs_is_navigation() {
    let browser = contact_form(
        StubElement::input("email", "email").attr("value", "a@b.c"),
        ClickBehavior::Navigate(THANKS.into()),
    );
    submit(&browser).await;

    let signals = SubmissionSignals {
        success: vec![],
        ..signals()
    };
    let outcome = assert_ok!(probe(browser).await_outcome(FORM, &signals).await);
    assert_eq!(outcome, SubmissionOutcome::Navigated { url: THANKS.into() });
}
