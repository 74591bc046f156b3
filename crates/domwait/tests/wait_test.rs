// Integration tests for the wait engine against the scripted driver
//
// Covers:
// - locate: late-appearing elements resolve, absent elements time out
// - locate_visible: presence alone is not enough
// - try_locate: absence is Ok(None), never an error
// - switch_to_new_window: strict baseline-exceeded semantics

use domwait::mock::{MockNode, MockWindow, ScriptedDriver};
use domwait::{Error, Locator, Session, WaitSpec};
use std::time::{Duration, Instant};

fn fast_session(driver: ScriptedDriver) -> Session<ScriptedDriver> {
    // Polling traces help when a wait test hangs; ok if already set.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    Session::new(driver)
        .with_wait(
            WaitSpec::new()
                .with_timeout(Duration::from_millis(300))
                .with_poll_interval(Duration::from_millis(10)),
        )
        .with_settle(Duration::from_millis(1))
}

#[tokio::test]
async fn locate_resolves_an_element_that_appears_late() {
    let driver = ScriptedDriver::new();
    driver.add_node(
        MockNode::new("banner")
            .text("Welcome")
            .appears_after(Duration::from_millis(60)),
    );
    let session = fast_session(driver);

    let element = session
        .locate(&Locator::text("Welcome"), Duration::from_millis(500))
        .await
        .expect("element should appear before the deadline");
    assert_eq!(element.id(), "banner");

    session.quit().await.unwrap();
}

#[tokio::test]
async fn locate_times_out_on_absent_element() {
    let session = fast_session(ScriptedDriver::new());

    let err = session
        .locate(&Locator::text("Ghost"), Duration::from_millis(80))
        .await
        .expect_err("nothing matches");
    match err {
        Error::Timeout { what, .. } => assert!(what.contains("Ghost")),
        other => panic!("expected Timeout, got {other:?}"),
    }

    session.quit().await.unwrap();
}

#[tokio::test]
async fn locate_visible_skips_hidden_elements() {
    let driver = ScriptedDriver::new();
    driver.add_node(MockNode::new("hidden").text("Deposit").hidden());
    let session = fast_session(driver);

    // Present in the tree, so a bare locate finds it...
    session
        .locate(&Locator::text("Deposit"), Duration::from_millis(50))
        .await
        .expect("present in the DOM");

    // ...but the visibility-requiring wait must not.
    let err = session
        .locate_visible(&Locator::text("Deposit"), Duration::from_millis(50))
        .await
        .expect_err("never displayed");
    assert!(matches!(err, Error::Timeout { .. }));

    session.quit().await.unwrap();
}

#[tokio::test]
async fn try_locate_returns_none_on_absence() {
    let session = fast_session(ScriptedDriver::new());

    let found = session
        .try_locate(&Locator::text("Optional dialog"), Duration::from_millis(50))
        .await
        .expect("absence is not an error");
    assert!(found.is_none());

    session.quit().await.unwrap();
}

#[tokio::test]
async fn locate_any_returns_first_matching_candidate() {
    let driver = ScriptedDriver::new();
    driver.add_node(MockNode::new("assets").text("Assets"));
    let session = fast_session(driver);

    let element = session
        .locate_any(
            &[
                Locator::text("Compose Assets"),
                Locator::text("Assets"),
                Locator::text("Views"),
            ],
            Duration::from_millis(200),
        )
        .await
        .expect("second candidate matches");
    assert_eq!(element.id(), "assets");

    session.quit().await.unwrap();
}

#[tokio::test]
async fn switch_to_new_window_waits_for_the_popup() {
    let driver = ScriptedDriver::new();
    driver.open_window_after(
        Duration::from_millis(60),
        MockWindow::new("w-popup", "MetaMask Notification", "chrome-extension://abc"),
    );
    let session = fast_session(driver.clone());

    let baseline = session.window_handles().await.unwrap().len();
    assert_eq!(baseline, 1);

    let handle = session
        .switch_to_new_window(baseline, Duration::from_millis(500))
        .await
        .expect("popup should be detected");
    assert_eq!(handle, "w-popup");
    assert_eq!(session.current_window().await.unwrap(), "w-popup");
    assert_eq!(session.title().await.unwrap(), "MetaMask Notification");

    session.quit().await.unwrap();
}

#[tokio::test]
async fn switch_to_new_window_times_out_when_no_window_opens() {
    let session = fast_session(ScriptedDriver::new());

    let baseline = session.window_handles().await.unwrap().len();
    let start = Instant::now();
    let err = session
        .switch_to_new_window(baseline, Duration::from_millis(100))
        .await
        .expect_err("no window ever opens; a false positive here hides real failures");
    assert!(matches!(err, Error::Timeout { .. }));
    assert!(start.elapsed() >= Duration::from_millis(100));

    // Focus must still be on the original window.
    assert_eq!(session.current_window().await.unwrap(), "w-main");

    session.quit().await.unwrap();
}
