// Integration tests for locate-then-act operations
//
// Covers:
// - click_first_match: shared budget bound, fallback order, error contents
// - click_if_present: optional-step contract
// - type_into: clear + keys + tab-out commit
// - hover: hover-revealed elements become locatable

use domwait::mock::{MockNode, ScriptedDriver};
use domwait::{Error, Locator, Session, WaitSpec};
use std::time::{Duration, Instant};

fn fast_session(driver: ScriptedDriver) -> Session<ScriptedDriver> {
    Session::new(driver)
        .with_wait(
            WaitSpec::new()
                .with_timeout(Duration::from_millis(300))
                .with_poll_interval(Duration::from_millis(10)),
        )
        .with_settle(Duration::from_millis(1))
}

#[tokio::test]
async fn click_first_match_never_exceeds_the_shared_budget() {
    let session = fast_session(ScriptedDriver::new());
    let budget = Duration::from_millis(150);

    // Ten candidates, none present. A fresh timeout per candidate would
    // block for 1.5s; the shared budget must bound the whole call.
    let candidates: Vec<Locator> = (0..10).map(|i| Locator::text(format!("nope-{i}"))).collect();

    let start = Instant::now();
    let err = session
        .click_first_match(&candidates, budget)
        .await
        .expect_err("nothing matches");
    let elapsed = start.elapsed();

    assert!(
        elapsed < budget + Duration::from_millis(100),
        "blocked {elapsed:?} against a {budget:?} budget"
    );
    match err {
        Error::AllCandidatesFailed {
            candidates: named, ..
        } => assert_eq!(named.len(), 10),
        other => panic!("expected AllCandidatesFailed, got {other:?}"),
    }

    session.quit().await.unwrap();
}

#[tokio::test]
async fn click_first_match_falls_through_to_a_later_candidate() {
    let driver = ScriptedDriver::new();
    driver.add_node(MockNode::new("deposit-alt").text("Deposits"));
    let session = fast_session(driver.clone());

    session
        .click_first_match(
            &[Locator::text("Deposit"), Locator::text("Deposits")],
            Duration::from_millis(400),
        )
        .await
        .expect("second candidate should absorb the remaining budget");
    assert_eq!(driver.clicked_ids(), vec!["deposit-alt".to_string()]);

    session.quit().await.unwrap();
}

#[tokio::test]
async fn click_first_match_prefers_the_earliest_candidate() {
    let driver = ScriptedDriver::new();
    driver.add_node(MockNode::new("primary").text("Actions"));
    driver.add_node(MockNode::new("shouty").text("ACTIONS"));
    let session = fast_session(driver.clone());

    session
        .click_first_match(
            &[Locator::text("Actions"), Locator::text("ACTIONS")],
            Duration::from_millis(200),
        )
        .await
        .unwrap();
    assert_eq!(driver.clicked_ids(), vec!["primary".to_string()]);

    session.quit().await.unwrap();
}

#[tokio::test]
async fn click_if_present_reports_skipped_optional_steps() {
    let driver = ScriptedDriver::new();
    driver.add_node(MockNode::new("approve").text("Approve"));
    let session = fast_session(driver.clone());

    let clicked = session
        .click_if_present(&Locator::text("Approve"), Duration::from_millis(100))
        .await
        .unwrap();
    assert!(clicked);

    let clicked = session
        .click_if_present(&Locator::text("Confirm"), Duration::from_millis(50))
        .await
        .unwrap();
    assert!(!clicked, "absent optional element is a skip, not a failure");

    assert_eq!(driver.clicked_ids(), vec!["approve".to_string()]);

    session.quit().await.unwrap();
}

#[tokio::test]
async fn type_into_replaces_content_and_commits_with_tab() {
    let driver = ScriptedDriver::new();
    driver.add_node(
        MockNode::new("amount")
            .matches(r#"input[type="number"]"#)
            .text(""),
    );
    let session = fast_session(driver.clone());

    session
        .type_into(&Locator::css(r#"input[type="number"]"#), "10000")
        .await
        .unwrap();

    assert_eq!(driver.input_value("amount").as_deref(), Some("10000"));
    // The tab-out commit is what fires blur/change listeners downstream.
    assert_eq!(driver.committed_ids(), vec!["amount".to_string()]);

    session.quit().await.unwrap();
}

#[tokio::test]
async fn type_into_first_match_walks_input_fallbacks() {
    let driver = ScriptedDriver::new();
    driver.add_node(MockNode::new("qty").matches("input"));
    let session = fast_session(driver.clone());

    session
        .type_into_first_match(
            &[
                Locator::css(r#"input[type="number"]"#),
                Locator::css(r#"input[placeholder*="amount" i]"#),
                Locator::css("input"),
            ],
            Duration::from_millis(300),
            "42",
        )
        .await
        .unwrap();
    assert_eq!(driver.input_value("qty").as_deref(), Some("42"));

    session.quit().await.unwrap();
}

#[tokio::test]
async fn hover_reveals_elements_no_click_locator_can_find() {
    let driver = ScriptedDriver::new();
    driver.add_node(MockNode::new("view-icon").matches(r#"[class*="icon"]"#));
    driver.add_node(
        MockNode::new("tooltip")
            .text("Community")
            .revealed_by_hover_of("view-icon"),
    );
    let session = fast_session(driver.clone());

    // Invisible until its anchor is hovered.
    let before = session
        .try_locate(&Locator::text("Community"), Duration::from_millis(50))
        .await
        .unwrap();
    assert!(before.is_none());

    session
        .hover(
            &Locator::css(r#"[class*="icon"]"#),
            Duration::from_millis(100),
        )
        .await
        .unwrap();

    let after = session
        .try_locate(&Locator::text("Community"), Duration::from_millis(100))
        .await
        .unwrap();
    assert!(after.is_some(), "tooltip should be visible while hovered");

    session.quit().await.unwrap();
}
