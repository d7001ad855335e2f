// Integration tests for ConditionPoller
//
// All timing tests run on a paused tokio clock: sleeps advance virtual time
// exactly, so elapsed-time bounds can be asserted precisely.
//
// Tests cover:
// - success lands in [t, t + poll_interval) after the condition turns true
// - timeout lands in [timeout, timeout + poll_interval), never earlier
// - malformed locators fail with zero (local) or one (driver) poll
// - try_check converts only ElementNotReady into false
// - already-satisfied waits take exactly one poll
// - condition semantics: present / visible / clickable

mod common;

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use uisync::scripted::{ElementScript, ScriptedDriver};
use uisync::{ConditionPoller, Error, Locator, WaitCondition};

fn poller(timeout_ms: u64, interval_ms: u64) -> ConditionPoller {
    ConditionPoller::new(
        Duration::from_millis(timeout_ms),
        Duration::from_millis(interval_ms),
    )
    .expect("valid timings")
}

// ============================================================================
// Timing bounds
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_returns_within_one_interval_of_becoming_visible() {
    common::init_tracing();
    let status = Locator::css("#status");
    let driver = ScriptedDriver::new().with_element(
        status.clone(),
        ElementScript::new().appears_at(Duration::from_millis(1200)),
    );

    let start = Instant::now();
    let handle = poller(5_000, 500)
        .wait_until(&driver, &status, WaitCondition::Visible)
        .await
        .expect("status becomes visible at 1.2s");
    let elapsed = start.elapsed();

    assert_eq!(handle.locator(), &status);
    assert!(
        elapsed >= Duration::from_millis(1200) && elapsed < Duration::from_millis(1700),
        "returned at {:?}",
        elapsed
    );
    // Polls at 0, 0.5, 1.0, 1.5
    assert_eq!(driver.find_calls(&status), 4);
}

#[tokio::test(start_paused = true)]
async fn test_times_out_within_one_interval_of_deadline() {
    common::init_tracing();
    let status = Locator::css("#status");
    let driver = ScriptedDriver::new();

    let start = Instant::now();
    let result = poller(2_000, 500)
        .wait_until(&driver, &status, WaitCondition::Visible)
        .await;
    let elapsed = start.elapsed();

    match result {
        Err(Error::ElementNotReady {
            locator,
            condition,
            timeout,
        }) => {
            assert_eq!(locator, status);
            assert_eq!(condition, WaitCondition::Visible);
            assert_eq!(timeout, Duration::from_secs(2));
        }
        other => panic!("expected ElementNotReady, got {:?}", other),
    }
    assert!(
        elapsed >= Duration::from_millis(2000) && elapsed < Duration::from_millis(2500),
        "timed out at {:?}",
        elapsed
    );
}

#[tokio::test(start_paused = true)]
async fn test_timing_bounds_hold_for_uneven_intervals() {
    // (appears_at, interval, timeout): interval does not divide timeout
    let cases = [(0, 300, 1_000), (650, 300, 1_000), (999, 300, 1_000), (2_500, 700, 2_000)];

    for (appears_at, interval, timeout) in cases {
        let locator = Locator::css("#late");
        let driver = ScriptedDriver::new().with_element(
            locator.clone(),
            ElementScript::new().appears_at(Duration::from_millis(appears_at)),
        );

        let start = Instant::now();
        let result = poller(timeout, interval)
            .wait_until(&driver, &locator, WaitCondition::Present)
            .await;
        let elapsed = start.elapsed();

        let (lower, upper) = if appears_at <= timeout {
            assert!(result.is_ok(), "case {:?}: {:?}", (appears_at, interval, timeout), result);
            (appears_at, appears_at + interval)
        } else {
            assert!(matches!(result, Err(Error::ElementNotReady { .. })));
            (timeout, timeout + interval)
        };
        assert!(
            elapsed >= Duration::from_millis(lower) && elapsed < Duration::from_millis(upper),
            "case {:?}: finished at {:?}",
            (appears_at, interval, timeout),
            elapsed
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_condition_met_exactly_at_deadline_succeeds() {
    let locator = Locator::css("#edge");
    let driver = ScriptedDriver::new().with_element(
        locator.clone(),
        ElementScript::new().appears_at(Duration::from_millis(1000)),
    );

    // Last sleep is clamped so the final poll happens at the deadline
    let result = poller(1_000, 300)
        .wait_until(&driver, &locator, WaitCondition::Present)
        .await;
    assert!(result.is_ok(), "{:?}", result);
}

// ============================================================================
// Malformed locators and driver failures
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_invalid_xpath_fails_immediately_without_polling() {
    let broken = Locator::xpath("//div[@data-testid='data-source-card'");
    let driver = ScriptedDriver::new();

    let start = Instant::now();
    let result = poller(5_000, 500)
        .wait_until(&driver, &broken, WaitCondition::Clickable)
        .await;

    assert!(matches!(result, Err(Error::MalformedLocator { .. })));
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(driver.total_find_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_path_characters_inside_string_literals_are_not_malformed() {
    let locator = Locator::xpath("//a[@href='file:///tmp' and text()='[]']");
    let driver = ScriptedDriver::new().with_element(
        locator.clone(),
        ElementScript::new().appears_at(Duration::from_millis(300)),
    );

    poller(1_000, 100)
        .wait_until(&driver, &locator, WaitCondition::Visible)
        .await
        .expect("quoted '[]' and '///' are plain text");
    assert_eq!(driver.find_calls(&locator), 4);
}

#[tokio::test(start_paused = true)]
async fn test_driver_rejected_selector_is_not_retried() {
    let locator = Locator::css("div:unknown-pseudo");
    let driver = ScriptedDriver::new();
    driver.reject_selector(locator.expression());

    let start = Instant::now();
    let result = poller(5_000, 500)
        .wait_until(&driver, &locator, WaitCondition::Present)
        .await;

    assert!(matches!(result, Err(Error::MalformedLocator { .. })));
    assert_eq!(driver.find_calls(&locator), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_driver_communication_error_passes_through_mid_wait() {
    let locator = Locator::css("#status");
    let driver = Arc::new(ScriptedDriver::new());

    let background = Arc::clone(&driver);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        background.disconnect();
    });

    let start = Instant::now();
    let result = poller(5_000, 500)
        .wait_until(driver.as_ref(), &locator, WaitCondition::Visible)
        .await;

    assert!(matches!(result, Err(Error::DriverCommunication(_))), "{:?}", result);
    // First poll after the disconnect (1.5s) fails; no retries after that
    assert!(start.elapsed() < Duration::from_millis(2_000));
    assert_eq!(driver.find_calls(&locator), 3);
}

#[tokio::test]
async fn test_invalid_timings_rejected_before_polling() {
    let locator = Locator::css("#status");
    let driver = ScriptedDriver::new();

    let inverted = ConditionPoller::default()
        .with_timeout(Duration::from_millis(100))
        .with_poll_interval(Duration::from_millis(500));
    let result = inverted
        .wait_until(&driver, &locator, WaitCondition::Present)
        .await;

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert_eq!(driver.total_find_calls(), 0);
}

// ============================================================================
// try_check
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_try_check_maps_only_timeout_to_false() {
    let banner = Locator::css("[data-testid='data-testid Panel status error']");
    let driver = ScriptedDriver::new();
    let poller = poller(1_000, 250);

    // Absent: false, not an error
    let start = Instant::now();
    assert!(!poller
        .try_check(&driver, &banner, WaitCondition::Visible)
        .await
        .unwrap());
    assert!(start.elapsed() >= Duration::from_secs(1));

    // Present: true
    driver.add_element(banner.clone(), ElementScript::new());
    assert!(poller
        .try_check(&driver, &banner, WaitCondition::Visible)
        .await
        .unwrap());

    // Malformed: re-raised
    let result = poller
        .try_check(&driver, &Locator::xpath("//*[text()='No data'"), WaitCondition::Visible)
        .await;
    assert!(matches!(result, Err(Error::MalformedLocator { .. })));

    // Driver failure: re-raised unchanged
    driver.disconnect();
    let result = poller
        .try_check(&driver, &banner, WaitCondition::Visible)
        .await;
    match result {
        Err(Error::DriverCommunication(message)) => {
            assert_eq!(message, "scripted session was disconnected");
        }
        other => panic!("expected DriverCommunication, got {:?}", other),
    }
}

// ============================================================================
// Idempotence and condition semantics
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_already_satisfied_condition_takes_one_poll_each_time() {
    let button = Locator::css("#apply");
    let driver = ScriptedDriver::new().with_element(button.clone(), ElementScript::new());
    let poller = poller(5_000, 500);

    let start = Instant::now();
    for expected_calls in 1..=2 {
        poller
            .wait_until(&driver, &button, WaitCondition::Clickable)
            .await
            .expect("already clickable");
        assert_eq!(driver.find_calls(&button), expected_calls);
    }
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_present_does_not_require_visibility() {
    let textarea = Locator::css("[class='inputarea monaco-mouse-cursor-text']");
    let driver =
        ScriptedDriver::new().with_element(textarea.clone(), ElementScript::new().hidden());
    let poller = poller(1_000, 100);

    assert!(poller
        .wait_until(&driver, &textarea, WaitCondition::Present)
        .await
        .is_ok());
    assert!(!poller
        .try_check(&driver, &textarea, WaitCondition::Visible)
        .await
        .unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_clickable_waits_for_enabled_and_unobscured() {
    let button = Locator::css("#save");
    let driver = ScriptedDriver::new().with_element(
        button.clone(),
        ElementScript::new()
            .enabled_at(Duration::from_millis(400))
            .obscured_until(Duration::from_millis(900)),
    );
    let poller = poller(2_000, 100);

    let start = Instant::now();
    poller
        .wait_until(&driver, &button, WaitCondition::Visible)
        .await
        .unwrap();
    assert_eq!(start.elapsed(), Duration::ZERO);

    poller
        .wait_until(&driver, &button, WaitCondition::Clickable)
        .await
        .unwrap();
    let elapsed = start.elapsed();
    assert!(
        elapsed >= Duration::from_millis(900) && elapsed < Duration::from_millis(1_000),
        "clickable at {:?}",
        elapsed
    );
}

#[tokio::test(start_paused = true)]
async fn test_disabled_element_never_clickable() {
    let button = Locator::css("#save");
    let driver =
        ScriptedDriver::new().with_element(button.clone(), ElementScript::new().disabled());

    let err = poller(500, 100)
        .wait_until(&driver, &button, WaitCondition::Clickable)
        .await
        .unwrap_err();
    assert!(err.is_not_ready());
    assert_eq!(
        err.to_string(),
        "Element 'css=#save' was not clickable after 500ms"
    );
}
