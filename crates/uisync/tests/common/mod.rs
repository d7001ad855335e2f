// Shared helpers for integration tests
//
// Each test binary compiles this module separately and uses a different
// subset of it.
#![allow(dead_code)]

use std::path::Path;
use uisync::scripted::ScriptedDriver;
use uisync::{Session, SuiteConfig};

pub fn init_tracing() {
    uisync::logging::init_tracing();
}

/// Fast timings, no settle delay, no failure screenshots.
pub fn test_config(screenshot_dir: &Path) -> SuiteConfig {
    SuiteConfig::new()
        .timeout_ms(2_000)
        .poll_interval_ms(100)
        .action_delay_ms(0)
        .screenshot_dir(screenshot_dir)
        .screenshot_on_failure(false)
}

/// Session over `driver` that never writes artifacts.
pub fn session(driver: ScriptedDriver) -> Session<ScriptedDriver> {
    let dir = std::env::temp_dir().join("uisync-tests-unused");
    Session::new(driver, test_config(&dir)).expect("valid test config")
}

/// Session over `driver` with a custom configuration.
pub fn session_with(driver: ScriptedDriver, config: SuiteConfig) -> Session<ScriptedDriver> {
    Session::new(driver, config).expect("valid test config")
}
