// Suite configuration
//
// Timing and artifact settings shared by every step of a run. Values come
// from, in increasing precedence: defaults, an optional JSON file, and
// `UISYNC_*` environment variables.

use crate::error::{Error, Result};
use crate::poller::ConditionPoller;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable overriding `base_url`
pub const ENV_BASE_URL: &str = "UISYNC_BASE_URL";
/// Environment variable overriding `timeout_ms`
pub const ENV_TIMEOUT_MS: &str = "UISYNC_TIMEOUT_MS";
/// Environment variable overriding `poll_interval_ms`
pub const ENV_POLL_INTERVAL_MS: &str = "UISYNC_POLL_INTERVAL_MS";
/// Environment variable overriding `action_delay_ms`
pub const ENV_ACTION_DELAY_MS: &str = "UISYNC_ACTION_DELAY_MS";
/// Environment variable overriding `screenshot_dir`
pub const ENV_SCREENSHOT_DIR: &str = "UISYNC_SCREENSHOT_DIR";
/// Environment variable overriding `screenshot_on_failure`
pub const ENV_SCREENSHOT_ON_FAILURE: &str = "UISYNC_SCREENSHOT_ON_FAILURE";

const DEFAULT_BASE_URL: &str = "http://localhost:3000/";

/// Settings for a test run
///
/// # Example
///
/// ```ignore
/// use uisync::SuiteConfig;
///
/// let config = SuiteConfig::from_env()?
///     .timeout_ms(10_000)
///     .screenshot_dir("target/screenshots");
/// let poller = config.poller()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuiteConfig {
    /// Root URL of the application under test
    pub base_url: Url,

    /// Deadline for every element wait, in milliseconds
    pub timeout_ms: u64,

    /// Interval between polls, in milliseconds
    pub poll_interval_ms: u64,

    /// Settle time around steps wrapped in `Session::delay`, in milliseconds
    pub action_delay_ms: u64,

    /// Directory receiving screenshot artifacts
    pub screenshot_dir: PathBuf,

    /// Capture a page screenshot when a step fails
    pub screenshot_on_failure: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout_ms: crate::poller::DEFAULT_WAIT_TIMEOUT.as_millis() as u64,
            poll_interval_ms: crate::poller::DEFAULT_POLL_INTERVAL.as_millis() as u64,
            action_delay_ms: 500,
            screenshot_dir: PathBuf::from("./screenshots"),
            screenshot_on_failure: true,
        }
    }
}

impl SuiteConfig {
    /// Creates a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `UISYNC_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Loads a JSON file, then applies environment overrides.
    ///
    /// Missing keys in the file keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::from(e).context(format!("reading {}", path.display())))?;
        let config: SuiteConfig = serde_json::from_str(&raw)
            .map_err(|e| Error::from(e).context(format!("parsing {}", path.display())))?;
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup` (an environment accessor).
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        if let Some(value) = lookup(ENV_BASE_URL) {
            self.base_url = Url::parse(&value)
                .map_err(|e| Error::Config(format!("{}={:?}: {}", ENV_BASE_URL, value, e)))?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = parse_env(ENV_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_POLL_INTERVAL_MS) {
            self.poll_interval_ms = parse_env(ENV_POLL_INTERVAL_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_ACTION_DELAY_MS) {
            self.action_delay_ms = parse_env(ENV_ACTION_DELAY_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_SCREENSHOT_DIR) {
            self.screenshot_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_SCREENSHOT_ON_FAILURE) {
            self.screenshot_on_failure = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(Error::Config(format!(
                        "{}={:?}: expected a boolean",
                        ENV_SCREENSHOT_ON_FAILURE, value
                    )));
                }
            };
        }
        Ok(self)
    }

    /// Set the application root URL
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Set the wait timeout in milliseconds
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the poll interval in milliseconds
    pub fn poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the settle time used by `Session::delay` in milliseconds
    pub fn action_delay_ms(mut self, action_delay_ms: u64) -> Self {
        self.action_delay_ms = action_delay_ms;
        self
    }

    /// Set the screenshot directory
    pub fn screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Enable or disable failure screenshots
    pub fn screenshot_on_failure(mut self, enabled: bool) -> Self {
        self.screenshot_on_failure = enabled;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn action_delay(&self) -> Duration {
        Duration::from_millis(self.action_delay_ms)
    }

    /// Builds the poller for these timings, validating them.
    pub fn poller(&self) -> Result<ConditionPoller> {
        ConditionPoller::new(self.timeout(), self.poll_interval())
    }
}

fn parse_env(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{}={:?}: {}", key, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.action_delay(), Duration::from_millis(500));
        assert_eq!(config.screenshot_dir, PathBuf::from("./screenshots"));
        assert!(config.screenshot_on_failure);
        assert!(config.poller().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = SuiteConfig::default()
            .with_env_overrides(env(&[
                (ENV_BASE_URL, "http://grafana:3000/"),
                (ENV_TIMEOUT_MS, "5000"),
                (ENV_POLL_INTERVAL_MS, " 250 "),
                (ENV_ACTION_DELAY_MS, "0"),
                (ENV_SCREENSHOT_DIR, "/tmp/shots"),
                (ENV_SCREENSHOT_ON_FAILURE, "off"),
            ]))
            .unwrap();

        assert_eq!(config.base_url.as_str(), "http://grafana:3000/");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.action_delay(), Duration::ZERO);
        assert_eq!(config.screenshot_dir, PathBuf::from("/tmp/shots"));
        assert!(!config.screenshot_on_failure);
    }

    #[test]
    fn test_env_override_errors() {
        let err = SuiteConfig::default()
            .with_env_overrides(env(&[(ENV_TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains(ENV_TIMEOUT_MS));

        let err = SuiteConfig::default()
            .with_env_overrides(env(&[(ENV_SCREENSHOT_ON_FAILURE, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = SuiteConfig::default()
            .with_env_overrides(env(&[(ENV_BASE_URL, "not a url")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SuiteConfig =
            serde_json::from_str(r#"{"timeoutMs": 2000, "screenshotDir": "shots"}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(2));
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.screenshot_dir, PathBuf::from("shots"));
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.json");
        let config = SuiteConfig::new().timeout_ms(4000).poll_interval_ms(200);
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = SuiteConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded.timeout_ms, 4000);
        assert_eq!(loaded.poll_interval_ms, 200);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = SuiteConfig::from_json_file("/nonexistent/suite.json").unwrap_err();
        assert!(err.to_string().contains("reading /nonexistent/suite.json"));
    }

    #[test]
    fn test_invalid_timings_rejected_by_poller() {
        let config = SuiteConfig::new().timeout_ms(100).poll_interval_ms(500);
        assert!(matches!(config.poller(), Err(Error::InvalidArgument(_))));
    }
}
