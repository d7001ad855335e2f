// Error types for uisync

use crate::condition::WaitCondition;
use crate::locator::Locator;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for uisync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synchronizing with and driving the UI
#[derive(Debug, Error)]
pub enum Error {
    /// Locator expression cannot compile for its strategy
    ///
    /// Raised before the first poll (local syntax check) or by the driver on
    /// lookup. Never retried: the same expression can never succeed.
    #[error("Malformed locator '{locator}': {reason}")]
    MalformedLocator { locator: String, reason: String },

    /// Element did not reach the requested condition before the deadline
    ///
    /// Contains everything needed to diagnose the wait without driver
    /// internals: what was looked up, what state it had to reach, and for how
    /// long it was polled.
    #[error("Element '{locator}' was not {condition} after {timeout:?}")]
    ElementNotReady {
        locator: Locator,
        condition: WaitCondition,
        timeout: Duration,
    },

    /// Automation channel failure (session dropped, browser crashed, ...)
    ///
    /// Passed through unchanged; never retried by the poller.
    #[error("Driver communication error: {0}")]
    DriverCommunication(String),

    /// Invalid argument provided to method
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A step-level expectation did not hold
    #[error("Step failed: {0}")]
    StepFailed(String),

    /// A named step failed
    ///
    /// Produced by `Session::step`; the innermost failing step wraps the
    /// cause, enclosing steps pass it through.
    #[error("Step '{step}' failed: {source}")]
    Step {
        step: String,
        #[source]
        source: Box<Error>,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL could not be parsed or joined
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Innermost error behind `Context` and `Step` wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Context(_, inner) => inner.root_cause(),
            Error::Step { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Returns true if a named step already reported this failure.
    ///
    /// Looks through `Context` wrappers.
    pub fn is_step_failure(&self) -> bool {
        match self {
            Error::Step { .. } => true,
            Error::Context(_, inner) => inner.is_step_failure(),
            _ => false,
        }
    }

    /// Returns true if this is (or wraps) an `ElementNotReady` timeout.
    pub fn is_not_ready(&self) -> bool {
        matches!(self.root_cause(), Error::ElementNotReady { .. })
    }

    /// Returns true if this is (or wraps) a `MalformedLocator`.
    pub fn is_malformed_locator(&self) -> bool {
        matches!(self.root_cause(), Error::MalformedLocator { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_message_names_locator_condition_and_timeout() {
        let err = Error::ElementNotReady {
            locator: Locator::css("#status"),
            condition: WaitCondition::Visible,
            timeout: Duration::from_secs(2),
        };
        assert_eq!(
            err.to_string(),
            "Element 'css=#status' was not visible after 2s"
        );
    }

    #[test]
    fn test_context_is_transparent_to_kind_checks() {
        let err = Error::ElementNotReady {
            locator: Locator::xpath("//button"),
            condition: WaitCondition::Clickable,
            timeout: Duration::from_millis(500),
        }
        .context("clicking apply button");

        assert!(err.is_not_ready());
        assert!(!err.is_malformed_locator());
        assert!(err.to_string().starts_with("clicking apply button: "));

        let err = Error::DriverCommunication("session closed".into()).context("step");
        assert!(!err.is_not_ready());
        assert!(!err.is_step_failure());
    }

    #[test]
    fn test_step_failure_found_behind_context() {
        let err = Error::Step {
            step: "inner".to_string(),
            source: Box::new(Error::StepFailed("boom".to_string())),
        };
        assert!(err.is_step_failure());

        let err = err.context("opening editor").context("outer");
        assert!(err.is_step_failure());
        assert!(matches!(err.root_cause(), Error::StepFailed(_)));
    }
}
