//! uisync: bounded wait-and-poll synchronization for browser-driven UI tests
//!
//! The UI under test renders asynchronously, so a lookup made right after an
//! action often fails even though the element shows up moments later. This
//! crate turns "find and check an element" into a bounded wait, and builds
//! test steps on top of it.
//!
//! - [`Locator`]: immutable (strategy, expression) pair, re-resolved on every poll
//! - [`WaitCondition`]: present, visible, or clickable
//! - [`ConditionPoller`]: `wait_until` (typed errors) and `try_check` (boolean)
//! - [`UiDriver`]: the boundary to the browser-automation driver
//! - [`Session`]: explicit step context (driver + timings + artifacts)
//! - [`panel`]: page objects and steps for the panel editor
//!
//! # Examples
//!
//! ## Waiting for an element
//!
//! ```ignore
//! use std::time::Duration;
//! use uisync::{ConditionPoller, Locator, WaitCondition};
//!
//! # async fn run<D: uisync::UiDriver>(driver: &D) -> uisync::Result<()> {
//! let poller = ConditionPoller::new(Duration::from_secs(5), Duration::from_millis(500))?;
//!
//! // Fails with Error::ElementNotReady after 5s if #status never shows up
//! let status = poller
//!     .wait_until(driver, &Locator::css("#status"), WaitCondition::Visible)
//!     .await?;
//!
//! // Absence is a valid answer here: timeout becomes `false`
//! let has_error = poller
//!     .try_check(driver, &Locator::css(".alert-error"), WaitCondition::Visible)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Running panel steps
//!
//! ```ignore
//! use uisync::{Session, SuiteConfig, panel::steps};
//!
//! # async fn run<D: uisync::UiDriver>(driver: D) -> uisync::Result<()> {
//! let session = Session::new(driver, SuiteConfig::from_env()?)?;
//!
//! steps::select_datasource_in_panel_view(&session, "clickhouse").await?;
//! steps::go_to_sql_editor(&session, "A").await?;
//! steps::enter_sql_editor_input(&session, "SELECT now(), number FROM numbers(60)", "A").await?;
//! steps::take_screenshot_for_visualization(&session, "panel_check").await?;
//! assert!(!steps::check_panel_error_exists(&session).await?);
//! # Ok(())
//! # }
//! ```

mod condition;
pub mod config;
mod driver;
mod error;
mod locator;
pub mod logging;
pub mod panel;
pub mod poller;
pub mod screenshot;
mod session;

#[cfg(any(test, feature = "test-util"))]
pub mod scripted;

#[cfg(feature = "playwright")]
pub mod playwright;

// Re-export error types
pub use error::{Error, Result};

// Re-export the synchronization core
pub use condition::WaitCondition;
pub use locator::{Locator, SelectBy, xpath_literal};
pub use poller::{ConditionPoller, PollOutcome};

// Re-export driver boundary
pub use driver::{Key, UiDriver};

// Re-export step context
pub use config::SuiteConfig;
pub use screenshot::ScreenshotStore;
pub use session::Session;

#[cfg(feature = "playwright")]
pub use playwright::PlaywrightDriver;
