// Session - Explicit step context
//
// Everything a step needs (driver, timings, artifact directory) travels in a
// `Session` passed by reference; there is no ambient "current driver".
//
// Interactions always wait first:
// - pointer actions (click, double click) wait for Clickable
// - keyboard input and clearing wait for Visible
// - reading text waits for Present

use crate::condition::WaitCondition;
use crate::config::SuiteConfig;
use crate::driver::{Key, UiDriver};
use crate::error::{Error, Result};
use crate::locator::Locator;
use crate::poller::ConditionPoller;
use crate::screenshot::ScreenshotStore;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Instrument;

/// One browser session plus the settings of the run it belongs to.
///
/// Steps borrow the session and run strictly one after another; the session
/// is not meant to be shared between concurrently running scenarios.
///
/// # Example
///
/// ```ignore
/// use uisync::{Locator, Session, SuiteConfig};
///
/// let session = Session::new(driver, SuiteConfig::from_env()?)?;
/// session.open("dashboard/new").await?;
/// session
///     .step("open SQL editor", async {
///         session.click(&Locator::css("[id*='option-sql']")).await
///     })
///     .await?;
/// ```
#[derive(Debug)]
pub struct Session<D: UiDriver> {
    driver: D,
    config: SuiteConfig,
    poller: ConditionPoller,
    screenshots: ScreenshotStore,
}

impl<D: UiDriver> Session<D> {
    /// Creates a session; fails if the configured timings are invalid.
    pub fn new(driver: D, config: SuiteConfig) -> Result<Self> {
        let poller = config.poller()?;
        let screenshots = ScreenshotStore::new(config.screenshot_dir.clone());
        Ok(Self {
            driver,
            config,
            poller,
            screenshots,
        })
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    pub fn poller(&self) -> &ConditionPoller {
        &self.poller
    }

    pub fn screenshots(&self) -> &ScreenshotStore {
        &self.screenshots
    }

    /// Consumes the session and returns its driver
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Navigates to `path` resolved against the configured base URL.
    pub async fn open(&self, path: &str) -> Result<()> {
        let url = self.config.base_url.join(path)?;
        tracing::info!("Opening {}", url);
        self.driver.goto(url.as_str()).await
    }

    /// Waits for `locator` to reach `condition` with the session's timings.
    pub async fn wait_for(&self, locator: &Locator, condition: WaitCondition) -> Result<D::Handle> {
        self.poller
            .wait_until(&self.driver, locator, condition)
            .await
    }

    pub async fn wait_for_element_to_be_present(&self, locator: &Locator) -> Result<D::Handle> {
        self.wait_for(locator, WaitCondition::Present).await
    }

    pub async fn wait_for_element_to_be_visible(&self, locator: &Locator) -> Result<D::Handle> {
        self.wait_for(locator, WaitCondition::Visible).await
    }

    pub async fn wait_for_element_to_be_clickable(&self, locator: &Locator) -> Result<D::Handle> {
        self.wait_for(locator, WaitCondition::Clickable).await
    }

    /// Boolean check: `Ok(false)` only when the wait timed out.
    pub async fn check(&self, locator: &Locator, condition: WaitCondition) -> Result<bool> {
        self.poller
            .try_check(&self.driver, locator, condition)
            .await
    }

    /// Like [`check`](Self::check), but gives up after `timeout`.
    ///
    /// For checks where absence is the expected answer. The poll interval is
    /// shortened to `timeout` if it is longer.
    pub async fn check_within(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<bool> {
        let poller = self
            .poller
            .with_timeout(timeout)
            .with_poll_interval(self.poller.poll_interval().min(timeout));
        poller.try_check(&self.driver, locator, condition).await
    }

    pub async fn click(&self, locator: &Locator) -> Result<()> {
        let handle = self.wait_for_element_to_be_clickable(locator).await?;
        tracing::debug!("Clicking {}", locator);
        self.driver.click(&handle).await
    }

    pub async fn double_click(&self, locator: &Locator) -> Result<()> {
        let handle = self.wait_for_element_to_be_clickable(locator).await?;
        tracing::debug!("Double-clicking {}", locator);
        self.driver.double_click(&handle).await
    }

    pub async fn clear(&self, locator: &Locator) -> Result<()> {
        let handle = self.wait_for_element_to_be_visible(locator).await?;
        self.driver.clear(&handle).await
    }

    /// Types `text` into the element, appending to its current value.
    pub async fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
        let handle = self.wait_for_element_to_be_visible(locator).await?;
        tracing::debug!("Typing {} character(s) into {}", text.chars().count(), locator);
        self.driver.send_keys(&handle, text).await
    }

    /// Types `text` and presses Enter, the way dropdown inputs are committed.
    pub async fn type_and_submit(&self, locator: &Locator, text: &str) -> Result<()> {
        let handle = self.wait_for_element_to_be_visible(locator).await?;
        self.driver.send_keys(&handle, text).await?;
        self.driver.press(&handle, Key::Enter).await
    }

    pub async fn press(&self, locator: &Locator, key: Key) -> Result<()> {
        let handle = self.wait_for_element_to_be_visible(locator).await?;
        self.driver.press(&handle, key).await
    }

    pub async fn text(&self, locator: &Locator) -> Result<String> {
        let handle = self.wait_for_element_to_be_present(locator).await?;
        self.driver.text(&handle).await
    }

    /// Runs `fut` with the configured settle time before and after it.
    ///
    /// For actions on widgets that animate in or re-render right after the
    /// element is found (dropdowns, modals).
    pub async fn delay<F, T>(&self, fut: F) -> T
    where
        F: Future<Output = T>,
    {
        let settle = self.config.action_delay();
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }
        let output = fut.await;
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }
        output
    }

    /// Runs `fut` as a named step.
    ///
    /// The step runs inside an `info` span named after it, so nested steps
    /// show up nested in the log. On failure the error is wrapped in
    /// `Error::Step` and, if enabled, a page screenshot named
    /// `failure-<step>` is saved. Only the innermost failing step captures
    /// and wraps; enclosing steps return the error unchanged.
    pub async fn step<F, T>(&self, name: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let span = tracing::info_span!("step", name = %name);
        async {
            tracing::info!("Starting");
            match fut.await {
                Ok(value) => {
                    tracing::info!("Done");
                    Ok(value)
                }
                Err(e) if e.is_step_failure() => Err(e),
                Err(e) => {
                    tracing::warn!("Failed: {}", e);
                    if self.config.screenshot_on_failure {
                        self.capture_failure(name).await;
                    }
                    Err(Error::Step {
                        step: name.to_string(),
                        source: Box::new(e),
                    })
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Waits for the element to be visible and saves its screenshot.
    pub async fn screenshot_element(&self, locator: &Locator, name: &str) -> Result<PathBuf> {
        let handle = self.wait_for_element_to_be_visible(locator).await?;
        let png = self.driver.screenshot(&handle).await?;
        self.screenshots.save(name, &png).await
    }

    /// Saves a screenshot of the current viewport.
    pub async fn screenshot_page(&self, name: &str) -> Result<PathBuf> {
        let png = self.driver.page_screenshot().await?;
        self.screenshots.save(name, &png).await
    }

    async fn capture_failure(&self, step: &str) {
        let name = format!("failure-{}", step);
        if let Err(e) = self.screenshot_page(&name).await {
            tracing::warn!("Could not capture failure screenshot for '{}': {}", step, e);
        }
    }
}
