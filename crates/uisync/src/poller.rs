// ConditionPoller - Bounded wait-and-poll synchronization
//
// The target UI renders asynchronously (client-side scripts, network-backed
// panel data, animated transitions) and sends no notification when it is
// done, so a single lookup often fails right before it would have succeeded.
// The poller turns "find and check an element" into a bounded retry loop:
//
// - one poll = resolve the locator, then evaluate the condition
// - constant interval between polls, the task sleeps (no busy wait)
// - every wait has a finite deadline; elapsed >= timeout fails the wait
// - malformed locators and driver failures are never retried

use crate::condition::WaitCondition;
use crate::driver::UiDriver;
use crate::error::{Error, Result};
use crate::locator::Locator;
use std::time::Duration;
use tokio::time::Instant;

/// Default timeout for waits (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Stand-in deadline when `start + timeout` does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Result of a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<H> {
    /// The element was found and satisfied the condition at this poll.
    Ready(H),
    /// Not found, or found but not yet in the required state.
    NotYetSatisfied,
}

/// Performs exactly one poll of `locator` against `condition`.
pub async fn poll_once<D>(
    driver: &D,
    locator: &Locator,
    condition: WaitCondition,
) -> Result<PollOutcome<D::Handle>>
where
    D: UiDriver + ?Sized,
{
    let Some(handle) = driver.find(locator).await? else {
        return Ok(PollOutcome::NotYetSatisfied);
    };

    if condition.needs_visibility() && !driver.is_visible(&handle).await? {
        return Ok(PollOutcome::NotYetSatisfied);
    }

    if condition == WaitCondition::Clickable
        && (!driver.is_enabled(&handle).await? || driver.is_obscured(&handle).await?)
    {
        return Ok(PollOutcome::NotYetSatisfied);
    }

    Ok(PollOutcome::Ready(handle))
}

/// Waits for elements to reach a `WaitCondition` within a bounded time.
///
/// The poller holds only its timing; the driver is passed to every call.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use uisync::{ConditionPoller, Locator, WaitCondition};
///
/// let poller = ConditionPoller::default()
///     .with_timeout(Duration::from_secs(5))
///     .with_poll_interval(Duration::from_millis(500));
///
/// let status = Locator::css("#status");
/// let handle = poller.wait_until(&driver, &status, WaitCondition::Visible).await?;
///
/// // Absence is an expected outcome here, not a defect
/// let banner = Locator::css("[data-testid='data-testid Panel status error']");
/// let has_error = poller
///     .try_check(&driver, &banner, WaitCondition::Visible)
///     .await?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionPoller {
    timeout: Duration,
    poll_interval: Duration,
}

impl Default for ConditionPoller {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ConditionPoller {
    /// Creates a poller, rejecting timings that could not bound a wait.
    pub fn new(timeout: Duration, poll_interval: Duration) -> Result<Self> {
        let poller = Self {
            timeout,
            poll_interval,
        };
        poller.validate()?;
        Ok(poller)
    }

    /// Sets the timeout for waits made with this poller.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the interval between polls.
    ///
    /// Default is 500ms.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Checks `timeout > 0` and `0 < poll_interval <= timeout`.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::InvalidArgument(
                "wait timeout must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::InvalidArgument(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval > self.timeout {
            return Err(Error::InvalidArgument(format!(
                "poll interval {:?} exceeds timeout {:?}",
                self.poll_interval, self.timeout
            )));
        }
        Ok(())
    }

    /// Polls until the element located by `locator` satisfies `condition`.
    ///
    /// Returns the handle that satisfied the condition at the successful
    /// poll. The UI may change right after; callers that act on the handle
    /// accept that race.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for timings rejected by [`validate`](Self::validate)
    /// - `MalformedLocator` immediately, with zero polls, if the expression
    ///   fails the local syntax check, or as soon as the driver rejects it
    /// - `ElementNotReady` once elapsed time reaches the timeout
    /// - driver errors such as `DriverCommunication` unchanged
    pub async fn wait_until<D>(
        &self,
        driver: &D,
        locator: &Locator,
        condition: WaitCondition,
    ) -> Result<D::Handle>
    where
        D: UiDriver + ?Sized,
    {
        self.validate()?;
        locator.validate()?;

        let start = Instant::now();
        let deadline = start
            .checked_add(self.timeout)
            .unwrap_or_else(|| start + FAR_FUTURE);
        let mut polls: u32 = 0;

        loop {
            polls += 1;

            if let PollOutcome::Ready(handle) = poll_once(driver, locator, condition).await? {
                tracing::debug!(
                    "{} is {} after {} poll(s), {:?}",
                    locator,
                    condition,
                    polls,
                    start.elapsed()
                );
                return Ok(handle);
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::debug!(
                    "{} not {} after {} poll(s), giving up",
                    locator,
                    condition,
                    polls
                );
                return Err(Error::ElementNotReady {
                    locator: locator.clone(),
                    condition,
                    timeout: self.timeout,
                });
            }

            // Never sleep past the deadline
            let nap = (deadline - now).min(self.poll_interval);
            tokio::time::sleep(nap).await;
        }
    }

    /// Waits like [`wait_until`](Self::wait_until) and reports the outcome
    /// as a boolean.
    ///
    /// Only `ElementNotReady` becomes `Ok(false)`; every other error kind is
    /// returned unchanged.
    pub async fn try_check<D>(
        &self,
        driver: &D,
        locator: &Locator,
        condition: WaitCondition,
    ) -> Result<bool>
    where
        D: UiDriver + ?Sized,
    {
        match self.wait_until(driver, locator, condition).await {
            Ok(_) => Ok(true),
            Err(Error::ElementNotReady { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
