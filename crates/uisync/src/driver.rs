// UiDriver - Boundary to the browser-automation driver
//
// The poller and the steps only ever talk to the browser through this trait.
// Session start/stop is owned by whoever constructs the driver.
//
// Implementations:
// - `scripted::ScriptedDriver`: in-memory, time-scripted UI for tests
// - `playwright::PlaywrightDriver` (feature `playwright`): real browser

use crate::error::Result;
use crate::locator::Locator;
use async_trait::async_trait;
use std::fmt;

/// Named keys that steps press on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Tab,
    Backspace,
}

impl Key {
    /// Key name as understood by browser drivers
    pub fn name(&self) -> &'static str {
        match self {
            Key::Enter => "Enter",
            Key::Escape => "Escape",
            Key::Tab => "Tab",
            Key::Backspace => "Backspace",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operations the synchronization core and the steps need from a driver.
///
/// Query methods must not change UI state. Errors from a broken automation
/// channel should be reported as `Error::DriverCommunication`; a selector the
/// driver cannot compile as `Error::MalformedLocator`.
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// Opaque element reference owned by the driver.
    type Handle: Clone + Send + Sync + 'static;

    /// Resolves `locator` against the current document.
    ///
    /// Returns `Ok(None)` when nothing matches right now.
    async fn find(&self, locator: &Locator) -> Result<Option<Self::Handle>>;

    /// Whether the element is rendered with a non-empty box and not hidden.
    ///
    /// A handle that went stale since `find` reports `Ok(false)`, so the
    /// poller treats a re-render as "not yet" rather than as a failure.
    async fn is_visible(&self, handle: &Self::Handle) -> Result<bool>;

    /// Whether the element is not disabled.
    async fn is_enabled(&self, handle: &Self::Handle) -> Result<bool>;

    /// Whether another element would receive a click aimed at this one.
    ///
    /// Drivers without hit-testing report `false`.
    async fn is_obscured(&self, _handle: &Self::Handle) -> Result<bool> {
        Ok(false)
    }

    /// PNG screenshot of one element.
    async fn screenshot(&self, handle: &Self::Handle) -> Result<Vec<u8>>;

    /// PNG screenshot of the current viewport.
    async fn page_screenshot(&self) -> Result<Vec<u8>>;

    /// Navigates the session to `url`.
    async fn goto(&self, url: &str) -> Result<()>;

    async fn click(&self, handle: &Self::Handle) -> Result<()>;

    async fn double_click(&self, handle: &Self::Handle) -> Result<()>;

    /// Empties an editable element.
    async fn clear(&self, handle: &Self::Handle) -> Result<()>;

    /// Types `text` into the element, appending to its current value.
    async fn send_keys(&self, handle: &Self::Handle, text: &str) -> Result<()>;

    async fn press(&self, handle: &Self::Handle, key: Key) -> Result<()>;

    /// Rendered text of the element.
    async fn text(&self, handle: &Self::Handle) -> Result<String>;
}
