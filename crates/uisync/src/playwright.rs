// PlaywrightDriver - UiDriver backed by a Playwright page
//
// Locators map to Playwright selectors with an explicit engine prefix
// (`css=...`, `xpath=...`). A handle is the first-match locator: Playwright
// re-resolves it on every call, which matches the "never cache elements"
// rule of the poller.
//
// Error mapping:
// - selector syntax errors -> Error::MalformedLocator (never retried)
// - everything else        -> Error::DriverCommunication

use crate::driver::{Key, UiDriver};
use crate::error::{Error, Result};
use crate::locator::Locator;
use async_trait::async_trait;
use playwright_rs::{Locator as PwLocator, Page};

/// Fragments of Playwright error messages that mean "this selector cannot compile".
const SELECTOR_SYNTAX_MARKERS: &[&str] = &[
    "is not a valid selector",
    "is not a valid XPath expression",
    "Unexpected token",
    "Failed to parse selector",
];

/// `UiDriver` over one Playwright page.
///
/// The page (and the browser behind it) is owned by the caller, which also
/// closes it at teardown.
#[derive(Clone)]
pub struct PlaywrightDriver {
    page: Page,
}

impl PlaywrightDriver {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }
}

impl std::fmt::Debug for PlaywrightDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaywrightDriver").finish_non_exhaustive()
    }
}

fn driver_error(e: playwright_rs::Error) -> Error {
    Error::DriverCommunication(e.to_string())
}

fn lookup_error(locator: &Locator, e: playwright_rs::Error) -> Error {
    let message = e.to_string();
    if SELECTOR_SYNTAX_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
    {
        Error::MalformedLocator {
            locator: locator.to_string(),
            reason: message,
        }
    } else {
        Error::DriverCommunication(message)
    }
}

#[async_trait]
impl UiDriver for PlaywrightDriver {
    type Handle = PwLocator;

    async fn find(&self, locator: &Locator) -> Result<Option<PwLocator>> {
        let found = self.page.locator(&locator.selector()).await;
        let count = found
            .count()
            .await
            .map_err(|e| lookup_error(locator, e))?;
        tracing::trace!("{} matched {} element(s)", locator, count);
        Ok((count > 0).then(|| found.first()))
    }

    async fn is_visible(&self, handle: &PwLocator) -> Result<bool> {
        handle.is_visible().await.map_err(driver_error)
    }

    async fn is_enabled(&self, handle: &PwLocator) -> Result<bool> {
        handle.is_enabled().await.map_err(driver_error)
    }

    async fn screenshot(&self, handle: &PwLocator) -> Result<Vec<u8>> {
        handle.screenshot(None).await.map_err(driver_error)
    }

    async fn page_screenshot(&self) -> Result<Vec<u8>> {
        self.page.screenshot(None).await.map_err(driver_error)
    }

    async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url, None).await.map_err(driver_error)?;
        Ok(())
    }

    async fn click(&self, handle: &PwLocator) -> Result<()> {
        handle.click(None).await.map_err(driver_error)
    }

    async fn double_click(&self, handle: &PwLocator) -> Result<()> {
        handle.dblclick(None).await.map_err(driver_error)
    }

    async fn clear(&self, handle: &PwLocator) -> Result<()> {
        handle.clear(None).await.map_err(driver_error)
    }

    async fn send_keys(&self, handle: &PwLocator, text: &str) -> Result<()> {
        // Typing goes to the focused element; keep an existing focus (and
        // selection) if the element already has it
        if !handle.is_focused().await.map_err(driver_error)? {
            handle.click(None).await.map_err(driver_error)?;
        }
        self.page
            .keyboard()
            .type_text(text, None)
            .await
            .map_err(driver_error)
    }

    async fn press(&self, handle: &PwLocator, key: Key) -> Result<()> {
        handle.press(key.name(), None).await.map_err(driver_error)
    }

    async fn text(&self, handle: &PwLocator) -> Result<String> {
        handle.inner_text().await.map_err(driver_error)
    }
}
