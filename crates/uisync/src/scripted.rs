// ScriptedDriver - In-memory UiDriver with a time-scripted UI
//
// Each element is described by when it attaches, becomes visible, becomes
// enabled, and stops being covered, relative to the moment the driver was
// created. Time comes from `tokio::time::Instant`, so a test running on a
// paused runtime clock gets exact, instant waits.
//
// The driver also records every lookup and interaction so tests can assert
// on poll counts and on the sequence of actions a step performed.

use crate::driver::{Key, UiDriver};
use crate::error::{Error, Result};
use crate::locator::Locator;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::time::Instant;

/// PNG file signature; every scripted screenshot starts with it.
pub const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Timeline of one scripted element.
///
/// All instants are offsets from driver creation. The default element is
/// present, visible and enabled from the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementScript {
    present_from: Duration,
    visible_from: Option<Duration>,
    enabled_from: Option<Duration>,
    obscured_until: Option<Duration>,
    removed_at: Option<Duration>,
    text: String,
}

impl Default for ElementScript {
    fn default() -> Self {
        Self {
            present_from: Duration::ZERO,
            visible_from: Some(Duration::ZERO),
            enabled_from: Some(Duration::ZERO),
            obscured_until: None,
            removed_at: None,
            text: String::new(),
        }
    }
}

impl ElementScript {
    /// Element that is present, visible and enabled from the start
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches (and, unless told otherwise, shows) the element at `at`.
    pub fn appears_at(mut self, at: Duration) -> Self {
        self.present_from = at;
        self.visible_from = self.visible_from.map(|v| v.max(at));
        self.enabled_from = self.enabled_from.map(|e| e.max(at));
        self
    }

    pub fn visible_at(mut self, at: Duration) -> Self {
        self.visible_from = Some(at);
        self
    }

    /// Present in the document but never rendered
    pub fn hidden(mut self) -> Self {
        self.visible_from = None;
        self
    }

    pub fn enabled_at(mut self, at: Duration) -> Self {
        self.enabled_from = Some(at);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled_from = None;
        self
    }

    /// Covered by another element (e.g. a loading overlay) until `until`
    pub fn obscured_until(mut self, until: Duration) -> Self {
        self.obscured_until = Some(until);
        self
    }

    /// Detaches the element at `at`
    pub fn removed_at(mut self, at: Duration) -> Self {
        self.removed_at = Some(at);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    fn is_present(&self, elapsed: Duration) -> bool {
        elapsed >= self.present_from && self.removed_at.is_none_or(|r| elapsed < r)
    }

    fn is_visible(&self, elapsed: Duration) -> bool {
        self.is_present(elapsed) && self.visible_from.is_some_and(|v| elapsed >= v)
    }

    fn is_enabled(&self, elapsed: Duration) -> bool {
        self.enabled_from.is_some_and(|e| elapsed >= e)
    }

    fn is_obscured(&self, elapsed: Duration) -> bool {
        self.obscured_until.is_some_and(|u| elapsed < u)
    }

    /// Makes the element attached, visible and enabled from `at`.
    fn reveal(&mut self, at: Duration) {
        self.present_from = at;
        self.visible_from = Some(at);
        self.enabled_from = Some(at);
        self.removed_at = None;
    }
}

/// Interaction recorded by the scripted driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Goto(String),
    Click(Locator),
    DoubleClick(Locator),
    Clear(Locator),
    SendKeys(Locator, String),
    Press(Locator, Key),
}

/// Handle to a scripted element; identifies it by the locator it was found with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptedHandle {
    locator: Locator,
}

impl ScriptedHandle {
    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

#[derive(Debug, Default)]
struct State {
    elements: HashMap<Locator, ElementScript>,
    reveals: HashMap<Locator, Vec<Locator>>,
    rejected: HashSet<String>,
    disconnected: bool,
    find_calls: HashMap<Locator, usize>,
    actions: Vec<Action>,
}

/// In-memory `UiDriver` for tests.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use uisync::scripted::{ElementScript, ScriptedDriver};
/// use uisync::Locator;
///
/// let driver = ScriptedDriver::new().with_element(
///     Locator::css("#status"),
///     ElementScript::new().appears_at(Duration::from_millis(1200)),
/// );
/// ```
#[derive(Debug)]
pub struct ScriptedDriver {
    origin: Instant,
    state: Mutex<State>,
}

impl Default for ScriptedDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedDriver {
    /// Creates an empty page; its timeline starts now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Mutex::new(State::default()),
        }
    }

    /// Adds an element (builder form)
    pub fn with_element(self, locator: Locator, script: ElementScript) -> Self {
        self.add_element(locator, script);
        self
    }

    /// Adds or replaces an element
    pub fn add_element(&self, locator: Locator, script: ElementScript) {
        self.state.lock().elements.insert(locator, script);
    }

    /// Clicking `trigger` attaches and shows `revealed` at the time of the click.
    ///
    /// `revealed` must already be registered; it is typically scripted as
    /// `ElementScript::new().hidden()` or with a far-future `appears_at`.
    pub fn reveal_on_click(&self, trigger: Locator, revealed: Locator) {
        self.state
            .lock()
            .reveals
            .entry(trigger)
            .or_default()
            .push(revealed);
    }

    /// Makes `find` reject `expression` as a selector the driver cannot compile.
    pub fn reject_selector(&self, expression: impl Into<String>) {
        self.state.lock().rejected.insert(expression.into());
    }

    /// Simulates a dropped session: every later call fails.
    pub fn disconnect(&self) {
        self.state.lock().disconnected = true;
    }

    /// Number of `find` calls made for `locator`
    pub fn find_calls(&self, locator: &Locator) -> usize {
        self.state
            .lock()
            .find_calls
            .get(locator)
            .copied()
            .unwrap_or(0)
    }

    /// Number of `find` calls made for any locator
    pub fn total_find_calls(&self) -> usize {
        self.state.lock().find_calls.values().sum()
    }

    /// Interactions performed so far, in order
    pub fn actions(&self) -> Vec<Action> {
        self.state.lock().actions.clone()
    }

    /// Current text of a scripted element
    pub fn text_of(&self, locator: &Locator) -> Option<String> {
        self.state
            .lock()
            .elements
            .get(locator)
            .map(|element| element.text.clone())
    }

    fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.origin)
    }

    fn connected(&self, state: &State) -> Result<()> {
        if state.disconnected {
            return Err(Error::DriverCommunication(
                "scripted session was disconnected".to_string(),
            ));
        }
        Ok(())
    }

    /// Runs `f` on the element behind `handle` if it is still attached.
    fn with_attached<T>(
        &self,
        handle: &ScriptedHandle,
        f: impl FnOnce(&mut ElementScript, Duration) -> T,
    ) -> Result<T> {
        let elapsed = self.elapsed();
        let mut state = self.state.lock();
        self.connected(&state)?;
        match state.elements.get_mut(&handle.locator) {
            Some(element) if element.is_present(elapsed) => Ok(f(element, elapsed)),
            _ => Err(Error::StepFailed(format!(
                "element '{}' is detached from the document",
                handle.locator
            ))),
        }
    }

    fn record(&self, action: Action) {
        self.state.lock().actions.push(action);
    }
}

#[async_trait]
impl UiDriver for ScriptedDriver {
    type Handle = ScriptedHandle;

    async fn find(&self, locator: &Locator) -> Result<Option<ScriptedHandle>> {
        let elapsed = self.elapsed();
        let mut state = self.state.lock();
        self.connected(&state)?;
        *state.find_calls.entry(locator.clone()).or_insert(0) += 1;

        if state.rejected.contains(locator.expression()) {
            return Err(Error::MalformedLocator {
                locator: locator.to_string(),
                reason: "rejected by driver".to_string(),
            });
        }

        Ok(state
            .elements
            .get(locator)
            .filter(|element| element.is_present(elapsed))
            .map(|_| ScriptedHandle {
                locator: locator.clone(),
            }))
    }

    async fn is_visible(&self, handle: &ScriptedHandle) -> Result<bool> {
        let elapsed = self.elapsed();
        let state = self.state.lock();
        self.connected(&state)?;
        Ok(state
            .elements
            .get(&handle.locator)
            .is_some_and(|element| element.is_visible(elapsed)))
    }

    async fn is_enabled(&self, handle: &ScriptedHandle) -> Result<bool> {
        let elapsed = self.elapsed();
        let state = self.state.lock();
        self.connected(&state)?;
        Ok(state
            .elements
            .get(&handle.locator)
            .is_some_and(|element| element.is_enabled(elapsed)))
    }

    async fn is_obscured(&self, handle: &ScriptedHandle) -> Result<bool> {
        let elapsed = self.elapsed();
        let state = self.state.lock();
        self.connected(&state)?;
        Ok(state
            .elements
            .get(&handle.locator)
            .is_some_and(|element| element.is_obscured(elapsed)))
    }

    async fn screenshot(&self, handle: &ScriptedHandle) -> Result<Vec<u8>> {
        self.with_attached(handle, |_, _| ())?;
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend_from_slice(handle.locator.to_string().as_bytes());
        Ok(png)
    }

    async fn page_screenshot(&self) -> Result<Vec<u8>> {
        self.connected(&self.state.lock())?;
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend_from_slice(b"page");
        Ok(png)
    }

    async fn goto(&self, url: &str) -> Result<()> {
        self.connected(&self.state.lock())?;
        self.record(Action::Goto(url.to_string()));
        Ok(())
    }

    async fn click(&self, handle: &ScriptedHandle) -> Result<()> {
        let elapsed = self.with_attached(handle, |_, elapsed| elapsed)?;
        let mut state = self.state.lock();
        let revealed = state
            .reveals
            .get(&handle.locator)
            .cloned()
            .unwrap_or_default();
        for locator in revealed {
            if let Some(element) = state.elements.get_mut(&locator) {
                element.reveal(elapsed);
            }
        }
        state.actions.push(Action::Click(handle.locator.clone()));
        Ok(())
    }

    async fn double_click(&self, handle: &ScriptedHandle) -> Result<()> {
        self.with_attached(handle, |_, _| ())?;
        self.record(Action::DoubleClick(handle.locator.clone()));
        Ok(())
    }

    async fn clear(&self, handle: &ScriptedHandle) -> Result<()> {
        self.with_attached(handle, |element, _| element.text.clear())?;
        self.record(Action::Clear(handle.locator.clone()));
        Ok(())
    }

    async fn send_keys(&self, handle: &ScriptedHandle, text: &str) -> Result<()> {
        self.with_attached(handle, |element, _| element.text.push_str(text))?;
        self.record(Action::SendKeys(handle.locator.clone(), text.to_string()));
        Ok(())
    }

    async fn press(&self, handle: &ScriptedHandle, key: Key) -> Result<()> {
        self.with_attached(handle, |_, _| ())?;
        self.record(Action::Press(handle.locator.clone(), key));
        Ok(())
    }

    async fn text(&self, handle: &ScriptedHandle) -> Result<String> {
        self.with_attached(handle, |element, _| element.text.clone())
    }
}
