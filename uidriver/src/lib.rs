//! Synchronized element lookup and synthetic input for GUI test automation.
//!
//! A [`Session`] attaches to a host (an application window or a browser
//! page), keeps an immutable snapshot of its element tree, and drives the
//! host with synthetic keyboard and mouse input. Lookups that may race
//! against the UI block through a bounded poll loop that re-synchronizes the
//! snapshot on every miss, so callers see elements as soon as the host
//! renders them.

use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, instrument};

pub mod browser;
pub mod element;
pub mod errors;
pub mod input;
pub mod provider;
pub mod resolver;
pub mod selector;
pub mod sync;
pub mod wait;

pub use element::{
    Bounds, Element, ElementTree, HostId, NodeAttributes, Pattern, Point, SerializableNode,
};
pub use errors::AutomationError;
pub use input::{
    Direction, InputEvent, InputSequence, InputSequenceBuilder, Key, KeyEvent, MouseButton,
    PointerEvent, WHEEL_NOTCH,
};
pub use provider::{
    AutomationProvider, BrowserScriptBridge, CacheRequest, InputDispatcher, NodeHandle,
    PropertyLoadingMode, ScanCodeMapper, ScreenMetrics, StaticScanCodeMapper,
};
pub use resolver::ChildResolver;
pub use selector::Selector;
pub use sync::TreeSynchronizer;
pub use wait::{wait, WaitSpec};

/// Tunables for a session's pacing and guards.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Timeout applied to blocking lookups when the caller gives none.
    pub default_timeout: Duration,
    /// Pause between poll probes.
    pub poll_delay: Duration,
    /// Pause before the single retry after a transient refresh failure.
    pub refresh_retry_delay: Duration,
    /// Pause after dispatching a click-family gesture, giving the target UI
    /// time to process the events before the caller's next assertion. A
    /// pacing heuristic, not a correctness requirement; zero disables it.
    pub settle_delay: Duration,
    /// Upper bound on text accepted by `type_text`.
    pub max_text_length: usize,
    /// Property-caching request threaded through every provider read.
    pub cache: CacheRequest,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_timeout: wait::DEFAULT_WAIT_TIMEOUT,
            poll_delay: wait::DEFAULT_POLL_DELAY,
            refresh_retry_delay: sync::DEFAULT_REFRESH_RETRY_DELAY,
            settle_delay: Duration::from_millis(100),
            max_text_length: 4096,
            cache: CacheRequest::default(),
        }
    }
}

pub(crate) struct SessionInner {
    pub(crate) dispatcher: Arc<dyn InputDispatcher>,
    pub(crate) scan_codes: Arc<dyn ScanCodeMapper>,
    pub(crate) screen: Arc<dyn ScreenMetrics>,
    pub(crate) synchronizer: TreeSynchronizer,
    pub(crate) config: SessionConfig,
    pub(crate) host: HostId,
    tree: RwLock<Arc<ElementTree>>,
}

impl SessionInner {
    /// The snapshot currently held for the host. Readers see either the old
    /// tree in full or the new tree in full, never a mix: a refresh builds
    /// the replacement off to the side and swaps the pointer.
    pub(crate) fn current_tree(&self) -> Arc<ElementTree> {
        self.tree.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub(crate) fn refresh(&self) -> Result<Arc<ElementTree>, AutomationError> {
        let fresh = Arc::new(self.synchronizer.refresh(&self.host)?);
        *self.tree.write().unwrap_or_else(|e| e.into_inner()) = fresh.clone();
        Ok(fresh)
    }
}

/// The main entry point: element lookup and input synthesis for one host.
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Attaches to a host and captures its initial snapshot.
    #[instrument(skip(provider, dispatcher, scan_codes, screen, config), fields(host = %host))]
    pub fn attach(
        host: HostId,
        provider: Arc<dyn AutomationProvider>,
        dispatcher: Arc<dyn InputDispatcher>,
        scan_codes: Arc<dyn ScanCodeMapper>,
        screen: Arc<dyn ScreenMetrics>,
        config: SessionConfig,
    ) -> Result<Self, AutomationError> {
        let synchronizer =
            TreeSynchronizer::new(provider, config.cache, config.refresh_retry_delay);
        let tree = Arc::new(synchronizer.refresh(&host)?);
        Ok(Self {
            inner: Arc::new(SessionInner {
                dispatcher,
                scan_codes,
                screen,
                synchronizer,
                config,
                host,
                tree: RwLock::new(tree),
            }),
        })
    }

    /// The snapshot currently held for the host.
    pub fn tree(&self) -> Arc<ElementTree> {
        self.inner.current_tree()
    }

    /// The root element of the current snapshot.
    pub fn root(&self) -> Element {
        Element::root_of(self.tree())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Rebuilds the host's snapshot, replacing the previous one entirely.
    /// Element handles retained from before stay readable against their old
    /// snapshot but are stale for interaction.
    #[instrument(skip(self))]
    pub fn refresh(&self) -> Result<Arc<ElementTree>, AutomationError> {
        self.inner.refresh()
    }

    /// A resolver for children of the host's root matching `selector`.
    #[instrument(skip(self, selector))]
    pub fn locator(&self, selector: impl Into<Selector>) -> ChildResolver {
        ChildResolver::new(self.inner.clone(), selector.into())
    }

    /// Left-clicks the element at its clickable point.
    #[instrument(skip(self, target))]
    pub fn click(&self, target: &Element) -> Result<(), AutomationError> {
        self.click_with(target, MouseButton::Left, 1)
    }

    #[instrument(skip(self, target))]
    pub fn right_click(&self, target: &Element) -> Result<(), AutomationError> {
        self.click_with(target, MouseButton::Right, 1)
    }

    /// Two clicks back-to-back; the dispatcher owns inter-click timing.
    #[instrument(skip(self, target))]
    pub fn double_click(&self, target: &Element) -> Result<(), AutomationError> {
        self.click_with(target, MouseButton::Left, 2)
    }

    fn click_with(
        &self,
        target: &Element,
        button: MouseButton,
        count: u32,
    ) -> Result<(), AutomationError> {
        self.require_enabled(target)?;
        let point = target.clickable_point()?;
        let mut builder = self.builder();
        builder.move_to(point)?;
        for _ in 0..count {
            builder.click(button, None)?;
        }
        self.dispatch(builder.build())?;
        self.settle();
        Ok(())
    }

    /// Clicks at an arbitrary screen point, no element precondition checks.
    #[instrument(skip(self))]
    pub fn click_at(&self, point: Point) -> Result<(), AutomationError> {
        let mut builder = self.builder();
        builder.click(MouseButton::Left, Some(point))?;
        self.dispatch(builder.build())?;
        self.settle();
        Ok(())
    }

    /// Scrolls the wheel over the element by `clicks` notches.
    #[instrument(skip(self, target))]
    pub fn scroll(&self, target: &Element, clicks: i32) -> Result<(), AutomationError> {
        self.require_enabled(target)?;
        let point = target.clickable_point()?;
        let mut builder = self.builder();
        builder.move_to(point)?;
        builder.wheel(clicks);
        self.dispatch(builder.build())
    }

    /// One key press (down + up).
    #[instrument(skip(self))]
    pub fn press(&self, key: Key) -> Result<(), AutomationError> {
        let mut builder = self.builder();
        builder.press(key);
        self.dispatch(builder.build())
    }

    /// A modified chord, e.g. Ctrl+Shift+K.
    #[instrument(skip(self))]
    pub fn chord(&self, modifiers: &[Key], keys: &[Key]) -> Result<(), AutomationError> {
        let mut builder = self.builder();
        builder.chord(modifiers, keys);
        self.dispatch(builder.build())
    }

    /// Clicks the element to give it focus, then types `text` into it — all
    /// in one dispatched batch so no other synthesized input can interleave.
    #[instrument(skip(self, target, text))]
    pub fn type_text(&self, target: &Element, text: &str) -> Result<(), AutomationError> {
        if text.len() > self.inner.config.max_text_length {
            return Err(AutomationError::InvalidInput(format!(
                "text of {} bytes exceeds the {}-byte limit",
                text.len(),
                self.inner.config.max_text_length
            )));
        }
        self.require_enabled(target)?;
        let point = target.clickable_point()?;
        let mut builder = self.builder();
        builder.click(MouseButton::Left, Some(point))?;
        builder.type_text(text);
        self.dispatch(builder.build())?;
        self.settle();
        Ok(())
    }

    fn builder(&self) -> InputSequenceBuilder<'_> {
        InputSequenceBuilder::new(&*self.inner.scan_codes, &*self.inner.screen)
    }

    fn dispatch(&self, sequence: InputSequence) -> Result<(), AutomationError> {
        debug!(event_count = sequence.len(), "submitting input sequence");
        self.inner.dispatcher.submit(sequence)
    }

    fn settle(&self) {
        let delay = self.inner.config.settle_delay;
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    fn require_enabled(&self, target: &Element) -> Result<(), AutomationError> {
        if target.is_enabled() {
            Ok(())
        } else {
            Err(AutomationError::ElementNotEnabled(format!("{target:?}")))
        }
    }
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
