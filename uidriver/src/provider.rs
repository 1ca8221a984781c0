//! Capability boundaries consumed from the host environment.
//!
//! The synchronization and input core never talks to an OS directly; it
//! drives these traits, which a platform backend (or a test fixture)
//! implements.

use crate::element::{NodeAttributes, Point};
use crate::errors::AutomationError;
use crate::input::{set1_scan_code, InputSequence, Key};

/// Opaque handle to a native node owned by an [`AutomationProvider`].
pub type NodeHandle = u64;

/// How much property data the provider should fetch per node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PropertyLoadingMode {
    /// Only essential properties (id + name) - fastest.
    #[default]
    Fast,
    /// All properties - slower but complete.
    Complete,
    /// Properties chosen per capability set - balanced.
    Smart,
}

/// Property-caching request, passed explicitly on every property read.
///
/// Scoped caching is a parameter of the call, never ambient state: a caller
/// that wants a different prefetch policy for one walk passes a different
/// request, and nothing is pushed onto a hidden stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheRequest {
    pub mode: PropertyLoadingMode,
}

/// Read access to a native tree of automatable nodes.
///
/// The provider exposes a sibling-walk cursor over live UI state. Any call
/// may fail with [`AutomationError::TransientUnavailable`] when the node was
/// torn down concurrently with the walk; the synchronizer recovers from that
/// by retrying the whole walk.
pub trait AutomationProvider: Send + Sync {
    /// First child of `node`, or `None` for a leaf.
    fn first_child(&self, node: NodeHandle) -> Result<Option<NodeHandle>, AutomationError>;

    /// Next sibling of `node`, or `None` at the end of the run.
    fn next_sibling(&self, node: NodeHandle) -> Result<Option<NodeHandle>, AutomationError>;

    /// Current properties of `node`, fetched per the explicit cache request.
    fn properties(
        &self,
        node: NodeHandle,
        cache: &CacheRequest,
    ) -> Result<NodeAttributes, AutomationError>;
}

/// Maps virtual keys to hardware scan codes.
pub trait ScanCodeMapper: Send + Sync {
    fn scan_code(&self, key: Key) -> u16;
}

/// Table-backed mapper using PC scan code set 1. Suitable wherever no OS
/// mapping function is available (tests, headless fixtures).
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticScanCodeMapper;

impl ScanCodeMapper for StaticScanCodeMapper {
    fn scan_code(&self, key: Key) -> u16 {
        set1_scan_code(key)
    }
}

/// Pixel dimensions of the screen that owns a point. Needed to normalize
/// absolute pointer moves.
pub trait ScreenMetrics: Send + Sync {
    fn size_of_screen_containing(&self, point: Point) -> Result<(u32, u32), AutomationError>;
}

/// Delivers one event batch to the OS input queue.
///
/// Submission must preserve the sequence's order and is synchronous from the
/// caller's point of view: it returns after the batch is queued, not after
/// the target application has processed it (which is why gestures carry a
/// settle delay).
pub trait InputDispatcher: Send + Sync {
    fn submit(&self, sequence: InputSequence) -> Result<(), AutomationError>;
}

/// Remote-execution channel into a browser page: runs a script in the page
/// and returns its string result. Used by the browser-hosted variant of
/// element resolution.
pub trait BrowserScriptBridge: Send + Sync {
    fn execute(&self, script: &str) -> Result<String, AutomationError>;
}
