//! Child lookup against the current snapshot, with blocking variants that
//! couple polling to tree refreshes.

use crate::element::{Element, ElementTree};
use crate::errors::AutomationError;
use crate::selector::Selector;
use crate::wait::{wait, WaitSpec};
use crate::SessionInner;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// A high-level API for finding and waiting on elements of a session's host.
///
/// `get` searches the snapshot the session currently holds and never blocks;
/// `wait_for` polls `get`, refreshing the snapshot before every sleep so
/// each retry observes fresh UI state. Elements can appear asynchronously
/// (animations, navigation, lazy rendering), which is why polling for
/// existence is inseparable from re-synchronizing the tree.
#[derive(Clone)]
pub struct ChildResolver {
    inner: Arc<SessionInner>,
    selector: Selector,
    timeout: Duration,
    root: Option<Element>,
}

impl ChildResolver {
    pub(crate) fn new(inner: Arc<SessionInner>, selector: Selector) -> Self {
        let timeout = inner.config.default_timeout;
        Self {
            inner,
            selector,
            timeout,
            root: None,
        }
    }

    /// Set a default timeout for waiting operations on this resolver
    /// instance, used when no per-call timeout is given.
    pub fn set_default_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Scope the search to the subtree under `element`. The scope is carried
    /// by identity: after a refresh it is re-resolved against the fresh
    /// snapshot rather than dereferenced blindly.
    pub fn within(mut self, element: Element) -> Self {
        self.root = Some(element);
        self
    }

    /// Synchronous, non-blocking search of the current snapshot only.
    ///
    /// All direct children of the scope are tested before any grandchild is
    /// considered, then each child's subtree is searched the same way; the
    /// first match in that order wins, so a shallower match always beats a
    /// deeper one. No secondary ordering is applied.
    #[instrument(level = "debug", skip(self))]
    pub fn get(&self, recursive: bool) -> Result<Element, AutomationError> {
        let tree = self.inner.current_tree();
        let scope = self.scope(&tree)?;
        match &self.selector {
            Selector::Invalid(reason) => Err(AutomationError::InvalidSelector(reason.clone())),
            Selector::Chain(links) => {
                let mut current = scope;
                for link in links {
                    if let Selector::Invalid(reason) = link {
                        return Err(AutomationError::InvalidSelector(reason.clone()));
                    }
                    current = find_scoped(&current, link, recursive).ok_or_else(|| {
                        AutomationError::ElementNotFound(format!(
                            "no child matching {link} under {current:?}"
                        ))
                    })?;
                }
                Ok(current)
            }
            single => find_scoped(&scope, single, recursive).ok_or_else(|| {
                AutomationError::ElementNotFound(format!(
                    "no child matching {single} under {scope:?}"
                ))
            }),
        }
    }

    /// All matches in document order. Chains are resolved link by link, with
    /// the final link collected exhaustively.
    pub fn all(&self, recursive: bool) -> Result<Vec<Element>, AutomationError> {
        let tree = self.inner.current_tree();
        let scope = self.scope(&tree)?;
        match &self.selector {
            Selector::Invalid(reason) => Err(AutomationError::InvalidSelector(reason.clone())),
            Selector::Chain(links) => {
                let Some((last, prefix)) = links.split_last() else {
                    return Ok(Vec::new());
                };
                let mut current = scope;
                for link in prefix {
                    current = find_scoped(&current, link, recursive).ok_or_else(|| {
                        AutomationError::ElementNotFound(format!(
                            "no child matching {link} under {current:?}"
                        ))
                    })?;
                }
                let mut matches = Vec::new();
                collect_scoped(&current, last, recursive, &mut matches);
                Ok(matches)
            }
            single => {
                let mut matches = Vec::new();
                collect_scoped(&scope, single, recursive, &mut matches);
                Ok(matches)
            }
        }
    }

    /// Blocks until a match exists or the timeout elapses.
    ///
    /// On every miss the host's snapshot is refreshed before the poll delay,
    /// so the next probe never runs against stale state. Exhausting the
    /// timeout surfaces as [`AutomationError::Timeout`]; refresh failures
    /// abort the wait immediately.
    #[instrument(level = "debug", skip(self, timeout))]
    pub fn wait_for(
        &self,
        recursive: bool,
        timeout: Option<Duration>,
    ) -> Result<Element, AutomationError> {
        let effective = timeout.unwrap_or(self.timeout);
        debug!(selector = %self.selector, ?effective, "waiting for element");
        let spec = WaitSpec::new(effective, self.inner.config.poll_delay);

        let mut found: Option<Element> = None;
        let mut fatal: Option<AutomationError> = None;
        wait(spec, || match self.get(recursive) {
            Ok(element) => {
                found = Some(element);
                true
            }
            Err(AutomationError::ElementNotFound(_)) => match self.inner.refresh() {
                Ok(_) => false,
                Err(e) => {
                    fatal = Some(e);
                    true
                }
            },
            Err(e) => {
                fatal = Some(e);
                true
            }
        });

        if let Some(e) = fatal {
            return Err(e);
        }
        if let Some(element) = found {
            return Ok(element);
        }
        Err(AutomationError::Timeout(format!(
            "Timed out after {effective:?} waiting for element matching {}",
            self.selector
        )))
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Resolves the search scope against the given snapshot, re-binding a
    /// caller-supplied scope element by provider handle.
    fn scope(&self, tree: &Arc<ElementTree>) -> Result<Element, AutomationError> {
        match &self.root {
            None => Ok(Element::root_of(tree.clone())),
            Some(element) if Arc::ptr_eq(element.tree(), tree) => Ok(element.clone()),
            Some(element) => tree
                .position_of_handle(element.handle())
                .map(|index| Element::at(tree.clone(), index))
                .ok_or_else(|| {
                    AutomationError::ElementNotFound(format!(
                        "scope element {element:?} is no longer present"
                    ))
                }),
        }
    }
}

/// First match under `scope`: every direct child is probed before any
/// grandchild, then subtrees are searched child by child in document order.
pub(crate) fn find_scoped(scope: &Element, selector: &Selector, recursive: bool) -> Option<Element> {
    let children = scope.children();
    for child in &children {
        if selector.matches(child.attributes()) {
            return Some(child.clone());
        }
    }
    if recursive {
        for child in &children {
            if let Some(found) = find_scoped(child, selector, recursive) {
                return Some(found);
            }
        }
    }
    None
}

fn collect_scoped(scope: &Element, selector: &Selector, recursive: bool, out: &mut Vec<Element>) {
    let children = scope.children();
    for child in &children {
        if selector.matches(child.attributes()) {
            out.push(child.clone());
        }
    }
    if recursive {
        for child in &children {
            collect_scoped(child, selector, recursive, out);
        }
    }
}

/// Convenience predicate search over the current snapshot; same traversal
/// order as selector-based `get`.
pub fn find_where(
    scope: &Element,
    recursive: bool,
    predicate: impl Fn(&Element) -> bool + Copy,
) -> Option<Element> {
    let children = scope.children();
    for child in &children {
        if predicate(child) {
            return Some(child.clone());
        }
    }
    if recursive {
        for child in &children {
            if let Some(found) = find_where(child, recursive, predicate) {
                return Some(found);
            }
        }
    }
    None
}
