//! Browser-hosted element resolution.
//!
//! A web page exposes no native accessibility walk; instead a script runs in
//! the page and returns a JSON snapshot of the interesting DOM subtree. This
//! module adapts that channel to [`AutomationProvider`], so the same
//! synchronizer and resolvers drive page elements and desktop windows alike.

use crate::element::{Bounds, HostId, NodeAttributes, Pattern};
use crate::errors::AutomationError;
use crate::provider::{AutomationProvider, BrowserScriptBridge, CacheRequest, NodeHandle};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Provider handle of a page's root node.
pub const PAGE_ROOT: NodeHandle = 0;

/// Script evaluated in the page to capture the element snapshot. Produces
/// the JSON shape decoded by [`PageNode`].
pub const SNAPSHOT_SCRIPT: &str = r#"
(function () {
    function capture(el) {
        var r = el.getBoundingClientRect();
        var patterns = [];
        if (el.onclick || el.tagName === 'BUTTON' || el.tagName === 'A') patterns.push('invoke');
        if ('value' in el) patterns.push('value');
        if (el.type === 'checkbox' || el.type === 'radio') patterns.push('toggle');
        if (el.scrollHeight > el.clientHeight) patterns.push('scroll');
        return {
            id: el.id || null,
            name: el.getAttribute('aria-label') || el.innerText || null,
            bounds: { x: Math.round(r.x), y: Math.round(r.y),
                      width: Math.round(r.width), height: Math.round(r.height) },
            enabled: !el.disabled,
            focused: document.activeElement === el,
            patterns: patterns,
            children: Array.prototype.map.call(el.children, capture)
        };
    }
    return JSON.stringify(capture(document.body));
})()
"#;

/// One node of the JSON snapshot returned by the page script.
#[derive(Debug, Clone, Deserialize)]
struct PageNode {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    bounds: Option<Bounds>,
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default)]
    focused: bool,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    children: Vec<PageNode>,
}

fn default_true() -> bool {
    true
}

fn pattern_from_name(name: &str) -> Option<Pattern> {
    match name {
        "invoke" => Some(Pattern::Invoke),
        "value" => Some(Pattern::Value),
        "toggle" => Some(Pattern::Toggle),
        "scroll" => Some(Pattern::Scroll),
        "text" => Some(Pattern::Text),
        "selection" => Some(Pattern::Selection),
        _ => None,
    }
}

impl PageNode {
    fn attributes(&self) -> NodeAttributes {
        NodeAttributes {
            id: self.id.clone(),
            name: self.name.clone(),
            bounds: self.bounds,
            enabled: self.enabled,
            focused: self.focused,
            // Unknown capability names from newer page scripts are ignored.
            patterns: self
                .patterns
                .iter()
                .filter_map(|p| pattern_from_name(p))
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct FlatNode {
    attrs: NodeAttributes,
    first_child: Option<NodeHandle>,
    next_sibling: Option<NodeHandle>,
}

/// [`AutomationProvider`] over a page snapshot fetched through a script
/// bridge.
///
/// Handles are pre-order positions within the most recent snapshot; the
/// property read of [`PAGE_ROOT`] is the snapshot boundary, so every tree
/// refresh re-executes the capture script exactly once. A handle that does
/// not survive into the current snapshot reports transient unavailability,
/// which is precisely what happened: the page changed underneath the walk.
pub struct BrowserPageProvider {
    bridge: Arc<dyn BrowserScriptBridge>,
    script: String,
    nodes: RwLock<HashMap<NodeHandle, FlatNode>>,
}

impl BrowserPageProvider {
    pub fn new(bridge: Arc<dyn BrowserScriptBridge>) -> Self {
        Self::with_script(bridge, SNAPSHOT_SCRIPT)
    }

    /// Use a custom capture script; it must produce the same JSON shape.
    pub fn with_script(bridge: Arc<dyn BrowserScriptBridge>, script: impl Into<String>) -> Self {
        Self {
            bridge,
            script: script.into(),
            nodes: RwLock::new(HashMap::new()),
        }
    }

    /// The host identity to attach a session to.
    pub fn host(label: impl Into<String>) -> HostId {
        HostId::new(PAGE_ROOT, label)
    }

    fn fetch(&self) -> Result<(), AutomationError> {
        let raw = self.bridge.execute(&self.script)?;
        let page: PageNode = serde_json::from_str(&raw).map_err(|e| {
            AutomationError::PlatformError(format!("malformed page snapshot: {e}"))
        })?;

        let mut flat = HashMap::new();
        let mut next = PAGE_ROOT;
        flatten(&page, &mut next, &mut flat);
        debug!(node_count = flat.len(), "captured page snapshot");

        *self.nodes.write().unwrap_or_else(|e| e.into_inner()) = flat;
        Ok(())
    }

    fn lookup(&self, node: NodeHandle) -> Result<FlatNode, AutomationError> {
        self.nodes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&node)
            .cloned()
            .ok_or_else(|| {
                AutomationError::TransientUnavailable(format!(
                    "page node {node} vanished; the page changed since the last snapshot"
                ))
            })
    }
}

fn flatten(node: &PageNode, next: &mut NodeHandle, out: &mut HashMap<NodeHandle, FlatNode>) {
    let handle = *next;
    *next += 1;
    out.insert(
        handle,
        FlatNode {
            attrs: node.attributes(),
            first_child: None,
            next_sibling: None,
        },
    );

    let mut previous: Option<NodeHandle> = None;
    for child in &node.children {
        let child_handle = *next;
        flatten(child, next, out);
        match previous {
            None => {
                if let Some(parent) = out.get_mut(&handle) {
                    parent.first_child = Some(child_handle);
                }
            }
            Some(prev) => {
                if let Some(sibling) = out.get_mut(&prev) {
                    sibling.next_sibling = Some(child_handle);
                }
            }
        }
        previous = Some(child_handle);
    }
}

impl AutomationProvider for BrowserPageProvider {
    fn first_child(&self, node: NodeHandle) -> Result<Option<NodeHandle>, AutomationError> {
        Ok(self.lookup(node)?.first_child)
    }

    fn next_sibling(&self, node: NodeHandle) -> Result<Option<NodeHandle>, AutomationError> {
        Ok(self.lookup(node)?.next_sibling)
    }

    fn properties(
        &self,
        node: NodeHandle,
        _cache: &CacheRequest,
    ) -> Result<NodeAttributes, AutomationError> {
        if node == PAGE_ROOT {
            self.fetch()?;
        }
        Ok(self.lookup(node)?.attrs)
    }
}
