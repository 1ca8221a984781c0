use crate::errors::AutomationError;
use crate::provider::NodeHandle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// An element's bounding rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn midpoint(&self) -> Point {
        Point {
            x: self.x + self.width / 2,
            y: self.y + self.height / 2,
        }
    }
}

/// A capability an element exposes. Control "types" (button, edit, grid, …)
/// differ only in which of these they support, so elements carry a flat
/// capability set instead of a nominal subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    Invoke,
    Value,
    Toggle,
    Scroll,
    Text,
    Selection,
}

/// Properties reported by the provider for one node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeAttributes {
    #[serde(default, skip_serializing_if = "is_empty_string")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "is_empty_string")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub focused: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<Pattern>,
}

/// Helper functions for clean serialization
fn is_empty_string(opt: &Option<String>) -> bool {
    match opt {
        Some(s) => s.is_empty(),
        None => true,
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Identity of the window or page that owns a tree of elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostId {
    /// Provider handle of the host's anchor node (the walk starts here).
    pub anchor: NodeHandle,
    /// Human-readable label, used in error messages and spans.
    pub label: String,
}

impl HostId {
    pub fn new(anchor: NodeHandle, label: impl Into<String>) -> Self {
        Self {
            anchor,
            label: label.into(),
        }
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (anchor {})", self.label, self.anchor)
    }
}

/// One automatable element inside a snapshot.
///
/// Children are exclusively owned by the snapshot arena; the parent link is a
/// plain index, valid only within the snapshot it was captured in.
#[derive(Debug, Clone)]
pub(crate) struct ElementNode {
    pub(crate) handle: NodeHandle,
    pub(crate) attrs: NodeAttributes,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
}

/// An immutable snapshot of a host's element subtree.
///
/// A snapshot is never mutated in place: a refresh builds a whole new tree
/// and swaps it into the host's slot, so a reader holding an `Arc` to an old
/// snapshot keeps seeing that snapshot in full.
#[derive(Debug)]
pub struct ElementTree {
    host: HostId,
    captured_at: Instant,
    nodes: Vec<ElementNode>,
}

impl ElementTree {
    pub(crate) fn new(host: HostId, nodes: Vec<ElementNode>) -> Self {
        debug_assert!(!nodes.is_empty(), "a snapshot always contains its root");
        Self {
            host,
            captured_at: Instant::now(),
            nodes,
        }
    }

    pub fn host(&self) -> &HostId {
        &self.host
    }

    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }

    /// Total number of nodes in the snapshot, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node(&self, index: usize) -> &ElementNode {
        &self.nodes[index]
    }

    /// Position of the node with the given provider handle, if it survived
    /// into this snapshot. Used to re-resolve stale element identities.
    pub(crate) fn position_of_handle(&self, handle: NodeHandle) -> Option<usize> {
        self.nodes.iter().position(|n| n.handle == handle)
    }
}

/// A handle to one element within a specific snapshot.
///
/// Cheap to clone; keeps its snapshot alive. After the owning host refreshes,
/// the handle stays readable against its old snapshot but is stale for
/// interaction and should be re-resolved by identity.
#[derive(Clone)]
pub struct Element {
    tree: Arc<ElementTree>,
    index: usize,
}

impl Element {
    /// The root element of a snapshot.
    pub fn root_of(tree: Arc<ElementTree>) -> Self {
        Self { tree, index: 0 }
    }

    pub(crate) fn at(tree: Arc<ElementTree>, index: usize) -> Self {
        Self { tree, index }
    }

    fn node(&self) -> &ElementNode {
        self.tree.node(self.index)
    }

    /// The provider handle backing this element. Stable across snapshots for
    /// as long as the provider keeps the underlying node alive.
    pub fn handle(&self) -> NodeHandle {
        self.node().handle
    }

    pub fn tree(&self) -> &Arc<ElementTree> {
        &self.tree
    }

    pub fn attributes(&self) -> &NodeAttributes {
        &self.node().attrs
    }

    pub fn id(&self) -> Option<&str> {
        self.node().attrs.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.node().attrs.name.as_deref()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.node().attrs.bounds
    }

    pub fn is_enabled(&self) -> bool {
        self.node().attrs.enabled
    }

    pub fn is_focused(&self) -> bool {
        self.node().attrs.focused
    }

    pub fn supports(&self, pattern: Pattern) -> bool {
        self.node().attrs.patterns.contains(&pattern)
    }

    /// Parent element within the same snapshot. `None` at the root.
    pub fn parent(&self) -> Option<Element> {
        self.node()
            .parent
            .map(|index| Element::at(self.tree.clone(), index))
    }

    /// Direct children, in document order.
    pub fn children(&self) -> Vec<Element> {
        self.node()
            .children
            .iter()
            .map(|&index| Element::at(self.tree.clone(), index))
            .collect()
    }

    /// The point synthetic pointer input should target: the midpoint of the
    /// element's bounding rectangle.
    pub fn clickable_point(&self) -> Result<Point, AutomationError> {
        match self.bounds() {
            Some(b) if b.width > 0 && b.height > 0 => Ok(b.midpoint()),
            Some(_) => Err(AutomationError::NoClickablePoint(format!(
                "{self:?} has a degenerate bounding rectangle"
            ))),
            None => Err(AutomationError::NoClickablePoint(format!(
                "{self:?} reports no bounding rectangle"
            ))),
        }
    }

    /// Detach this element (and its subtree) into a serializable snapshot.
    pub fn to_serializable(&self) -> SerializableNode {
        let attrs = self.attributes();
        SerializableNode {
            id: attrs.id.clone(),
            name: attrs.name.clone(),
            bounds: attrs.bounds,
            enabled: attrs.enabled,
            focused: attrs.focused,
            patterns: attrs.patterns.clone(),
            children: self
                .children()
                .iter()
                .map(|c| c.to_serializable())
                .collect(),
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree) && self.index == other.index
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Element");
        s.field("handle", &self.handle());
        if let Some(id) = self.id() {
            s.field("id", &id);
        }
        if let Some(name) = self.name() {
            s.field("name", &name);
        }
        s.finish()
    }
}

/// Detached, serializable form of an element subtree.
///
/// Carries the same data as a live [`Element`] but cannot perform any
/// automation; useful for storing or transmitting captured UI state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableNode {
    #[serde(default, skip_serializing_if = "is_empty_string")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "is_empty_string")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub focused: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<Pattern>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SerializableNode>,
}

impl SerializableNode {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Best label for this node: name, falling back to id, then a placeholder.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.id.clone())
            .unwrap_or_else(|| "<unnamed>".to_string())
    }
}
