//! In-memory collaborators shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uidriver::{
    AutomationError, AutomationProvider, Bounds, CacheRequest, HostId, InputDispatcher,
    InputSequence, NodeAttributes, NodeHandle, Point, ScreenMetrics, Session, SessionConfig,
    StaticScanCodeMapper,
};

pub const ROOT: NodeHandle = 1;

/// Attributes for a clickable, enabled node.
pub fn attrs(id: &str, name: &str) -> NodeAttributes {
    NodeAttributes {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        bounds: Some(Bounds {
            x: 10,
            y: 10,
            width: 80,
            height: 30,
        }),
        enabled: true,
        ..Default::default()
    }
}

struct PendingInsert {
    parent: NodeHandle,
    node: NodeHandle,
    attrs: NodeAttributes,
    due: Instant,
}

#[derive(Default)]
struct FakeUi {
    attrs: HashMap<NodeHandle, NodeAttributes>,
    children: HashMap<NodeHandle, Vec<NodeHandle>>,
    pending: Vec<PendingInsert>,
    fail_property_reads: u32,
    walk_starts: u32,
}

impl FakeUi {
    fn apply_due(&mut self) {
        let now = Instant::now();
        let mut remaining = Vec::new();
        for insert in self.pending.drain(..) {
            if insert.due <= now {
                self.attrs.insert(insert.node, insert.attrs);
                self.children
                    .entry(insert.parent)
                    .or_default()
                    .push(insert.node);
            } else {
                remaining.push(insert);
            }
        }
        self.pending = remaining;
    }
}

/// Scriptable provider over a flat node table. Nodes can be inserted
/// immediately or on a deadline, and property reads can be made to fail a
/// fixed number of times to exercise transient-unavailability handling.
pub struct FakeProvider {
    root: NodeHandle,
    ui: Mutex<FakeUi>,
}

impl FakeProvider {
    pub fn new(root_attrs: NodeAttributes) -> Self {
        let mut ui = FakeUi::default();
        ui.attrs.insert(ROOT, root_attrs);
        Self {
            root: ROOT,
            ui: Mutex::new(ui),
        }
    }

    pub fn add(&self, parent: NodeHandle, node: NodeHandle, attrs: NodeAttributes) {
        let mut ui = self.ui.lock().unwrap();
        ui.attrs.insert(node, attrs);
        ui.children.entry(parent).or_default().push(node);
    }

    /// Make the node appear only once `after` has elapsed, as a lazily
    /// rendered element would.
    pub fn add_after(
        &self,
        parent: NodeHandle,
        node: NodeHandle,
        attrs: NodeAttributes,
        after: Duration,
    ) {
        self.ui.lock().unwrap().pending.push(PendingInsert {
            parent,
            node,
            attrs,
            due: Instant::now() + after,
        });
    }

    pub fn remove(&self, node: NodeHandle) {
        let mut ui = self.ui.lock().unwrap();
        ui.attrs.remove(&node);
        for children in ui.children.values_mut() {
            children.retain(|&c| c != node);
        }
    }

    /// The next `count` property reads report transient unavailability.
    pub fn fail_next_property_reads(&self, count: u32) {
        self.ui.lock().unwrap().fail_property_reads = count;
    }

    /// How many walks have started (root property reads).
    pub fn walk_starts(&self) -> u32 {
        self.ui.lock().unwrap().walk_starts
    }
}

impl AutomationProvider for FakeProvider {
    fn first_child(&self, node: NodeHandle) -> Result<Option<NodeHandle>, AutomationError> {
        let mut ui = self.ui.lock().unwrap();
        ui.apply_due();
        Ok(ui.children.get(&node).and_then(|c| c.first().copied()))
    }

    fn next_sibling(&self, node: NodeHandle) -> Result<Option<NodeHandle>, AutomationError> {
        let ui = self.ui.lock().unwrap();
        for children in ui.children.values() {
            if let Some(position) = children.iter().position(|&c| c == node) {
                return Ok(children.get(position + 1).copied());
            }
        }
        Ok(None)
    }

    fn properties(
        &self,
        node: NodeHandle,
        _cache: &CacheRequest,
    ) -> Result<NodeAttributes, AutomationError> {
        let mut ui = self.ui.lock().unwrap();
        ui.apply_due();
        if node == self.root {
            ui.walk_starts += 1;
        }
        if ui.fail_property_reads > 0 {
            ui.fail_property_reads -= 1;
            return Err(AutomationError::TransientUnavailable(format!(
                "node {node} vanished mid-walk"
            )));
        }
        ui.attrs.get(&node).cloned().ok_or_else(|| {
            AutomationError::TransientUnavailable(format!("node {node} vanished mid-walk"))
        })
    }
}

/// Dispatcher that records every submitted batch.
#[derive(Default)]
pub struct RecordingDispatcher {
    sequences: Mutex<Vec<InputSequence>>,
}

impl RecordingDispatcher {
    pub fn submitted(&self) -> Vec<InputSequence> {
        self.sequences.lock().unwrap().clone()
    }
}

impl InputDispatcher for RecordingDispatcher {
    fn submit(&self, sequence: InputSequence) -> Result<(), AutomationError> {
        self.sequences.lock().unwrap().push(sequence);
        Ok(())
    }
}

pub struct FixedScreen;

impl ScreenMetrics for FixedScreen {
    fn size_of_screen_containing(&self, _point: Point) -> Result<(u32, u32), AutomationError> {
        Ok((1920, 1080))
    }
}

/// Fast pacing for tests: tight polling, no settle delay.
pub fn test_config() -> SessionConfig {
    SessionConfig {
        poll_delay: Duration::from_millis(10),
        refresh_retry_delay: Duration::from_millis(10),
        settle_delay: Duration::ZERO,
        ..Default::default()
    }
}

pub struct Fixture {
    pub provider: Arc<FakeProvider>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub session: Session,
}

/// Attaches a session to a fake host whose root is already populated.
pub fn attach(provider: Arc<FakeProvider>) -> Fixture {
    attach_with(provider, test_config())
}

pub fn attach_with(provider: Arc<FakeProvider>, config: SessionConfig) -> Fixture {
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let session = Session::attach(
        HostId::new(ROOT, "fake host"),
        provider.clone(),
        dispatcher.clone(),
        Arc::new(StaticScanCodeMapper),
        Arc::new(FixedScreen),
        config,
    )
    .expect("attach should capture the initial snapshot");
    Fixture {
        provider,
        dispatcher,
        session,
    }
}
