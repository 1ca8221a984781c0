//! Drives a small scripted form end to end: waits for a lazily rendered
//! submit button, fills the name field, clicks submit, and prints every
//! input batch that would have reached the OS.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uidriver::{
    AutomationError, AutomationProvider, Bounds, CacheRequest, HostId, InputDispatcher,
    InputSequence, NodeAttributes, NodeHandle, Pattern, Point, ScreenMetrics, Session,
    SessionConfig, StaticScanCodeMapper,
};

const WINDOW: NodeHandle = 1;
const NAME_FIELD: NodeHandle = 2;
const SUBMIT: NodeHandle = 3;

/// A form whose submit button only renders once the page "settles".
struct ScriptedForm {
    ready_at: Instant,
}

impl ScriptedForm {
    fn node(&self, handle: NodeHandle) -> Option<NodeAttributes> {
        let mut table = HashMap::new();
        table.insert(
            WINDOW,
            NodeAttributes {
                name: Some("Feedback".into()),
                bounds: Some(Bounds { x: 0, y: 0, width: 640, height: 480 }),
                enabled: true,
                ..Default::default()
            },
        );
        table.insert(
            NAME_FIELD,
            NodeAttributes {
                id: Some("name".into()),
                name: Some("Your name".into()),
                bounds: Some(Bounds { x: 20, y: 40, width: 300, height: 28 }),
                enabled: true,
                patterns: vec![Pattern::Value],
                ..Default::default()
            },
        );
        if Instant::now() >= self.ready_at {
            table.insert(
                SUBMIT,
                NodeAttributes {
                    id: Some("submit".into()),
                    name: Some("Submit".into()),
                    bounds: Some(Bounds { x: 20, y: 90, width: 120, height: 32 }),
                    enabled: true,
                    patterns: vec![Pattern::Invoke],
                    ..Default::default()
                },
            );
        }
        table.remove(&handle)
    }

    fn children(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        match handle {
            WINDOW if Instant::now() >= self.ready_at => vec![NAME_FIELD, SUBMIT],
            WINDOW => vec![NAME_FIELD],
            _ => Vec::new(),
        }
    }
}

impl AutomationProvider for ScriptedForm {
    fn first_child(&self, node: NodeHandle) -> Result<Option<NodeHandle>, AutomationError> {
        Ok(self.children(node).first().copied())
    }

    fn next_sibling(&self, node: NodeHandle) -> Result<Option<NodeHandle>, AutomationError> {
        let siblings = self.children(WINDOW);
        let position = siblings.iter().position(|&n| n == node);
        Ok(position.and_then(|p| siblings.get(p + 1).copied()))
    }

    fn properties(
        &self,
        node: NodeHandle,
        _cache: &CacheRequest,
    ) -> Result<NodeAttributes, AutomationError> {
        self.node(node).ok_or_else(|| {
            AutomationError::TransientUnavailable(format!("node {node} vanished mid-walk"))
        })
    }
}

struct PrintingDispatcher {
    batches: Mutex<u32>,
}

impl InputDispatcher for PrintingDispatcher {
    fn submit(&self, sequence: InputSequence) -> Result<(), AutomationError> {
        let mut batches = self.batches.lock().unwrap();
        *batches += 1;
        println!("batch {} ({} events):", batches, sequence.len());
        for event in sequence.events() {
            println!("  {event:?}");
        }
        Ok(())
    }
}

struct SingleScreen;

impl ScreenMetrics for SingleScreen {
    fn size_of_screen_containing(&self, _point: Point) -> Result<(u32, u32), AutomationError> {
        Ok((1920, 1080))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let form = Arc::new(ScriptedForm {
        ready_at: Instant::now() + Duration::from_millis(300),
    });
    let session = Session::attach(
        HostId::new(WINDOW, "feedback form"),
        form,
        Arc::new(PrintingDispatcher {
            batches: Mutex::new(0),
        }),
        Arc::new(StaticScanCodeMapper),
        Arc::new(SingleScreen),
        SessionConfig::default(),
    )?;

    let name = session.locator("#name").get(true)?;
    session.type_text(&name, "Ada Lovelace")?;

    // The submit button renders late; wait_for keeps re-synchronizing the
    // snapshot until it shows up.
    let submit = session
        .locator("#submit")
        .wait_for(true, Some(Duration::from_secs(5)))?;
    session.click(&submit)?;

    println!("form submitted");
    Ok(())
}
