use super::keys::Key;
use serde::{Deserialize, Serialize};

/// Wheel delta for one notch of scrolling.
pub const WHEEL_NOTCH: i32 = 120;

/// Key or button transition direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Down,
    Up,
}

/// One key transition as handed to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    /// Hardware scan code, derived deterministically from the virtual key.
    pub scan_code: u16,
    /// Extended-key flag; set only for the E0-prefixed key set.
    pub extended: bool,
    /// Up events carry the key-up marker via this field.
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// One mouse transition as handed to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Absolute move; coordinates are already normalized to the 0-65535
    /// grid of the owning screen.
    Move { x: i32, y: i32 },
    Button {
        button: MouseButton,
        direction: Direction,
    },
    /// Signed wheel delta in multiples of [`WHEEL_NOTCH`].
    Wheel { delta: i32 },
}

/// A primitive input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
}

/// An ordered batch of primitive input events.
///
/// Built once per gesture and consumed exactly once by the dispatcher.
/// Dispatch order is construction order; nothing downstream may reorder it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSequence {
    events: Vec<InputEvent>,
}

impl InputSequence {
    pub(crate) fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<InputEvent> {
        self.events
    }
}
