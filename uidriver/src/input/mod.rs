//! Synthetic input: virtual keys, primitive events and the sequence builder
//! that turns gesture requests into ordered event batches.

pub mod builder;
pub mod events;
pub mod keys;

pub use builder::InputSequenceBuilder;
pub use events::{
    Direction, InputEvent, InputSequence, KeyEvent, MouseButton, PointerEvent, WHEEL_NOTCH,
};
pub use keys::{keystroke_for_char, set1_scan_code, Key, Keystroke};
