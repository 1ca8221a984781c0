//! Converts high-level gesture requests into ordered primitive event lists.

use super::events::{
    Direction, InputEvent, InputSequence, KeyEvent, MouseButton, PointerEvent, WHEEL_NOTCH,
};
use super::keys::{keystroke_for_char, Key, MODIFIER_PRESS_ORDER};
use crate::element::Point;
use crate::errors::AutomationError;
use crate::provider::{ScanCodeMapper, ScreenMetrics};
use tracing::trace;

/// Accumulates primitive events for one logical gesture.
///
/// The builder only ever appends; the finished sequence is handed to the
/// dispatcher as a single batch so concurrently synthesized input cannot
/// interleave with it.
pub struct InputSequenceBuilder<'a> {
    scan_codes: &'a dyn ScanCodeMapper,
    screen: &'a dyn ScreenMetrics,
    sequence: InputSequence,
}

impl<'a> InputSequenceBuilder<'a> {
    pub fn new(scan_codes: &'a dyn ScanCodeMapper, screen: &'a dyn ScreenMetrics) -> Self {
        Self {
            scan_codes,
            screen,
            sequence: InputSequence::default(),
        }
    }

    fn key_event(&self, key: Key, direction: Direction) -> KeyEvent {
        KeyEvent {
            key,
            scan_code: self.scan_codes.scan_code(key),
            extended: key.is_extended(),
            direction,
        }
    }

    pub fn key_down(&mut self, key: Key) -> &mut Self {
        let event = self.key_event(key, Direction::Down);
        self.sequence.push(InputEvent::Key(event));
        self
    }

    pub fn key_up(&mut self, key: Key) -> &mut Self {
        let event = self.key_event(key, Direction::Up);
        self.sequence.push(InputEvent::Key(event));
        self
    }

    /// One key press: down immediately followed by up, both carrying the
    /// same extended-key flag.
    pub fn press(&mut self, key: Key) -> &mut Self {
        self.key_down(key);
        self.key_up(key)
    }

    /// A modified chord: requested modifiers go down in canonical order,
    /// non-modifier keys are pressed in caller order, then the modifiers are
    /// released in the same order they were pressed (not reversed; this
    /// matches the observed wire format).
    pub fn chord(&mut self, modifiers: &[Key], keys: &[Key]) -> &mut Self {
        let held: Vec<Key> = MODIFIER_PRESS_ORDER
            .iter()
            .copied()
            .filter(|m| modifiers.contains(m))
            .collect();
        for modifier in &held {
            self.key_down(*modifier);
        }
        for key in keys {
            if key.is_modifier() {
                continue;
            }
            self.press(*key);
        }
        for modifier in &held {
            self.key_up(*modifier);
        }
        self
    }

    /// Emits a down/up pair per character, bracketing with Shift where the
    /// character requires it. Characters with no representable key are
    /// dropped.
    pub fn type_text(&mut self, text: &str) -> &mut Self {
        for c in text.chars() {
            let Some(stroke) = keystroke_for_char(c) else {
                trace!(character = %c.escape_debug(), "no key for character, dropping");
                continue;
            };
            if stroke.shifted {
                self.key_down(Key::Shift);
                self.press(stroke.key);
                self.key_up(Key::Shift);
            } else {
                self.press(stroke.key);
            }
        }
        self
    }

    /// Absolute pointer move to a screen-space point, normalized to the
    /// 0-65535 grid of the screen that owns the point.
    pub fn move_to(&mut self, point: Point) -> Result<&mut Self, AutomationError> {
        let (width, height) = self.screen.size_of_screen_containing(point)?;
        if width == 0 || height == 0 {
            return Err(AutomationError::PlatformError(format!(
                "screen containing ({}, {}) reported zero size",
                point.x, point.y
            )));
        }
        let event = PointerEvent::Move {
            x: normalize(point.x, width),
            y: normalize(point.y, height),
        };
        self.sequence.push(InputEvent::Pointer(event));
        Ok(self)
    }

    pub fn button_down(&mut self, button: MouseButton) -> &mut Self {
        self.sequence.push(InputEvent::Pointer(PointerEvent::Button {
            button,
            direction: Direction::Down,
        }));
        self
    }

    pub fn button_up(&mut self, button: MouseButton) -> &mut Self {
        self.sequence.push(InputEvent::Pointer(PointerEvent::Button {
            button,
            direction: Direction::Up,
        }));
        self
    }

    /// A click: optional move to the target point, then exactly one down
    /// immediately followed by one up with no intervening move.
    pub fn click(
        &mut self,
        button: MouseButton,
        at: Option<Point>,
    ) -> Result<&mut Self, AutomationError> {
        if let Some(point) = at {
            self.move_to(point)?;
        }
        self.button_down(button);
        self.button_up(button);
        Ok(self)
    }

    /// Two clicks back-to-back. Inter-click timing is the dispatcher's
    /// concern, not encoded here.
    pub fn double_click(
        &mut self,
        button: MouseButton,
        at: Option<Point>,
    ) -> Result<&mut Self, AutomationError> {
        self.click(button, at)?;
        self.click(button, None)
    }

    /// Wheel scroll of `clicks` notches; negative scrolls the other way.
    pub fn wheel(&mut self, clicks: i32) -> &mut Self {
        self.sequence.push(InputEvent::Pointer(PointerEvent::Wheel {
            delta: clicks * WHEEL_NOTCH,
        }));
        self
    }

    pub fn build(self) -> InputSequence {
        self.sequence
    }
}

/// Maps a pixel coordinate onto the 0-65535 absolute grid. The +1 bias keeps
/// the extreme edge from rounding back into the previous cell.
fn normalize(pixel: i32, screen_dim: u32) -> i32 {
    (pixel as i64 * 65536 / screen_dim as i64) as i32 + 1
}
