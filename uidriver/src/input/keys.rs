//! Virtual keys and the fixed mappings hanging off them: the extended-key
//! set, the canonical modifier ordering, character-to-keystroke translation
//! and a static scan-code table.

use serde::{Deserialize, Serialize};

/// A virtual key. Discriminants are Win32 virtual-key codes; they double as
/// the wire value carried in synthesized key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum Key {
    ControlBreak = 0x03,
    Backspace = 0x08,
    Tab = 0x09,
    Return = 0x0D,
    Shift = 0x10,
    Control = 0x11,
    Alt = 0x12,
    Pause = 0x13,
    CapsLock = 0x14,
    Escape = 0x1B,
    Space = 0x20,
    PageUp = 0x21,
    PageDown = 0x22,
    End = 0x23,
    Home = 0x24,
    Left = 0x25,
    Up = 0x26,
    Right = 0x27,
    Down = 0x28,
    PrintScreen = 0x2C,
    Insert = 0x2D,
    Delete = 0x2E,
    D0 = 0x30,
    D1 = 0x31,
    D2 = 0x32,
    D3 = 0x33,
    D4 = 0x34,
    D5 = 0x35,
    D6 = 0x36,
    D7 = 0x37,
    D8 = 0x38,
    D9 = 0x39,
    A = 0x41,
    B = 0x42,
    C = 0x43,
    D = 0x44,
    E = 0x45,
    F = 0x46,
    G = 0x47,
    H = 0x48,
    I = 0x49,
    J = 0x4A,
    K = 0x4B,
    L = 0x4C,
    M = 0x4D,
    N = 0x4E,
    O = 0x4F,
    P = 0x50,
    Q = 0x51,
    R = 0x52,
    S = 0x53,
    T = 0x54,
    U = 0x55,
    V = 0x56,
    W = 0x57,
    X = 0x58,
    Y = 0x59,
    Z = 0x5A,
    LeftWin = 0x5B,
    RightWin = 0x5C,
    Numpad0 = 0x60,
    Numpad1 = 0x61,
    Numpad2 = 0x62,
    Numpad3 = 0x63,
    Numpad4 = 0x64,
    Numpad5 = 0x65,
    Numpad6 = 0x66,
    Numpad7 = 0x67,
    Numpad8 = 0x68,
    Numpad9 = 0x69,
    NumpadMultiply = 0x6A,
    NumpadAdd = 0x6B,
    NumpadSubtract = 0x6D,
    NumpadDecimal = 0x6E,
    NumpadDivide = 0x6F,
    F1 = 0x70,
    F2 = 0x71,
    F3 = 0x72,
    F4 = 0x73,
    F5 = 0x74,
    F6 = 0x75,
    F7 = 0x76,
    F8 = 0x77,
    F9 = 0x78,
    F10 = 0x79,
    F11 = 0x7A,
    F12 = 0x7B,
    NumLock = 0x90,
    ScrollLock = 0x91,
    LeftShift = 0xA0,
    RightShift = 0xA1,
    LeftControl = 0xA2,
    RightControl = 0xA3,
    LeftAlt = 0xA4,
    RightAlt = 0xA5,
    Semicolon = 0xBA,
    Equals = 0xBB,
    Comma = 0xBC,
    Minus = 0xBD,
    Period = 0xBE,
    Slash = 0xBF,
    Grave = 0xC0,
    LeftBracket = 0xDB,
    Backslash = 0xDC,
    RightBracket = 0xDD,
    Apostrophe = 0xDE,
}

impl Key {
    /// The Win32 virtual-key code backing this key.
    pub fn virtual_key(self) -> u16 {
        self as u16
    }

    /// Whether this key brackets other keys in a chord rather than being
    /// pressed on its own.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Key::Alt
                | Key::LeftAlt
                | Key::RightAlt
                | Key::Control
                | Key::LeftControl
                | Key::RightControl
                | Key::Shift
                | Key::LeftShift
                | Key::RightShift
        )
    }

    /// Whether synthesized events for this key carry the extended-key flag.
    ///
    /// The set mirrors the hardware E0-prefixed scan codes: RightAlt and
    /// RightControl are extended while LeftControl and every Shift variant
    /// are not. That asymmetry is a scan-code quirk and must hold exactly.
    pub fn is_extended(self) -> bool {
        matches!(
            self,
            Key::Alt
                | Key::LeftAlt
                | Key::RightAlt
                | Key::Control
                | Key::RightControl
                | Key::Insert
                | Key::Delete
                | Key::Home
                | Key::End
                | Key::PageUp
                | Key::PageDown
                | Key::Right
                | Key::Up
                | Key::Left
                | Key::Down
                | Key::NumLock
                | Key::ControlBreak
                | Key::PrintScreen
                | Key::NumpadDivide
        )
    }
}

/// Canonical order in which chord modifiers are pressed. Only the modifiers
/// a chord actually requests are included, in this order; releases reuse the
/// same order.
pub(crate) const MODIFIER_PRESS_ORDER: [Key; 9] = [
    Key::Alt,
    Key::LeftAlt,
    Key::RightAlt,
    Key::Control,
    Key::LeftControl,
    Key::RightControl,
    Key::Shift,
    Key::LeftShift,
    Key::RightShift,
];

/// One key plus whether Shift must bracket it to produce a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    pub key: Key,
    pub shifted: bool,
}

impl Keystroke {
    fn plain(key: Key) -> Self {
        Self { key, shifted: false }
    }

    fn shifted(key: Key) -> Self {
        Self { key, shifted: true }
    }
}

/// Maps one character to the keystroke that produces it on a US layout.
///
/// Characters with no representable key return `None` and are dropped by the
/// caller; that is not an error.
pub fn keystroke_for_char(c: char) -> Option<Keystroke> {
    if c.is_ascii_alphabetic() {
        return Some(Keystroke {
            key: letter_key(c.to_ascii_uppercase()),
            shifted: c.is_ascii_uppercase(),
        });
    }
    if c.is_ascii_digit() {
        return Some(Keystroke::plain(digit_key(c)));
    }
    let stroke = match c {
        ' ' => Keystroke::plain(Key::Space),
        '\n' | '\r' => Keystroke::plain(Key::Return),
        '\t' => Keystroke::plain(Key::Tab),
        '!' => Keystroke::shifted(Key::D1),
        '@' => Keystroke::shifted(Key::D2),
        '#' => Keystroke::shifted(Key::D3),
        '$' => Keystroke::shifted(Key::D4),
        '%' => Keystroke::shifted(Key::D5),
        '^' => Keystroke::shifted(Key::D6),
        '&' => Keystroke::shifted(Key::D7),
        '*' => Keystroke::shifted(Key::D8),
        '(' => Keystroke::shifted(Key::D9),
        ')' => Keystroke::shifted(Key::D0),
        '-' => Keystroke::plain(Key::Minus),
        '_' => Keystroke::shifted(Key::Minus),
        '=' => Keystroke::plain(Key::Equals),
        '+' => Keystroke::shifted(Key::Equals),
        '[' => Keystroke::plain(Key::LeftBracket),
        '{' => Keystroke::shifted(Key::LeftBracket),
        ']' => Keystroke::plain(Key::RightBracket),
        '}' => Keystroke::shifted(Key::RightBracket),
        '\\' => Keystroke::plain(Key::Backslash),
        '|' => Keystroke::shifted(Key::Backslash),
        ';' => Keystroke::plain(Key::Semicolon),
        ':' => Keystroke::shifted(Key::Semicolon),
        '\'' => Keystroke::plain(Key::Apostrophe),
        '"' => Keystroke::shifted(Key::Apostrophe),
        ',' => Keystroke::plain(Key::Comma),
        '<' => Keystroke::shifted(Key::Comma),
        '.' => Keystroke::plain(Key::Period),
        '>' => Keystroke::shifted(Key::Period),
        '/' => Keystroke::plain(Key::Slash),
        '?' => Keystroke::shifted(Key::Slash),
        '`' => Keystroke::plain(Key::Grave),
        '~' => Keystroke::shifted(Key::Grave),
        _ => return None,
    };
    Some(stroke)
}

fn letter_key(upper: char) -> Key {
    match upper {
        'A' => Key::A,
        'B' => Key::B,
        'C' => Key::C,
        'D' => Key::D,
        'E' => Key::E,
        'F' => Key::F,
        'G' => Key::G,
        'H' => Key::H,
        'I' => Key::I,
        'J' => Key::J,
        'K' => Key::K,
        'L' => Key::L,
        'M' => Key::M,
        'N' => Key::N,
        'O' => Key::O,
        'P' => Key::P,
        'Q' => Key::Q,
        'R' => Key::R,
        'S' => Key::S,
        'T' => Key::T,
        'U' => Key::U,
        'V' => Key::V,
        'W' => Key::W,
        'X' => Key::X,
        'Y' => Key::Y,
        'Z' => Key::Z,
        _ => unreachable!("caller filters to ASCII letters"),
    }
}

fn digit_key(digit: char) -> Key {
    match digit {
        '0' => Key::D0,
        '1' => Key::D1,
        '2' => Key::D2,
        '3' => Key::D3,
        '4' => Key::D4,
        '5' => Key::D5,
        '6' => Key::D6,
        '7' => Key::D7,
        '8' => Key::D8,
        '9' => Key::D9,
        _ => unreachable!("caller filters to ASCII digits"),
    }
}

/// PC scan code set 1 make codes. Extended keys share their base make code;
/// the E0 prefix travels separately as the extended-key flag.
pub fn set1_scan_code(key: Key) -> u16 {
    match key {
        Key::Escape => 0x01,
        Key::D1 => 0x02,
        Key::D2 => 0x03,
        Key::D3 => 0x04,
        Key::D4 => 0x05,
        Key::D5 => 0x06,
        Key::D6 => 0x07,
        Key::D7 => 0x08,
        Key::D8 => 0x09,
        Key::D9 => 0x0A,
        Key::D0 => 0x0B,
        Key::Minus => 0x0C,
        Key::Equals => 0x0D,
        Key::Backspace => 0x0E,
        Key::Tab => 0x0F,
        Key::Q => 0x10,
        Key::W => 0x11,
        Key::E => 0x12,
        Key::R => 0x13,
        Key::T => 0x14,
        Key::Y => 0x15,
        Key::U => 0x16,
        Key::I => 0x17,
        Key::O => 0x18,
        Key::P => 0x19,
        Key::LeftBracket => 0x1A,
        Key::RightBracket => 0x1B,
        Key::Return => 0x1C,
        Key::Control | Key::LeftControl | Key::RightControl => 0x1D,
        Key::A => 0x1E,
        Key::S => 0x1F,
        Key::D => 0x20,
        Key::F => 0x21,
        Key::G => 0x22,
        Key::H => 0x23,
        Key::J => 0x24,
        Key::K => 0x25,
        Key::L => 0x26,
        Key::Semicolon => 0x27,
        Key::Apostrophe => 0x28,
        Key::Grave => 0x29,
        Key::Shift | Key::LeftShift => 0x2A,
        Key::Backslash => 0x2B,
        Key::Z => 0x2C,
        Key::X => 0x2D,
        Key::C => 0x2E,
        Key::V => 0x2F,
        Key::B => 0x30,
        Key::N => 0x31,
        Key::M => 0x32,
        Key::Comma => 0x33,
        Key::Period => 0x34,
        Key::Slash | Key::NumpadDivide => 0x35,
        Key::RightShift => 0x36,
        Key::NumpadMultiply | Key::PrintScreen => 0x37,
        Key::Alt | Key::LeftAlt | Key::RightAlt => 0x38,
        Key::Space => 0x39,
        Key::CapsLock => 0x3A,
        Key::F1 => 0x3B,
        Key::F2 => 0x3C,
        Key::F3 => 0x3D,
        Key::F4 => 0x3E,
        Key::F5 => 0x3F,
        Key::F6 => 0x40,
        Key::F7 => 0x41,
        Key::F8 => 0x42,
        Key::F9 => 0x43,
        Key::F10 => 0x44,
        Key::NumLock | Key::Pause => 0x45,
        Key::ScrollLock | Key::ControlBreak => 0x46,
        Key::Numpad7 | Key::Home => 0x47,
        Key::Numpad8 | Key::Up => 0x48,
        Key::Numpad9 | Key::PageUp => 0x49,
        Key::NumpadSubtract => 0x4A,
        Key::Numpad4 | Key::Left => 0x4B,
        Key::Numpad5 => 0x4C,
        Key::Numpad6 | Key::Right => 0x4D,
        Key::NumpadAdd => 0x4E,
        Key::Numpad1 | Key::End => 0x4F,
        Key::Numpad2 | Key::Down => 0x50,
        Key::Numpad3 | Key::PageDown => 0x51,
        Key::Numpad0 | Key::Insert => 0x52,
        Key::NumpadDecimal | Key::Delete => 0x53,
        Key::LeftWin => 0x5B,
        Key::RightWin => 0x5C,
        Key::F11 => 0x57,
        Key::F12 => 0x58,
    }
}
