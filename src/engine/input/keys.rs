// Key and mouse button codes, human-readable names, and winit translation

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Virtual key codes understood by the input manager.
///
/// Values follow the classic desktop virtual-key layout (letters and digits
/// map to their ASCII upper-case values), so binding files written against
/// that layout keep working.
pub mod key {
    pub const BACKSPACE: u32 = 8;
    pub const TAB: u32 = 9;
    pub const ENTER: u32 = 10;
    pub const SHIFT: u32 = 16;
    pub const CONTROL: u32 = 17;
    pub const ALT: u32 = 18;
    pub const ESCAPE: u32 = 27;
    pub const SPACE: u32 = 32;
    pub const PAGE_UP: u32 = 33;
    pub const PAGE_DOWN: u32 = 34;
    pub const END: u32 = 35;
    pub const HOME: u32 = 36;
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
    pub const COMMA: u32 = 44;
    pub const MINUS: u32 = 45;
    pub const PERIOD: u32 = 46;
    pub const SLASH: u32 = 47;
    pub const DIGIT_0: u32 = 48;
    pub const SEMICOLON: u32 = 59;
    pub const EQUALS: u32 = 61;
    pub const A: u32 = 65;
    pub const D: u32 = 68;
    pub const S: u32 = 83;
    pub const W: u32 = 87;
    pub const BRACKET_LEFT: u32 = 91;
    pub const BACKSLASH: u32 = 92;
    pub const BRACKET_RIGHT: u32 = 93;
    pub const NUMPAD_0: u32 = 96;
    pub const NUMPAD_MULTIPLY: u32 = 106;
    pub const NUMPAD_ADD: u32 = 107;
    pub const NUMPAD_SUBTRACT: u32 = 109;
    pub const NUMPAD_DECIMAL: u32 = 110;
    pub const NUMPAD_DIVIDE: u32 = 111;
    pub const F1: u32 = 112;
    pub const DELETE: u32 = 127;
    pub const INSERT: u32 = 155;
    pub const BRACE_LEFT: u32 = 161;
    pub const BRACE_RIGHT: u32 = 162;
    pub const BACKQUOTE: u32 = 192;
    pub const QUOTE: u32 = 222;

    /// Code for the letter `c` (`'A'..='Z'`, case-insensitive)
    pub const fn letter(c: char) -> u32 {
        c.to_ascii_uppercase() as u32
    }

    /// Code for the top-row digit `n` (0-9)
    pub const fn digit(n: u32) -> u32 {
        DIGIT_0 + n
    }

    /// Code for the numpad digit `n` (0-9)
    pub const fn numpad(n: u32) -> u32 {
        NUMPAD_0 + n
    }

    /// Code for the function key `F<n>` (1-12)
    pub const fn function(n: u32) -> u32 {
        F1 + n - 1
    }
}

/// Mouse button codes
pub mod button {
    pub const LEFT: u32 = 1;
    pub const MIDDLE: u32 = 2;
    pub const RIGHT: u32 = 3;
    pub const BACK: u32 = 4;
    pub const FORWARD: u32 = 5;
}

/// Named keys. The first entry for a code is its canonical name.
const KEY_NAMES: &[(&str, u32)] = &[
    ("SPACE", key::SPACE),
    ("SPACEBAR", key::SPACE),
    ("ENTER", key::ENTER),
    ("RETURN", key::ENTER),
    ("NUMPAD_ENTER", key::ENTER),
    ("ESCAPE", key::ESCAPE),
    ("ESC", key::ESCAPE),
    ("TAB", key::TAB),
    ("BACKSPACE", key::BACKSPACE),
    ("DELETE", key::DELETE),
    ("HOME", key::HOME),
    ("END", key::END),
    ("PAGE_UP", key::PAGE_UP),
    ("PAGE_DOWN", key::PAGE_DOWN),
    ("INSERT", key::INSERT),
    ("UP", key::UP),
    ("DOWN", key::DOWN),
    ("LEFT", key::LEFT),
    ("RIGHT", key::RIGHT),
    ("ARROW_UP", key::UP),
    ("ARROW_DOWN", key::DOWN),
    ("ARROW_LEFT", key::LEFT),
    ("ARROW_RIGHT", key::RIGHT),
    ("SHIFT", key::SHIFT),
    ("LEFT_SHIFT", key::SHIFT),
    ("RIGHT_SHIFT", key::SHIFT),
    ("LSHIFT", key::SHIFT),
    ("RSHIFT", key::SHIFT),
    ("CTRL", key::CONTROL),
    ("CONTROL", key::CONTROL),
    ("LEFT_CTRL", key::CONTROL),
    ("RIGHT_CTRL", key::CONTROL),
    ("LCTRL", key::CONTROL),
    ("RCTRL", key::CONTROL),
    ("ALT", key::ALT),
    ("LEFT_ALT", key::ALT),
    ("RIGHT_ALT", key::ALT),
    ("LALT", key::ALT),
    ("RALT", key::ALT),
    ("COMMA", key::COMMA),
    ("PERIOD", key::PERIOD),
    ("SLASH", key::SLASH),
    ("SEMICOLON", key::SEMICOLON),
    ("QUOTE", key::QUOTE),
    ("BRACE_LEFT", key::BRACE_LEFT),
    ("BRACE_RIGHT", key::BRACE_RIGHT),
    ("BRACKET_LEFT", key::BRACKET_LEFT),
    ("BRACKET_RIGHT", key::BRACKET_RIGHT),
    ("BACKSLASH", key::BACKSLASH),
    ("MINUS", key::MINUS),
    ("EQUALS", key::EQUALS),
    ("BACKTICK", key::BACKQUOTE),
    ("BACK_QUOTE", key::BACKQUOTE),
    ("NUMPAD_PLUS", key::NUMPAD_ADD),
    ("NUMPAD_MINUS", key::NUMPAD_SUBTRACT),
    ("NUMPAD_MULTIPLY", key::NUMPAD_MULTIPLY),
    ("NUMPAD_DIVIDE", key::NUMPAD_DIVIDE),
    ("NUMPAD_DECIMAL", key::NUMPAD_DECIMAL),
];

const DIGIT_WORDS: [&str; 10] = [
    "ZERO", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE",
];

/// Named mouse buttons. The first entry for a code is its canonical name.
const BUTTON_NAMES: &[(&str, u32)] = &[
    ("LEFT", button::LEFT),
    ("LEFT_CLICK", button::LEFT),
    ("LEFT_MOUSE", button::LEFT),
    ("LMB", button::LEFT),
    ("RIGHT", button::RIGHT),
    ("RIGHT_CLICK", button::RIGHT),
    ("RIGHT_MOUSE", button::RIGHT),
    ("RMB", button::RIGHT),
    ("MIDDLE", button::MIDDLE),
    ("MIDDLE_CLICK", button::MIDDLE),
    ("MIDDLE_MOUSE", button::MIDDLE),
    ("MMB", button::MIDDLE),
    ("WHEEL", button::MIDDLE),
    ("WHEEL_CLICK", button::MIDDLE),
    ("BACK", button::BACK),
    ("BUTTON4", button::BACK),
    ("MOUSE4", button::BACK),
    ("FORWARD", button::FORWARD),
    ("BUTTON5", button::FORWARD),
    ("MOUSE5", button::FORWARD),
];

/// Resolve a key name (case-insensitive, surrounding whitespace ignored)
pub fn key_code(name: &str) -> Option<u32> {
    let name = name.trim().to_ascii_uppercase();

    if let Some(&(_, code)) = KEY_NAMES.iter().find(|(n, _)| *n == name) {
        return Some(code);
    }

    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_uppercase() {
            return Some(key::letter(c));
        }
        if let Some(d) = c.to_digit(10) {
            return Some(key::digit(d));
        }
    }

    if let Some(n) = DIGIT_WORDS.iter().position(|w| *w == name) {
        return Some(key::digit(n as u32));
    }

    if let Some(n) = name.strip_prefix("NUMPAD_").and_then(|d| d.parse::<u32>().ok()) {
        if n <= 9 {
            return Some(key::numpad(n));
        }
    }

    match name.strip_prefix('F').and_then(|n| n.parse::<u32>().ok()) {
        Some(n @ 1..=12) => Some(key::function(n)),
        _ => None,
    }
}

/// Canonical name for a key code, or `UNKNOWN_<code>`
pub fn key_name(code: u32) -> String {
    if let Some(&(name, _)) = KEY_NAMES.iter().find(|(_, c)| *c == code) {
        return name.to_string();
    }

    match code {
        65..=90 => char::from_u32(code).map(String::from).unwrap_or_default(),
        48..=57 => (code - key::DIGIT_0).to_string(),
        96..=105 => format!("NUMPAD_{}", code - key::NUMPAD_0),
        112..=123 => format!("F{}", code - key::F1 + 1),
        _ => format!("UNKNOWN_{code}"),
    }
}

/// Resolve a mouse button name (case-insensitive, surrounding whitespace ignored)
pub fn mouse_button_code(name: &str) -> Option<u32> {
    let name = name.trim().to_ascii_uppercase();
    BUTTON_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, code)| code)
}

/// Canonical name for a mouse button code, or `UNKNOWN_<code>`
pub fn mouse_button_name(code: u32) -> String {
    BUTTON_NAMES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| format!("UNKNOWN_{code}"))
}

/// Translate a winit physical key into a virtual key code
pub fn from_winit_key(code: KeyCode) -> Option<u32> {
    let vk = match code {
        KeyCode::KeyA => key::letter('A'),
        KeyCode::KeyB => key::letter('B'),
        KeyCode::KeyC => key::letter('C'),
        KeyCode::KeyD => key::letter('D'),
        KeyCode::KeyE => key::letter('E'),
        KeyCode::KeyF => key::letter('F'),
        KeyCode::KeyG => key::letter('G'),
        KeyCode::KeyH => key::letter('H'),
        KeyCode::KeyI => key::letter('I'),
        KeyCode::KeyJ => key::letter('J'),
        KeyCode::KeyK => key::letter('K'),
        KeyCode::KeyL => key::letter('L'),
        KeyCode::KeyM => key::letter('M'),
        KeyCode::KeyN => key::letter('N'),
        KeyCode::KeyO => key::letter('O'),
        KeyCode::KeyP => key::letter('P'),
        KeyCode::KeyQ => key::letter('Q'),
        KeyCode::KeyR => key::letter('R'),
        KeyCode::KeyS => key::letter('S'),
        KeyCode::KeyT => key::letter('T'),
        KeyCode::KeyU => key::letter('U'),
        KeyCode::KeyV => key::letter('V'),
        KeyCode::KeyW => key::letter('W'),
        KeyCode::KeyX => key::letter('X'),
        KeyCode::KeyY => key::letter('Y'),
        KeyCode::KeyZ => key::letter('Z'),
        KeyCode::Digit0 => key::digit(0),
        KeyCode::Digit1 => key::digit(1),
        KeyCode::Digit2 => key::digit(2),
        KeyCode::Digit3 => key::digit(3),
        KeyCode::Digit4 => key::digit(4),
        KeyCode::Digit5 => key::digit(5),
        KeyCode::Digit6 => key::digit(6),
        KeyCode::Digit7 => key::digit(7),
        KeyCode::Digit8 => key::digit(8),
        KeyCode::Digit9 => key::digit(9),
        KeyCode::Numpad0 => key::numpad(0),
        KeyCode::Numpad1 => key::numpad(1),
        KeyCode::Numpad2 => key::numpad(2),
        KeyCode::Numpad3 => key::numpad(3),
        KeyCode::Numpad4 => key::numpad(4),
        KeyCode::Numpad5 => key::numpad(5),
        KeyCode::Numpad6 => key::numpad(6),
        KeyCode::Numpad7 => key::numpad(7),
        KeyCode::Numpad8 => key::numpad(8),
        KeyCode::Numpad9 => key::numpad(9),
        KeyCode::NumpadAdd => key::NUMPAD_ADD,
        KeyCode::NumpadSubtract => key::NUMPAD_SUBTRACT,
        KeyCode::NumpadMultiply => key::NUMPAD_MULTIPLY,
        KeyCode::NumpadDivide => key::NUMPAD_DIVIDE,
        KeyCode::NumpadDecimal => key::NUMPAD_DECIMAL,
        KeyCode::NumpadEnter => key::ENTER,
        KeyCode::F1 => key::function(1),
        KeyCode::F2 => key::function(2),
        KeyCode::F3 => key::function(3),
        KeyCode::F4 => key::function(4),
        KeyCode::F5 => key::function(5),
        KeyCode::F6 => key::function(6),
        KeyCode::F7 => key::function(7),
        KeyCode::F8 => key::function(8),
        KeyCode::F9 => key::function(9),
        KeyCode::F10 => key::function(10),
        KeyCode::F11 => key::function(11),
        KeyCode::F12 => key::function(12),
        KeyCode::ArrowUp => key::UP,
        KeyCode::ArrowDown => key::DOWN,
        KeyCode::ArrowLeft => key::LEFT,
        KeyCode::ArrowRight => key::RIGHT,
        KeyCode::Space => key::SPACE,
        KeyCode::Enter => key::ENTER,
        KeyCode::Escape => key::ESCAPE,
        KeyCode::Tab => key::TAB,
        KeyCode::Backspace => key::BACKSPACE,
        KeyCode::Delete => key::DELETE,
        KeyCode::Home => key::HOME,
        KeyCode::End => key::END,
        KeyCode::PageUp => key::PAGE_UP,
        KeyCode::PageDown => key::PAGE_DOWN,
        KeyCode::Insert => key::INSERT,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => key::SHIFT,
        KeyCode::ControlLeft | KeyCode::ControlRight => key::CONTROL,
        KeyCode::AltLeft | KeyCode::AltRight => key::ALT,
        KeyCode::Comma => key::COMMA,
        KeyCode::Period => key::PERIOD,
        KeyCode::Slash => key::SLASH,
        KeyCode::Semicolon => key::SEMICOLON,
        KeyCode::Quote => key::QUOTE,
        KeyCode::BracketLeft => key::BRACKET_LEFT,
        KeyCode::BracketRight => key::BRACKET_RIGHT,
        KeyCode::Backslash => key::BACKSLASH,
        KeyCode::Minus => key::MINUS,
        KeyCode::Equal => key::EQUALS,
        KeyCode::Backquote => key::BACKQUOTE,
        _ => return None,
    };
    Some(vk)
}

/// Translate a winit mouse button into a button code
pub fn from_winit_button(mouse_button: MouseButton) -> Option<u32> {
    match mouse_button {
        MouseButton::Left => Some(button::LEFT),
        MouseButton::Middle => Some(button::MIDDLE),
        MouseButton::Right => Some(button::RIGHT),
        MouseButton::Back => Some(button::BACK),
        MouseButton::Forward => Some(button::FORWARD),
        MouseButton::Other(n) => Some(u32::from(n)),
    }
}
