/// A key as delivered by the host, already decoded from platform key codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Key {
    Enter,
    Space,
    Escape,
    /// Backspace/delete: removes the last typed digit.
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    F11,
    F12,
    /// Top-row or keypad digit.
    Digit(u8),
    /// Any other printable key.
    Char(char),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        alt: false,
        ctrl: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        alt: false,
        ctrl: false,
        meta: false,
    };
}

/// What a key press asks the show to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Exit,
    ToggleHelp,
    ToggleSlideNumber,
    /// Confirm typed digits, or advance a build when nothing is being typed.
    Confirm,
    AdvanceBuild,
    AdvanceAndSkipBuild,
    AdvanceSlide,
    BackBuild,
    BackSlide,
    DeleteDigit,
    FirstSlide,
    LastSlide,
    Digit(u8),
    /// Unbound key. Still restarts the slide-number auto-hide.
    Other,
}

/// How the host pre-filters a key press before the show sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyRoute {
    /// Leave the key to the host (browser shortcuts, function keys).
    PassThrough,
    /// Meta+period: end the show immediately.
    ExitNow,
    Handle,
}

pub fn route_key(key: Key, modifiers: Modifiers) -> KeyRoute {
    if matches!(key, Key::F11 | Key::F12) {
        return KeyRoute::PassThrough;
    }
    if modifiers.meta {
        return match key {
            Key::Char('.') => KeyRoute::ExitNow,
            Key::Enter => KeyRoute::Handle,
            _ => KeyRoute::PassThrough,
        };
    }
    if modifiers.ctrl {
        return KeyRoute::PassThrough;
    }
    KeyRoute::Handle
}

/// Bind a key and its modifiers to a command. Bindings match modifiers exactly.
pub fn key_command(key: Key, modifiers: Modifiers) -> KeyCommand {
    let key = normalize(key);
    let shift = match modifiers {
        Modifiers::NONE => false,
        Modifiers::SHIFT => true,
        _ => return KeyCommand::Other,
    };

    match (key, shift) {
        (Key::Escape, false) | (Key::Char('q'), false) => KeyCommand::Exit,
        (Key::Char('/'), _) | (Key::Char('?'), _) => KeyCommand::ToggleHelp,
        (Key::Char('s'), false) => KeyCommand::ToggleSlideNumber,
        (Key::Enter, false) => KeyCommand::Confirm,
        (Key::Char('n') | Key::Space | Key::ArrowDown | Key::ArrowRight | Key::PageDown, false) => {
            KeyCommand::AdvanceBuild
        }
        (Key::ArrowRight, true) | (Key::Char(']'), false) => KeyCommand::AdvanceAndSkipBuild,
        (Key::ArrowDown | Key::PageDown, true) | (Key::Char('='), _) | (Key::Char('+'), _) => {
            KeyCommand::AdvanceSlide
        }
        (Key::ArrowLeft | Key::PageUp, true) | (Key::Char('['), false) => KeyCommand::BackBuild,
        (Key::Char('p') | Key::PageUp | Key::ArrowLeft, false)
        | (Key::ArrowUp, _)
        | (Key::Char('-'), false) => KeyCommand::BackSlide,
        (Key::Delete, false) => KeyCommand::DeleteDigit,
        (Key::Home, false) => KeyCommand::FirstSlide,
        (Key::End, false) => KeyCommand::LastSlide,
        (Key::Digit(d), false) if d <= 9 => KeyCommand::Digit(d),
        _ => KeyCommand::Other,
    }
}

fn normalize(key: Key) -> Key {
    match key {
        Key::Char(c) if c.is_ascii_digit() => Key::Digit(c as u8 - b'0'),
        Key::Char(' ') => Key::Space,
        Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/keys.rs"]
mod tests;
