//! Keyboard input primitives.
use std::ops::Add;

/// Modifier key state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift is active.
    pub shift: bool,
    /// Control is active.
    pub ctrl: bool,
    /// Alt is active.
    pub alt: bool,
    /// Super / command is active.
    pub meta: bool,
}

impl Mods {
    /// True if no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Empty
    }
}

impl Add<Self> for Mods {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            shift: self.shift || other.shift,
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
            meta: self.meta || other.meta,
        }
    }
}

impl Add<Key> for Mods {
    type Output = KeyEvent;

    fn add(self, key: Key) -> KeyEvent {
        KeyEvent {
            key,
            pressed: true,
            mods: self,
        }
    }
}

/// No modifiers pressed.
#[allow(non_upper_case_globals)]
pub const Empty: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: false,
    meta: false,
};

/// Shift-only modifier state.
#[allow(non_upper_case_globals)]
pub const Shift: Mods = Mods {
    shift: true,
    ..Empty
};

/// Control-only modifier state.
#[allow(non_upper_case_globals)]
pub const Ctrl: Mods = Mods { ctrl: true, ..Empty };

/// Alt-only modifier state.
#[allow(non_upper_case_globals)]
pub const Alt: Mods = Mods { alt: true, ..Empty };

/// Keys that widgets react to. Printable input arrives separately as text.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Key {
    /// A character key, used for shortcuts.
    Char(char),
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Enter / return.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Space bar.
    Space,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Any other host key code.
    Other(u32),
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        match c {
            '\t' => Self::Tab,
            '\n' | '\r' => Self::Enter,
            ' ' => Self::Space,
            c => Self::Char(c),
        }
    }
}

/// A key press or release with the modifiers held at the time.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct KeyEvent {
    /// Key that changed state.
    pub key: Key,
    /// True on press, false on release.
    pub pressed: bool,
    /// Modifier state.
    pub mods: Mods,
}

impl KeyEvent {
    /// A press of `key` with no modifiers.
    pub fn press(key: impl Into<Key>) -> Self {
        Empty + key.into()
    }
}

impl PartialEq<Key> for KeyEvent {
    fn eq(&self, other: &Key) -> bool {
        self.key == *other
    }
}
