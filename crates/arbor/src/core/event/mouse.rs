//! Pointer input primitives.
use arbor_geom::Point;
use serde::{Deserialize, Serialize};

use super::key::Mods;

/// Mouse button codes.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Button {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Middle button.
    Middle,
    /// Extra buttons by host index.
    Other(u8),
}

impl Button {
    /// Bit position within a [`Buttons`] mask.
    fn bit(self) -> u32 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
            Self::Other(n) => 3 + u32::from(n.min(28)),
        }
    }

    /// The primary and secondary buttons start drag capture by default.
    pub fn captures_drag(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Set of mouse buttons held during a motion event.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Buttons {
    /// One bit per button.
    bits: u32,
}

impl Buttons {
    /// No buttons held.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a button and return the set.
    pub fn with(mut self, button: Button) -> Self {
        self.insert(button);
        self
    }

    /// Mark a button held.
    pub fn insert(&mut self, button: Button) {
        self.bits |= 1 << button.bit();
    }

    /// Mark a button released.
    pub fn remove(&mut self, button: Button) {
        self.bits &= !(1 << button.bit());
    }

    /// Is the button held?
    pub fn contains(&self, button: Button) -> bool {
        self.bits & (1 << button.bit()) != 0
    }

    /// Is no button held?
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl From<Button> for Buttons {
    fn from(button: Button) -> Self {
        Self::empty().with(button)
    }
}

/// Mouse button transition.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Action {
    /// Button press.
    Down,
    /// Button release.
    Up,
}

/// A button press or release.
///
/// `pos` is expressed in the coordinate space of the receiving widget's
/// parent, the same space as the widget's own rect.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct MouseButton {
    /// Pointer position.
    pub pos: Point,
    /// Button that changed state.
    pub button: Button,
    /// Press or release.
    pub action: Action,
    /// Modifier state.
    pub mods: Mods,
}

impl MouseButton {
    /// Was the button pressed?
    pub fn is_down(&self) -> bool {
        self.action == Action::Down
    }

    /// Copy of the event with the position translated into a space whose
    /// origin sits at `origin`.
    pub fn relative_to(&self, origin: Point) -> Self {
        Self {
            pos: self.pos - origin,
            ..*self
        }
    }
}

/// Pointer movement, also used for drag deliveries.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct MouseMotion {
    /// Pointer position, in the receiver's parent space.
    pub pos: Point,
    /// Movement since the previous motion event.
    pub delta: Point,
    /// Buttons held.
    pub buttons: Buttons,
    /// Modifier state.
    pub mods: Mods,
}

impl MouseMotion {
    /// Copy of the event relative to `origin`.
    pub fn relative_to(&self, origin: Point) -> Self {
        Self {
            pos: self.pos - origin,
            ..*self
        }
    }
}

/// A scroll wheel or trackpad event.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Scroll {
    /// Pointer position, in the receiver's parent space.
    pub pos: Point,
    /// Scroll amount per axis.
    pub delta: Point,
}

impl Scroll {
    /// Copy of the event relative to `origin`.
    pub fn relative_to(&self, origin: Point) -> Self {
        Self {
            pos: self.pos - origin,
            ..*self
        }
    }
}
