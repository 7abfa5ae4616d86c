//! Input events delivered by the host.

pub mod key;
pub mod mouse;

use arbor_geom::{Point, Size};

/// A single host input event.
///
/// [`Canvas::event`](crate::Canvas::event) routes each variant to the
/// matching dispatcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Button press or release.
    MouseButton(mouse::MouseButton),
    /// Pointer movement.
    MouseMotion(mouse::MouseMotion),
    /// Wheel or trackpad scroll.
    Scroll(mouse::Scroll),
    /// Key press or release.
    Key(key::KeyEvent),
    /// A character of text input.
    Text(char),
    /// The framebuffer changed size.
    Resize(Size),
}

impl Event {
    /// Pointer position for pointer events.
    pub fn pos(&self) -> Option<Point> {
        match self {
            Self::MouseButton(e) => Some(e.pos),
            Self::MouseMotion(e) => Some(e.pos),
            Self::Scroll(e) => Some(e.pos),
            _ => None,
        }
    }
}
