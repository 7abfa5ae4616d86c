//! Geometry primitives used across arbor.
//!
//! All coordinates are `f32` logical pixels. Every boundary predicate in this
//! crate uses the same half-open convention: a rectangle covers `[min, max)` on
//! both axes, so two siblings that share an edge never both claim a point on it.

#![warn(missing_docs)]

/// Margin and inset helpers.
mod margin;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Width/height size type.
mod size;

pub use margin::Margin;
pub use point::Point;
pub use rect::Rect;
pub use size::Size;

/// A layout axis.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}
