use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

use crate::{Axis, Margin};

/// A width and height.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Construct a size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Is either extent zero or negative?
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Area of the size.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Extent along the main axis.
    pub fn main(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Extent along the cross axis.
    pub fn cross(&self, axis: Axis) -> f32 {
        self.main(axis.cross())
    }

    /// Build a size from main and cross extents for an axis.
    pub fn from_main_cross(axis: Axis, main: f32, cross: f32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(main, cross),
            Axis::Vertical => Self::new(cross, main),
        }
    }

    /// Component-wise maximum.
    pub fn max(&self, other: Self) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Component-wise minimum.
    pub fn min(&self, other: Self) -> Self {
        Self::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Clamp both extents to be non-negative.
    pub fn non_negative(&self) -> Self {
        Self::new(self.width.max(0.0), self.height.max(0.0))
    }

    /// Grow by a margin on all sides.
    pub fn expand(&self, margin: Margin) -> Self {
        Self::new(
            self.width + margin.horizontal(),
            self.height + margin.vertical(),
        )
    }

    /// Shrink by a margin on all sides, clamping at zero.
    pub fn shrink(&self, margin: Margin) -> Self {
        Self::new(
            self.width - margin.horizontal(),
            self.height - margin.vertical(),
        )
        .non_negative()
    }

    /// Replace zero components with the matching component of `fallback`.
    ///
    /// Used for fixed-size overrides where a zero extent means "unset".
    pub fn or(&self, fallback: Self) -> Self {
        Self::new(
            if self.width > 0.0 {
                self.width
            } else {
                fallback.width
            },
            if self.height > 0.0 {
                self.height
            } else {
                fallback.height
            },
        )
    }
}

impl Add for Size {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.width + other.width, self.height + other.height)
    }
}

impl AddAssign for Size {
    fn add_assign(&mut self, other: Self) {
        self.width += other.width;
        self.height += other.height;
    }
}

impl Sub for Size {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.width - other.width, self.height - other.height)
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_override() {
        let fixed = Size::new(0.0, 20.0);
        assert_eq!(fixed.or(Size::new(5.0, 7.0)), Size::new(5.0, 20.0));
        assert_eq!(Size::ZERO.or(Size::new(5.0, 7.0)), Size::new(5.0, 7.0));
    }

    #[test]
    fn margins() {
        let m = Margin::new(1.0, 2.0, 3.0, 4.0);
        let s = Size::new(10.0, 10.0);
        assert_eq!(s.expand(m), Size::new(14.0, 16.0));
        assert_eq!(s.shrink(m), Size::new(6.0, 4.0));
        assert_eq!(Size::new(1.0, 1.0).shrink(m), Size::ZERO);
    }
}
