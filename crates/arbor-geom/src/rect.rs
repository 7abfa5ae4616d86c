use serde::{Deserialize, Serialize};

use crate::{Margin, Point, Size};

/// An axis-aligned rectangle.
///
/// A rect covers the half-open ranges `[left, right)` and `[top, bottom)`.
/// Every predicate below honours that convention, so adjacent rects never
/// both contain a point on their shared edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub pos: Point,
    /// Extent.
    pub size: Size,
}

impl Rect {
    /// Construct a rect from components.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Construct a rect from a position and a size.
    pub const fn from_parts(pos: Point, size: Size) -> Self {
        Self { pos, size }
    }

    /// A rect at the origin with the given size.
    pub const fn from_size(size: Size) -> Self {
        Self {
            pos: Point::ZERO,
            size,
        }
    }

    /// The empty rect at the origin.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Left edge (inclusive).
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    /// Top edge (inclusive).
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.height
    }

    /// Is the rect empty?
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(
            self.pos.x + self.size.width / 2.0,
            self.pos.y + self.size.height / 2.0,
        )
    }

    /// Does this rect contain the point?
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Does this rect completely enclose the other? Empty rects enclose nothing.
    pub fn contains_rect(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Do the rects share any point? Rects that merely touch along an edge do
    /// not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// The overlapping region, if any.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Self::new(left, top, right - left, bottom - top))
    }

    /// The smallest rect enclosing both. An empty rect contributes nothing.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }

    /// Shift the rect by an offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self::from_parts(self.pos + offset, self.size)
    }

    /// Shrink the rect by a margin, clamping the size at zero.
    pub fn inset(&self, margin: Margin) -> Self {
        Self::from_parts(self.pos + margin.offset(), self.size.shrink(margin))
    }

    /// Grow the rect by a margin.
    pub fn outset(&self, margin: Margin) -> Self {
        Self::from_parts(self.pos - margin.offset(), self.size.expand(margin))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(19.9, 19.9)));
        assert!(!r.contains(Point::new(20.0, 15.0)));
        assert!(!r.contains(Point::new(15.0, 20.0)));
        assert!(!r.contains(Point::new(9.99, 15.0)));
    }

    #[test]
    fn empty_rect_contains_nothing() {
        let r = Rect::new(5.0, 5.0, 0.0, 10.0);
        assert!(!r.contains(Point::new(5.0, 5.0)));
        assert!(!Rect::zero().contains_rect(&Rect::zero()));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert_eq!(a.intersection(&b), None);
        let c = Rect::new(9.0, 9.0, 5.0, 5.0);
        assert_eq!(a.intersection(&c), Some(Rect::new(9.0, 9.0, 1.0, 1.0)));
    }

    #[test]
    fn contains_rect_edges() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_rect(&r));
        assert!(r.contains_rect(&Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert!(!r.contains_rect(&Rect::new(5.0, 5.0, 5.1, 5.0)));
    }

    #[test]
    fn union_skips_empty() {
        let a = Rect::new(0.0, 0.0, 5.0, 5.0);
        let b = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 15.0, 15.0));
        assert_eq!(Rect::zero().union(&b), b);
    }

    #[test]
    fn inset_outset() {
        let r = Rect::new(0.0, 0.0, 20.0, 20.0);
        let m = Margin::new(1.0, 2.0, 3.0, 4.0);
        let inner = r.inset(m);
        assert_eq!(inner, Rect::new(1.0, 2.0, 16.0, 14.0));
        assert_eq!(inner.outset(m), r);
    }

    fn coord() -> impl Strategy<Value = f32> {
        (-200i32..200).prop_map(|v| v as f32)
    }

    fn extent() -> impl Strategy<Value = f32> {
        (0i32..100).prop_map(|v| v as f32)
    }

    proptest! {
        #[test]
        fn shared_edge_claimed_once(
            x in coord(),
            y in coord(),
            w1 in extent(),
            w2 in extent(),
            h in extent(),
            py in coord(),
        ) {
            // Two horizontally adjacent siblings never both claim a point on the seam.
            let a = Rect::new(x, y, w1, h);
            let b = Rect::new(x + w1, y, w2, h);
            let p = Point::new(x + w1, py);
            prop_assert!(!(a.contains(p) && b.contains(p)));
            prop_assert!(!a.intersects(&b));
        }

        #[test]
        fn contains_agrees_with_intersection(
            x in coord(),
            y in coord(),
            w in extent(),
            h in extent(),
            px in coord(),
            py in coord(),
        ) {
            let r = Rect::new(x, y, w, h);
            let p = Point::new(px, py);
            let unit = Rect::new(px, py, 1.0, 1.0);
            prop_assert_eq!(r.contains(p), r.intersects(&unit));
        }
    }
}
