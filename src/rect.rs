//! Axis-aligned rectangles with single- and double-precision variants,
//! union/intersection/outcode logic, and a path iterator over the
//! rectangle outline.

use core::ops::{Add, Sub};

use crate::basics::{PathIterator, SegmentType, WindingRule};
use crate::error::{GeomError, Result};
use crate::trans_affine::TransAffine;

// ============================================================================
// Outcode bits
// ============================================================================

/// Point is left of the rectangle.
pub const OUT_LEFT: i32 = 1;
/// Point is above the rectangle.
pub const OUT_TOP: i32 = 2;
/// Point is right of the rectangle.
pub const OUT_RIGHT: i32 = 4;
/// Point is below the rectangle.
pub const OUT_BOTTOM: i32 = 8;

#[inline]
fn tmin<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

#[inline]
fn tmax<T: PartialOrd>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

// ============================================================================
// Rect
// ============================================================================

/// An axis-aligned rectangle `(x, y, width, height)`.
///
/// A rectangle is empty exactly when `width <= 0` or `height <= 0`; empty
/// rectangles contain nothing and intersect nothing, but they still carry
/// their coordinates (union treats them as degenerate boxes).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect<T: Copy> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

impl<T> Rect<T>
where
    T: Copy + PartialOrd + Add<Output = T> + Sub<Output = T> + Default,
{
    pub fn new(x: T, y: T, width: T, height: T) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Overwrite all four components.
    pub fn set_bounds(&mut self, x: T, y: T, width: T, height: T) {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
    }

    /// `true` when `width <= 0` or `height <= 0`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        let zero = T::default();
        self.width <= zero || self.height <= zero
    }

    #[inline]
    pub fn min_x(&self) -> T {
        self.x
    }

    #[inline]
    pub fn min_y(&self) -> T {
        self.y
    }

    #[inline]
    pub fn max_x(&self) -> T {
        self.x + self.width
    }

    #[inline]
    pub fn max_y(&self) -> T {
        self.y + self.height
    }

    /// Shift the rectangle by (dx, dy).
    pub fn translate(&mut self, dx: T, dy: T) {
        self.x = self.x + dx;
        self.y = self.y + dy;
    }

    /// Expand by `h` on the left and right and `v` on the top and bottom.
    /// Negative values shrink the rectangle and may make it empty.
    pub fn grow(&mut self, h: T, v: T) {
        self.x = self.x - h;
        self.y = self.y - v;
        self.width = self.width + h + h;
        self.height = self.height + v + v;
    }

    /// Extend the rectangle (in place) to cover the point (px, py).
    pub fn add_point(&mut self, px: T, py: T) {
        let x1 = tmin(self.min_x(), px);
        let x2 = tmax(self.max_x(), px);
        let y1 = tmin(self.min_y(), py);
        let y2 = tmax(self.max_y(), py);
        self.set_bounds(x1, y1, x2 - x1, y2 - y1);
    }

    /// Extend the rectangle (in place) to cover `other`.
    pub fn add_rect(&mut self, other: &Rect<T>) {
        *self = self.union(other);
    }

    /// Bounding box of the two rectangles.
    pub fn union(&self, other: &Rect<T>) -> Rect<T> {
        let x1 = tmin(self.min_x(), other.min_x());
        let y1 = tmin(self.min_y(), other.min_y());
        let x2 = tmax(self.max_x(), other.max_x());
        let y2 = tmax(self.max_y(), other.max_y());
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Largest rectangle contained in both. The result is empty (possibly
    /// with negative extent) when the two do not overlap.
    pub fn intersection(&self, other: &Rect<T>) -> Rect<T> {
        let x1 = tmax(self.min_x(), other.min_x());
        let y1 = tmax(self.min_y(), other.min_y());
        let x2 = tmin(self.max_x(), other.max_x());
        let y2 = tmin(self.max_y(), other.max_y());
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// `true` if the point is inside (left/top edges inclusive,
    /// right/bottom exclusive). Empty rectangles contain nothing.
    pub fn contains_point(&self, px: T, py: T) -> bool {
        if self.is_empty() {
            return false;
        }
        px >= self.x && py >= self.y && px < self.max_x() && py < self.max_y()
    }

    /// `true` if `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect<T>) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// `true` if the interiors of the two rectangles overlap.
    pub fn intersects(&self, other: &Rect<T>) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        other.max_x() > self.min_x()
            && other.max_y() > self.min_y()
            && other.min_x() < self.max_x()
            && other.min_y() < self.max_y()
    }

    /// Bitmask of [`OUT_LEFT`]/[`OUT_TOP`]/[`OUT_RIGHT`]/[`OUT_BOTTOM`]
    /// describing where (px, py) falls relative to the rectangle; 0 means
    /// inside. A degenerate axis reports both of its sides.
    pub fn outcode(&self, px: T, py: T) -> i32 {
        let zero = T::default();
        let mut out = 0;
        if self.width <= zero {
            out |= OUT_LEFT | OUT_RIGHT;
        } else if px < self.x {
            out |= OUT_LEFT;
        } else if px > self.max_x() {
            out |= OUT_RIGHT;
        }
        if self.height <= zero {
            out |= OUT_TOP | OUT_BOTTOM;
        } else if py < self.y {
            out |= OUT_TOP;
        } else if py > self.max_y() {
            out |= OUT_BOTTOM;
        }
        out
    }
}

/// Rectangle with `f32` coordinates.
pub type RectF = Rect<f32>;
/// Rectangle with `f64` coordinates.
pub type RectD = Rect<f64>;

impl RectD {
    /// `true` if the line segment (x1,y1)→(x2,y2) touches the rectangle.
    /// Walks the Cohen-Sutherland outcodes, clipping the segment toward the
    /// rectangle until it either lands inside or is rejected.
    pub fn intersects_line(&self, mut x1: f64, mut y1: f64, x2: f64, y2: f64) -> bool {
        let out2 = self.outcode(x2, y2);
        if out2 == 0 {
            return true;
        }
        loop {
            let out1 = self.outcode(x1, y1);
            if out1 == 0 {
                return true;
            }
            if (out1 & out2) != 0 {
                return false;
            }
            if (out1 & (OUT_LEFT | OUT_RIGHT)) != 0 {
                let mut x = self.x;
                if (out1 & OUT_RIGHT) != 0 {
                    x += self.width;
                }
                y1 += (x - x1) * (y2 - y1) / (x2 - x1);
                x1 = x;
            } else {
                let mut y = self.y;
                if (out1 & OUT_BOTTOM) != 0 {
                    y += self.height;
                }
                x1 += (y - y1) * (x2 - x1) / (y2 - y1);
                y1 = y;
            }
        }
    }

    /// Iterate the rectangle outline as
    /// `MoveTo, LineTo, LineTo, LineTo, Close`, optionally transformed.
    pub fn path_iter(&self, transform: Option<&TransAffine>) -> RectIterator {
        RectIterator::new(self, transform)
    }
}

// ============================================================================
// RectIterator
// ============================================================================

/// Path iterator over a rectangle outline. Snapshots the rectangle at
/// construction; five segments, clockwise in a y-down coordinate system.
pub struct RectIterator {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    transform: Option<TransAffine>,
    index: usize,
}

impl RectIterator {
    fn new(rect: &RectD, transform: Option<&TransAffine>) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            transform: transform.cloned(),
            index: 0,
        }
    }
}

impl PathIterator for RectIterator {
    fn winding_rule(&self) -> WindingRule {
        WindingRule::NonZero
    }

    fn is_done(&self) -> bool {
        self.index > 4
    }

    fn next(&mut self) {
        if !self.is_done() {
            self.index += 1;
        }
    }

    fn current_segment(&self, coords: &mut [f64; 6]) -> Result<SegmentType> {
        if self.is_done() {
            return Err(GeomError::IteratorExhausted);
        }
        let seg = match self.index {
            0 => {
                coords[0] = self.x;
                coords[1] = self.y;
                SegmentType::MoveTo
            }
            1 => {
                coords[0] = self.x + self.width;
                coords[1] = self.y;
                SegmentType::LineTo
            }
            2 => {
                coords[0] = self.x + self.width;
                coords[1] = self.y + self.height;
                SegmentType::LineTo
            }
            3 => {
                coords[0] = self.x;
                coords[1] = self.y + self.height;
                SegmentType::LineTo
            }
            _ => SegmentType::Close,
        };
        if seg != SegmentType::Close {
            if let Some(t) = &self.transform {
                let (a, b) = coords.split_at_mut(1);
                t.transform(&mut a[0], &mut b[0]);
            }
        }
        Ok(seg)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_and_accessors() {
        let r = RectD::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.min_x(), 10.0);
        assert_eq!(r.min_y(), 20.0);
        assert_eq!(r.max_x(), 40.0);
        assert_eq!(r.max_y(), 60.0);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_is_empty() {
        assert!(RectD::new(0.0, 0.0, 0.0, 10.0).is_empty());
        assert!(RectD::new(0.0, 0.0, 10.0, 0.0).is_empty());
        assert!(RectD::new(0.0, 0.0, -1.0, 10.0).is_empty());
        assert!(!RectD::new(0.0, 0.0, 1.0, 1.0).is_empty());
        assert!(RectF::new(0.0, 0.0, 5.0, -2.0).is_empty());
    }

    #[test]
    fn test_set_bounds_translate_grow() {
        let mut r = RectD::new(0.0, 0.0, 1.0, 1.0);
        r.set_bounds(5.0, 6.0, 7.0, 8.0);
        assert_eq!(r, RectD::new(5.0, 6.0, 7.0, 8.0));

        r.translate(1.0, -1.0);
        assert_eq!(r, RectD::new(6.0, 5.0, 7.0, 8.0));

        r.grow(2.0, 3.0);
        assert_eq!(r, RectD::new(4.0, 2.0, 11.0, 14.0));

        // Shrinking past zero makes it empty
        r.grow(-6.0, 0.0);
        assert!(r.is_empty());
    }

    #[test]
    fn test_add_point() {
        let mut r = RectD::new(0.0, 0.0, 10.0, 10.0);
        r.add_point(5.0, 5.0);
        assert_eq!(r, RectD::new(0.0, 0.0, 10.0, 10.0));

        r.add_point(20.0, -5.0);
        assert_eq!(r, RectD::new(0.0, -5.0, 20.0, 15.0));
    }

    #[test]
    fn test_union_intersection() {
        let a = RectD::new(0.0, 0.0, 10.0, 10.0);
        let b = RectD::new(5.0, 5.0, 10.0, 10.0);

        let u = a.union(&b);
        assert_eq!(u, RectD::new(0.0, 0.0, 15.0, 15.0));

        let i = a.intersection(&b);
        assert_eq!(i, RectD::new(5.0, 5.0, 5.0, 5.0));

        // Disjoint intersection is empty
        let c = RectD::new(100.0, 100.0, 1.0, 1.0);
        assert!(a.intersection(&c).is_empty());
    }

    #[test]
    fn test_union_intersection_idempotent() {
        let r = RectD::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.union(&r), r);
        assert_eq!(r.intersection(&r), r);
    }

    #[test]
    fn test_union_contains_both() {
        let a = RectD::new(0.0, 0.0, 2.0, 2.0);
        let b = RectD::new(10.0, -3.0, 4.0, 4.0);
        let u = a.union(&b);
        assert!(u.contains_rect(&a));
        assert!(u.contains_rect(&b));
    }

    #[test]
    fn test_contains_point() {
        let r = RectD::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(5.0, 5.0));
        assert!(r.contains_point(0.0, 0.0));
        // Right/bottom edges are exclusive
        assert!(!r.contains_point(10.0, 5.0));
        assert!(!r.contains_point(5.0, 10.0));
        assert!(!r.contains_point(-1.0, 5.0));

        let empty = RectD::new(0.0, 0.0, 0.0, 10.0);
        assert!(!empty.contains_point(0.0, 5.0));
    }

    #[test]
    fn test_contains_rect_and_intersects() {
        let outer = RectD::new(0.0, 0.0, 10.0, 10.0);
        let inner = RectD::new(2.0, 2.0, 3.0, 3.0);
        let overlapping = RectD::new(8.0, 8.0, 5.0, 5.0);
        let disjoint = RectD::new(20.0, 20.0, 5.0, 5.0);

        assert!(outer.contains_rect(&inner));
        assert!(!outer.contains_rect(&overlapping));
        assert!(outer.intersects(&inner));
        assert!(outer.intersects(&overlapping));
        assert!(!outer.intersects(&disjoint));

        // Touching edges do not intersect (open interiors)
        let touching = RectD::new(10.0, 0.0, 5.0, 5.0);
        assert!(!outer.intersects(&touching));
    }

    #[test]
    fn test_outcode() {
        let r = RectD::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(r.outcode(5.0, 5.0), 0);
        assert_eq!(r.outcode(-1.0, 5.0), OUT_LEFT);
        assert_eq!(r.outcode(11.0, 5.0), OUT_RIGHT);
        assert_eq!(r.outcode(5.0, -1.0), OUT_TOP);
        assert_eq!(r.outcode(5.0, 11.0), OUT_BOTTOM);
        assert_eq!(r.outcode(-1.0, -1.0), OUT_LEFT | OUT_TOP);
        assert_eq!(r.outcode(11.0, 11.0), OUT_RIGHT | OUT_BOTTOM);
    }

    #[test]
    fn test_outcode_degenerate() {
        let r = RectD::new(0.0, 0.0, 0.0, 10.0);
        assert_eq!(r.outcode(5.0, 5.0) & (OUT_LEFT | OUT_RIGHT), OUT_LEFT | OUT_RIGHT);
    }

    #[test]
    fn test_intersects_line() {
        let r = RectD::new(0.0, 0.0, 10.0, 10.0);
        // Through the middle
        assert!(r.intersects_line(-5.0, 5.0, 15.0, 5.0));
        // Diagonal corner to corner
        assert!(r.intersects_line(-5.0, -5.0, 15.0, 15.0));
        // Entirely outside
        assert!(!r.intersects_line(-5.0, -5.0, -1.0, 15.0));
        assert!(!r.intersects_line(20.0, 0.0, 20.0, 10.0));
        // Endpoint inside
        assert!(r.intersects_line(5.0, 5.0, 50.0, 50.0));
    }

    #[test]
    fn test_path_iter_segments() {
        let r = RectD::new(1.0, 2.0, 3.0, 4.0);
        let mut it = r.path_iter(None);
        let mut coords = [0.0f64; 6];

        assert_eq!(it.current_segment(&mut coords).unwrap(), SegmentType::MoveTo);
        assert_eq!(&coords[..2], &[1.0, 2.0]);
        it.next();
        assert_eq!(it.current_segment(&mut coords).unwrap(), SegmentType::LineTo);
        assert_eq!(&coords[..2], &[4.0, 2.0]);
        it.next();
        assert_eq!(it.current_segment(&mut coords).unwrap(), SegmentType::LineTo);
        assert_eq!(&coords[..2], &[4.0, 6.0]);
        it.next();
        assert_eq!(it.current_segment(&mut coords).unwrap(), SegmentType::LineTo);
        assert_eq!(&coords[..2], &[1.0, 6.0]);
        it.next();
        assert_eq!(it.current_segment(&mut coords).unwrap(), SegmentType::Close);
        assert!(!it.is_done());
        it.next();
        assert!(it.is_done());
    }

    #[test]
    fn test_path_iter_exhaustion() {
        let r = RectD::new(0.0, 0.0, 1.0, 1.0);
        let mut it = r.path_iter(None);
        for _ in 0..5 {
            it.next();
        }
        assert!(it.is_done());
        let mut coords = [0.0f64; 6];
        assert!(matches!(
            it.current_segment(&mut coords),
            Err(GeomError::IteratorExhausted)
        ));
        // next past the end stays done
        it.next();
        it.next();
        assert!(it.is_done());
    }

    #[test]
    fn test_path_iter_transformed() {
        let r = RectD::new(0.0, 0.0, 1.0, 1.0);
        let t = TransAffine::new_translation(10.0, 20.0);
        let mut it = r.path_iter(Some(&t));
        let mut coords = [0.0f64; 6];
        assert_eq!(it.current_segment(&mut coords).unwrap(), SegmentType::MoveTo);
        assert_eq!(&coords[..2], &[10.0, 20.0]);
        it.next();
        it.current_segment(&mut coords).unwrap();
        assert_eq!(&coords[..2], &[11.0, 20.0]);
    }

    proptest! {
        #[test]
        fn prop_union_covers_operands(
            ax in -100.0f64..100.0, ay in -100.0f64..100.0,
            aw in 0.1f64..50.0, ah in 0.1f64..50.0,
            bx in -100.0f64..100.0, by in -100.0f64..100.0,
            bw in 0.1f64..50.0, bh in 0.1f64..50.0,
        ) {
            let a = RectD::new(ax, ay, aw, ah);
            let b = RectD::new(bx, by, bw, bh);
            let u = a.union(&b);
            prop_assert!(u.contains_rect(&a));
            prop_assert!(u.contains_rect(&b));
        }

        #[test]
        fn prop_intersection_within_operands(
            ax in -100.0f64..100.0, ay in -100.0f64..100.0,
            aw in 0.1f64..50.0, ah in 0.1f64..50.0,
            bx in -100.0f64..100.0, by in -100.0f64..100.0,
            bw in 0.1f64..50.0, bh in 0.1f64..50.0,
        ) {
            let a = RectD::new(ax, ay, aw, ah);
            let b = RectD::new(bx, by, bw, bh);
            let i = a.intersection(&b);
            if !i.is_empty() {
                prop_assert!(a.contains_rect(&i));
                prop_assert!(b.contains_rect(&i));
            }
        }
    }
}
