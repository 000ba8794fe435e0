//! Line segments: orientation tests, robust segment intersection, and
//! point-to-line distance metrics.

use crate::basics::{PathIterator, PointD, SegmentType, WindingRule};
use crate::error::{GeomError, Result};
use crate::math::{calc_line_point_distance, calc_segment_point_sq_distance};
use crate::rect::RectD;
use crate::trans_affine::TransAffine;

// ============================================================================
// Line
// ============================================================================

/// A line segment from (x1, y1) to (x2, y2).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line<T: Copy> {
    pub x1: T,
    pub y1: T,
    pub x2: T,
    pub y2: T,
}

impl<T: Copy> Line<T> {
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Overwrite both endpoints.
    pub fn set_line(&mut self, x1: T, y1: T, x2: T, y2: T) {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
    }
}

/// Line segment with `f32` coordinates.
pub type LineF = Line<f32>;
/// Line segment with `f64` coordinates.
pub type LineD = Line<f64>;

/// Where the point (px, py) lies relative to the directed segment
/// (x1,y1)→(x2,y2): the sign of the cross product, with collinear points
/// resolved by projecting onto the segment direction — `-1` before the
/// start, `0` within the segment, `1` beyond the end.
pub fn relative_ccw(x1: f64, y1: f64, x2: f64, y2: f64, px: f64, py: f64) -> i32 {
    let x2 = x2 - x1;
    let y2 = y2 - y1;
    let mut px = px - x1;
    let mut py = py - y1;
    let mut ccw = px * y2 - py * x2;
    if ccw == 0.0 {
        // Collinear: classify by the projection onto the dominant direction
        ccw = px * x2 + py * y2;
        if ccw > 0.0 {
            px -= x2;
            py -= y2;
            ccw = px * x2 + py * y2;
            if ccw < 0.0 {
                ccw = 0.0;
            }
        }
    }
    if ccw < 0.0 {
        -1
    } else if ccw > 0.0 {
        1
    } else {
        0
    }
}

/// `true` if segments (x1,y1)→(x2,y2) and (x3,y3)→(x4,y4) touch or cross.
/// Each segment must straddle the other's supporting line; the CCW sign
/// products handle shared endpoints and collinear overlap.
#[allow(clippy::too_many_arguments)]
pub fn lines_intersect(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    x4: f64,
    y4: f64,
) -> bool {
    relative_ccw(x1, y1, x2, y2, x3, y3) * relative_ccw(x1, y1, x2, y2, x4, y4) <= 0
        && relative_ccw(x3, y3, x4, y4, x1, y1) * relative_ccw(x3, y3, x4, y4, x2, y2) <= 0
}

impl LineD {
    /// Where (px, py) lies relative to this directed segment.
    pub fn relative_ccw(&self, px: f64, py: f64) -> i32 {
        relative_ccw(self.x1, self.y1, self.x2, self.y2, px, py)
    }

    /// `true` if this segment touches or crosses `other`.
    pub fn intersects_line(&self, other: &LineD) -> bool {
        lines_intersect(
            self.x1, self.y1, self.x2, self.y2, other.x1, other.y1, other.x2, other.y2,
        )
    }

    /// Squared distance from (px, py) to the closest point on this segment.
    pub fn pt_seg_dist_sq(&self, px: f64, py: f64) -> f64 {
        calc_segment_point_sq_distance(self.x1, self.y1, self.x2, self.y2, px, py)
    }

    /// Distance from (px, py) to the closest point on this segment.
    pub fn pt_seg_dist(&self, px: f64, py: f64) -> f64 {
        self.pt_seg_dist_sq(px, py).sqrt()
    }

    /// Distance from (px, py) to the infinite line through this segment.
    pub fn pt_line_dist(&self, px: f64, py: f64) -> f64 {
        calc_line_point_distance(self.x1, self.y1, self.x2, self.y2, px, py).abs()
    }

    /// Squared distance from (px, py) to the infinite line through this
    /// segment.
    pub fn pt_line_dist_sq(&self, px: f64, py: f64) -> f64 {
        let d = calc_line_point_distance(self.x1, self.y1, self.x2, self.y2, px, py);
        d * d
    }

    /// Point at parameter `t` along the segment (0 = start, 1 = end).
    pub fn point_at(&self, t: f64) -> PointD {
        PointD::new(
            self.x1 + t * (self.x2 - self.x1),
            self.y1 + t * (self.y2 - self.y1),
        )
    }

    /// A line has zero area and contains no point.
    pub fn contains(&self, _px: f64, _py: f64) -> bool {
        false
    }

    /// `true` if the segment touches the rectangle.
    pub fn intersects_rect(&self, rect: &RectD) -> bool {
        rect.intersects_line(self.x1, self.y1, self.x2, self.y2)
    }

    /// Tight bounding box of the two endpoints.
    pub fn get_bounds(&self) -> RectD {
        let x = self.x1.min(self.x2);
        let y = self.y1.min(self.y2);
        RectD::new(x, y, self.x1.max(self.x2) - x, self.y1.max(self.y2) - y)
    }

    /// Iterate the segment as `MoveTo, LineTo`, optionally transformed.
    pub fn path_iter(&self, transform: Option<&TransAffine>) -> LineIterator {
        LineIterator {
            line: *self,
            transform: transform.cloned(),
            index: 0,
        }
    }
}

// ============================================================================
// LineIterator
// ============================================================================

/// Path iterator over a line segment: `MoveTo` then `LineTo`.
pub struct LineIterator {
    line: LineD,
    transform: Option<TransAffine>,
    index: usize,
}

impl PathIterator for LineIterator {
    fn winding_rule(&self) -> WindingRule {
        WindingRule::NonZero
    }

    fn is_done(&self) -> bool {
        self.index > 1
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
        let seg = if self.index == 0 {
            coords[0] = self.line.x1;
            coords[1] = self.line.y1;
            SegmentType::MoveTo
        } else {
            coords[0] = self.line.x2;
            coords[1] = self.line.y2;
            SegmentType::LineTo
        };
        if let Some(t) = &self.transform {
            let (a, b) = coords.split_at_mut(1);
            t.transform(&mut a[0], &mut b[0]);
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

    #[test]
    fn test_set_line() {
        let mut l = LineD::new(0.0, 0.0, 1.0, 1.0);
        l.set_line(2.0, 3.0, 4.0, 5.0);
        assert_eq!(l, LineD::new(2.0, 3.0, 4.0, 5.0));

        let lf = LineF::new(0.0, 0.0, 1.0, 2.0);
        assert_eq!(lf.y2, 2.0f32);
    }

    #[test]
    fn test_relative_ccw_sides() {
        let l = LineD::new(0.0, 0.0, 10.0, 0.0);
        assert_eq!(l.relative_ccw(5.0, 1.0), -1);
        assert_eq!(l.relative_ccw(5.0, -1.0), 1);
    }

    #[test]
    fn test_relative_ccw_collinear() {
        let l = LineD::new(0.0, 0.0, 10.0, 0.0);
        // Between the endpoints (inclusive)
        assert_eq!(l.relative_ccw(5.0, 0.0), 0);
        assert_eq!(l.relative_ccw(0.0, 0.0), 0);
        assert_eq!(l.relative_ccw(10.0, 0.0), 0);
        // Before the start / beyond the end
        assert_eq!(l.relative_ccw(-1.0, 0.0), -1);
        assert_eq!(l.relative_ccw(11.0, 0.0), 1);
    }

    #[test]
    fn test_lines_intersect_crossing() {
        let a = LineD::new(0.0, 0.0, 10.0, 10.0);
        let b = LineD::new(0.0, 10.0, 10.0, 0.0);
        assert!(a.intersects_line(&b));
        assert!(b.intersects_line(&a));
    }

    #[test]
    fn test_lines_intersect_disjoint() {
        let a = LineD::new(0.0, 0.0, 1.0, 0.0);
        let b = LineD::new(0.0, 1.0, 1.0, 1.0);
        assert!(!a.intersects_line(&b));
    }

    #[test]
    fn test_lines_intersect_shared_endpoint() {
        let a = LineD::new(0.0, 0.0, 5.0, 5.0);
        let b = LineD::new(5.0, 5.0, 10.0, 0.0);
        assert!(a.intersects_line(&b));
    }

    #[test]
    fn test_lines_intersect_collinear() {
        // Overlapping collinear segments intersect
        let a = LineD::new(0.0, 0.0, 5.0, 0.0);
        let b = LineD::new(3.0, 0.0, 8.0, 0.0);
        assert!(a.intersects_line(&b));

        // Disjoint collinear segments do not
        let c = LineD::new(6.0, 0.0, 8.0, 0.0);
        assert!(!a.intersects_line(&c));
    }

    #[test]
    fn test_pt_seg_dist() {
        let l = LineD::new(0.0, 0.0, 10.0, 0.0);
        assert!((l.pt_seg_dist(5.0, 3.0) - 3.0).abs() < 1e-12);
        assert!((l.pt_seg_dist_sq(5.0, 3.0) - 9.0).abs() < 1e-12);
        // Clamps to the nearest endpoint
        assert!((l.pt_seg_dist(-3.0, 4.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_pt_line_dist() {
        let l = LineD::new(0.0, 0.0, 10.0, 0.0);
        // The infinite line does not clamp
        assert!((l.pt_line_dist(-3.0, 4.0) - 4.0).abs() < 1e-12);
        assert!((l.pt_line_dist_sq(-3.0, 4.0) - 16.0).abs() < 1e-12);
        // Distance is unsigned on both sides
        assert!((l.pt_line_dist(5.0, -2.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_at() {
        let l = LineD::new(0.0, 0.0, 10.0, 20.0);
        let mid = l.point_at(0.5);
        assert!((mid.x - 5.0).abs() < 1e-12);
        assert!((mid.y - 10.0).abs() < 1e-12);
        assert_eq!(l.point_at(0.0), PointD::new(0.0, 0.0));
        assert_eq!(l.point_at(1.0), PointD::new(10.0, 20.0));
    }

    #[test]
    fn test_contains_is_always_false() {
        let l = LineD::new(0.0, 0.0, 10.0, 0.0);
        assert!(!l.contains(5.0, 0.0));
    }

    #[test]
    fn test_intersects_rect() {
        let l = LineD::new(-5.0, 5.0, 15.0, 5.0);
        let r = RectD::new(0.0, 0.0, 10.0, 10.0);
        assert!(l.intersects_rect(&r));

        let far = LineD::new(-5.0, 50.0, 15.0, 50.0);
        assert!(!far.intersects_rect(&r));
    }

    #[test]
    fn test_get_bounds() {
        let l = LineD::new(10.0, 2.0, 4.0, 8.0);
        assert_eq!(l.get_bounds(), RectD::new(4.0, 2.0, 6.0, 6.0));
    }

    #[test]
    fn test_path_iter() {
        let l = LineD::new(1.0, 2.0, 3.0, 4.0);
        let mut it = l.path_iter(None);
        let mut coords = [0.0f64; 6];

        assert_eq!(it.current_segment(&mut coords).unwrap(), SegmentType::MoveTo);
        assert_eq!(&coords[..2], &[1.0, 2.0]);
        it.next();
        assert_eq!(it.current_segment(&mut coords).unwrap(), SegmentType::LineTo);
        assert_eq!(&coords[..2], &[3.0, 4.0]);
        it.next();
        assert!(it.is_done());
        assert!(it.current_segment(&mut coords).is_err());
    }

    #[test]
    fn test_path_iter_transformed() {
        let l = LineD::new(0.0, 0.0, 1.0, 0.0);
        let t = TransAffine::new_scaling(2.0, 2.0);
        let mut it = l.path_iter(Some(&t));
        let mut coords = [0.0f64; 6];
        it.next();
        it.current_segment(&mut coords).unwrap();
        assert_eq!(&coords[..2], &[2.0, 0.0]);
    }
}
