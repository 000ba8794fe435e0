//! Quadratic and cubic Bezier curve primitives: control points, flatness
//! metrics, midpoint subdivision, and evaluation.
//!
//! Subdivision is pure De Casteljau midpoint halving — every produced
//! coordinate is an affine combination of the inputs, so the halves
//! reproduce the parent's start/split/end points exactly. The flat-slice
//! forms operate on `[x, y, ...]` coordinate runs and are what the
//! flattening iterator drives.

use crate::basics::{PathIterator, PointD, SegmentType, WindingRule};
use crate::crossings::{CrossingOracle, RECT_INTERSECTS};
use crate::error::{GeomError, Result};
use crate::math::calc_segment_point_sq_distance;
use crate::rect::RectD;
use crate::trans_affine::TransAffine;

// ============================================================================
// QuadCurve
// ============================================================================

/// A quadratic Bezier segment: endpoints plus one control point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuadCurve<T: Copy> {
    pub x1: T,
    pub y1: T,
    pub ctrl_x: T,
    pub ctrl_y: T,
    pub x2: T,
    pub y2: T,
}

impl<T: Copy> QuadCurve<T> {
    pub fn new(x1: T, y1: T, ctrl_x: T, ctrl_y: T, x2: T, y2: T) -> Self {
        Self {
            x1,
            y1,
            ctrl_x,
            ctrl_y,
            x2,
            y2,
        }
    }

    /// Overwrite all three control points.
    pub fn set_curve(&mut self, x1: T, y1: T, ctrl_x: T, ctrl_y: T, x2: T, y2: T) {
        self.x1 = x1;
        self.y1 = y1;
        self.ctrl_x = ctrl_x;
        self.ctrl_y = ctrl_y;
        self.x2 = x2;
        self.y2 = y2;
    }
}

/// Quadratic curve with `f32` coordinates.
pub type QuadCurveF = QuadCurve<f32>;
/// Quadratic curve with `f64` coordinates.
pub type QuadCurveD = QuadCurve<f64>;

impl QuadCurveD {
    /// Squared flatness of the coordinate run `coords[off..off + 6]`:
    /// squared distance of the control point from the chord.
    pub fn flatness_sq_flat(coords: &[f64], off: usize) -> f64 {
        calc_segment_point_sq_distance(
            coords[off],
            coords[off + 1],
            coords[off + 4],
            coords[off + 5],
            coords[off + 2],
            coords[off + 3],
        )
    }

    /// Midpoint-subdivide the coordinate run at `src_off` into runs at
    /// `left_off` and `right_off` of the same buffer. The regions may
    /// overlap: all six source values are read out before anything is
    /// written.
    pub fn subdivide_flat(coords: &mut [f64], src_off: usize, left_off: usize, right_off: usize) {
        let x1 = coords[src_off];
        let y1 = coords[src_off + 1];
        let cx = coords[src_off + 2];
        let cy = coords[src_off + 3];
        let x2 = coords[src_off + 4];
        let y2 = coords[src_off + 5];

        let x1c = (x1 + cx) / 2.0;
        let y1c = (y1 + cy) / 2.0;
        let cx2 = (cx + x2) / 2.0;
        let cy2 = (cy + y2) / 2.0;
        let mx = (x1c + cx2) / 2.0;
        let my = (y1c + cy2) / 2.0;

        coords[left_off] = x1;
        coords[left_off + 1] = y1;
        coords[left_off + 2] = x1c;
        coords[left_off + 3] = y1c;
        coords[left_off + 4] = mx;
        coords[left_off + 5] = my;

        coords[right_off] = mx;
        coords[right_off + 1] = my;
        coords[right_off + 2] = cx2;
        coords[right_off + 3] = cy2;
        coords[right_off + 4] = x2;
        coords[right_off + 5] = y2;
    }

    /// Squared perpendicular distance of the control point from the chord.
    pub fn flatness_sq(&self) -> f64 {
        calc_segment_point_sq_distance(
            self.x1,
            self.y1,
            self.x2,
            self.y2,
            self.ctrl_x,
            self.ctrl_y,
        )
    }

    /// Perpendicular distance of the control point from the chord.
    pub fn flatness(&self) -> f64 {
        self.flatness_sq().sqrt()
    }

    /// Split at the parametric midpoint.
    pub fn subdivide(&self) -> (QuadCurveD, QuadCurveD) {
        let mut buf = [
            self.x1,
            self.y1,
            self.ctrl_x,
            self.ctrl_y,
            self.x2,
            self.y2,
            0.0,
            0.0,
            0.0,
            0.0,
        ];
        Self::subdivide_flat(&mut buf, 0, 0, 4);
        (
            QuadCurveD::new(buf[0], buf[1], buf[2], buf[3], buf[4], buf[5]),
            QuadCurveD::new(buf[4], buf[5], buf[6], buf[7], buf[8], buf[9]),
        )
    }

    /// Evaluate the curve at parameter `t`.
    pub fn point_at(&self, t: f64) -> PointD {
        let u = 1.0 - t;
        PointD::new(
            u * u * self.x1 + 2.0 * t * u * self.ctrl_x + t * t * self.x2,
            u * u * self.y1 + 2.0 * t * u * self.ctrl_y + t * t * self.y2,
        )
    }

    /// Bounding box of the control polygon (contains the curve).
    pub fn get_bounds(&self) -> RectD {
        let x = self.x1.min(self.ctrl_x).min(self.x2);
        let y = self.y1.min(self.ctrl_y).min(self.y2);
        RectD::new(
            x,
            y,
            self.x1.max(self.ctrl_x).max(self.x2) - x,
            self.y1.max(self.ctrl_y).max(self.y2) - y,
        )
    }

    /// Iterate as `MoveTo` + one `QuadTo`, optionally transformed.
    pub fn path_iter(&self, transform: Option<&TransAffine>) -> QuadIterator {
        QuadIterator {
            curve: *self,
            transform: transform.cloned(),
            index: 0,
        }
    }

    /// Point containment of the chord-closed curve region, classified by
    /// the non-zero winding of the oracle's crossing count.
    pub fn contains<O: CrossingOracle>(&self, oracle: &O, px: f64, py: f64) -> bool {
        let mut it = self.path_iter(None);
        oracle.point_crossings(&mut it, px, py) != 0
    }

    /// `true` if the chord-closed curve region touches the rectangle.
    pub fn intersects_rect<O: CrossingOracle>(&self, oracle: &O, rect: &RectD) -> bool {
        if rect.is_empty() {
            return false;
        }
        let mut it = self.path_iter(None);
        let crossings = oracle.rect_crossings(&mut it, rect.x, rect.y, rect.width, rect.height);
        crossings == RECT_INTERSECTS || crossings != 0
    }

    /// `true` if the rectangle lies entirely inside the chord-closed
    /// curve region.
    pub fn contains_rect<O: CrossingOracle>(&self, oracle: &O, rect: &RectD) -> bool {
        if rect.is_empty() {
            return false;
        }
        let mut it = self.path_iter(None);
        let crossings = oracle.rect_crossings(&mut it, rect.x, rect.y, rect.width, rect.height);
        crossings != RECT_INTERSECTS && crossings != 0
    }
}

// ============================================================================
// CubicCurve
// ============================================================================

/// A cubic Bezier segment: endpoints plus two control points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CubicCurve<T: Copy> {
    pub x1: T,
    pub y1: T,
    pub ctrl_x1: T,
    pub ctrl_y1: T,
    pub ctrl_x2: T,
    pub ctrl_y2: T,
    pub x2: T,
    pub y2: T,
}

impl<T: Copy> CubicCurve<T> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x1: T,
        y1: T,
        ctrl_x1: T,
        ctrl_y1: T,
        ctrl_x2: T,
        ctrl_y2: T,
        x2: T,
        y2: T,
    ) -> Self {
        Self {
            x1,
            y1,
            ctrl_x1,
            ctrl_y1,
            ctrl_x2,
            ctrl_y2,
            x2,
            y2,
        }
    }

    /// Overwrite all four control points.
    #[allow(clippy::too_many_arguments)]
    pub fn set_curve(
        &mut self,
        x1: T,
        y1: T,
        ctrl_x1: T,
        ctrl_y1: T,
        ctrl_x2: T,
        ctrl_y2: T,
        x2: T,
        y2: T,
    ) {
        self.x1 = x1;
        self.y1 = y1;
        self.ctrl_x1 = ctrl_x1;
        self.ctrl_y1 = ctrl_y1;
        self.ctrl_x2 = ctrl_x2;
        self.ctrl_y2 = ctrl_y2;
        self.x2 = x2;
        self.y2 = y2;
    }
}

/// Cubic curve with `f32` coordinates.
pub type CubicCurveF = CubicCurve<f32>;
/// Cubic curve with `f64` coordinates.
pub type CubicCurveD = CubicCurve<f64>;

impl CubicCurveD {
    /// Squared flatness of the coordinate run `coords[off..off + 8]`:
    /// the larger of the two control-point distances from the chord.
    pub fn flatness_sq_flat(coords: &[f64], off: usize) -> f64 {
        let d1 = calc_segment_point_sq_distance(
            coords[off],
            coords[off + 1],
            coords[off + 6],
            coords[off + 7],
            coords[off + 2],
            coords[off + 3],
        );
        let d2 = calc_segment_point_sq_distance(
            coords[off],
            coords[off + 1],
            coords[off + 6],
            coords[off + 7],
            coords[off + 4],
            coords[off + 5],
        );
        d1.max(d2)
    }

    /// Midpoint-subdivide the coordinate run at `src_off` into runs at
    /// `left_off` and `right_off` of the same buffer. Regions may overlap;
    /// sources are read out before writing. Three nested midpoint levels.
    pub fn subdivide_flat(coords: &mut [f64], src_off: usize, left_off: usize, right_off: usize) {
        let x1 = coords[src_off];
        let y1 = coords[src_off + 1];
        let cx1 = coords[src_off + 2];
        let cy1 = coords[src_off + 3];
        let cx2 = coords[src_off + 4];
        let cy2 = coords[src_off + 5];
        let x2 = coords[src_off + 6];
        let y2 = coords[src_off + 7];

        let x12 = (x1 + cx1) / 2.0;
        let y12 = (y1 + cy1) / 2.0;
        let xcc = (cx1 + cx2) / 2.0;
        let ycc = (cy1 + cy2) / 2.0;
        let x34 = (cx2 + x2) / 2.0;
        let y34 = (cy2 + y2) / 2.0;
        let xl = (x12 + xcc) / 2.0;
        let yl = (y12 + ycc) / 2.0;
        let xr = (xcc + x34) / 2.0;
        let yr = (ycc + y34) / 2.0;
        let mx = (xl + xr) / 2.0;
        let my = (yl + yr) / 2.0;

        coords[left_off] = x1;
        coords[left_off + 1] = y1;
        coords[left_off + 2] = x12;
        coords[left_off + 3] = y12;
        coords[left_off + 4] = xl;
        coords[left_off + 5] = yl;
        coords[left_off + 6] = mx;
        coords[left_off + 7] = my;

        coords[right_off] = mx;
        coords[right_off + 1] = my;
        coords[right_off + 2] = xr;
        coords[right_off + 3] = yr;
        coords[right_off + 4] = x34;
        coords[right_off + 5] = y34;
        coords[right_off + 6] = x2;
        coords[right_off + 7] = y2;
    }

    /// Squared flatness: the larger control-point distance from the chord.
    pub fn flatness_sq(&self) -> f64 {
        let d1 = calc_segment_point_sq_distance(
            self.x1,
            self.y1,
            self.x2,
            self.y2,
            self.ctrl_x1,
            self.ctrl_y1,
        );
        let d2 = calc_segment_point_sq_distance(
            self.x1,
            self.y1,
            self.x2,
            self.y2,
            self.ctrl_x2,
            self.ctrl_y2,
        );
        d1.max(d2)
    }

    /// Flatness: the larger control-point distance from the chord.
    pub fn flatness(&self) -> f64 {
        self.flatness_sq().sqrt()
    }

    /// Split at the parametric midpoint.
    pub fn subdivide(&self) -> (CubicCurveD, CubicCurveD) {
        let mut buf = [0.0; 14];
        buf[0] = self.x1;
        buf[1] = self.y1;
        buf[2] = self.ctrl_x1;
        buf[3] = self.ctrl_y1;
        buf[4] = self.ctrl_x2;
        buf[5] = self.ctrl_y2;
        buf[6] = self.x2;
        buf[7] = self.y2;
        Self::subdivide_flat(&mut buf, 0, 0, 6);
        (
            CubicCurveD::new(
                buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
            ),
            CubicCurveD::new(
                buf[6], buf[7], buf[8], buf[9], buf[10], buf[11], buf[12], buf[13],
            ),
        )
    }

    /// Evaluate the curve at parameter `t`.
    pub fn point_at(&self, t: f64) -> PointD {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * t * u * u;
        let b2 = 3.0 * t * t * u;
        let b3 = t * t * t;
        PointD::new(
            b0 * self.x1 + b1 * self.ctrl_x1 + b2 * self.ctrl_x2 + b3 * self.x2,
            b0 * self.y1 + b1 * self.ctrl_y1 + b2 * self.ctrl_y2 + b3 * self.y2,
        )
    }

    /// Bounding box of the control polygon (contains the curve).
    pub fn get_bounds(&self) -> RectD {
        let x = self.x1.min(self.ctrl_x1).min(self.ctrl_x2).min(self.x2);
        let y = self.y1.min(self.ctrl_y1).min(self.ctrl_y2).min(self.y2);
        let mx = self.x1.max(self.ctrl_x1).max(self.ctrl_x2).max(self.x2);
        let my = self.y1.max(self.ctrl_y1).max(self.ctrl_y2).max(self.y2);
        RectD::new(x, y, mx - x, my - y)
    }

    /// Iterate as `MoveTo` + one `CubicTo`, optionally transformed.
    pub fn path_iter(&self, transform: Option<&TransAffine>) -> CubicIterator {
        CubicIterator {
            curve: *self,
            transform: transform.cloned(),
            index: 0,
        }
    }

    /// Point containment of the chord-closed curve region, classified by
    /// the non-zero winding of the oracle's crossing count.
    pub fn contains<O: CrossingOracle>(&self, oracle: &O, px: f64, py: f64) -> bool {
        let mut it = self.path_iter(None);
        oracle.point_crossings(&mut it, px, py) != 0
    }

    /// `true` if the chord-closed curve region touches the rectangle.
    pub fn intersects_rect<O: CrossingOracle>(&self, oracle: &O, rect: &RectD) -> bool {
        if rect.is_empty() {
            return false;
        }
        let mut it = self.path_iter(None);
        let crossings = oracle.rect_crossings(&mut it, rect.x, rect.y, rect.width, rect.height);
        crossings == RECT_INTERSECTS || crossings != 0
    }

    /// `true` if the rectangle lies entirely inside the chord-closed
    /// curve region.
    pub fn contains_rect<O: CrossingOracle>(&self, oracle: &O, rect: &RectD) -> bool {
        if rect.is_empty() {
            return false;
        }
        let mut it = self.path_iter(None);
        let crossings = oracle.rect_crossings(&mut it, rect.x, rect.y, rect.width, rect.height);
        crossings != RECT_INTERSECTS && crossings != 0
    }
}

// ============================================================================
// Iterators
// ============================================================================

/// Path iterator over a quadratic curve: `MoveTo` then `QuadTo`.
pub struct QuadIterator {
    curve: QuadCurveD,
    transform: Option<TransAffine>,
    index: usize,
}

impl PathIterator for QuadIterator {
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
        let (seg, n) = if self.index == 0 {
            coords[0] = self.curve.x1;
            coords[1] = self.curve.y1;
            (SegmentType::MoveTo, 1)
        } else {
            coords[0] = self.curve.ctrl_x;
            coords[1] = self.curve.ctrl_y;
            coords[2] = self.curve.x2;
            coords[3] = self.curve.y2;
            (SegmentType::QuadTo, 2)
        };
        if let Some(t) = &self.transform {
            t.transform_in_slice(coords, 0, 0, n);
        }
        Ok(seg)
    }
}

/// Path iterator over a cubic curve: `MoveTo` then `CubicTo`.
pub struct CubicIterator {
    curve: CubicCurveD,
    transform: Option<TransAffine>,
    index: usize,
}

impl PathIterator for CubicIterator {
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
        let (seg, n) = if self.index == 0 {
            coords[0] = self.curve.x1;
            coords[1] = self.curve.y1;
            (SegmentType::MoveTo, 1)
        } else {
            coords[0] = self.curve.ctrl_x1;
            coords[1] = self.curve.ctrl_y1;
            coords[2] = self.curve.ctrl_x2;
            coords[3] = self.curve.ctrl_y2;
            coords[4] = self.curve.x2;
            coords[5] = self.curve.y2;
            (SegmentType::CubicTo, 3)
        };
        if let Some(t) = &self.transform {
            t.transform_in_slice(coords, 0, 0, n);
        }
        Ok(seg)
    }
}

// ============================================================================
// Tests
// ============================================================================
