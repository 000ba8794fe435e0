//! Crossing counts and polynomial root solving for containment tests.
//!
//! Containment logic in the kernel never counts crossings itself — it asks
//! a [`CrossingOracle`]. The trait keeps the counting algorithm swappable
//! (and containment testable against stub oracles with canned counts);
//! [`RayCrossings`] is the reference implementation, which reduces curve
//! segments to chords by adaptive subdivision before counting.

use crate::basics::PathIterator;
use crate::curves::{CubicCurveD, QuadCurveD};

// ============================================================================
// Constants
// ============================================================================

/// Sentinel crossing count: the shape's boundary enters the rectangle, so
/// no simple inside/outside classification applies.
pub const RECT_INTERSECTS: i32 = i32::MIN;

// ============================================================================
// Winding predicates
// ============================================================================

/// Non-zero winding: inside when the signed crossing count is non-zero.
#[inline]
pub fn is_inside_non_zero(crossings: i32) -> bool {
    crossings != 0
}

/// Even-odd winding: inside when the crossing count is odd.
#[inline]
pub fn is_inside_even_odd(crossings: i32) -> bool {
    (crossings & 1) != 0
}

// ============================================================================
// Polynomial root solvers
// ============================================================================

/// Real roots of `eqn[2]*x^2 + eqn[1]*x + eqn[0] = 0`, written into `res`.
/// Returns the root count, degrading to the linear solution when the
/// leading coefficient is zero, or `-1` for the constant equation.
pub fn solve_quadratic(eqn: &[f64; 3], res: &mut [f64; 2]) -> i32 {
    let a = eqn[2];
    let b = eqn[1];
    let c = eqn[0];
    let mut roots = 0usize;
    if a == 0.0 {
        if b == 0.0 {
            return -1;
        }
        res[roots] = -c / b;
        roots += 1;
    } else {
        let mut d = b * b - 4.0 * a * c;
        if d < 0.0 {
            return 0;
        }
        d = d.sqrt();
        if b < 0.0 {
            d = -d;
        }
        let q = (b + d) / -2.0;
        res[roots] = q / a;
        roots += 1;
        if q != 0.0 {
            res[roots] = c / q;
            roots += 1;
        }
    }
    roots as i32
}

/// Real roots of `eqn[3]*x^3 + eqn[2]*x^2 + eqn[1]*x + eqn[0] = 0`,
/// written into `res`. Returns the root count; degrades to
/// [`solve_quadratic`] when the cubic coefficient is zero.
pub fn solve_cubic(eqn: &[f64; 4], res: &mut [f64; 3]) -> i32 {
    let d = eqn[3];
    if d == 0.0 {
        let quad = [eqn[0], eqn[1], eqn[2]];
        let mut qres = [0.0; 2];
        let n = solve_quadratic(&quad, &mut qres);
        res[0] = qres[0];
        res[1] = qres[1];
        return n;
    }
    let a = eqn[2] / d;
    let b = eqn[1] / d;
    let c = eqn[0] / d;

    let q = (a * a - 3.0 * b) / 9.0;
    let r = (2.0 * a * a * a - 9.0 * a * b + 27.0 * c) / 54.0;
    let r2 = r * r;
    let q3 = q * q * q;
    let a3 = a / 3.0;
    if r2 < q3 {
        let theta = (r / q3.sqrt()).acos();
        let m = -2.0 * q.sqrt();
        res[0] = m * (theta / 3.0).cos() - a3;
        res[1] = m * ((theta + 2.0 * std::f64::consts::PI) / 3.0).cos() - a3;
        res[2] = m * ((theta - 2.0 * std::f64::consts::PI) / 3.0).cos() - a3;
        3
    } else {
        let neg = r < 0.0;
        let rr = if neg { -r } else { r };
        let s = (r2 - q3).sqrt();
        let mut big = (rr + s).powf(1.0 / 3.0);
        if !neg {
            big = -big;
        }
        let small = if big == 0.0 { 0.0 } else { q / big };
        res[0] = (big + small) - a3;
        1
    }
}

// ============================================================================
// Per-segment crossing primitives
// ============================================================================

/// Signed crossings of the horizontal ray from (px, py) toward +x with the
/// segment (x0,y0)→(x1,y1): `+1` for a downward-in-y crossing, `-1` for
/// the reverse, `0` for none. The y interval is half open so shared
/// vertices are counted once.
pub fn point_crossings_for_line(px: f64, py: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> i32 {
    if py < y0 && py < y1 {
        return 0;
    }
    if py >= y0 && py >= y1 {
        return 0;
    }
    if px >= x0 && px >= x1 {
        return 0;
    }
    if px < x0 && px < x1 {
        return if y0 < y1 { 1 } else { -1 };
    }
    let xintercept = x0 + (py - y0) * (x1 - x0) / (y1 - y0);
    if px >= xintercept {
        return 0;
    }
    if y0 < y1 {
        1
    } else {
        -1
    }
}

/// Accumulate the crossings of segment (x0,y0)→(x1,y1) against the
/// vertical band to the right of the rectangle, or report
/// [`RECT_INTERSECTS`] when the segment reaches the rectangle itself.
/// Crossing counts against a rectangle are doubled: a segment sweeping the
/// whole band crosses both the top and bottom extensions.
#[allow(clippy::too_many_arguments)]
pub fn rect_crossings_for_line(
    crossings: i32,
    rxmin: f64,
    rymin: f64,
    rxmax: f64,
    rymax: f64,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
) -> i32 {
    if y0 >= rymax && y1 >= rymax {
        return crossings;
    }
    if y0 <= rymin && y1 <= rymin {
        return crossings;
    }
    if x0 <= rxmin && x1 <= rxmin {
        return crossings;
    }
    if x0 >= rxmax && x1 >= rxmax {
        // Entirely in the band right of the rectangle; count how many of
        // the two horizontal edge extensions it sweeps across.
        let mut crossings = crossings;
        if y0 < y1 {
            if y0 <= rymin {
                crossings += 1;
            }
            if y1 >= rymax {
                crossings += 1;
            }
        } else {
            if y1 <= rymin {
                crossings -= 1;
            }
            if y0 >= rymax {
                crossings -= 1;
            }
        }
        return crossings;
    }
    // Both coordinate ranges overlap the rectangle's
    if (x0 > rxmin && x0 < rxmax && y0 > rymin && y0 < rymax)
        || (x1 > rxmin && x1 < rxmax && y1 > rymin && y1 < rymax)
    {
        return RECT_INTERSECTS;
    }
    // Clip the segment to the horizontal band of the rectangle and retest
    let mut xi0 = x0;
    if y0 < rymin {
        xi0 += (rymin - y0) * (x1 - x0) / (y1 - y0);
    } else if y0 > rymax {
        xi0 += (rymax - y0) * (x1 - x0) / (y1 - y0);
    }
    let mut xi1 = x1;
    if y1 < rymin {
        xi1 += (rymin - y1) * (x0 - x1) / (y0 - y1);
    } else if y1 > rymax {
        xi1 += (rymax - y1) * (x0 - x1) / (y0 - y1);
    }
    if xi0 <= rxmin && xi1 <= rxmin {
        return crossings;
    }
    if xi0 >= rxmax && xi1 >= rxmax {
        let mut crossings = crossings;
        if y0 < y1 {
            if y0 <= rymin {
                crossings += 1;
            }
            if y1 >= rymax {
                crossings += 1;
            }
        } else {
            if y1 <= rymin {
                crossings -= 1;
            }
            if y0 >= rymax {
                crossings -= 1;
            }
        }
        return crossings;
    }
    RECT_INTERSECTS
}

// ============================================================================
// CrossingOracle
// ============================================================================

/// Supplier of crossing counts for containment and intersection tests.
///
/// `point_crossings` is the signed count of boundary crossings of a
/// horizontal ray from the test point; unterminated subpaths are treated
/// as closed. `rect_crossings` reports the doubled crossing count of the
/// whole boundary around the rectangle, or [`RECT_INTERSECTS`] when the
/// boundary enters it.
pub trait CrossingOracle {
    fn point_crossings(&self, iter: &mut dyn PathIterator, px: f64, py: f64) -> i32;

    fn rect_crossings(&self, iter: &mut dyn PathIterator, rx: f64, ry: f64, rw: f64, rh: f64)
        -> i32;
}

// ============================================================================
// RayCrossings — reference oracle
// ============================================================================

/// Reference crossing oracle. Curve segments are subdivided until they are
/// flat within a tolerance (or a depth cap is reached) and counted as
/// chords; the error is bounded by the tolerance, which suits containment
/// tests away from the boundary.
#[derive(Debug, Clone, Copy)]
pub struct RayCrossings {
    flatness_sq: f64,
    limit: u32,
}

impl RayCrossings {
    /// Oracle with the default chord tolerance (0.01) and depth cap (16).
    pub fn new() -> Self {
        Self {
            flatness_sq: 1e-4,
            limit: 16,
        }
    }

    /// Oracle with a custom chord tolerance.
    pub fn with_flatness(flatness: f64) -> Self {
        Self {
            flatness_sq: flatness * flatness,
            limit: 16,
        }
    }

    fn point_crossings_for_quad(&self, px: f64, py: f64, q: &[f64], level: u32) -> i32 {
        // Hull culls: the curve never leaves its control polygon
        let ymin = q[1].min(q[3]).min(q[5]);
        let ymax = q[1].max(q[3]).max(q[5]);
        if py < ymin || py >= ymax || px >= q[0].max(q[2]).max(q[4]) {
            return point_crossings_for_line(px, py, q[0], q[1], q[4], q[5]);
        }
        if level >= self.limit || QuadCurveD::flatness_sq_flat(q, 0) < self.flatness_sq {
            return point_crossings_for_line(px, py, q[0], q[1], q[4], q[5]);
        }
        let mut buf = [0.0; 10];
        buf[..6].copy_from_slice(&q[..6]);
        QuadCurveD::subdivide_flat(&mut buf, 0, 0, 4);
        let (left, right) = (&buf[0..6], &buf[4..10]);
        self.point_crossings_for_quad(px, py, left, level + 1)
            + self.point_crossings_for_quad(px, py, right, level + 1)
    }

    fn point_crossings_for_cubic(&self, px: f64, py: f64, c: &[f64], level: u32) -> i32 {
        let ymin = c[1].min(c[3]).min(c[5]).min(c[7]);
        let ymax = c[1].max(c[3]).max(c[5]).max(c[7]);
        if py < ymin || py >= ymax || px >= c[0].max(c[2]).max(c[4]).max(c[6]) {
            return point_crossings_for_line(px, py, c[0], c[1], c[6], c[7]);
        }
        if level >= self.limit || CubicCurveD::flatness_sq_flat(c, 0) < self.flatness_sq {
            return point_crossings_for_line(px, py, c[0], c[1], c[6], c[7]);
        }
        let mut buf = [0.0; 14];
        buf[..8].copy_from_slice(&c[..8]);
        CubicCurveD::subdivide_flat(&mut buf, 0, 0, 6);
        let (left, right) = (&buf[0..8], &buf[6..14]);
        self.point_crossings_for_cubic(px, py, left, level + 1)
            + self.point_crossings_for_cubic(px, py, right, level + 1)
    }

    fn rect_crossings_for_quad(
        &self,
        crossings: i32,
        rx: (f64, f64, f64, f64),
        q: &[f64],
        level: u32,
    ) -> i32 {
        let (rxmin, rymin, rxmax, rymax) = rx;
        if level >= self.limit || QuadCurveD::flatness_sq_flat(q, 0) < self.flatness_sq {
            return rect_crossings_for_line(
                crossings, rxmin, rymin, rxmax, rymax, q[0], q[1], q[4], q[5],
            );
        }
        let mut buf = [0.0; 10];
        buf[..6].copy_from_slice(&q[..6]);
        QuadCurveD::subdivide_flat(&mut buf, 0, 0, 4);
        let crossings = self.rect_crossings_for_quad(crossings, rx, &buf[0..6], level + 1);
        if crossings == RECT_INTERSECTS {
            return RECT_INTERSECTS;
        }
        self.rect_crossings_for_quad(crossings, rx, &buf[4..10], level + 1)
    }

    fn rect_crossings_for_cubic(
        &self,
        crossings: i32,
        rx: (f64, f64, f64, f64),
        c: &[f64],
        level: u32,
    ) -> i32 {
        let (rxmin, rymin, rxmax, rymax) = rx;
        if level >= self.limit || CubicCurveD::flatness_sq_flat(c, 0) < self.flatness_sq {
            return rect_crossings_for_line(
                crossings, rxmin, rymin, rxmax, rymax, c[0], c[1], c[6], c[7],
            );
        }
        let mut buf = [0.0; 14];
        buf[..8].copy_from_slice(&c[..8]);
        CubicCurveD::subdivide_flat(&mut buf, 0, 0, 6);
        let crossings = self.rect_crossings_for_cubic(crossings, rx, &buf[0..8], level + 1);
        if crossings == RECT_INTERSECTS {
            return RECT_INTERSECTS;
        }
        self.rect_crossings_for_cubic(crossings, rx, &buf[6..14], level + 1)
    }
}

impl Default for RayCrossings {
    fn default() -> Self {
        Self::new()
    }
}

impl CrossingOracle for RayCrossings {
    fn point_crossings(&self, iter: &mut dyn PathIterator, px: f64, py: f64) -> i32 {
        let mut coords = [0.0f64; 6];
        let mut movx = 0.0;
        let mut movy = 0.0;
        let mut curx = 0.0;
        let mut cury = 0.0;
        let mut crossings = 0;
        while !iter.is_done() {
            let seg = match iter.current_segment(&mut coords) {
                Ok(seg) => seg,
                Err(_) => break,
            };
            match seg {
                crate::basics::SegmentType::MoveTo => {
                    if curx != movx || cury != movy {
                        crossings += point_crossings_for_line(px, py, curx, cury, movx, movy);
                    }
                    movx = coords[0];
                    movy = coords[1];
                    curx = movx;
                    cury = movy;
                }
                crate::basics::SegmentType::LineTo => {
                    crossings += point_crossings_for_line(px, py, curx, cury, coords[0], coords[1]);
                    curx = coords[0];
                    cury = coords[1];
                }
                crate::basics::SegmentType::QuadTo => {
                    let q = [curx, cury, coords[0], coords[1], coords[2], coords[3]];
                    crossings += self.point_crossings_for_quad(px, py, &q, 0);
                    curx = coords[2];
                    cury = coords[3];
                }
                crate::basics::SegmentType::CubicTo => {
                    let c = [
                        curx, cury, coords[0], coords[1], coords[2], coords[3], coords[4],
                        coords[5],
                    ];
                    crossings += self.point_crossings_for_cubic(px, py, &c, 0);
                    curx = coords[4];
                    cury = coords[5];
                }
                crate::basics::SegmentType::Close => {
                    if curx != movx || cury != movy {
                        crossings += point_crossings_for_line(px, py, curx, cury, movx, movy);
                    }
                    curx = movx;
                    cury = movy;
                }
            }
            iter.next();
        }
        // Implicit close of a trailing open subpath
        if curx != movx || cury != movy {
            crossings += point_crossings_for_line(px, py, curx, cury, movx, movy);
        }
        crossings
    }

    fn rect_crossings(
        &self,
        iter: &mut dyn PathIterator,
        rx: f64,
        ry: f64,
        rw: f64,
        rh: f64,
    ) -> i32 {
        let bounds = (rx, ry, rx + rw, ry + rh);
        let (rxmin, rymin, rxmax, rymax) = bounds;
        let mut coords = [0.0f64; 6];
        let mut movx = 0.0;
        let mut movy = 0.0;
        let mut curx = 0.0;
        let mut cury = 0.0;
        let mut crossings = 0;
        while crossings != RECT_INTERSECTS && !iter.is_done() {
            let seg = match iter.current_segment(&mut coords) {
                Ok(seg) => seg,
                Err(_) => break,
            };
            match seg {
                crate::basics::SegmentType::MoveTo => {
                    if curx != movx || cury != movy {
                        crossings = rect_crossings_for_line(
                            crossings, rxmin, rymin, rxmax, rymax, curx, cury, movx, movy,
                        );
                    }
                    movx = coords[0];
                    movy = coords[1];
                    curx = movx;
                    cury = movy;
                }
                crate::basics::SegmentType::LineTo => {
                    crossings = rect_crossings_for_line(
                        crossings, rxmin, rymin, rxmax, rymax, curx, cury, coords[0], coords[1],
                    );
                    curx = coords[0];
                    cury = coords[1];
                }
                crate::basics::SegmentType::QuadTo => {
                    let q = [curx, cury, coords[0], coords[1], coords[2], coords[3]];
                    crossings = self.rect_crossings_for_quad(crossings, bounds, &q, 0);
                    curx = coords[2];
                    cury = coords[3];
                }
                crate::basics::SegmentType::CubicTo => {
                    let c = [
                        curx, cury, coords[0], coords[1], coords[2], coords[3], coords[4],
                        coords[5],
                    ];
                    crossings = self.rect_crossings_for_cubic(crossings, bounds, &c, 0);
                    curx = coords[4];
                    cury = coords[5];
                }
                crate::basics::SegmentType::Close => {
                    if curx != movx || cury != movy {
                        crossings = rect_crossings_for_line(
                            crossings, rxmin, rymin, rxmax, rymax, curx, cury, movx, movy,
                        );
                    }
                    curx = movx;
                    cury = movy;
                }
            }
            iter.next();
        }
        if crossings != RECT_INTERSECTS && (curx != movx || cury != movy) {
            crossings = rect_crossings_for_line(
                crossings, rxmin, rymin, rxmax, rymax, curx, cury, movx, movy,
            );
        }
        crossings
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::RectD;

    #[test]
    fn test_winding_predicates() {
        assert!(is_inside_non_zero(1));
        assert!(is_inside_non_zero(-2));
        assert!(!is_inside_non_zero(0));

        assert!(is_inside_even_odd(1));
        assert!(is_inside_even_odd(3));
        assert!(!is_inside_even_odd(2));
        assert!(!is_inside_even_odd(0));
    }

    #[test]
    fn test_solve_quadratic_two_roots() {
        // x^2 - 3x + 2 = 0 -> roots 1, 2
        let eqn = [2.0, -3.0, 1.0];
        let mut res = [0.0; 2];
        let n = solve_quadratic(&eqn, &mut res);
        assert_eq!(n, 2);
        let mut roots = [res[0], res[1]];
        roots.sort_by(f64::total_cmp);
        assert!((roots[0] - 1.0).abs() < 1e-12);
        assert!((roots[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_solve_quadratic_degenerate() {
        // Linear: 2x + 4 = 0
        let mut res = [0.0; 2];
        assert_eq!(solve_quadratic(&[4.0, 2.0, 0.0], &mut res), 1);
        assert!((res[0] + 2.0).abs() < 1e-12);

        // Constant equation
        assert_eq!(solve_quadratic(&[4.0, 0.0, 0.0], &mut res), -1);

        // Negative discriminant
        assert_eq!(solve_quadratic(&[1.0, 0.0, 1.0], &mut res), 0);
    }

    #[test]
    fn test_solve_cubic_three_roots() {
        // (x-1)(x-2)(x-3) = x^3 - 6x^2 + 11x - 6
        let eqn = [-6.0, 11.0, -6.0, 1.0];
        let mut res = [0.0; 3];
        let n = solve_cubic(&eqn, &mut res);
        assert_eq!(n, 3);
        let mut roots = res;
        roots.sort_by(f64::total_cmp);
        assert!((roots[0] - 1.0).abs() < 1e-9);
        assert!((roots[1] - 2.0).abs() < 1e-9);
        assert!((roots[2] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_solve_cubic_one_root() {
        // x^3 - 1 = 0 -> single real root 1
        let eqn = [-1.0, 0.0, 0.0, 1.0];
        let mut res = [0.0; 3];
        let n = solve_cubic(&eqn, &mut res);
        assert_eq!(n, 1);
        assert!((res[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_solve_cubic_degrades_to_quadratic() {
        let eqn = [2.0, -3.0, 1.0, 0.0];
        let mut res = [0.0; 3];
        assert_eq!(solve_cubic(&eqn, &mut res), 2);
    }

    #[test]
    fn test_point_crossings_for_line() {
        // Upward segment right of the point: one positive crossing
        assert_eq!(point_crossings_for_line(0.0, 0.5, 5.0, 0.0, 5.0, 1.0), 1);
        // Downward: negative
        assert_eq!(point_crossings_for_line(0.0, 0.5, 5.0, 1.0, 5.0, 0.0), -1);
        // Segment left of the point: none
        assert_eq!(point_crossings_for_line(10.0, 0.5, 5.0, 0.0, 5.0, 1.0), 0);
        // Ray misses the y range
        assert_eq!(point_crossings_for_line(0.0, 2.0, 5.0, 0.0, 5.0, 1.0), 0);
        // Half-open interval: start vertex counts, end vertex does not
        assert_eq!(point_crossings_for_line(0.0, 0.0, 5.0, 0.0, 5.0, 1.0), 1);
        assert_eq!(point_crossings_for_line(0.0, 1.0, 5.0, 0.0, 5.0, 1.0), 0);
    }

    #[test]
    fn test_rect_crossings_for_line_band() {
        // Segment sweeping the full right band: two crossings
        let c = rect_crossings_for_line(0, 0.0, 0.0, 1.0, 1.0, 5.0, -1.0, 5.0, 2.0);
        assert_eq!(c, 2);
        // Reverse direction: negative
        let c = rect_crossings_for_line(0, 0.0, 0.0, 1.0, 1.0, 5.0, 2.0, 5.0, -1.0);
        assert_eq!(c, -2);
        // Left of the rect: untouched
        let c = rect_crossings_for_line(0, 0.0, 0.0, 1.0, 1.0, -5.0, -1.0, -5.0, 2.0);
        assert_eq!(c, 0);
        // Endpoint inside the rect
        let c = rect_crossings_for_line(0, 0.0, 0.0, 1.0, 1.0, 0.5, 0.5, 5.0, 0.5);
        assert_eq!(c, RECT_INTERSECTS);
    }

    #[test]
    fn test_ray_crossings_unit_square() {
        let oracle = RayCrossings::new();
        let square = RectD::new(0.0, 0.0, 1.0, 1.0);

        let mut it = square.path_iter(None);
        assert_ne!(oracle.point_crossings(&mut it, 0.5, 0.5), 0);

        let mut it = square.path_iter(None);
        assert_eq!(oracle.point_crossings(&mut it, 2.0, 2.0), 0);

        let mut it = square.path_iter(None);
        assert_eq!(oracle.point_crossings(&mut it, -0.5, 0.5), 0);
    }

    #[test]
    fn test_ray_crossings_quad_arch() {
        let oracle = RayCrossings::new();
        let q = crate::curves::QuadCurveD::new(0.0, 0.0, 5.0, 10.0, 10.0, 0.0);

        // Point under the arch, above the chord closing it
        let mut it = q.path_iter(None);
        assert_ne!(oracle.point_crossings(&mut it, 5.0, 2.0), 0);

        // Point above the arch
        let mut it = q.path_iter(None);
        assert_eq!(oracle.point_crossings(&mut it, 5.0, 8.0), 0);
    }

    #[test]
    fn test_ray_rect_crossings_square() {
        let oracle = RayCrossings::new();
        let square = RectD::new(0.0, 0.0, 10.0, 10.0);

        // Rect fully inside: doubled winding, no intersection
        let mut it = square.path_iter(None);
        let c = oracle.rect_crossings(&mut it, 4.0, 4.0, 2.0, 2.0);
        assert_ne!(c, RECT_INTERSECTS);
        assert_ne!(c, 0);

        // Rect fully outside
        let mut it = square.path_iter(None);
        let c = oracle.rect_crossings(&mut it, 20.0, 20.0, 2.0, 2.0);
        assert_eq!(c, 0);

        // Rect straddling the boundary
        let mut it = square.path_iter(None);
        let c = oracle.rect_crossings(&mut it, -1.0, 4.0, 3.0, 2.0);
        assert_eq!(c, RECT_INTERSECTS);
    }
}
