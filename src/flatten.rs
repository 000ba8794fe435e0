//! Adaptive curve flattening: a decorator iterator that subdivides the
//! curve segments of any inner [`PathIterator`] into line segments within
//! a flatness tolerance.
//!
//! Work lives in a growable hold buffer with the current segment at the
//! low end; subdividing pushes the left half below the working segment and
//! leaves the right half behind it, so each emitted `LineTo` is one buffer
//! pop. When the per-segment subdivision depth budget runs out the current
//! chord is accepted as-is: termination is guaranteed on pathological
//! (near-cusp) curves at the price of accuracy.

use crate::basics::{PathIterator, SegmentType, WindingRule};
use crate::curves::{CubicCurveD, QuadCurveD};
use crate::error::{GeomError, Result};

/// Default per-segment subdivision depth budget.
pub const DEFAULT_RECURSION_LIMIT: u32 = 16;

/// Initial hold-buffer capacity and growth increment.
const BUFFER_SIZE: usize = 16;

// ============================================================================
// FlatteningPathIterator
// ============================================================================

/// Path iterator that emits only `MoveTo`, `LineTo` and `Close` segments,
/// approximating curve segments from the inner iterator by chords whose
/// control points deviate from them by no more than the flatness
/// tolerance (except when the recursion budget runs out first).
pub struct FlatteningPathIterator<I: PathIterator> {
    src: I,
    flatness_sq: f64,
    limit: u32,
    hold: Vec<f64>,
    hold_index: usize,
    hold_end: usize,
    hold_type: SegmentType,
    curx: f64,
    cury: f64,
    movx: f64,
    movy: f64,
    levels: Vec<u32>,
    level_index: usize,
    done: bool,
}

impl<I: PathIterator> FlatteningPathIterator<I> {
    /// Flatten `src` with the given tolerance and the default recursion
    /// limit of 16. Fails on negative (or NaN) flatness.
    pub fn new(src: I, flatness: f64) -> Result<Self> {
        Self::with_limit(src, flatness, DEFAULT_RECURSION_LIMIT)
    }

    /// Flatten `src` with the given tolerance and subdivision depth
    /// budget. Fails on negative (or NaN) flatness.
    pub fn with_limit(src: I, flatness: f64, limit: u32) -> Result<Self> {
        if !(flatness >= 0.0) {
            return Err(GeomError::InvalidArgument("flatness must be non-negative"));
        }
        let mut iter = Self {
            src,
            flatness_sq: flatness * flatness,
            limit,
            hold: vec![0.0; BUFFER_SIZE],
            hold_index: 0,
            hold_end: 0,
            hold_type: SegmentType::MoveTo,
            curx: 0.0,
            cury: 0.0,
            movx: 0.0,
            movy: 0.0,
            levels: vec![0; limit as usize + 1],
            level_index: 0,
            done: false,
        };
        iter.advance(false);
        Ok(iter)
    }

    /// The flatness tolerance.
    pub fn flatness(&self) -> f64 {
        self.flatness_sq.sqrt()
    }

    /// The subdivision depth budget.
    pub fn recursion_limit(&self) -> u32 {
        self.limit
    }

    /// Make room for `want` more coordinates below `hold_index`. Growth
    /// extends the low end: live contents move to the tail of the new
    /// buffer because new work is pushed toward lower indices.
    fn ensure_hold_capacity(&mut self, want: usize) {
        if self.hold_index < want {
            let have = self.hold.len() - self.hold_index;
            let mut grown = vec![0.0; self.hold.len() + BUFFER_SIZE];
            let new_index = self.hold_index + BUFFER_SIZE;
            grown[new_index..new_index + have].copy_from_slice(&self.hold[self.hold_index..]);
            self.hold = grown;
            self.hold_index = new_index;
            self.hold_end += BUFFER_SIZE;
        }
    }

    fn advance(&mut self, pull_next: bool) {
        if self.done {
            return;
        }
        if self.hold_index >= self.hold_end {
            // The hold buffer is drained; fetch the next source segment
            if pull_next {
                self.src.next();
            }
            if self.src.is_done() {
                self.done = true;
                return;
            }
            let mut coords = [0.0f64; 6];
            self.hold_type = match self.src.current_segment(&mut coords) {
                Ok(seg) => seg,
                Err(_) => {
                    self.done = true;
                    return;
                }
            };
            let n = self.hold_type.coord_count();
            self.hold[..n].copy_from_slice(&coords[..n]);
            self.level_index = 0;
            self.levels[0] = 0;
        }

        match self.hold_type {
            SegmentType::MoveTo | SegmentType::LineTo => {
                self.curx = self.hold[0];
                self.cury = self.hold[1];
                if self.hold_type == SegmentType::MoveTo {
                    self.movx = self.curx;
                    self.movy = self.cury;
                }
                self.hold_index = 0;
                self.hold_end = 0;
            }
            SegmentType::Close => {
                self.curx = self.movx;
                self.cury = self.movy;
                self.hold_index = 0;
                self.hold_end = 0;
            }
            SegmentType::QuadTo => {
                if self.hold_index >= self.hold_end {
                    // Seed: [previous point, control point, end point]
                    // moved to the tail of the buffer
                    self.hold_index = self.hold.len() - 6;
                    self.hold_end = self.hold.len() - 2;
                    let i = self.hold_index;
                    let (cx, cy, x2, y2) = (self.hold[0], self.hold[1], self.hold[2], self.hold[3]);
                    self.hold[i] = self.curx;
                    self.hold[i + 1] = self.cury;
                    self.hold[i + 2] = cx;
                    self.hold[i + 3] = cy;
                    self.hold[i + 4] = x2;
                    self.hold[i + 5] = y2;
                    self.curx = x2;
                    self.cury = y2;
                }
                let mut level = self.levels[self.level_index];
                while level < self.limit
                    && QuadCurveD::flatness_sq_flat(&self.hold, self.hold_index)
                        >= self.flatness_sq
                {
                    self.ensure_hold_capacity(4);
                    QuadCurveD::subdivide_flat(
                        &mut self.hold,
                        self.hold_index,
                        self.hold_index - 4,
                        self.hold_index,
                    );
                    self.hold_index -= 4;
                    // Both halves sit one level deeper than their parent
                    level += 1;
                    self.levels[self.level_index] = level;
                    self.level_index += 1;
                    self.levels[self.level_index] = level;
                }
                // Flat enough, or out of depth budget: emit this chord
                self.hold_index += 4;
                self.level_index = self.level_index.saturating_sub(1);
            }
            SegmentType::CubicTo => {
                if self.hold_index >= self.hold_end {
                    self.hold_index = self.hold.len() - 8;
                    self.hold_end = self.hold.len() - 2;
                    let i = self.hold_index;
                    let (cx1, cy1, cx2, cy2, x2, y2) = (
                        self.hold[0],
                        self.hold[1],
                        self.hold[2],
                        self.hold[3],
                        self.hold[4],
                        self.hold[5],
                    );
                    self.hold[i] = self.curx;
                    self.hold[i + 1] = self.cury;
                    self.hold[i + 2] = cx1;
                    self.hold[i + 3] = cy1;
                    self.hold[i + 4] = cx2;
                    self.hold[i + 5] = cy2;
                    self.hold[i + 6] = x2;
                    self.hold[i + 7] = y2;
                    self.curx = x2;
                    self.cury = y2;
                }
                let mut level = self.levels[self.level_index];
                while level < self.limit
                    && CubicCurveD::flatness_sq_flat(&self.hold, self.hold_index)
                        >= self.flatness_sq
                {
                    self.ensure_hold_capacity(6);
                    CubicCurveD::subdivide_flat(
                        &mut self.hold,
                        self.hold_index,
                        self.hold_index - 6,
                        self.hold_index,
                    );
                    self.hold_index -= 6;
                    level += 1;
                    self.levels[self.level_index] = level;
                    self.level_index += 1;
                    self.levels[self.level_index] = level;
                }
                self.hold_index += 6;
                self.level_index = self.level_index.saturating_sub(1);
            }
        }
    }
}

impl<I: PathIterator> PathIterator for FlatteningPathIterator<I> {
    fn winding_rule(&self) -> WindingRule {
        self.src.winding_rule()
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn next(&mut self) {
        self.advance(true);
    }

    fn current_segment(&self, coords: &mut [f64; 6]) -> Result<SegmentType> {
        if self.done {
            return Err(GeomError::IteratorExhausted);
        }
        let mut seg = self.hold_type;
        if seg != SegmentType::Close {
            coords[0] = self.hold[self.hold_index];
            coords[1] = self.hold[self.hold_index + 1];
            if seg != SegmentType::MoveTo {
                seg = SegmentType::LineTo;
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
    use crate::curves::{CubicCurveD, QuadCurveD};
    use crate::general_path::GeneralPath;
    use crate::line::LineD;

    fn collect<I: PathIterator>(mut it: I) -> Vec<(SegmentType, Vec<f64>)> {
        let mut out = Vec::new();
        while !it.is_done() {
            let mut coords = [0.0f64; 6];
            let seg = it.current_segment(&mut coords).unwrap();
            out.push((seg, coords[..seg.coord_count()].to_vec()));
            it.next();
        }
        out
    }

    #[test]
    fn test_negative_flatness_rejected() {
        let line = LineD::new(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            FlatteningPathIterator::new(line.path_iter(None), -1.0),
            Err(GeomError::InvalidArgument(_))
        ));
        assert!(FlatteningPathIterator::new(line.path_iter(None), f64::NAN).is_err());
    }

    #[test]
    fn test_lines_pass_through() {
        let mut path = GeneralPath::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0).unwrap();
        path.line_to(10.0, 10.0).unwrap();
        path.close_path().unwrap();

        let flat = FlatteningPathIterator::new(path.path_iter(None), 0.1).unwrap();
        let segs = collect(flat);
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[0].0, SegmentType::MoveTo);
        assert_eq!(segs[0].1, vec![0.0, 0.0]);
        assert_eq!(segs[1].0, SegmentType::LineTo);
        assert_eq!(segs[2].0, SegmentType::LineTo);
        assert_eq!(segs[3].0, SegmentType::Close);
    }

    #[test]
    fn test_quad_flattens_to_lines() {
        let q = QuadCurveD::new(0.0, 0.0, 5.0, 10.0, 10.0, 0.0);
        let flat = FlatteningPathIterator::new(q.path_iter(None), 0.1).unwrap();
        let segs = collect(flat);

        assert!(segs.len() > 2, "curve should split, got {} segments", segs.len());
        assert_eq!(segs[0].0, SegmentType::MoveTo);
        assert_eq!(segs[0].1, vec![0.0, 0.0]);
        for s in &segs[1..] {
            assert_eq!(s.0, SegmentType::LineTo);
        }
        // The source endpoint arrives verbatim
        let last = segs.last().unwrap();
        assert_eq!(last.1, vec![10.0, 0.0]);
    }

    #[test]
    fn test_flattened_polyline_within_tolerance() {
        let flatness = 0.05;
        let c = CubicCurveD::new(0.0, 0.0, 3.0, 9.0, 7.0, -9.0, 10.0, 0.0);
        let flat = FlatteningPathIterator::new(c.path_iter(None), flatness).unwrap();
        let segs = collect(flat);

        let points: Vec<(f64, f64)> = segs.iter().map(|s| (s.1[0], s.1[1])).collect();
        // Sample the true curve and measure distance to the polyline
        for i in 0..=200 {
            let t = i as f64 / 200.0;
            let p = c.point_at(t);
            let mut best = f64::MAX;
            for w in points.windows(2) {
                let seg = LineD::new(w[0].0, w[0].1, w[1].0, w[1].1);
                best = best.min(seg.pt_seg_dist(p.x, p.y));
            }
            assert!(
                best <= flatness + 1e-9,
                "deviation {} exceeds tolerance at t={}",
                best,
                t
            );
        }
    }

    #[test]
    fn test_zero_limit_emits_single_chord() {
        let q = QuadCurveD::new(0.0, 0.0, 5.0, 10.0, 10.0, 0.0);
        let flat = FlatteningPathIterator::with_limit(q.path_iter(None), 0.001, 0).unwrap();
        let segs = collect(flat);
        // Depth budget of zero: the curve degenerates to its chord even
        // though it is nowhere near flat
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1].0, SegmentType::LineTo);
        assert_eq!(segs[1].1, vec![10.0, 0.0]);
    }

    #[test]
    fn test_small_limit_bounds_segment_count() {
        let q = QuadCurveD::new(0.0, 0.0, 5.0, 100.0, 10.0, 0.0);
        let flat = FlatteningPathIterator::with_limit(q.path_iter(None), 1e-9, 3).unwrap();
        let segs = collect(flat);
        // Depth 3 can produce at most 2^3 chords plus the initial MoveTo
        assert!(segs.len() <= 9);
        assert_eq!(segs.last().unwrap().1, vec![10.0, 0.0]);
    }

    #[test]
    fn test_tight_tolerance_grows_buffer() {
        // Deep subdivision forces the hold buffer past its initial 16 slots
        let c = CubicCurveD::new(0.0, 0.0, 0.0, 1000.0, 1000.0, -1000.0, 1000.0, 0.0);
        let flat = FlatteningPathIterator::new(c.path_iter(None), 1e-4).unwrap();
        let segs = collect(flat);
        assert!(segs.len() > 100);
        assert_eq!(segs.last().unwrap().1, vec![1000.0, 0.0]);
    }

    #[test]
    fn test_close_passes_through_and_restores_origin() {
        let mut path = GeneralPath::new();
        path.move_to(0.0, 0.0);
        path.quad_to(5.0, 10.0, 10.0, 0.0).unwrap();
        path.close_path().unwrap();
        path.line_to(20.0, 0.0).unwrap();

        let flat = FlatteningPathIterator::new(path.path_iter(None), 0.5).unwrap();
        let segs = collect(flat);
        let close_pos = segs
            .iter()
            .position(|s| s.0 == SegmentType::Close)
            .expect("close must pass through");
        // The line after the close starts from the subpath origin
        assert_eq!(segs[close_pos + 1].0, SegmentType::LineTo);
        assert_eq!(segs[close_pos + 1].1, vec![20.0, 0.0]);
    }

    #[test]
    fn test_exhaustion_and_next_no_op() {
        let line = LineD::new(0.0, 0.0, 1.0, 0.0);
        let mut flat = FlatteningPathIterator::new(line.path_iter(None), 0.1).unwrap();
        flat.next();
        flat.next();
        assert!(flat.is_done());
        let mut coords = [0.0f64; 6];
        assert!(matches!(
            flat.current_segment(&mut coords),
            Err(GeomError::IteratorExhausted)
        ));
        flat.next();
        assert!(flat.is_done());
    }

    #[test]
    fn test_winding_rule_delegates() {
        let mut path = GeneralPath::with_winding_rule(crate::basics::WindingRule::EvenOdd);
        path.move_to(0.0, 0.0);
        let flat = FlatteningPathIterator::new(path.path_iter(None), 0.1).unwrap();
        assert_eq!(flat.winding_rule(), crate::basics::WindingRule::EvenOdd);
    }

    #[test]
    fn test_accessors() {
        let line = LineD::new(0.0, 0.0, 1.0, 0.0);
        let flat = FlatteningPathIterator::with_limit(line.path_iter(None), 0.25, 7).unwrap();
        assert!((flat.flatness() - 0.25).abs() < 1e-12);
        assert_eq!(flat.recursion_limit(), 7);
    }
}
