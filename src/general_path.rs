//! Mutable multi-segment path builder with winding-rule containment.
//!
//! `GeneralPath` stores segment tags and raw coordinates in two parallel
//! growable buffers; the coordinate buffer length always equals the sum of
//! the per-tag coordinate counts. Coordinates are never validated or
//! snapped when appended. Containment and intersection feed the path's own
//! iterator to a [`CrossingOracle`] and classify the count by the path's
//! winding rule.

use crate::basics::{PathIterator, SegmentType, WindingRule};
use crate::crossings::{is_inside_even_odd, is_inside_non_zero, CrossingOracle, RECT_INTERSECTS};
use crate::error::{GeomError, Result};
use crate::rect::RectD;
use crate::trans_affine::TransAffine;

// ============================================================================
// GeneralPath
// ============================================================================

/// A growable path of move/line/quad/cubic/close segments.
///
/// Iterators borrow the path, so mutating it while an iterator is live is
/// rejected at compile time rather than left as a runtime hazard.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralPath {
    types: Vec<SegmentType>,
    coords: Vec<f64>,
    winding_rule: WindingRule,
}

impl GeneralPath {
    /// Empty path with the non-zero winding rule.
    pub fn new() -> Self {
        Self::with_winding_rule(WindingRule::NonZero)
    }

    /// Empty path with the given winding rule.
    pub fn with_winding_rule(rule: WindingRule) -> Self {
        Self {
            types: Vec::new(),
            coords: Vec::new(),
            winding_rule: rule,
        }
    }

    /// Empty path with room for `capacity` segments.
    pub fn with_capacity(rule: WindingRule, capacity: usize) -> Self {
        Self {
            types: Vec::with_capacity(capacity),
            coords: Vec::with_capacity(capacity * 2),
            winding_rule: rule,
        }
    }

    /// Copy another shape's segment stream into a new path, taking the
    /// winding rule from the iterator.
    pub fn from_path_iter<I: PathIterator>(iter: &mut I) -> Result<Self> {
        let mut path = Self::with_winding_rule(iter.winding_rule());
        path.append(iter, false)?;
        Ok(path)
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    pub fn winding_rule(&self) -> WindingRule {
        self.winding_rule
    }

    pub fn set_winding_rule(&mut self, rule: WindingRule) {
        self.winding_rule = rule;
    }

    /// Set the winding rule from a raw integer value; values outside the
    /// two defined enumerants fail with the invalid-winding-rule error.
    pub fn set_winding_rule_raw(&mut self, raw: u32) -> Result<()> {
        self.winding_rule = WindingRule::from_raw(raw)?;
        Ok(())
    }

    /// Number of segments in the path.
    pub fn segment_count(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn need_room(&self) -> Result<()> {
        if self.types.is_empty() {
            return Err(GeomError::InvalidPathState(
                "missing initial move_to in path definition",
            ));
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Path construction
    // ---------------------------------------------------------------

    /// Begin a new subpath. A `move_to` directly following another
    /// `move_to` overwrites it instead of appending.
    pub fn move_to(&mut self, x: f64, y: f64) {
        if self.types.last() == Some(&SegmentType::MoveTo) {
            let n = self.coords.len();
            self.coords[n - 2] = x;
            self.coords[n - 1] = y;
        } else {
            self.types.push(SegmentType::MoveTo);
            self.coords.push(x);
            self.coords.push(y);
        }
    }

    /// Append a line segment to (x, y).
    pub fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.need_room()?;
        self.types.push(SegmentType::LineTo);
        self.coords.push(x);
        self.coords.push(y);
        Ok(())
    }

    /// Append a quadratic segment through control point (cx, cy) to (x, y).
    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> Result<()> {
        self.need_room()?;
        self.types.push(SegmentType::QuadTo);
        self.coords.extend_from_slice(&[cx, cy, x, y]);
        Ok(())
    }

    /// Append a cubic segment through two control points to (x, y).
    pub fn curve_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x: f64, y: f64) -> Result<()> {
        self.need_room()?;
        self.types.push(SegmentType::CubicTo);
        self.coords.extend_from_slice(&[cx1, cy1, cx2, cy2, x, y]);
        Ok(())
    }

    /// Close the current subpath. A second close in a row is a no-op.
    pub fn close_path(&mut self) -> Result<()> {
        self.need_room()?;
        if self.types.last() != Some(&SegmentType::Close) {
            self.types.push(SegmentType::Close);
        }
        Ok(())
    }

    /// Remove all segments. The winding rule is kept.
    pub fn reset(&mut self) {
        self.types.clear();
        self.coords.clear();
    }

    /// Replay another iterator's segments onto this path.
    ///
    /// With `connect` set and a non-empty, unterminated path, the incoming
    /// leading `MoveTo` degrades to a `LineTo` — or is dropped entirely
    /// when its point exactly equals the current end point, so connecting
    /// a path that starts where this one ends inserts nothing extra.
    pub fn append<I: PathIterator>(&mut self, iter: &mut I, connect: bool) -> Result<()> {
        let mut connect = connect;
        let mut coords = [0.0f64; 6];
        while !iter.is_done() {
            let seg = iter.current_segment(&mut coords)?;
            match seg {
                SegmentType::MoveTo => {
                    if !connect || self.types.is_empty() {
                        self.move_to(coords[0], coords[1]);
                    } else if self.types.last() == Some(&SegmentType::Close)
                        || self.coords[self.coords.len() - 2] != coords[0]
                        || self.coords[self.coords.len() - 1] != coords[1]
                    {
                        self.line_to(coords[0], coords[1])?;
                    }
                    // Exactly coincident with the current end point: the
                    // connection is implicit, append nothing
                }
                SegmentType::LineTo => self.line_to(coords[0], coords[1])?,
                SegmentType::QuadTo => self.quad_to(coords[0], coords[1], coords[2], coords[3])?,
                SegmentType::CubicTo => self.curve_to(
                    coords[0], coords[1], coords[2], coords[3], coords[4], coords[5],
                )?,
                SegmentType::Close => self.close_path()?,
            }
            connect = false;
            iter.next();
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------

    /// Transform every stored coordinate in place.
    pub fn transform(&mut self, t: &TransAffine) {
        let n = self.coords.len() / 2;
        t.transform_in_slice(&mut self.coords, 0, 0, n);
    }

    /// Tight bounding box of all stored coordinates (control points
    /// included — every stored coordinate bounds the path). Empty paths
    /// report a zero rectangle at the origin.
    pub fn get_bounds(&self) -> RectD {
        if self.coords.is_empty() {
            return RectD::new(0.0, 0.0, 0.0, 0.0);
        }
        let mut x1 = self.coords[0];
        let mut y1 = self.coords[1];
        let mut x2 = x1;
        let mut y2 = y1;
        for pair in self.coords.chunks_exact(2) {
            x1 = x1.min(pair[0]);
            x2 = x2.max(pair[0]);
            y1 = y1.min(pair[1]);
            y2 = y2.max(pair[1]);
        }
        RectD::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Point containment under this path's winding rule.
    pub fn contains<O: CrossingOracle>(&self, oracle: &O, x: f64, y: f64) -> bool {
        let mut iter = self.path_iter(None);
        let crossings = oracle.point_crossings(&mut iter, x, y);
        match self.winding_rule {
            WindingRule::NonZero => is_inside_non_zero(crossings),
            WindingRule::EvenOdd => is_inside_even_odd(crossings),
        }
    }

    fn rect_crossings_mask(&self) -> i32 {
        // Crossing counts around a rectangle are doubled, so the even-odd
        // test keys on bit 1
        match self.winding_rule {
            WindingRule::NonZero => -1,
            WindingRule::EvenOdd => 2,
        }
    }

    /// `true` if the rectangle lies entirely inside the path under its
    /// winding rule.
    pub fn contains_rect<O: CrossingOracle>(&self, oracle: &O, rect: &RectD) -> bool {
        if rect.is_empty() {
            return false;
        }
        let mut iter = self.path_iter(None);
        let crossings = oracle.rect_crossings(&mut iter, rect.x, rect.y, rect.width, rect.height);
        crossings != RECT_INTERSECTS && (crossings & self.rect_crossings_mask()) != 0
    }

    /// `true` if the path and the rectangle touch.
    pub fn intersects_rect<O: CrossingOracle>(&self, oracle: &O, rect: &RectD) -> bool {
        if rect.is_empty() {
            return false;
        }
        let mut iter = self.path_iter(None);
        let crossings = oracle.rect_crossings(&mut iter, rect.x, rect.y, rect.width, rect.height);
        crossings == RECT_INTERSECTS || (crossings & self.rect_crossings_mask()) != 0
    }

    /// Iterate the path's segments, optionally transformed. The iterator
    /// borrows the path.
    pub fn path_iter(&self, transform: Option<&TransAffine>) -> GeneralPathIterator<'_> {
        GeneralPathIterator {
            path: self,
            transform: transform.cloned(),
            type_index: 0,
            coord_index: 0,
        }
    }
}

impl Default for GeneralPath {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// GeneralPathIterator
// ============================================================================

/// Path iterator over a [`GeneralPath`]. Tracks a segment cursor and a
/// parallel coordinate cursor; independent iterators never share state.
pub struct GeneralPathIterator<'a> {
    path: &'a GeneralPath,
    transform: Option<TransAffine>,
    type_index: usize,
    coord_index: usize,
}

impl PathIterator for GeneralPathIterator<'_> {
    fn winding_rule(&self) -> WindingRule {
        self.path.winding_rule
    }

    fn is_done(&self) -> bool {
        self.type_index >= self.path.types.len()
    }

    fn next(&mut self) {
        if !self.is_done() {
            self.coord_index += self.path.types[self.type_index].coord_count();
            self.type_index += 1;
        }
    }

    fn current_segment(&self, coords: &mut [f64; 6]) -> Result<SegmentType> {
        if self.is_done() {
            return Err(GeomError::IteratorExhausted);
        }
        let seg = self.path.types[self.type_index];
        let n = seg.coord_count();
        coords[..n].copy_from_slice(&self.path.coords[self.coord_index..self.coord_index + n]);
        if n > 0 {
            if let Some(t) = &self.transform {
                t.transform_in_slice(coords, 0, 0, n / 2);
            }
        }
        Ok(seg)
    }
}

// ============================================================================
// Tests
// ============================================================================
