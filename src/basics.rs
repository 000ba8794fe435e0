//! Foundation types: points, segment tags, winding rules, and the
//! path-iteration protocol that every shape in the crate implements.

use crate::error::{GeomError, Result};

// ============================================================================
// Numeric constants
// ============================================================================

/// Threshold below which a determinant (or similar product) is treated as
/// effectively zero.
pub const EPSILON: f64 = 1e-10;

// ============================================================================
// Segment types
// ============================================================================

/// One instruction in a path's command stream.
///
/// The discriminant values are a wire contract: code that serializes segment
/// streams relies on `MoveTo=0 .. Close=4` and they must not be renumbered.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentType {
    MoveTo = 0,
    LineTo = 1,
    QuadTo = 2,
    CubicTo = 3,
    Close = 4,
}

impl SegmentType {
    /// Number of coordinate values (not points) carried by this segment.
    #[inline]
    pub fn coord_count(self) -> usize {
        match self {
            SegmentType::MoveTo | SegmentType::LineTo => 2,
            SegmentType::QuadTo => 4,
            SegmentType::CubicTo => 6,
            SegmentType::Close => 0,
        }
    }

    /// The raw wire value of this segment type.
    #[inline]
    pub fn to_raw(self) -> u32 {
        self as u32
    }

    /// Decode a raw wire value. Returns `None` for values outside `0..=4`.
    pub fn from_raw(raw: u32) -> Option<SegmentType> {
        match raw {
            0 => Some(SegmentType::MoveTo),
            1 => Some(SegmentType::LineTo),
            2 => Some(SegmentType::QuadTo),
            3 => Some(SegmentType::CubicTo),
            4 => Some(SegmentType::Close),
            _ => None,
        }
    }
}

// ============================================================================
// Winding rule
// ============================================================================

/// Policy for deciding point-in-shape from a crossing count.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindingRule {
    /// Inside when the crossing count is odd.
    EvenOdd = 0,
    /// Inside when the signed crossing count is non-zero.
    NonZero = 1,
}

impl WindingRule {
    /// The raw integer value of this rule.
    #[inline]
    pub fn to_raw(self) -> u32 {
        self as u32
    }

    /// Decode a raw integer winding rule. Values outside the two defined
    /// enumerants fail with [`GeomError::InvalidWindingRule`].
    pub fn from_raw(raw: u32) -> Result<WindingRule> {
        match raw {
            0 => Ok(WindingRule::EvenOdd),
            1 => Ok(WindingRule::NonZero),
            other => Err(GeomError::InvalidWindingRule(other)),
        }
    }
}

// ============================================================================
// Point
// ============================================================================

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointBase<T: Copy> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> PointBase<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

pub type PointF = PointBase<f32>;
pub type PointD = PointBase<f64>;

impl PointD {
    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: PointD) -> f64 {
        crate::math::calc_distance(self.x, self.y, other.x, other.y)
    }

    /// Squared Euclidean distance to another point.
    #[inline]
    pub fn distance_sq(&self, other: PointD) -> f64 {
        crate::math::calc_sq_distance(self.x, self.y, other.x, other.y)
    }
}

// ============================================================================
// PathIterator trait
// ============================================================================

/// The path-iteration protocol. Every shape exposes itself as a finite,
/// single-pass stream of segments through an implementation of this trait.
///
/// Iterators are non-restartable cursors: `next` past the end does not move
/// the cursor further, and `current_segment` after `is_done` fails with
/// [`GeomError::IteratorExhausted`]. An iterator borrows (or snapshots) its
/// source shape; independent iterators over the same shape never share
/// mutable state.
pub trait PathIterator {
    /// The winding rule of the shape being iterated.
    fn winding_rule(&self) -> WindingRule;

    /// `true` once all segments have been consumed.
    fn is_done(&self) -> bool;

    /// Advance to the next segment. No-op when the iterator is exhausted.
    fn next(&mut self);

    /// Read the current segment, writing 0/2/4/6 coordinate values into
    /// `coords` depending on the returned segment type. Coordinates are
    /// pre-multiplied by the iterator's transform, if it has one.
    fn current_segment(&self, coords: &mut [f64; 6]) -> Result<SegmentType>;
}

/// Blanket implementation so `&mut T` can be used as a PathIterator.
/// This allows consumers to borrow an iterator instead of owning it.
impl<T: PathIterator + ?Sized> PathIterator for &mut T {
    fn winding_rule(&self) -> WindingRule {
        (**self).winding_rule()
    }

    fn is_done(&self) -> bool {
        (**self).is_done()
    }

    fn next(&mut self) {
        (**self).next();
    }

    fn current_segment(&self, coords: &mut [f64; 6]) -> Result<SegmentType> {
        (**self).current_segment(coords)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_type_wire_values() {
        assert_eq!(SegmentType::MoveTo.to_raw(), 0);
        assert_eq!(SegmentType::LineTo.to_raw(), 1);
        assert_eq!(SegmentType::QuadTo.to_raw(), 2);
        assert_eq!(SegmentType::CubicTo.to_raw(), 3);
        assert_eq!(SegmentType::Close.to_raw(), 4);
    }

    #[test]
    fn test_segment_type_round_trip() {
        for raw in 0..5 {
            let seg = SegmentType::from_raw(raw).unwrap();
            assert_eq!(seg.to_raw(), raw);
        }
        assert_eq!(SegmentType::from_raw(5), None);
        assert_eq!(SegmentType::from_raw(u32::MAX), None);
    }

    #[test]
    fn test_segment_coord_counts() {
        assert_eq!(SegmentType::MoveTo.coord_count(), 2);
        assert_eq!(SegmentType::LineTo.coord_count(), 2);
        assert_eq!(SegmentType::QuadTo.coord_count(), 4);
        assert_eq!(SegmentType::CubicTo.coord_count(), 6);
        assert_eq!(SegmentType::Close.coord_count(), 0);
    }

    #[test]
    fn test_winding_rule_round_trip() {
        assert_eq!(WindingRule::from_raw(0).unwrap(), WindingRule::EvenOdd);
        assert_eq!(WindingRule::from_raw(1).unwrap(), WindingRule::NonZero);
        assert_eq!(WindingRule::EvenOdd.to_raw(), 0);
        assert_eq!(WindingRule::NonZero.to_raw(), 1);
    }

    #[test]
    fn test_winding_rule_rejects_out_of_range() {
        assert!(matches!(
            WindingRule::from_raw(2),
            Err(GeomError::InvalidWindingRule(2))
        ));
        assert!(WindingRule::from_raw(u32::MAX).is_err());
    }

    #[test]
    fn test_point() {
        let p = PointD::new(1.5, 2.5);
        assert_eq!(p.x, 1.5);
        assert_eq!(p.y, 2.5);
    }

    #[test]
    fn test_point_distance() {
        let a = PointD::new(0.0, 0.0);
        let b = PointD::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
        assert!((a.distance_sq(b) - 25.0).abs() < 1e-12);
    }
}
