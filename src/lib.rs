//! # plane-geom
//!
//! A 2D affine-geometry kernel: a family of value types — points,
//! rectangles, lines, quadratic and cubic Bezier curves — plus an affine
//! transform with lazily-classified type, unified behind a pull-based
//! segment-iteration protocol with adaptive curve flattening and
//! winding-rule containment predicates.
//!
//! The kernel computes shapes, transforms and containment; it never draws
//! pixels, touches files, or logs.
//!
//! ## Architecture
//!
//! - **Shapes** (`rect`, `line`, `curves`, `general_path`) are plain
//!   mutable value containers.
//! - **Iteration**: every shape yields a [`basics::PathIterator`] — a
//!   finite, single-pass cursor over move/line/quad/cubic/close segments,
//!   optionally pre-transformed by a [`trans_affine::TransAffine`].
//! - **Flattening**: [`flatten::FlatteningPathIterator`] decorates any
//!   iterator, adaptively subdividing curves into chords within a
//!   tolerance under a bounded recursion depth.
//! - **Containment**: shapes feed their iterators to a
//!   [`crossings::CrossingOracle`] and classify the signed crossing count
//!   by winding rule.

// Foundation types and math
pub mod basics;
pub mod error;
pub mod math;

// Geometry primitives
pub mod curves;
pub mod line;
pub mod rect;
pub mod trans_affine;

// Path machinery
pub mod crossings;
pub mod flatten;
pub mod general_path;

pub use basics::{PathIterator, PointD, PointF, SegmentType, WindingRule};
pub use crossings::{CrossingOracle, RayCrossings};
pub use curves::{CubicCurveD, CubicCurveF, QuadCurveD, QuadCurveF};
pub use error::{GeomError, Result};
pub use flatten::FlatteningPathIterator;
pub use general_path::GeneralPath;
pub use line::{LineD, LineF};
pub use rect::{RectD, RectF};
pub use trans_affine::TransAffine;
