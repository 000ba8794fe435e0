//! Error taxonomy for the geometry kernel.
//!
//! Every condition here is local, synchronous, and recoverable by the
//! caller; nothing is retried internally and nothing is logged — the error
//! value is the whole diagnostic.

use thiserror::Error;

/// Errors produced by the geometry kernel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeomError {
    /// Inversion requested on a transform whose determinant is effectively
    /// zero. The offending determinant is carried for diagnostics.
    #[error("non-invertible transform: determinant {det}")]
    NonInvertibleTransform { det: f64 },

    /// A path-building operation other than `move_to`/`reset` was invoked
    /// on a path with no segments.
    #[error("invalid path state: {0}")]
    InvalidPathState(&'static str),

    /// A constructor or setter received an out-of-domain value.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// `current_segment` was called after the iterator reported done.
    #[error("path iterator exhausted")]
    IteratorExhausted,

    /// A raw winding-rule value outside the two defined enumerants.
    #[error("invalid winding rule: {0}")]
    InvalidWindingRule(u32),
}

pub type Result<T> = std::result::Result<T, GeomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = GeomError::NonInvertibleTransform { det: 0.0 };
        assert!(e.to_string().contains("non-invertible"));

        let e = GeomError::InvalidPathState("missing initial move_to");
        assert!(e.to_string().contains("missing initial move_to"));

        let e = GeomError::IteratorExhausted;
        assert_eq!(e.to_string(), "path iterator exhausted");

        let e = GeomError::InvalidWindingRule(7);
        assert!(e.to_string().contains('7'));
    }
}
