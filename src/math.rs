//! Scalar geometry helpers: distances, point-to-segment metrics, and
//! cross products. These back the line/curve distance APIs and the
//! crossing predicates.

// ============================================================================
// Constants
// ============================================================================

/// Coinciding points maximal distance (epsilon).
pub const VERTEX_DIST_EPSILON: f64 = 1e-14;

// ============================================================================
// Cross product
// ============================================================================

/// Cross product of vectors (x2-x1, y2-y1) and (x-x2, y-y2).
/// The sign indicates which side of the line (x1,y1)→(x2,y2) the point (x,y) is on.
#[inline]
pub fn cross_product(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> f64 {
    (x - x2) * (y2 - y1) - (y - y2) * (x2 - x1)
}

// ============================================================================
// Distance calculations
// ============================================================================

/// Euclidean distance between two points.
#[inline]
pub fn calc_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Squared Euclidean distance between two points.
#[inline]
pub fn calc_sq_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    dx * dx + dy * dy
}

/// Signed distance from point (x, y) to the infinite line through
/// (x1,y1)→(x2,y2). Positive means left side, negative means right side.
/// If the segment is degenerate (length < VERTEX_DIST_EPSILON), returns the
/// distance from (x,y) to (x1,y1).
#[inline]
pub fn calc_line_point_distance(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let d = (dx * dx + dy * dy).sqrt();
    if d < VERTEX_DIST_EPSILON {
        return calc_distance(x1, y1, x, y);
    }
    ((x - x2) * dy - (y - y2) * dx) / d
}

/// Compute the parameter `u` for the projection of point (x, y) onto
/// the line segment (x1,y1)→(x2,y2). Returns 0 if the segment is degenerate.
#[inline]
pub fn calc_segment_point_u(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;

    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }

    let pdx = x - x1;
    let pdy = y - y1;

    (pdx * dx + pdy * dy) / (dx * dx + dy * dy)
}

/// Squared distance from point (x, y) to the closest point on segment
/// (x1,y1)→(x2,y2), given pre-computed parameter `u`.
#[inline]
pub fn calc_segment_point_sq_distance_with_u(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x: f64,
    y: f64,
    u: f64,
) -> f64 {
    if u <= 0.0 {
        calc_sq_distance(x, y, x1, y1)
    } else if u >= 1.0 {
        calc_sq_distance(x, y, x2, y2)
    } else {
        calc_sq_distance(x, y, x1 + u * (x2 - x1), y1 + u * (y2 - y1))
    }
}

/// Squared distance from point (x, y) to the closest point on segment
/// (x1,y1)→(x2,y2).
#[inline]
pub fn calc_segment_point_sq_distance(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> f64 {
    calc_segment_point_sq_distance_with_u(
        x1,
        y1,
        x2,
        y2,
        x,
        y,
        calc_segment_point_u(x1, y1, x2, y2, x, y),
    )
}

// ============================================================================
// Tests
// ============================================================================
