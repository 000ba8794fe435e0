//! Affine transformation matrix with lazily-computed type classification.
//!
//! 2D affine transformations: rotation, scaling, translation, shearing,
//! composition, and inversion. Every transform carries a cached
//! classification bitmask describing what kind of map it is (identity,
//! translation, scale, rotation, flip, general), recomputed on demand and
//! invalidated by every mutation.

use std::cell::Cell;

use crate::basics::{PointD, EPSILON};
use crate::error::{GeomError, Result};

// ============================================================================
// Classification bitmask
// ============================================================================

/// The identity transform (no bits set).
pub const TYPE_IDENTITY: u32 = 0;
/// The transform translates.
pub const TYPE_TRANSLATION: u32 = 1;
/// The transform scales both axes by the same factor.
pub const TYPE_UNIFORM_SCALE: u32 = 2;
/// The transform scales the axes by different factors.
pub const TYPE_GENERAL_SCALE: u32 = 4;
/// The transform rotates by a multiple of 90 degrees.
pub const TYPE_QUADRANT_ROTATION: u32 = 8;
/// The transform rotates by an arbitrary angle.
pub const TYPE_GENERAL_ROTATION: u32 = 16;
/// The transform is not decomposable into translate/scale/rotate/flip.
pub const TYPE_GENERAL_TRANSFORM: u32 = 32;
/// The transform reverses orientation (negative determinant).
pub const TYPE_FLIP: u32 = 64;

/// Either of the scale bits.
pub const TYPE_MASK_SCALE: u32 = TYPE_UNIFORM_SCALE | TYPE_GENERAL_SCALE;
/// Either of the rotation bits.
pub const TYPE_MASK_ROTATION: u32 = TYPE_QUADRANT_ROTATION | TYPE_GENERAL_ROTATION;

/// Cache sentinel: classification not yet computed.
const TYPE_UNKNOWN: u32 = u32::MAX;

// ============================================================================
// TransAffine
// ============================================================================

/// 2D affine transformation matrix.
///
/// Stores six components `[sx, shy, shx, sy, tx, ty]` representing the
/// matrix:
///
/// ```text
///   | sx  shx tx |
///   | shy  sy ty |
///   |  0    0  1 |
/// ```
///
/// Transform: `x' = x*sx + y*shx + tx`, `y' = x*shy + y*sy + ty`.
///
/// The components are private so the cached classification can never go
/// stale: every mutation runs through a setter that refreshes or
/// invalidates the cache.
#[derive(Debug, Clone)]
pub struct TransAffine {
    sx: f64,
    shy: f64,
    shx: f64,
    sy: f64,
    tx: f64,
    ty: f64,
    kind: Cell<u32>,
}

impl TransAffine {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Identity matrix.
    pub fn new() -> Self {
        Self {
            sx: 1.0,
            shy: 0.0,
            shx: 0.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
            kind: Cell::new(TYPE_IDENTITY),
        }
    }

    /// Custom matrix from six components.
    pub fn new_custom(sx: f64, shy: f64, shx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self {
            sx,
            shy,
            shx,
            sy,
            tx,
            ty,
            kind: Cell::new(TYPE_UNKNOWN),
        }
    }

    /// Construct from a flat slice of 4 (`[sx, shy, shx, sy]`) or
    /// 6 (`[sx, shy, shx, sy, tx, ty]`) components.
    pub fn from_flat(m: &[f64]) -> Result<Self> {
        match m.len() {
            4 => Ok(Self::new_custom(m[0], m[1], m[2], m[3], 0.0, 0.0)),
            6 => Ok(Self::new_custom(m[0], m[1], m[2], m[3], m[4], m[5])),
            _ => Err(GeomError::InvalidArgument(
                "flat matrix must have 4 or 6 components",
            )),
        }
    }

    /// Construct from a flat `f32` slice of 4 or 6 components.
    pub fn from_flat_f32(m: &[f32]) -> Result<Self> {
        match m.len() {
            4 => Ok(Self::new_custom(
                m[0] as f64,
                m[1] as f64,
                m[2] as f64,
                m[3] as f64,
                0.0,
                0.0,
            )),
            6 => Ok(Self::new_custom(
                m[0] as f64,
                m[1] as f64,
                m[2] as f64,
                m[3] as f64,
                m[4] as f64,
                m[5] as f64,
            )),
            _ => Err(GeomError::InvalidArgument(
                "flat matrix must have 4 or 6 components",
            )),
        }
    }

    // ====================================================================
    // Named constructors
    // ====================================================================

    /// Translation matrix.
    pub fn new_translation(x: f64, y: f64) -> Self {
        let mut m = Self::new();
        m.set_to_translation(x, y);
        m
    }

    /// Non-uniform scaling matrix.
    pub fn new_scaling(x: f64, y: f64) -> Self {
        let mut m = Self::new();
        m.set_to_scale(x, y);
        m
    }

    /// Uniform scaling matrix.
    pub fn new_scaling_uniform(s: f64) -> Self {
        Self::new_scaling(s, s)
    }

    /// Rotation matrix (angle in radians, counter-clockwise in a y-up
    /// coordinate system).
    pub fn new_rotation(a: f64) -> Self {
        let mut m = Self::new();
        m.set_to_rotation(a);
        m
    }

    /// Rotation about an anchor point.
    pub fn new_rotation_about(a: f64, px: f64, py: f64) -> Self {
        let mut m = Self::new_translation(px, py);
        m.concatenate(&Self::new_rotation(a));
        m.concatenate(&Self::new_translation(-px, -py));
        m
    }

    /// Shearing matrix: `x' = x + shx*y`, `y' = shy*x + y`.
    pub fn new_shearing(shx: f64, shy: f64) -> Self {
        let mut m = Self::new();
        m.set_to_shear(shx, shy);
        m
    }

    // ====================================================================
    // Component access
    // ====================================================================

    #[inline]
    pub fn sx(&self) -> f64 {
        self.sx
    }

    #[inline]
    pub fn shy(&self) -> f64 {
        self.shy
    }

    #[inline]
    pub fn shx(&self) -> f64 {
        self.shx
    }

    #[inline]
    pub fn sy(&self) -> f64 {
        self.sy
    }

    #[inline]
    pub fn tx(&self) -> f64 {
        self.tx
    }

    #[inline]
    pub fn ty(&self) -> f64 {
        self.ty
    }

    /// Store to a `[6]` array: `[sx, shy, shx, sy, tx, ty]`.
    pub fn store_to(&self, m: &mut [f64; 6]) {
        m[0] = self.sx;
        m[1] = self.shy;
        m[2] = self.shx;
        m[3] = self.sy;
        m[4] = self.tx;
        m[5] = self.ty;
    }

    /// Load from a `[6]` array.
    pub fn load_from(&mut self, m: &[f64; 6]) {
        self.sx = m[0];
        self.shy = m[1];
        self.shx = m[2];
        self.sy = m[3];
        self.tx = m[4];
        self.ty = m[5];
        self.kind.set(TYPE_UNKNOWN);
    }

    // ====================================================================
    // Classification
    // ====================================================================

    /// Classification bitmask of this transform. Computed on first query
    /// after a mutation and cached until the next mutation.
    pub fn get_type(&self) -> u32 {
        let mut kind = self.kind.get();
        if kind == TYPE_UNKNOWN {
            kind = self.classify();
            self.kind.set(kind);
        }
        kind
    }

    fn classify(&self) -> u32 {
        // Column vectors of the linear part: (sx, shy) and (shx, sy).
        // Non-perpendicular columns cannot be expressed as any combination
        // of scale, rotation and flip. NaN lands here as well.
        if self.sx * self.shx + self.shy * self.sy != 0.0 {
            return TYPE_GENERAL_TRANSFORM;
        }
        let mut kind = TYPE_IDENTITY;
        if self.tx != 0.0 || self.ty != 0.0 {
            kind |= TYPE_TRANSLATION;
        }
        let dx = self.sx * self.sx + self.shy * self.shy;
        let dy = self.shx * self.shx + self.sy * self.sy;
        if dx != dy {
            kind |= TYPE_GENERAL_SCALE;
        } else if dx != 1.0 {
            kind |= TYPE_UNIFORM_SCALE;
        }
        if self.determinant() < 0.0 {
            kind |= TYPE_FLIP;
        }
        if self.shx == 0.0 && self.shy == 0.0 {
            // Axis-aligned. Both diagonal entries negative is a half turn;
            // opposite signs are a pure flip, already recorded above.
            if self.sx < 0.0 && self.sy < 0.0 {
                kind |= TYPE_QUADRANT_ROTATION;
            }
        } else if self.sx == 0.0 && self.sy == 0.0 {
            kind |= TYPE_QUADRANT_ROTATION;
        } else {
            kind |= TYPE_GENERAL_ROTATION;
        }
        kind
    }

    /// `true` if this is exactly the identity matrix.
    pub fn is_identity(&self) -> bool {
        self.get_type() == TYPE_IDENTITY
    }

    // ====================================================================
    // Setters
    // ====================================================================

    /// Overwrite all six components.
    pub fn set_transform(&mut self, sx: f64, shy: f64, shx: f64, sy: f64, tx: f64, ty: f64) {
        self.sx = sx;
        self.shy = shy;
        self.shx = shx;
        self.sy = sy;
        self.tx = tx;
        self.ty = ty;
        self.kind.set(TYPE_UNKNOWN);
    }

    /// Reset to identity.
    pub fn set_to_identity(&mut self) {
        self.sx = 1.0;
        self.shy = 0.0;
        self.shx = 0.0;
        self.sy = 1.0;
        self.tx = 0.0;
        self.ty = 0.0;
        self.kind.set(TYPE_IDENTITY);
    }

    /// Become a pure translation.
    pub fn set_to_translation(&mut self, x: f64, y: f64) {
        self.sx = 1.0;
        self.shy = 0.0;
        self.shx = 0.0;
        self.sy = 1.0;
        self.tx = x;
        self.ty = y;
        self.kind.set(if x == 0.0 && y == 0.0 {
            TYPE_IDENTITY
        } else {
            TYPE_TRANSLATION
        });
    }

    /// Become a pure scale.
    pub fn set_to_scale(&mut self, x: f64, y: f64) {
        self.sx = x;
        self.shy = 0.0;
        self.shx = 0.0;
        self.sy = y;
        self.tx = 0.0;
        self.ty = 0.0;
        self.kind.set(if x == 1.0 && y == 1.0 {
            TYPE_IDENTITY
        } else {
            TYPE_UNKNOWN
        });
    }

    /// Become a pure shear.
    pub fn set_to_shear(&mut self, shx: f64, shy: f64) {
        self.sx = 1.0;
        self.shy = shy;
        self.shx = shx;
        self.sy = 1.0;
        self.tx = 0.0;
        self.ty = 0.0;
        self.kind.set(if shx == 0.0 && shy == 0.0 {
            TYPE_IDENTITY
        } else {
            TYPE_UNKNOWN
        });
    }

    /// Become a pure rotation (radians).
    pub fn set_to_rotation(&mut self, a: f64) {
        let (sin, cos) = a.sin_cos();
        self.sx = cos;
        self.shy = sin;
        self.shx = -sin;
        self.sy = cos;
        self.tx = 0.0;
        self.ty = 0.0;
        self.kind.set(if sin == 0.0 && cos == 1.0 {
            TYPE_IDENTITY
        } else {
            TYPE_UNKNOWN
        });
    }

    // ====================================================================
    // Composition
    // ====================================================================

    /// Concatenate: `self = self ∘ t`, so that `t` maps first and `self`
    /// maps its output. `(a.concatenate(b)).apply(p) == a.apply(b.apply(p))`.
    pub fn concatenate(&mut self, t: &TransAffine) {
        let sx = self.sx * t.sx + self.shx * t.shy;
        let shy = self.shy * t.sx + self.sy * t.shy;
        let shx = self.sx * t.shx + self.shx * t.sy;
        let sy = self.shy * t.shx + self.sy * t.sy;
        let tx = self.sx * t.tx + self.shx * t.ty + self.tx;
        let ty = self.shy * t.tx + self.sy * t.ty + self.ty;
        self.sx = sx;
        self.shy = shy;
        self.shx = shx;
        self.sy = sy;
        self.tx = tx;
        self.ty = ty;
        self.kind.set(TYPE_UNKNOWN);
    }

    /// Pre-concatenate: `self = t ∘ self`, so that `self` maps first and
    /// `t` maps its output.
    pub fn pre_concatenate(&mut self, t: &TransAffine) {
        let sx = t.sx * self.sx + t.shx * self.shy;
        let shy = t.shy * self.sx + t.sy * self.shy;
        let shx = t.sx * self.shx + t.shx * self.sy;
        let sy = t.shy * self.shx + t.sy * self.sy;
        let tx = t.sx * self.tx + t.shx * self.ty + t.tx;
        let ty = t.shy * self.tx + t.sy * self.ty + t.ty;
        self.sx = sx;
        self.shy = shy;
        self.shx = shx;
        self.sy = sy;
        self.tx = tx;
        self.ty = ty;
        self.kind.set(TYPE_UNKNOWN);
    }

    /// Concatenate a translation.
    pub fn translate(&mut self, x: f64, y: f64) {
        self.concatenate(&Self::new_translation(x, y));
    }

    /// Concatenate a scale.
    pub fn scale(&mut self, x: f64, y: f64) {
        self.concatenate(&Self::new_scaling(x, y));
    }

    /// Concatenate a rotation (radians).
    pub fn rotate(&mut self, a: f64) {
        self.concatenate(&Self::new_rotation(a));
    }

    /// Concatenate a shear.
    pub fn shear(&mut self, shx: f64, shy: f64) {
        self.concatenate(&Self::new_shearing(shx, shy));
    }

    // ====================================================================
    // Inversion
    // ====================================================================

    /// Determinant of the 2x2 portion.
    #[inline]
    pub fn determinant(&self) -> f64 {
        self.sx * self.sy - self.shy * self.shx
    }

    /// Closed-form inverse. Fails when the determinant is effectively zero;
    /// a degenerate matrix is never silently replaced.
    pub fn create_inverse(&self) -> Result<TransAffine> {
        let det = self.determinant();
        if det.abs() < EPSILON {
            return Err(GeomError::NonInvertibleTransform { det });
        }
        Ok(Self::new_custom(
            self.sy / det,
            -self.shy / det,
            -self.shx / det,
            self.sx / det,
            (self.shx * self.ty - self.sy * self.tx) / det,
            (self.shy * self.tx - self.sx * self.ty) / det,
        ))
    }

    /// Invert in place. Fails (leaving `self` untouched) when the
    /// determinant is effectively zero.
    pub fn invert(&mut self) -> Result<()> {
        let inv = self.create_inverse()?;
        *self = inv;
        Ok(())
    }

    // ====================================================================
    // Transformations
    // ====================================================================

    /// Forward transform: `(x, y) -> (x', y')`.
    #[inline]
    pub fn transform(&self, x: &mut f64, y: &mut f64) {
        let tmp = *x;
        *x = tmp * self.sx + *y * self.shx + self.tx;
        *y = tmp * self.shy + *y * self.sy + self.ty;
    }

    /// Forward transform of a point value.
    #[inline]
    pub fn transform_point(&self, p: PointD) -> PointD {
        PointD::new(
            p.x * self.sx + p.y * self.shx + self.tx,
            p.x * self.shy + p.y * self.sy + self.ty,
        )
    }

    /// Transform without translation (direction/delta vectors).
    #[inline]
    pub fn delta_transform(&self, x: &mut f64, y: &mut f64) {
        let tmp = *x;
        *x = tmp * self.sx + *y * self.shx;
        *y = tmp * self.shy + *y * self.sy;
    }

    /// Inverse transform: `(x', y') -> (x, y)`. Fails when the matrix is
    /// not invertible.
    pub fn inverse_transform(&self, x: &mut f64, y: &mut f64) -> Result<()> {
        let det = self.determinant();
        if det.abs() < EPSILON {
            return Err(GeomError::NonInvertibleTransform { det });
        }
        let a = *x - self.tx;
        let b = *y - self.ty;
        *x = (a * self.sy - b * self.shx) / det;
        *y = (b * self.sx - a * self.shy) / det;
        Ok(())
    }

    /// Transform `num_pts` coordinate pairs from `src[src_off..]` into
    /// `dst[dst_off..]` (distinct buffers).
    pub fn transform_slice(
        &self,
        src: &[f64],
        src_off: usize,
        dst: &mut [f64],
        dst_off: usize,
        num_pts: usize,
    ) {
        for i in 0..num_pts {
            let x = src[src_off + i * 2];
            let y = src[src_off + i * 2 + 1];
            dst[dst_off + i * 2] = x * self.sx + y * self.shx + self.tx;
            dst[dst_off + i * 2 + 1] = x * self.shy + y * self.sy + self.ty;
        }
    }

    /// Transform `num_pts` coordinate pairs without translation
    /// (direction/delta vectors) from `src[src_off..]` into
    /// `dst[dst_off..]`.
    pub fn delta_transform_slice(
        &self,
        src: &[f64],
        src_off: usize,
        dst: &mut [f64],
        dst_off: usize,
        num_pts: usize,
    ) {
        for i in 0..num_pts {
            let x = src[src_off + i * 2];
            let y = src[src_off + i * 2 + 1];
            dst[dst_off + i * 2] = x * self.sx + y * self.shx;
            dst[dst_off + i * 2 + 1] = x * self.shy + y * self.sy;
        }
    }

    /// Inverse-transform `num_pts` coordinate pairs from `src[src_off..]`
    /// into `dst[dst_off..]`. Fails before writing anything when the
    /// matrix is not invertible.
    pub fn inverse_transform_slice(
        &self,
        src: &[f64],
        src_off: usize,
        dst: &mut [f64],
        dst_off: usize,
        num_pts: usize,
    ) -> Result<()> {
        let det = self.determinant();
        if det.abs() < EPSILON {
            return Err(GeomError::NonInvertibleTransform { det });
        }
        for i in 0..num_pts {
            let a = src[src_off + i * 2] - self.tx;
            let b = src[src_off + i * 2 + 1] - self.ty;
            dst[dst_off + i * 2] = (a * self.sy - b * self.shx) / det;
            dst[dst_off + i * 2 + 1] = (b * self.sx - a * self.shy) / det;
        }
        Ok(())
    }

    /// Transform `num_pts` coordinate pairs within one buffer, reading at
    /// `src_off` and writing at `dst_off`. When the ranges overlap and the
    /// destination starts after the source, iteration runs backwards so no
    /// source pair is clobbered before it is read.
    pub fn transform_in_slice(
        &self,
        coords: &mut [f64],
        src_off: usize,
        dst_off: usize,
        num_pts: usize,
    ) {
        let overlap_backwards = dst_off > src_off && dst_off < src_off + num_pts * 2;
        if overlap_backwards {
            for i in (0..num_pts).rev() {
                let x = coords[src_off + i * 2];
                let y = coords[src_off + i * 2 + 1];
                coords[dst_off + i * 2] = x * self.sx + y * self.shx + self.tx;
                coords[dst_off + i * 2 + 1] = x * self.shy + y * self.sy + self.ty;
            }
        } else {
            for i in 0..num_pts {
                let x = coords[src_off + i * 2];
                let y = coords[src_off + i * 2 + 1];
                coords[dst_off + i * 2] = x * self.sx + y * self.shx + self.tx;
                coords[dst_off + i * 2 + 1] = x * self.shy + y * self.sy + self.ty;
            }
        }
    }
}

impl Default for TransAffine {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for TransAffine {
    fn eq(&self, other: &Self) -> bool {
        self.sx == other.sx
            && self.shy == other.shy
            && self.shx == other.shx
            && self.sy == other.sy
            && self.tx == other.tx
            && self.ty == other.ty
    }
}

impl std::ops::Mul for TransAffine {
    type Output = TransAffine;
    fn mul(self, rhs: TransAffine) -> TransAffine {
        let mut result = self;
        result.concatenate(&rhs);
        result
    }
}

impl std::ops::MulAssign for TransAffine {
    fn mul_assign(&mut self, rhs: TransAffine) {
        self.concatenate(&rhs);
    }
}

// ============================================================================
// Tests
// ============================================================================
