//! Two-dimensional affine matrices.

use core::ops::Mul;

use crate::MatrixError;

/// A 2D affine transform.
///
/// Maps `(x, y)` to `(a*x + c*y + tx, b*x + d*y + ty)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix::from_array([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// Build from `[a, b, c, d, tx, ty]`.
    pub const fn from_array([a, b, c, d, tx, ty]: [f64; 6]) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    pub const fn to_array(self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.tx, self.ty]
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::from_array([sx, 0.0, 0.0, sy, 0.0, 0.0])
    }

    pub const fn uniform_scale(s: f64) -> Self {
        Self::scale(s, s)
    }

    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::from_array([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// Shear by angles in degrees: `deg_x` tilts along x, `deg_y` along y.
    pub fn skew(deg_x: f64, deg_y: f64) -> Self {
        Self::from_array([
            1.0,
            deg_y.to_radians().tan(),
            deg_x.to_radians().tan(),
            1.0,
            0.0,
            0.0,
        ])
    }

    /// Rotation by `deg` degrees. With y pointing down this turns clockwise.
    pub fn rotate(deg: f64) -> Self {
        let (sin, cos) = deg.to_radians().sin_cos();
        Self::from_array([cos, sin, -sin, cos, 0.0, 0.0])
    }

    /// Product of `matrices` folded left to right from the identity.
    ///
    /// The last matrix is applied to a point first.
    pub fn compose<I>(matrices: I) -> Self
    where
        I: IntoIterator<Item = AffineMatrix>,
    {
        matrices.into_iter().fold(Self::IDENTITY, |base, m| base * m)
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// The inverse transform.
    ///
    /// Fails with [`MatrixError::Singular`] when the determinant is zero or
    /// not finite.
    pub fn invert(&self) -> Result<Self, MatrixError> {
        let determinant = self.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(MatrixError::Singular { determinant });
        }
        Ok(self.invert_unchecked())
    }

    /// The inverse transform without a singularity check. A zero determinant
    /// yields infinite or NaN entries.
    pub fn invert_unchecked(&self) -> Self {
        let Self { a, b, c, d, tx, ty } = *self;
        let dt = 1.0 / self.determinant();
        Self {
            a: d * dt,
            b: -b * dt,
            c: -c * dt,
            d: a * dt,
            tx: dt * (c * ty - d * tx),
            ty: dt * (b * tx - a * ty),
        }
    }

    #[inline]
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    /// Map integer pixel coordinates around the centre `(xc, yc)` and
    /// truncate toward zero. Non-finite results truncate to 0.
    #[inline]
    pub(crate) fn map_centred(&self, x: f64, y: f64, xc: f64, yc: f64) -> (i64, i64) {
        let xa = x - xc;
        let ya = y - yc;
        let xx = xc + ((self.tx + ya * self.c) + xa * self.a);
        let yy = yc + ((self.ty + ya * self.d) + xa * self.b);
        (xx as i64, yy as i64)
    }
}

impl Mul for AffineMatrix {
    type Output = AffineMatrix;

    /// `self * rhs` applies `rhs` first, then `self`.
    fn mul(self, rhs: AffineMatrix) -> AffineMatrix {
        let o = self;
        let n = rhs;
        AffineMatrix {
            a: o.a * n.a + o.c * n.b,
            b: o.b * n.a + o.d * n.b,
            c: o.a * n.c + o.c * n.d,
            d: o.b * n.c + o.d * n.d,
            tx: o.tx + o.a * n.tx + o.c * n.ty,
            ty: o.ty + o.b * n.tx + o.d * n.ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(m: AffineMatrix, expected: [f64; 6]) {
        for (got, want) in m.to_array().into_iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{m:?} != {expected:?}");
        }
    }

    #[test]
    fn constructors() {
        assert_eq!(AffineMatrix::default(), AffineMatrix::IDENTITY);
        assert_eq!(AffineMatrix::scale(2.0, 3.0).to_array(), [2.0, 0.0, 0.0, 3.0, 0.0, 0.0]);
        assert_eq!(AffineMatrix::uniform_scale(4.0), AffineMatrix::scale(4.0, 4.0));
        assert_eq!(AffineMatrix::translate(5.0, -1.0).to_array(), [1.0, 0.0, 0.0, 1.0, 5.0, -1.0]);
        assert_near(AffineMatrix::rotate(90.0), [0.0, 1.0, -1.0, 0.0, 0.0, 0.0]);
        assert_near(AffineMatrix::skew(45.0, 0.0), [1.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        assert_near(AffineMatrix::skew(0.0, 45.0), [1.0, 1.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn compose_applies_last_matrix_first() {
        let m = AffineMatrix::compose([
            AffineMatrix::translate(5.0, 0.0),
            AffineMatrix::uniform_scale(2.0),
        ]);
        assert_eq!(m.transform_point(1.0, 0.0), (7.0, 0.0));
        assert_eq!(AffineMatrix::compose([]), AffineMatrix::IDENTITY);
        assert_eq!(
            m,
            AffineMatrix::translate(5.0, 0.0) * AffineMatrix::uniform_scale(2.0)
        );
    }

    #[test]
    fn rotate_turns_x_axis_toward_y() {
        let (x, y) = AffineMatrix::rotate(90.0).transform_point(1.0, 0.0);
        assert!(x.abs() < 1e-12 && (y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn invert_round_trips() {
        let m = AffineMatrix::compose([
            AffineMatrix::translate(3.0, -7.0),
            AffineMatrix::rotate(30.0),
            AffineMatrix::scale(2.0, 0.5),
            AffineMatrix::skew(10.0, 5.0),
        ]);
        let inv = m.invert().unwrap();
        assert_near(m * inv, AffineMatrix::IDENTITY.to_array());
        assert_near(inv * m, AffineMatrix::IDENTITY.to_array());
        assert_eq!(inv, m.invert_unchecked());
    }

    #[test]
    fn invert_rejects_singular() {
        let flat = AffineMatrix::scale(0.0, 1.0);
        assert_eq!(flat.determinant(), 0.0);
        assert_eq!(
            flat.invert(),
            Err(MatrixError::Singular { determinant: 0.0 })
        );

        let nan = AffineMatrix::from_array([f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert!(matches!(nan.invert(), Err(MatrixError::Singular { .. })));
    }

    #[test]
    fn invert_unchecked_propagates_non_finite() {
        let inv = AffineMatrix::scale(0.0, 1.0).invert_unchecked();
        assert!(inv.to_array().iter().any(|v| !v.is_finite()));
    }

    #[test]
    fn map_centred_truncates_toward_zero() {
        let m = AffineMatrix::translate(0.75, -0.75);
        assert_eq!(m.map_centred(1.0, 1.0, 0.5, 0.5), (1, 0));
        assert_eq!(m.map_centred(0.0, 0.0, 0.0, 0.0), (0, 0));
        let nan = AffineMatrix::from_array([f64::NAN; 6]);
        assert_eq!(nan.map_centred(3.0, 3.0, 1.0, 1.0), (0, 0));
    }
}
