use crate::math::Vector;
use crate::utils::ScalarType;

/// A 2D rotation stored as its sine and cosine.
///
/// Unlike `nalgebra::UnitComplex`, this only requires the arithmetic of [`ScalarType`], so it
/// can be built on top of deterministic fixed-point scalars.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Rotation<N> {
    /// Sine of the rotation angle.
    pub s: N,
    /// Cosine of the rotation angle.
    pub c: N,
}

impl<N: ScalarType> Rotation<N> {
    /// The identity rotation.
    #[inline]
    pub fn identity() -> Self {
        Self {
            s: N::zero(),
            c: N::one(),
        }
    }

    /// Builds the rotation with the given angle, in radians.
    #[inline]
    pub fn new(angle: N) -> Self {
        let (s, c) = angle.sin_cos();
        Self { s, c }
    }

    /// Rotates `v` by this rotation.
    #[inline]
    pub fn transform_vector(&self, v: &Vector<N>) -> Vector<N> {
        Vector::new(self.c * v.x - self.s * v.y, self.s * v.x + self.c * v.y)
    }

    /// Rotates `v` by the inverse of this rotation.
    #[inline]
    pub fn inverse_transform_vector(&self, v: &Vector<N>) -> Vector<N> {
        Vector::new(self.c * v.x + self.s * v.y, -self.s * v.x + self.c * v.y)
    }
}

#[cfg(test)]
mod test {
    use super::Rotation;
    use crate::math::Vector;
    use crate::utils::ScalarType;
    use approx::assert_relative_eq;

    #[test]
    fn quarter_turn() {
        let rot = Rotation::new(f64::pi() / 2.0);
        let v = rot.transform_vector(&Vector::new(1.0, 0.0));
        assert_relative_eq!(v, Vector::new(0.0, 1.0), epsilon = 1.0e-12);
        let back = rot.inverse_transform_vector(&v);
        assert_relative_eq!(back, Vector::new(1.0, 0.0), epsilon = 1.0e-12);
    }
}
