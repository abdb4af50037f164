//! CrossProduct trait for the generalized 2D cross product.

use crate::utils::ScalarType;
use na::Vector2;

/// Trait for computing generalized cross products.
pub trait CrossProduct<Rhs>: Sized {
    /// The result type of the cross product.
    type Result;
    /// Computes the generalized cross product of `self` with `rhs`.
    fn gcross(&self, rhs: Rhs) -> Self::Result;
}

/// `a × b` between two 2D vectors is the scalar `a.x * b.y - a.y * b.x`.
impl<N: ScalarType> CrossProduct<Vector2<N>> for Vector2<N> {
    type Result = N;

    #[inline]
    fn gcross(&self, rhs: Vector2<N>) -> Self::Result {
        self.x * rhs.y - self.y * rhs.x
    }
}

/// `w × v` between an angular velocity and a 2D vector is the vector `(-w * v.y, w * v.x)`.
impl<N: ScalarType> CrossProduct<Vector2<N>> for N {
    type Result = Vector2<N>;

    #[inline]
    fn gcross(&self, rhs: Vector2<N>) -> Self::Result {
        Vector2::new(-rhs.y * *self, rhs.x * *self)
    }
}
