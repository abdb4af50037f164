use crate::utils::ScalarType;
use na::{Vector2, Vector3};

/// A symmetric 2x2 matrix, used as the block mass matrix of two coupled constraint rows.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SdpMatrix2<N> {
    /// The component at the first row and first column of this matrix.
    pub m11: N,
    /// The component at the first row and second column of this matrix.
    pub m12: N,
    /// The component at the second row and second column of this matrix.
    pub m22: N,
}

impl<N: ScalarType> SdpMatrix2<N> {
    /// A new SDP 2x2 matrix with the given components.
    ///
    /// Because the matrix is symmetric, only the lower off-diagonal component is required.
    #[inline]
    pub fn new(m11: N, m12: N, m22: N) -> Self {
        Self { m11, m12, m22 }
    }

    /// The zero matrix.
    #[inline]
    pub fn zero() -> Self {
        Self::new(N::zero(), N::zero(), N::zero())
    }

    /// The determinant of this matrix.
    #[inline]
    pub fn determinant(&self) -> N {
        self.m11 * self.m22 - self.m12 * self.m12
    }

    /// Solves `self * x = b` in closed form.
    ///
    /// Returns zero if the matrix is singular.
    #[inline]
    pub fn solve(&self, b: &Vector2<N>) -> Vector2<N> {
        let mut det = self.determinant();
        if det != N::zero() {
            det = N::one() / det;
        }

        Vector2::new(
            det * (self.m22 * b.x - self.m12 * b.y),
            det * (self.m11 * b.y - self.m12 * b.x),
        )
    }
}

/// A symmetric 3x3 matrix, used as the block mass matrix of three coupled constraint rows.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SdpMatrix3<N> {
    /// The component at the first row and first column of this matrix.
    pub m11: N,
    /// The component at the first row and second column of this matrix.
    pub m12: N,
    /// The component at the first row and third column of this matrix.
    pub m13: N,
    /// The component at the second row and second column of this matrix.
    pub m22: N,
    /// The component at the second row and third column of this matrix.
    pub m23: N,
    /// The component at the third row and third column of this matrix.
    pub m33: N,
}

impl<N: ScalarType> SdpMatrix3<N> {
    /// A new SDP 3x3 matrix with the given components.
    ///
    /// Because the matrix is symmetric, only the upper off-diagonal components are required.
    #[inline]
    pub fn new(m11: N, m12: N, m13: N, m22: N, m23: N, m33: N) -> Self {
        Self {
            m11,
            m12,
            m13,
            m22,
            m23,
            m33,
        }
    }

    /// The determinant of this matrix.
    #[inline]
    pub fn determinant(&self) -> N {
        self.m11 * (self.m22 * self.m33 - self.m23 * self.m23)
            - self.m12 * (self.m12 * self.m33 - self.m23 * self.m13)
            + self.m13 * (self.m12 * self.m23 - self.m22 * self.m13)
    }

    /// Solves `self * x = b` in closed form, using Cramer’s rule.
    ///
    /// Returns zero if the matrix is singular.
    pub fn solve(&self, b: &Vector3<N>) -> Vector3<N> {
        let mut det = self.determinant();
        if det != N::zero() {
            det = N::one() / det;
        }

        // Cofactors of the symmetric matrix.
        let c11 = self.m22 * self.m33 - self.m23 * self.m23;
        let c12 = self.m13 * self.m23 - self.m12 * self.m33;
        let c13 = self.m12 * self.m23 - self.m13 * self.m22;
        let c22 = self.m11 * self.m33 - self.m13 * self.m13;
        let c23 = self.m13 * self.m12 - self.m11 * self.m23;
        let c33 = self.m11 * self.m22 - self.m12 * self.m12;

        Vector3::new(
            det * (c11 * b.x + c12 * b.y + c13 * b.z),
            det * (c12 * b.x + c22 * b.y + c23 * b.z),
            det * (c13 * b.x + c23 * b.y + c33 * b.z),
        )
    }
}
