use crate::math::Vector;
use crate::utils::ScalarType;

/// The position of a body, as seen by the constraints solver.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SolverPosition<N: ScalarType> {
    /// World-space center of mass.
    pub center: Vector<N>,
    /// Rotation angle, in radians.
    pub angle: N,
}

/// The velocity of a body, as seen by the constraints solver.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SolverVelocity<N: ScalarType> {
    /// The linear velocity of the center of mass.
    pub linear: Vector<N>,
    /// The angular velocity.
    pub angular: N,
}

impl<N: ScalarType> SolverVelocity<N> {
    /// A zero velocity.
    pub fn zero() -> Self {
        Self {
            linear: Vector::zeros(),
            angular: N::zero(),
        }
    }
}
