use crate::dynamics::solver::{PrismaticVelocityConstraint, SolverPosition};
use crate::dynamics::{PrismaticJoint, TimeStep};
use crate::math::{Rotation, SdpMatrix2, SdpMatrix3, Vector};
use crate::utils::{CrossProduct, ScalarType};
use na::Vector3;

/// Which translation limit takes part in a position correction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LimitState {
    /// The translation is strictly within the limits, or the limits are disabled.
    Inactive,
    /// The limits are so close to each other that they act as an equality constraint. The
    /// positional error is the deviation of the translation from the lower limit, so the
    /// correction drives it back into that narrow band.
    Equal,
    /// The translation is at or below the lower limit.
    AtLower,
    /// The translation is at or above the upper limit.
    AtUpper,
}

/// A nonlinear position correction for a prismatic joint.
///
/// This reuses the body indices and mass properties gathered by the velocity constraint
/// during the same step, but recomputes the geometry from the current positions.
#[derive(Copy, Clone, Debug)]
pub(crate) struct PrismaticPositionConstraint<N: ScalarType> {
    index1: usize,
    index2: usize,
    local_anchor1: Vector<N>,
    local_anchor2: Vector<N>,
    local_axis1: Vector<N>,
    local_perp1: Vector<N>,
    reference_angle: N,
    limits_enabled: bool,
    lower: N,
    upper: N,
    im1: N,
    im2: N,
    ii1: N,
    ii2: N,
}

impl<N: ScalarType> PrismaticPositionConstraint<N> {
    pub fn from_params(
        joint: &PrismaticJoint<N>,
        velocity_constraint: &PrismaticVelocityConstraint<N>,
    ) -> Self {
        Self {
            index1: velocity_constraint.index1,
            index2: velocity_constraint.index2,
            local_anchor1: joint.local_anchor1 - velocity_constraint.local_center1,
            local_anchor2: joint.local_anchor2 - velocity_constraint.local_center2,
            local_axis1: joint.local_axis1,
            local_perp1: joint.local_perp1(),
            reference_angle: joint.reference_angle,
            limits_enabled: joint.limits_enabled,
            lower: joint.limits[0],
            upper: joint.limits[1],
            im1: velocity_constraint.im1,
            im2: velocity_constraint.im2,
            ii1: velocity_constraint.ii1,
            ii2: velocity_constraint.ii2,
        }
    }

    /// Classifies the limit and computes its positional error.
    pub fn limit_state(&self, step: &TimeStep<N>, translation: N) -> (LimitState, N) {
        if !self.limits_enabled {
            return (LimitState::Inactive, N::zero());
        }

        if (self.upper - self.lower).abs() < N::two() * step.linear_slop {
            (LimitState::Equal, translation - self.lower)
        } else if translation <= self.lower {
            (LimitState::AtLower, (translation - self.lower).min(N::zero()))
        } else if translation >= self.upper {
            (LimitState::AtUpper, (translation - self.upper).max(N::zero()))
        } else {
            (LimitState::Inactive, N::zero())
        }
    }

    /// Applies one position correction, returning `true` if the joint error was already within
    /// the allowed slop before the correction.
    pub fn solve(&self, step: &TimeStep<N>, positions: &mut [SolverPosition<N>]) -> bool {
        let mut pos1 = positions[self.index1];
        let mut pos2 = positions[self.index2];

        let rot1 = Rotation::new(pos1.angle);
        let rot2 = Rotation::new(pos2.angle);

        let (im1, im2, ii1, ii2) = (self.im1, self.im2, self.ii1, self.ii2);

        let r1 = rot1.transform_vector(&self.local_anchor1);
        let r2 = rot2.transform_vector(&self.local_anchor2);
        let d = pos2.center + r2 - pos1.center - r1;
        let arm1 = d + r1;

        let axis = rot1.transform_vector(&self.local_axis1);
        let a1 = arm1.gcross(axis);
        let a2 = r2.gcross(axis);
        let perp = rot1.transform_vector(&self.local_perp1);
        let s1 = arm1.gcross(perp);
        let s2 = r2.gcross(perp);

        let c1 = na::Vector2::new(
            perp.dot(&d),
            pos2.angle - pos1.angle - self.reference_angle,
        );

        let mut linear_error = c1.x.abs();
        let angular_error = c1.y.abs();

        let (state, c2) = self.limit_state(step, axis.dot(&d));
        if state != LimitState::Inactive {
            linear_error = linear_error.max(c2.abs());
        }

        let k11 = im1 + im2 + ii1 * s1 * s1 + ii2 * s2 * s2;
        let k12 = ii1 * s1 + ii2 * s2;
        let mut k22 = ii1 + ii2;
        if k22 == N::zero() {
            // For fixed rotation.
            k22 = N::one();
        }

        let impulse = if state != LimitState::Inactive {
            let k13 = ii1 * s1 * a1 + ii2 * s2 * a2;
            let k23 = ii1 * a1 + ii2 * a2;
            let k33 = im1 + im2 + ii1 * a1 * a1 + ii2 * a2 * a2;
            let k = SdpMatrix3::new(k11, k12, k13, k22, k23, k33);
            k.solve(&-Vector3::new(c1.x, c1.y, c2))
        } else {
            let k = SdpMatrix2::new(k11, k12, k22);
            let impulse = k.solve(&-c1);
            Vector3::new(impulse.x, impulse.y, N::zero())
        };

        let p = perp * impulse.x + axis * impulse.z;
        let l1 = impulse.x * s1 + impulse.y + impulse.z * a1;
        let l2 = impulse.x * s2 + impulse.y + impulse.z * a2;

        pos1.center -= p * im1;
        pos1.angle -= ii1 * l1;
        pos2.center += p * im2;
        pos2.angle += ii2 * l2;

        positions[self.index1] = pos1;
        positions[self.index2] = pos2;

        linear_error <= step.linear_slop && angular_error <= step.angular_slop
    }
}

#[cfg(test)]
mod test {
    use super::{LimitState, PrismaticPositionConstraint};
    use crate::dynamics::solver::{PrismaticVelocityConstraint, SolverPosition};
    use crate::dynamics::{IntegrationParameters, PrismaticJoint, PrismaticJointBuilder, TimeStep};
    use crate::math::Vector;
    use approx::assert_relative_eq;

    fn constraint(joint: &PrismaticJoint<f64>) -> PrismaticPositionConstraint<f64> {
        let mut velocity_constraint = PrismaticVelocityConstraint::new();
        velocity_constraint.index1 = 0;
        velocity_constraint.index2 = 1;
        velocity_constraint.im1 = 1.0;
        velocity_constraint.im2 = 0.5;
        velocity_constraint.ii1 = 2.0;
        velocity_constraint.ii2 = 1.0;
        PrismaticPositionConstraint::from_params(joint, &velocity_constraint)
    }

    fn step() -> TimeStep<f64> {
        TimeStep::new(&IntegrationParameters::default(), 0.0)
    }

    #[test]
    fn aligned_joint_is_converged_and_untouched() {
        let joint = PrismaticJointBuilder::new(Vector::x()).build();
        let constraint = constraint(&joint);
        let mut positions = vec![
            SolverPosition {
                center: Vector::zeros(),
                angle: 0.0,
            },
            SolverPosition {
                center: Vector::new(1.0, 0.0),
                angle: 0.0,
            },
        ];
        let expected = positions.clone();

        assert!(constraint.solve(&step(), &mut positions));
        assert_relative_eq!(positions[0].center, expected[0].center);
        assert_relative_eq!(positions[1].center, expected[1].center);
        assert_eq!(positions[1].angle, 0.0);
    }

    #[test]
    fn misaligned_joint_converges() {
        let joint = PrismaticJointBuilder::new(Vector::x())
            .local_anchor2(Vector::new(-0.5, 0.0))
            .build();
        let constraint = constraint(&joint);
        let mut positions = vec![
            SolverPosition {
                center: Vector::zeros(),
                angle: 0.0,
            },
            SolverPosition {
                center: Vector::new(1.0, 0.3),
                angle: 0.2,
            },
        ];

        assert!(!constraint.solve(&step(), &mut positions));
        let mut converged = false;
        for _ in 0..20 {
            if constraint.solve(&step(), &mut positions) {
                converged = true;
                break;
            }
        }
        assert!(converged);
        assert_relative_eq!(positions[1].angle - positions[0].angle, 0.0, epsilon = 0.035);
    }

    #[test]
    fn limit_classification() {
        let step = step();
        let joint = PrismaticJointBuilder::new(Vector::x())
            .limits([-1.0, 1.0])
            .limits_enabled(true)
            .build();
        let constraint = constraint(&joint);

        assert_eq!(constraint.limit_state(&step, 0.0).0, LimitState::Inactive);
        let (state, c2) = constraint.limit_state(&step, -1.5);
        assert_eq!(state, LimitState::AtLower);
        assert_relative_eq!(c2, -0.5);
        let (state, c2) = constraint.limit_state(&step, 1.25);
        assert_eq!(state, LimitState::AtUpper);
        assert_relative_eq!(c2, 0.25);
        assert_eq!(constraint.limit_state(&step, -1.0), (LimitState::AtLower, 0.0));
    }

    #[test]
    fn narrow_limits_act_as_an_equality() {
        let step = step();
        let joint = PrismaticJointBuilder::new(Vector::x())
            .limits([0.5, 0.505])
            .limits_enabled(true)
            .build();
        let constraint = constraint(&joint);

        // Strictly inside the range, but still solved with the three-row system.
        let (state, c2) = constraint.limit_state(&step, 0.502);
        assert_eq!(state, LimitState::Equal);
        assert_relative_eq!(c2, 0.002, epsilon = 1.0e-12);

        let mut positions = vec![
            SolverPosition {
                center: Vector::zeros(),
                angle: 0.0,
            },
            SolverPosition {
                center: Vector::new(1.0, 0.0),
                angle: 0.0,
            },
        ];
        let _ = constraint.solve(&step, &mut positions);
        let translation = positions[1].center.x - positions[0].center.x;
        assert_relative_eq!(translation, 0.5, epsilon = 1.0e-9);
    }

    #[test]
    fn disabled_limits_are_inactive() {
        let joint = PrismaticJointBuilder::new(Vector::x())
            .limits([0.0, 0.0])
            .build();
        assert_eq!(
            constraint(&joint).limit_state(&step(), 10.0),
            (LimitState::Inactive, 0.0)
        );
    }
}
