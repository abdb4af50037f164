use crate::dynamics::{JointError, RigidBodyHandle, RigidBodySet};
use crate::math::Vector;
use crate::utils::{CrossProduct, ScalarType};

#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
/// A sliding joint that allows movement along one axis only (like a piston or sliding door).
///
/// The relative rotation of the two bodies is locked to the reference angle, and their
/// relative translation is confined to the axis. Translation along the axis can optionally be
/// restricted to a range of values, and driven by a motor.
pub struct PrismaticJoint<N: ScalarType> {
    pub(crate) local_anchor1: Vector<N>,
    pub(crate) local_anchor2: Vector<N>,
    pub(crate) local_axis1: Vector<N>,
    pub(crate) reference_angle: N,
    pub(crate) limits: [N; 2],
    pub(crate) limits_enabled: bool,
    pub(crate) motor_enabled: bool,
    pub(crate) motor_speed: N,
    pub(crate) max_motor_force: N,
    pub(crate) contacts_enabled: bool,
}

impl<N: ScalarType> PrismaticJoint<N> {
    /// Creates a new prismatic joint allowing only relative translations along the specified axis.
    ///
    /// This axis is expressed in the local-space of the first rigid-body, and normalized.
    pub fn new(axis: Vector<N>) -> Self {
        Self {
            local_anchor1: Vector::zeros(),
            local_anchor2: Vector::zeros(),
            local_axis1: normalize(axis),
            reference_angle: N::zero(),
            limits: [N::zero(), N::zero()],
            limits_enabled: false,
            motor_enabled: false,
            motor_speed: N::zero(),
            max_motor_force: N::zero(),
            contacts_enabled: false,
        }
    }

    /// Creates a prismatic joint from a world-space anchor and axis, using the current poses of
    /// both rigid-bodies.
    ///
    /// The reference angle is set so that the current relative rotation of the bodies is the
    /// one maintained by the joint.
    pub fn from_world_anchor(
        bodies: &RigidBodySet<N>,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        anchor: Vector<N>,
        axis: Vector<N>,
    ) -> Result<Self, JointError> {
        let rb1 = bodies.get(body1).ok_or(JointError::UnknownBody(body1))?;
        let rb2 = bodies.get(body2).ok_or(JointError::UnknownBody(body2))?;

        let mut joint = Self::new(rb1.local_vector(&axis));
        joint.local_anchor1 = rb1.local_point(&anchor);
        joint.local_anchor2 = rb2.local_point(&anchor);
        joint.reference_angle = rb2.angle() - rb1.angle();
        joint.validate()?;
        Ok(joint)
    }

    /// Checks that the joint parameters are consistent.
    pub fn validate(&self) -> Result<(), JointError> {
        if self.local_axis1 == Vector::zeros() {
            return Err(JointError::ZeroAxis);
        }

        if self.limits[0] > self.limits[1] {
            return Err(JointError::InvalidLimits {
                lower: self.limits[0].to_f64(),
                upper: self.limits[1].to_f64(),
            });
        }

        Ok(())
    }

    /// Are contacts between the attached rigid-bodies enabled?
    pub fn contacts_enabled(&self) -> bool {
        self.contacts_enabled
    }

    /// Sets whether contacts between the attached rigid-bodies are enabled.
    pub fn set_contacts_enabled(&mut self, enabled: bool) -> &mut Self {
        self.contacts_enabled = enabled;
        self
    }

    /// The joint’s anchor, expressed in the local-space of the first rigid-body.
    #[must_use]
    pub fn local_anchor1(&self) -> Vector<N> {
        self.local_anchor1
    }

    /// Sets the joint’s anchor, expressed in the local-space of the first rigid-body.
    pub fn set_local_anchor1(&mut self, anchor1: Vector<N>) -> &mut Self {
        self.local_anchor1 = anchor1;
        self
    }

    /// The joint’s anchor, expressed in the local-space of the second rigid-body.
    #[must_use]
    pub fn local_anchor2(&self) -> Vector<N> {
        self.local_anchor2
    }

    /// Sets the joint’s anchor, expressed in the local-space of the second rigid-body.
    pub fn set_local_anchor2(&mut self, anchor2: Vector<N>) -> &mut Self {
        self.local_anchor2 = anchor2;
        self
    }

    /// The unit sliding axis of the joint, expressed in the local-space of the first rigid-body.
    #[must_use]
    pub fn local_axis1(&self) -> Vector<N> {
        self.local_axis1
    }

    /// Sets the sliding axis of the joint, expressed in the local-space of the first rigid-body.
    ///
    /// The axis is normalized.
    pub fn set_local_axis1(&mut self, axis1: Vector<N>) -> &mut Self {
        self.local_axis1 = normalize(axis1);
        self
    }

    /// The direction orthogonal to the sliding axis, in the local-space of the first rigid-body.
    #[inline]
    pub(crate) fn local_perp1(&self) -> Vector<N> {
        N::one().gcross(self.local_axis1)
    }

    /// The angle of the second rigid-body relative to the first one that this joint maintains.
    #[must_use]
    pub fn reference_angle(&self) -> N {
        self.reference_angle
    }

    /// Sets the reference angle of this joint.
    pub fn set_reference_angle(&mut self, angle: N) -> &mut Self {
        self.reference_angle = angle;
        self
    }

    /// The `[lower, upper]` translation limits along the sliding axis.
    #[must_use]
    pub fn limits(&self) -> [N; 2] {
        self.limits
    }

    /// The lower translation limit.
    #[must_use]
    pub fn lower_limit(&self) -> N {
        self.limits[0]
    }

    /// The upper translation limit.
    #[must_use]
    pub fn upper_limit(&self) -> N {
        self.limits[1]
    }

    /// Sets the `[lower, upper]` translation limits along the sliding axis.
    ///
    /// The lower limit must not be greater than the upper limit.
    pub fn set_limits(&mut self, limits: [N; 2]) -> &mut Self {
        debug_assert!(limits[0] <= limits[1], "Invalid joint limits.");
        self.limits = limits;
        self
    }

    /// Are the translation limits enabled?
    #[must_use]
    pub fn limits_enabled(&self) -> bool {
        self.limits_enabled
    }

    /// Enables or disables the translation limits.
    pub fn set_limits_enabled(&mut self, enabled: bool) -> &mut Self {
        self.limits_enabled = enabled;
        self
    }

    /// Is the motor enabled?
    #[must_use]
    pub fn motor_enabled(&self) -> bool {
        self.motor_enabled
    }

    /// Enables or disables the motor.
    pub fn set_motor_enabled(&mut self, enabled: bool) -> &mut Self {
        self.motor_enabled = enabled;
        self
    }

    /// The target relative speed along the axis the motor tries to reach.
    #[must_use]
    pub fn motor_speed(&self) -> N {
        self.motor_speed
    }

    /// Sets the target relative speed along the axis the motor tries to reach.
    pub fn set_motor_speed(&mut self, speed: N) -> &mut Self {
        self.motor_speed = speed;
        self
    }

    /// The maximum force the motor can deliver.
    #[must_use]
    pub fn max_motor_force(&self) -> N {
        self.max_motor_force
    }

    /// Sets the maximum force the motor can deliver.
    pub fn set_max_motor_force(&mut self, force: N) -> &mut Self {
        self.max_motor_force = force;
        self
    }
}

fn normalize<N: ScalarType>(v: Vector<N>) -> Vector<N> {
    let norm = v.dot(&v).sqrt();
    if norm > N::zero() {
        v / norm
    } else {
        v
    }
}

/// Create prismatic joints using the builder pattern.
///
/// A prismatic joint locks all relative motion except for translations along the joint’s
/// principal axis.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PrismaticJointBuilder<N: ScalarType>(pub PrismaticJoint<N>);

impl<N: ScalarType> PrismaticJointBuilder<N> {
    /// Creates a new builder for prismatic joints.
    ///
    /// This axis is expressed in the local-space of the first rigid-body.
    pub fn new(axis: Vector<N>) -> Self {
        Self(PrismaticJoint::new(axis))
    }

    /// Sets whether contacts between the attached rigid-bodies are enabled.
    #[must_use]
    pub fn contacts_enabled(mut self, enabled: bool) -> Self {
        self.0.contacts_enabled = enabled;
        self
    }

    /// Sets the joint’s anchor, expressed in the local-space of the first rigid-body.
    #[must_use]
    pub fn local_anchor1(mut self, anchor1: Vector<N>) -> Self {
        self.0.local_anchor1 = anchor1;
        self
    }

    /// Sets the joint’s anchor, expressed in the local-space of the second rigid-body.
    #[must_use]
    pub fn local_anchor2(mut self, anchor2: Vector<N>) -> Self {
        self.0.local_anchor2 = anchor2;
        self
    }

    /// Sets the principal axis of the joint, expressed in the local-space of the first rigid-body.
    #[must_use]
    pub fn local_axis1(mut self, axis1: Vector<N>) -> Self {
        self.0.set_local_axis1(axis1);
        self
    }

    /// Sets the angle of the second rigid-body relative to the first one.
    #[must_use]
    pub fn reference_angle(mut self, angle: N) -> Self {
        self.0.reference_angle = angle;
        self
    }

    /// Sets the `[lower, upper]` translation limits along the joint’s principal axis.
    ///
    /// This does not enable the limits.
    #[must_use]
    pub fn limits(mut self, limits: [N; 2]) -> Self {
        self.0.limits = limits;
        self
    }

    /// Enables or disables the translation limits.
    #[must_use]
    pub fn limits_enabled(mut self, enabled: bool) -> Self {
        self.0.limits_enabled = enabled;
        self
    }

    /// Enables or disables the motor.
    #[must_use]
    pub fn motor_enabled(mut self, enabled: bool) -> Self {
        self.0.motor_enabled = enabled;
        self
    }

    /// Sets the target speed of the motor.
    #[must_use]
    pub fn motor_speed(mut self, speed: N) -> Self {
        self.0.motor_speed = speed;
        self
    }

    /// Sets the maximum force the motor can deliver.
    #[must_use]
    pub fn max_motor_force(mut self, force: N) -> Self {
        self.0.max_motor_force = force;
        self
    }

    /// Builds the prismatic joint.
    ///
    /// The limits must be ordered. Use [`Self::try_build`] to check this at runtime.
    #[must_use]
    pub fn build(self) -> PrismaticJoint<N> {
        debug_assert!(self.0.limits[0] <= self.0.limits[1], "Invalid joint limits.");
        self.0
    }

    /// Builds the prismatic joint, checking that its parameters are consistent.
    pub fn try_build(self) -> Result<PrismaticJoint<N>, JointError> {
        self.0.validate()?;
        Ok(self.0)
    }
}

impl<N: ScalarType> From<PrismaticJointBuilder<N>> for PrismaticJoint<N> {
    fn from(val: PrismaticJointBuilder<N>) -> PrismaticJoint<N> {
        val.build()
    }
}
