use crate::dynamics::solver::{PrismaticPositionConstraint, PrismaticVelocityConstraint, SolverData};
use crate::dynamics::{ImpulseJointHandle, PrismaticJoint, RigidBodyHandle, RigidBodySet};
use crate::math::Vector;
use crate::utils::{CrossProduct, ScalarType};

#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
/// An impulse-based prismatic joint attached to two bodies.
pub struct ImpulseJoint<N: ScalarType> {
    /// Handle to the first body attached to this joint.
    pub body1: RigidBodyHandle,
    /// Handle to the second body attached to this joint.
    pub body2: RigidBodyHandle,

    /// The joint’s description. Once the joint is inserted, it only changes through the
    /// control methods of this structure.
    pub(crate) data: PrismaticJoint<N>,

    /// The impulses accumulated by this joint.
    pub(crate) constraint: PrismaticVelocityConstraint<N>,
    /// Whether both bodies were found when the velocity constraint was initialized.
    pub(crate) active: bool,

    // A joint needs to know its handle to simplify its removal.
    pub(crate) handle: ImpulseJointHandle,
}

impl<N: ScalarType> ImpulseJoint<N> {
    pub(crate) fn new(
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        data: PrismaticJoint<N>,
    ) -> Self {
        Self {
            body1,
            body2,
            data,
            constraint: PrismaticVelocityConstraint::new(),
            active: false,
            handle: ImpulseJointHandle::invalid(),
        }
    }

    /// The handle of this joint in its joint set.
    pub fn handle(&self) -> ImpulseJointHandle {
        self.handle
    }

    /// The joint’s description.
    pub fn data(&self) -> &PrismaticJoint<N> {
        &self.data
    }

    /// The velocity-level solver state of this joint, including its accumulated impulses.
    pub fn velocity_constraint(&self) -> &PrismaticVelocityConstraint<N> {
        &self.constraint
    }

    /*
     * Solver entry points.
     */
    /// Prepares the velocity constraint for the current step and applies warm-starting.
    ///
    /// Both bodies must be part of the island described by `data`. If one of them has been
    /// removed, the joint is skipped for this step.
    pub fn init_velocity_constraints(&mut self, bodies: &RigidBodySet<N>, data: &mut SolverData<N>) {
        match (bodies.get(self.body1), bodies.get(self.body2)) {
            (Some(rb1), Some(rb2)) => {
                self.constraint.init(&self.data, rb1, rb2, data);
                self.active = true;
            }
            _ => {
                log::warn!(
                    "Joint {:?} references a rigid-body that no longer exists, skipping it.",
                    self.handle.into_raw_parts()
                );
                self.active = false;
            }
        }
    }

    /// Performs one velocity iteration.
    pub fn solve_velocity_constraints(&mut self, data: &mut SolverData<N>) {
        if self.active {
            self.constraint.solve(&self.data, data);
        }
    }

    /// Performs one position iteration and returns `true` if the joint error was within the
    /// allowed slop.
    pub fn solve_position_constraints(&self, data: &mut SolverData<N>) -> bool {
        if !self.active {
            return true;
        }

        PrismaticPositionConstraint::from_params(&self.data, &self.constraint)
            .solve(&data.step, data.positions)
    }

    /*
     * Runtime control.
     */
    fn wake_up_bodies(&self, bodies: &mut RigidBodySet<N>) {
        bodies.wake_up(self.body1);
        bodies.wake_up(self.body2);
    }

    /// Is the translation limit enabled?
    pub fn is_limit_enabled(&self) -> bool {
        self.data.limits_enabled
    }

    /// Enables or disables the translation limit, waking up both bodies if this changes it.
    pub fn enable_limit(&mut self, bodies: &mut RigidBodySet<N>, enabled: bool) {
        if enabled != self.data.limits_enabled {
            log::trace!("Joint {:?}: limits enabled = {}", self.handle, enabled);
            self.wake_up_bodies(bodies);
            self.data.limits_enabled = enabled;
            self.constraint.reset_limit_impulses();
        }
    }

    /// The lower translation limit.
    pub fn lower_limit(&self) -> N {
        self.data.limits[0]
    }

    /// The upper translation limit.
    pub fn upper_limit(&self) -> N {
        self.data.limits[1]
    }

    /// Sets the translation limits, waking up both bodies if this changes them.
    ///
    /// The `lower` limit must not be greater than the `upper` limit.
    pub fn set_limits(&mut self, bodies: &mut RigidBodySet<N>, lower: N, upper: N) {
        debug_assert!(lower <= upper, "Invalid joint limits.");
        if lower != self.data.limits[0] || upper != self.data.limits[1] {
            log::trace!("Joint {:?}: limits = [{}, {}]", self.handle, lower, upper);
            self.wake_up_bodies(bodies);
            self.data.limits = [lower, upper];
            self.constraint.reset_limit_impulses();
        }
    }

    /// Is the motor enabled?
    pub fn is_motor_enabled(&self) -> bool {
        self.data.motor_enabled
    }

    /// Enables or disables the motor, waking up both bodies if this changes it.
    pub fn enable_motor(&mut self, bodies: &mut RigidBodySet<N>, enabled: bool) {
        if enabled != self.data.motor_enabled {
            log::trace!("Joint {:?}: motor enabled = {}", self.handle, enabled);
            self.wake_up_bodies(bodies);
            self.data.motor_enabled = enabled;
            self.constraint.reset_motor_impulse();
        }
    }

    /// The target speed of the motor.
    pub fn motor_speed(&self) -> N {
        self.data.motor_speed
    }

    /// Sets the target speed of the motor, waking up both bodies if this changes it.
    pub fn set_motor_speed(&mut self, bodies: &mut RigidBodySet<N>, speed: N) {
        if speed != self.data.motor_speed {
            log::trace!("Joint {:?}: motor speed = {}", self.handle, speed);
            self.wake_up_bodies(bodies);
            self.data.motor_speed = speed;
        }
    }

    /// The maximum force the motor can deliver.
    pub fn max_motor_force(&self) -> N {
        self.data.max_motor_force
    }

    /// Sets the maximum force the motor can deliver, waking up both bodies if this changes it.
    pub fn set_max_motor_force(&mut self, bodies: &mut RigidBodySet<N>, force: N) {
        if force != self.data.max_motor_force {
            log::trace!("Joint {:?}: max motor force = {}", self.handle, force);
            self.wake_up_bodies(bodies);
            self.data.max_motor_force = force;
        }
    }

    /// The reference angle of this joint.
    pub fn reference_angle(&self) -> N {
        self.data.reference_angle
    }

    /// The sliding axis, in the local-space of the first body.
    pub fn local_axis1(&self) -> Vector<N> {
        self.data.local_axis1
    }

    /*
     * Queries.
     */
    /// The force applied on the second body during the last step.
    ///
    /// The upper limit impulse pushes against the axis, so it is subtracted from the motor and
    /// lower limit impulses.
    pub fn reaction_force(&self, inv_dt: N) -> Vector<N> {
        let c = &self.constraint;
        (c.perp * c.impulse.x + c.axis * c.axial_impulse()) * inv_dt
    }

    /// The torque applied on the second body during the last step.
    pub fn reaction_torque(&self, inv_dt: N) -> N {
        inv_dt * self.constraint.impulse.y
    }

    /// The force applied by the motor during the last step.
    pub fn motor_force(&self, inv_dt: N) -> N {
        inv_dt * self.constraint.motor_impulse
    }

    /// The world-space anchor on the first body.
    pub fn anchor1(&self, bodies: &RigidBodySet<N>) -> Option<Vector<N>> {
        let rb1 = bodies.get(self.body1)?;
        Some(rb1.world_point(&self.data.local_anchor1))
    }

    /// The world-space anchor on the second body.
    pub fn anchor2(&self, bodies: &RigidBodySet<N>) -> Option<Vector<N>> {
        let rb2 = bodies.get(self.body2)?;
        Some(rb2.world_point(&self.data.local_anchor2))
    }

    /// The current translation of the second anchor relative to the first one, along the
    /// sliding axis.
    pub fn translation(&self, bodies: &RigidBodySet<N>) -> Option<N> {
        let rb1 = bodies.get(self.body1)?;
        let rb2 = bodies.get(self.body2)?;
        let p1 = rb1.world_point(&self.data.local_anchor1);
        let p2 = rb2.world_point(&self.data.local_anchor2);
        let axis = rb1.world_vector(&self.data.local_axis1);
        Some((p2 - p1).dot(&axis))
    }

    /// The current rate of change of [`Self::translation`].
    pub fn speed(&self, bodies: &RigidBodySet<N>) -> Option<N> {
        let rb1 = bodies.get(self.body1)?;
        let rb2 = bodies.get(self.body2)?;

        let r1 = rb1.world_vector(&(self.data.local_anchor1 - rb1.local_center));
        let r2 = rb2.world_vector(&(self.data.local_anchor2 - rb2.local_center));
        let p1 = rb1.center + r1;
        let p2 = rb2.center + r2;
        let axis = rb1.world_vector(&self.data.local_axis1);

        let relative_velocity = rb2.velocity_at_point(&p2) - rb1.velocity_at_point(&p1);
        Some((p2 - p1).dot(&rb1.angvel.gcross(axis)) + axis.dot(&relative_velocity))
    }

    /// A textual description of this joint, one `key = value` pair per line.
    pub fn dump(&self) -> String {
        let data = &self.data;
        let (i1, g1) = self.body1.into_raw_parts();
        let (i2, g2) = self.body2.into_raw_parts();
        format!(
            "joint = prismatic\n\
             body1 = ({i1}, {g1})\n\
             body2 = ({i2}, {g2})\n\
             contacts_enabled = {}\n\
             local_anchor1 = ({}, {})\n\
             local_anchor2 = ({}, {})\n\
             local_axis1 = ({}, {})\n\
             reference_angle = {}\n\
             limits_enabled = {}\n\
             lower_limit = {}\n\
             upper_limit = {}\n\
             motor_enabled = {}\n\
             motor_speed = {}\n\
             max_motor_force = {}\n",
            data.contacts_enabled,
            data.local_anchor1.x,
            data.local_anchor1.y,
            data.local_anchor2.x,
            data.local_anchor2.y,
            data.local_axis1.x,
            data.local_axis1.y,
            data.reference_angle,
            data.limits_enabled,
            data.limits[0],
            data.limits[1],
            data.motor_enabled,
            data.motor_speed,
            data.max_motor_force,
        )
    }
}
