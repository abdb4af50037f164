use crate::math::{Rotation, Vector};
use crate::utils::{inv_positive, CrossProduct, ScalarType};

/// The status of a body, governing how it is affected by external forces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum RigidBodyType {
    /// A `RigidBodyType::Dynamic` body can be affected by all external forces.
    Dynamic,
    /// A `RigidBodyType::Fixed` body cannot be affected by external forces and never moves.
    Fixed,
}

impl RigidBodyType {
    /// Is this rigid-body fixed (i.e. cannot move)?
    pub fn is_fixed(self) -> bool {
        self == RigidBodyType::Fixed
    }

    /// Is this rigid-body dynamic (i.e. can move and be affected by forces)?
    pub fn is_dynamic(self) -> bool {
        self == RigidBodyType::Dynamic
    }
}

/// A rigid body.
///
/// The pose is stored the way the solver consumes it: the world-space position of the center of
/// mass and the rotation angle. The position of the body’s origin is derived from them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBody<N: ScalarType> {
    pub(crate) body_type: RigidBodyType,
    /// World-space center of mass.
    pub(crate) center: Vector<N>,
    pub(crate) angle: N,
    pub(crate) rotation: Rotation<N>,
    /// Center of mass, expressed in the local frame of the body.
    pub(crate) local_center: Vector<N>,
    pub(crate) linvel: Vector<N>,
    pub(crate) angvel: N,
    pub(crate) inv_mass: N,
    pub(crate) inv_inertia: N,
    pub(crate) linear_damping: N,
    pub(crate) angular_damping: N,
    pub(crate) gravity_scale: N,
    pub(crate) sleeping: bool,
    /// Offset of this body in the arrays of the island being solved.
    pub(crate) island_index: usize,
}

impl<N: ScalarType> RigidBody<N> {
    /// The status of this rigid-body.
    pub fn body_type(&self) -> RigidBodyType {
        self.body_type
    }

    /// Is this body dynamic?
    pub fn is_dynamic(&self) -> bool {
        self.body_type.is_dynamic()
    }

    /// Is this body fixed?
    pub fn is_fixed(&self) -> bool {
        self.body_type.is_fixed()
    }

    /// The world-space position of this body’s center of mass.
    pub fn center_of_mass(&self) -> Vector<N> {
        self.center
    }

    /// The center of mass of this body, expressed in its local frame.
    pub fn local_center_of_mass(&self) -> Vector<N> {
        self.local_center
    }

    /// The world-space position of this body’s origin.
    pub fn translation(&self) -> Vector<N> {
        self.center - self.rotation.transform_vector(&self.local_center)
    }

    /// The rotation angle of this body, in radians.
    pub fn angle(&self) -> N {
        self.angle
    }

    /// The rotation of this body.
    pub fn rotation(&self) -> &Rotation<N> {
        &self.rotation
    }

    /// Teleports this body so that its origin is at `translation` with the rotation `angle`.
    ///
    /// The velocities are left unchanged.
    pub fn set_position(&mut self, translation: Vector<N>, angle: N) {
        self.angle = angle;
        self.rotation = Rotation::new(angle);
        self.center = translation + self.rotation.transform_vector(&self.local_center);
    }

    /// The linear velocity of this body’s center of mass.
    pub fn linvel(&self) -> &Vector<N> {
        &self.linvel
    }

    /// The angular velocity of this body.
    pub fn angvel(&self) -> N {
        self.angvel
    }

    /// Sets the linear velocity of this body.
    ///
    /// Setting a non-zero velocity wakes the body up.
    pub fn set_linvel(&mut self, linvel: Vector<N>) {
        if self.body_type.is_dynamic() {
            self.linvel = linvel;
            if linvel != Vector::zeros() {
                self.wake_up();
            }
        }
    }

    /// Sets the angular velocity of this body.
    ///
    /// Setting a non-zero velocity wakes the body up.
    pub fn set_angvel(&mut self, angvel: N) {
        if self.body_type.is_dynamic() {
            self.angvel = angvel;
            if angvel != N::zero() {
                self.wake_up();
            }
        }
    }

    /// The inverse of the mass of this body (zero for fixed bodies).
    pub fn inv_mass(&self) -> N {
        self.inv_mass
    }

    /// The inverse of the angular inertia of this body around its center of mass.
    ///
    /// This is zero for fixed bodies and bodies with locked rotations.
    pub fn inv_inertia(&self) -> N {
        self.inv_inertia
    }

    /// The linear damping coefficient of this body.
    pub fn linear_damping(&self) -> N {
        self.linear_damping
    }

    /// The angular damping coefficient of this body.
    pub fn angular_damping(&self) -> N {
        self.angular_damping
    }

    /// The scaling factor applied to the gravity affecting this body.
    pub fn gravity_scale(&self) -> N {
        self.gravity_scale
    }

    /// Is this body sleeping?
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Puts this body to sleep and resets its velocities.
    pub fn sleep(&mut self) {
        if self.body_type.is_dynamic() {
            self.sleeping = true;
            self.linvel = Vector::zeros();
            self.angvel = N::zero();
        }
    }

    /// Wakes this body up if it is sleeping.
    pub fn wake_up(&mut self) {
        if self.body_type.is_dynamic() {
            self.sleeping = false;
        }
    }

    /// Transforms a point expressed in the local frame of this body into world-space.
    pub fn world_point(&self, local_point: &Vector<N>) -> Vector<N> {
        self.center + self.rotation.transform_vector(&(local_point - self.local_center))
    }

    /// Transforms a vector expressed in the local frame of this body into world-space.
    pub fn world_vector(&self, local_vector: &Vector<N>) -> Vector<N> {
        self.rotation.transform_vector(local_vector)
    }

    /// Transforms a world-space point into the local frame of this body.
    pub fn local_point(&self, world_point: &Vector<N>) -> Vector<N> {
        self.rotation
            .inverse_transform_vector(&(world_point - self.center))
            + self.local_center
    }

    /// Transforms a world-space vector into the local frame of this body.
    pub fn local_vector(&self, world_vector: &Vector<N>) -> Vector<N> {
        self.rotation.inverse_transform_vector(world_vector)
    }

    /// The world-space velocity of the given world-space point attached to this body.
    pub fn velocity_at_point(&self, world_point: &Vector<N>) -> Vector<N> {
        self.linvel + self.angvel.gcross(world_point - self.center)
    }
}

/// A builder for rigid-bodies.
#[derive(Clone, Debug, PartialEq)]
#[must_use = "Builder functions return the updated builder"]
pub struct RigidBodyBuilder<N: ScalarType> {
    body_type: RigidBodyType,
    translation: Vector<N>,
    angle: N,
    linvel: Vector<N>,
    angvel: N,
    mass: N,
    angular_inertia: N,
    local_center: Vector<N>,
    rotations_locked: bool,
    linear_damping: N,
    angular_damping: N,
    gravity_scale: N,
    sleeping: bool,
}

impl<N: ScalarType> RigidBodyBuilder<N> {
    /// Initialize a new builder for a rigid body which is either fixed or dynamic.
    pub fn new(body_type: RigidBodyType) -> Self {
        Self {
            body_type,
            translation: Vector::zeros(),
            angle: N::zero(),
            linvel: Vector::zeros(),
            angvel: N::zero(),
            mass: N::one(),
            angular_inertia: N::one(),
            local_center: Vector::zeros(),
            rotations_locked: false,
            linear_damping: N::zero(),
            angular_damping: N::zero(),
            gravity_scale: N::one(),
            sleeping: false,
        }
    }

    /// Initializes the builder of a new fixed rigid body.
    pub fn fixed() -> Self {
        Self::new(RigidBodyType::Fixed)
    }

    /// Initializes the builder of a new dynamic rigid body.
    pub fn dynamic() -> Self {
        Self::new(RigidBodyType::Dynamic)
    }

    /// Sets the initial translation of the rigid-body’s origin.
    pub fn translation(mut self, translation: Vector<N>) -> Self {
        self.translation = translation;
        self
    }

    /// Sets the initial rotation angle of the rigid-body.
    pub fn rotation(mut self, angle: N) -> Self {
        self.angle = angle;
        self
    }

    /// Sets the initial linear velocity of the rigid-body.
    pub fn linvel(mut self, linvel: Vector<N>) -> Self {
        self.linvel = linvel;
        self
    }

    /// Sets the initial angular velocity of the rigid-body.
    pub fn angvel(mut self, angvel: N) -> Self {
        self.angvel = angvel;
        self
    }

    /// Sets the mass of the rigid-body.
    ///
    /// A non-positive mass on a dynamic body is replaced by `1`, so that it can still be moved.
    pub fn mass(mut self, mass: N) -> Self {
        self.mass = mass;
        self
    }

    /// Sets the angular inertia of the rigid-body around its center of mass.
    ///
    /// A non-positive angular inertia locks the rotations of the body.
    pub fn angular_inertia(mut self, angular_inertia: N) -> Self {
        self.angular_inertia = angular_inertia;
        self
    }

    /// Sets the center of mass of the rigid-body, expressed in its local frame.
    pub fn local_center_of_mass(mut self, local_center: Vector<N>) -> Self {
        self.local_center = local_center;
        self
    }

    /// Prevents this rigid-body from rotating.
    pub fn lock_rotations(mut self) -> Self {
        self.rotations_locked = true;
        self
    }

    /// Sets the damping factor for the linear part of the rigid-body motion.
    pub fn linear_damping(mut self, factor: N) -> Self {
        self.linear_damping = factor;
        self
    }

    /// Sets the damping factor for the angular part of the rigid-body motion.
    pub fn angular_damping(mut self, factor: N) -> Self {
        self.angular_damping = factor;
        self
    }

    /// Sets the scale applied to the gravity force affecting the rigid-body.
    pub fn gravity_scale(mut self, scale: N) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Sets whether the rigid-body starts sleeping.
    pub fn sleeping(mut self, sleeping: bool) -> Self {
        self.sleeping = sleeping;
        self
    }

    /// Build a new rigid-body with the parameters configured with this builder.
    pub fn build(&self) -> RigidBody<N> {
        let rotation = Rotation::new(self.angle);
        let dynamic = self.body_type.is_dynamic();

        let (inv_mass, inv_inertia) = if dynamic {
            let mass = if self.mass > N::zero() {
                self.mass
            } else {
                N::one()
            };
            let inv_inertia = if self.rotations_locked {
                N::zero()
            } else {
                inv_positive(self.angular_inertia)
            };
            (N::one() / mass, inv_inertia)
        } else {
            (N::zero(), N::zero())
        };

        let (linvel, angvel) = if dynamic {
            (self.linvel, self.angvel)
        } else {
            (Vector::zeros(), N::zero())
        };

        RigidBody {
            body_type: self.body_type,
            center: self.translation + rotation.transform_vector(&self.local_center),
            angle: self.angle,
            rotation,
            local_center: self.local_center,
            linvel,
            angvel,
            inv_mass,
            inv_inertia,
            linear_damping: self.linear_damping,
            angular_damping: self.angular_damping,
            gravity_scale: self.gravity_scale,
            sleeping: self.sleeping && dynamic,
            island_index: usize::MAX,
        }
    }
}

impl<N: ScalarType> From<RigidBodyBuilder<N>> for RigidBody<N> {
    fn from(val: RigidBodyBuilder<N>) -> RigidBody<N> {
        val.build()
    }
}
