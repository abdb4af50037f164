use crate::data::{Arena, Index};
use crate::dynamics::{ImpulseJointSet, RigidBody};
use crate::utils::ScalarType;
use std::ops::{Index as IndexOp, IndexMut};

/// The unique handle of a rigid body added to a `RigidBodySet`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct RigidBodyHandle(pub Index);

impl RigidBodyHandle {
    /// Converts this handle into its (index, generation) components.
    pub fn into_raw_parts(self) -> (u32, u32) {
        self.0.into_raw_parts()
    }

    /// Reconstructs an handle from its (index, generation) components.
    pub fn from_raw_parts(id: u32, generation: u32) -> Self {
        Self(Index::from_raw_parts(id, generation))
    }

    /// An always-invalid rigid-body handle.
    pub fn invalid() -> Self {
        Self(Index::from_raw_parts(crate::INVALID_U32, crate::INVALID_U32))
    }
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
/// A set of rigid bodies that can be handled by a physics pipeline.
pub struct RigidBodySet<N: ScalarType> {
    pub(crate) bodies: Arena<RigidBody<N>>,
}

impl<N: ScalarType> RigidBodySet<N> {
    /// Create a new empty set of rigid bodies.
    pub fn new() -> Self {
        RigidBodySet {
            bodies: Arena::new(),
        }
    }

    /// The number of rigid bodies on this set.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// `true` if there are no rigid bodies in this set.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Is the given body handle valid?
    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Insert a rigid body into this set and retrieve its handle.
    pub fn insert(&mut self, rb: impl Into<RigidBody<N>>) -> RigidBodyHandle {
        let mut rb = rb.into();
        rb.island_index = usize::MAX;
        RigidBodyHandle(self.bodies.insert(rb))
    }

    /// Removes a rigid-body, and all the impulse joints attached to it, from these sets.
    pub fn remove(
        &mut self,
        handle: RigidBodyHandle,
        impulse_joints: &mut ImpulseJointSet<N>,
    ) -> Option<RigidBody<N>> {
        let rb = self.bodies.remove(handle.0)?;
        for removed in impulse_joints.remove_joints_attached_to_rigid_body(handle) {
            log::trace!("Removed joint {:?} attached to body {:?}.", removed, handle);
        }
        Some(rb)
    }

    /// Gets the rigid-body with the given handle.
    pub fn get(&self, handle: RigidBodyHandle) -> Option<&RigidBody<N>> {
        self.bodies.get(handle.0)
    }

    /// Gets a mutable reference to the rigid-body with the given handle.
    pub fn get_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody<N>> {
        self.bodies.get_mut(handle.0)
    }

    /// Wakes up the rigid-body with the given handle, if it exists.
    pub fn wake_up(&mut self, handle: RigidBodyHandle) {
        if let Some(rb) = self.bodies.get_mut(handle.0) {
            rb.wake_up();
        }
    }

    /// Iterates through all the rigid-bodies on this set.
    pub fn iter(&self) -> impl Iterator<Item = (RigidBodyHandle, &RigidBody<N>)> {
        self.bodies.iter().map(|(h, b)| (RigidBodyHandle(h), b))
    }

    /// Iterates mutably through all the rigid-bodies on this set.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (RigidBodyHandle, &mut RigidBody<N>)> {
        self.bodies.iter_mut().map(|(h, b)| (RigidBodyHandle(h), b))
    }
}

impl<N: ScalarType> IndexOp<RigidBodyHandle> for RigidBodySet<N> {
    type Output = RigidBody<N>;

    fn index(&self, index: RigidBodyHandle) -> &RigidBody<N> {
        &self.bodies[index.0]
    }
}

impl<N: ScalarType> IndexMut<RigidBodyHandle> for RigidBodySet<N> {
    fn index_mut(&mut self, handle: RigidBodyHandle) -> &mut RigidBody<N> {
        &mut self.bodies[handle.0]
    }
}

#[cfg(test)]
mod test {
    use super::{RigidBodyHandle, RigidBodySet};
    use crate::dynamics::{ImpulseJointSet, PrismaticJointBuilder, RigidBodyBuilder};
    use crate::math::Vector;

    #[test]
    fn removing_a_body_removes_its_joints() {
        let mut bodies = RigidBodySet::<f64>::new();
        let mut joints = ImpulseJointSet::new();
        let b1 = bodies.insert(RigidBodyBuilder::fixed());
        let b2 = bodies.insert(RigidBodyBuilder::dynamic());
        let b3 = bodies.insert(RigidBodyBuilder::dynamic());
        let joint = PrismaticJointBuilder::new(Vector::x());
        let j12 = joints.insert(b1, b2, joint);
        let j23 = joints.insert(b2, b3, joint);
        let j13 = joints.insert(b1, b3, joint);

        assert!(bodies.remove(b2, &mut joints).is_some());
        assert!(!bodies.contains(b2));
        assert!(!joints.contains(j12));
        assert!(!joints.contains(j23));
        assert!(joints.contains(j13));
        assert!(bodies.remove(b2, &mut joints).is_none());
    }

    #[test]
    fn wake_up_unknown_body_is_ignored() {
        let mut bodies = RigidBodySet::<f32>::new();
        let h = bodies.insert(RigidBodyBuilder::dynamic().sleeping(true));
        assert!(bodies[h].is_sleeping());
        bodies.wake_up(h);
        assert!(!bodies[h].is_sleeping());
        bodies.wake_up(RigidBodyHandle::invalid());
    }
}
