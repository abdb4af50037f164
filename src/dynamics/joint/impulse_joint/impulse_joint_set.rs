use super::ImpulseJoint;
use crate::data::arena::{Arena, Index};
use crate::dynamics::{JointError, PrismaticJoint, RigidBodyHandle, RigidBodySet};
use crate::utils::ScalarType;
use std::ops::{Index as IndexOp, IndexMut};

/// The unique identifier of a joint added to the joint set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct ImpulseJointHandle(pub Index);

impl ImpulseJointHandle {
    /// Converts this handle into its (index, generation) components.
    pub fn into_raw_parts(self) -> (u32, u32) {
        self.0.into_raw_parts()
    }

    /// Reconstructs an handle from its (index, generation) components.
    pub fn from_raw_parts(id: u32, generation: u32) -> Self {
        Self(Index::from_raw_parts(id, generation))
    }

    /// An always-invalid joint handle.
    pub fn invalid() -> Self {
        Self(Index::from_raw_parts(crate::INVALID_U32, crate::INVALID_U32))
    }
}

#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Default, Debug)]
/// The collection that stores all the joints connecting rigid bodies.
///
/// Joints are solved in the order of their slot in the set, which only depends on the
/// sequence of insertions and removals.
pub struct ImpulseJointSet<N: ScalarType> {
    joints: Arena<ImpulseJoint<N>>,
}

impl<N: ScalarType> ImpulseJointSet<N> {
    /// Creates a new empty set of impulse joints.
    pub fn new() -> Self {
        Self {
            joints: Arena::new(),
        }
    }

    /// The number of joints on this set.
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// `true` if there are no joints in this set.
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Is the given joint handle valid?
    pub fn contains(&self, handle: ImpulseJointHandle) -> bool {
        self.joints.contains(handle.0)
    }

    /// Gets the joint with the given handle.
    pub fn get(&self, handle: ImpulseJointHandle) -> Option<&ImpulseJoint<N>> {
        self.joints.get(handle.0)
    }

    /// Gets a mutable reference to the joint with the given handle.
    pub fn get_mut(&mut self, handle: ImpulseJointHandle) -> Option<&mut ImpulseJoint<N>> {
        self.joints.get_mut(handle.0)
    }

    /// Iterates through all the joints on this set.
    pub fn iter(&self) -> impl Iterator<Item = (ImpulseJointHandle, &ImpulseJoint<N>)> {
        self.joints
            .iter()
            .map(|(h, j)| (ImpulseJointHandle(h), j))
    }

    /// Iterates mutably through all the joints on this set.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ImpulseJointHandle, &mut ImpulseJoint<N>)> {
        self.joints
            .iter_mut()
            .map(|(h, j)| (ImpulseJointHandle(h), j))
    }

    /// Iterates through all the joints attached to the given rigid-body.
    pub fn attached_joints(
        &self,
        body: RigidBodyHandle,
    ) -> impl Iterator<Item = (ImpulseJointHandle, &ImpulseJoint<N>)> {
        self.iter()
            .filter(move |(_, j)| j.body1 == body || j.body2 == body)
    }

    /// Iterates through all the joints attaching the two given rigid-bodies, in any order.
    pub fn joints_between(
        &self,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
    ) -> impl Iterator<Item = (ImpulseJointHandle, &ImpulseJoint<N>)> {
        self.iter().filter(move |(_, j)| {
            (j.body1 == body1 && j.body2 == body2) || (j.body1 == body2 && j.body2 == body1)
        })
    }

    /// Inserts a new joint into this set and retrieve its handle.
    ///
    /// The existence of the bodies is not checked: a joint attached to a missing body is
    /// skipped by the solver. Use [`Self::try_insert`] to validate the joint beforehand.
    pub fn insert(
        &mut self,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        data: impl Into<PrismaticJoint<N>>,
    ) -> ImpulseJointHandle {
        let joint = ImpulseJoint::new(body1, body2, data.into());
        let handle = ImpulseJointHandle(self.joints.insert(joint));
        self.joints[handle.0].handle = handle;
        handle
    }

    /// Inserts a new joint into this set, after checking that both bodies exist and differ
    /// and that the joint parameters are consistent.
    pub fn try_insert(
        &mut self,
        bodies: &RigidBodySet<N>,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        data: PrismaticJoint<N>,
    ) -> Result<ImpulseJointHandle, JointError> {
        if body1 == body2 {
            return Err(JointError::SameBody(body1));
        }

        for body in [body1, body2] {
            if !bodies.contains(body) {
                return Err(JointError::UnknownBody(body));
            }
        }

        data.validate()?;
        Ok(self.insert(body1, body2, data))
    }

    /// Removes a joint from this set.
    ///
    /// If `wake_up` is set to `true`, then the bodies attached to this joint will be
    /// automatically woken up.
    pub fn remove(
        &mut self,
        handle: ImpulseJointHandle,
        bodies: &mut RigidBodySet<N>,
        wake_up: bool,
    ) -> Option<ImpulseJoint<N>> {
        let joint = self.joints.remove(handle.0)?;

        if wake_up {
            bodies.wake_up(joint.body1);
            bodies.wake_up(joint.body2);
        }

        Some(joint)
    }

    /// Removes all the joints attached to the given rigid-body, returning their handles.
    pub(crate) fn remove_joints_attached_to_rigid_body(
        &mut self,
        body: RigidBodyHandle,
    ) -> Vec<ImpulseJointHandle> {
        let mut removed = vec![];
        self.joints.retain(|h, j| {
            let attached = j.body1 == body || j.body2 == body;
            if attached {
                removed.push(ImpulseJointHandle(h));
            }
            !attached
        });
        removed
    }
}

impl<N: ScalarType> IndexOp<ImpulseJointHandle> for ImpulseJointSet<N> {
    type Output = ImpulseJoint<N>;

    fn index(&self, index: ImpulseJointHandle) -> &ImpulseJoint<N> {
        &self.joints[index.0]
    }
}

impl<N: ScalarType> IndexMut<ImpulseJointHandle> for ImpulseJointSet<N> {
    fn index_mut(&mut self, handle: ImpulseJointHandle) -> &mut ImpulseJoint<N> {
        &mut self.joints[handle.0]
    }
}
