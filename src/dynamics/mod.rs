//! Structures related to dynamics: bodies, joints, etc.

pub use self::integration_parameters::{IntegrationParameters, TimeStep};
pub use self::joint::{
    ImpulseJoint, ImpulseJointHandle, ImpulseJointSet, JointError, PrismaticJoint,
    PrismaticJointBuilder,
};
pub use self::rigid_body::{RigidBody, RigidBodyBuilder, RigidBodyType};
pub use self::rigid_body_set::{RigidBodyHandle, RigidBodySet};
pub(crate) use self::solver::IslandSolver;
pub use self::solver::{PrismaticVelocityConstraint, SolverData, SolverPosition, SolverVelocity};

mod integration_parameters;
mod joint;
mod rigid_body;
mod rigid_body_set;
pub(crate) mod solver;
