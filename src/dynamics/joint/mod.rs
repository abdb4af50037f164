pub use self::impulse_joint::{ImpulseJoint, ImpulseJointHandle, ImpulseJointSet};
pub use self::joint_error::JointError;
pub use self::prismatic_joint::{PrismaticJoint, PrismaticJointBuilder};

mod impulse_joint;
mod joint_error;
mod prismatic_joint;
