pub use self::impulse_joint::ImpulseJoint;
pub use self::impulse_joint_set::{ImpulseJointHandle, ImpulseJointSet};

mod impulse_joint;
mod impulse_joint_set;
