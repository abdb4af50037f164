//! Errors reported when a joint cannot be created.

use crate::dynamics::RigidBodyHandle;

/// Possible errors returned by the fallible joint constructors.
#[derive(thiserror::Error, Debug, PartialEq, Clone)]
pub enum JointError {
    /// The lower translation limit is greater than the upper one.
    #[error("invalid joint limits: the lower limit {lower} is greater than the upper limit {upper}")]
    InvalidLimits {
        /// The lower limit, converted to `f64`.
        lower: f64,
        /// The upper limit, converted to `f64`.
        upper: f64,
    },
    /// The sliding axis has a zero length.
    #[error("the joint axis must not have a zero length")]
    ZeroAxis,
    /// The rigid-body does not exist, or was removed.
    #[error("the rigid-body {:?} does not exist", .0.into_raw_parts())]
    UnknownBody(RigidBodyHandle),
    /// Both ends of the joint are attached to the same rigid-body.
    #[error("a joint cannot attach the rigid-body {:?} to itself", .0.into_raw_parts())]
    SameBody(RigidBodyHandle),
}
