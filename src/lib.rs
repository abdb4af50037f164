//! # glide2d
//!
//! glide2d is a 2-dimensional sequential-impulse solver for prismatic (slider) joints. A
//! prismatic joint removes all the relative motion between two rigid-bodies except a
//! translation along one axis, optionally bounded by lower and upper limits and driven by a
//! force-limited motor.
//!
//! The whole engine is generic over its scalar type: it runs on `f32`, `f64`, or on the
//! fixed-point [`Fix64`](crate::math::Fix64) when the simulation must be reproduced bit-for-bit
//! on any platform.
//!
//! ```
//! use glide2d::prelude::*;
//!
//! let mut bodies = RigidBodySet::<f64>::new();
//! let mut joints = ImpulseJointSet::new();
//! let ground = bodies.insert(RigidBodyBuilder::fixed());
//! let slider = bodies.insert(RigidBodyBuilder::dynamic().translation(vector![0.0, 1.0]));
//! let joint = PrismaticJointBuilder::new(vector![0.0, 1.0])
//!     .local_anchor2(vector![0.0, -1.0])
//!     .limits([-0.5, 0.5])
//!     .limits_enabled(true);
//! let handle = joints.insert(ground, slider, joint);
//!
//! let mut pipeline = PhysicsPipeline::new();
//! let params = IntegrationParameters::default();
//! for _ in 0..120 {
//!     pipeline.step(&vector![0.0, -9.81], &params, &mut bodies, &mut joints);
//! }
//!
//! let translation = joints[handle].translation(&bodies).unwrap();
//! assert!(translation >= -0.5 - params.linear_slop);
//! ```

#![deny(bare_trait_objects)]
#![warn(missing_docs)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::module_inception)]

pub extern crate nalgebra as na;
#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
extern crate num_traits as num;

pub(crate) const INVALID_U32: u32 = u32::MAX;

/// The string version of glide2d.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod counters;
pub mod data;
pub mod dynamics;
pub mod math;
pub mod pipeline;
pub mod utils;

/// Prelude containing the common types defined by glide2d.
pub mod prelude {
    pub use crate::counters::Counters;
    pub use crate::dynamics::*;
    pub use crate::math::*;
    pub use crate::pipeline::*;
    pub use na::vector;
    pub extern crate nalgebra;
}
