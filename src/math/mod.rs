//! Elementary mathematical entities (vectors, rotations, block matrices).

pub use self::rotation::Rotation;
pub use self::sdp_matrix::{SdpMatrix2, SdpMatrix3};
pub use crate::utils::{Fix64, ScalarType};

mod rotation;
mod sdp_matrix;

/// The vector type.
pub type Vector<N> = na::Vector2<N>;

/// The type of the impulse accumulated by a two-row block constraint.
pub type BlockImpulse<N> = na::Vector2<N>;

