pub(crate) use self::prismatic_position_constraint::PrismaticPositionConstraint;
pub use self::prismatic_velocity_constraint::PrismaticVelocityConstraint;

mod prismatic_position_constraint;
mod prismatic_velocity_constraint;
