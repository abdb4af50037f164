pub(crate) use self::island_solver::IslandSolver;
pub(crate) use self::joint_constraint::PrismaticPositionConstraint;
pub use self::joint_constraint::PrismaticVelocityConstraint;
pub use self::solver_body::{SolverPosition, SolverVelocity};
pub use self::solver_data::SolverData;

mod island_solver;
mod joint_constraint;
mod solver_body;
mod solver_data;
