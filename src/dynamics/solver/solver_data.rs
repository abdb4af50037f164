use crate::dynamics::solver::{SolverPosition, SolverVelocity};
use crate::dynamics::TimeStep;
use crate::utils::ScalarType;

/// Everything a constraint reads or writes while being solved.
///
/// Bodies are addressed by their island index.
pub struct SolverData<'a, N: ScalarType> {
    /// The time-stepping information of the current step.
    pub step: TimeStep<N>,
    /// Positions of the island’s bodies.
    pub positions: &'a mut [SolverPosition<N>],
    /// Velocities of the island’s bodies.
    pub velocities: &'a mut [SolverVelocity<N>],
}
