use crate::counters::Timer;
use std::fmt::{Display, Formatter, Result};

/// Performance counters related to constraints resolution.
#[derive(Clone, Copy, Debug)]
pub struct SolverCounters {
    /// Number of joint constraints solved during the last step.
    pub nconstraints: usize,
    /// Number of position iterations actually run during the last step.
    pub position_iterations: usize,
    /// Whether every joint reached the allowed slop during the last step.
    pub positions_converged: bool,
    /// Time spent for the assembly of all the velocity constraints.
    pub velocity_assembly_time: Timer,
    /// Time spent for the resolution of the velocity constraints.
    pub velocity_resolution_time: Timer,
    /// Time spent for the resolution of the position constraints.
    pub position_resolution_time: Timer,
}

impl SolverCounters {
    /// Creates a new counter initialized to zero.
    pub fn new() -> Self {
        SolverCounters {
            nconstraints: 0,
            position_iterations: 0,
            positions_converged: true,
            velocity_assembly_time: Timer::new(),
            velocity_resolution_time: Timer::new(),
            position_resolution_time: Timer::new(),
        }
    }

    /// Reset all the counters to zero.
    pub fn reset(&mut self) {
        self.nconstraints = 0;
        self.position_iterations = 0;
        self.positions_converged = true;
        self.velocity_assembly_time.reset();
        self.velocity_resolution_time.reset();
        self.position_resolution_time.reset();
    }
}

impl Default for SolverCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SolverCounters {
    fn fmt(&self, f: &mut Formatter) -> Result {
        writeln!(f, "Number of constraints: {}", self.nconstraints)?;
        writeln!(f, "Position iterations: {}", self.position_iterations)?;
        writeln!(f, "Positions converged: {}", self.positions_converged)?;
        writeln!(f, "Velocity assembly time: {}", self.velocity_assembly_time)?;
        writeln!(
            f,
            "Velocity resolution time: {}",
            self.velocity_resolution_time
        )?;
        writeln!(
            f,
            "Position resolution time: {}",
            self.position_resolution_time
        )
    }
}
