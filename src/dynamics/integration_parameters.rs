use crate::utils::ScalarType;

/// Parameters for a time-step of the physics engine.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct IntegrationParameters<N> {
    /// The timestep length (default: `1.0 / 60.0`).
    pub dt: N,

    /// Whether the impulses accumulated during the previous step are used as the initial
    /// solution of the current step (default: `true`).
    pub warmstart: bool,

    /// Number of velocity iterations performed by the constraints solver (default: `8`).
    pub num_velocity_iterations: usize,

    /// Maximum number of position iterations performed by the constraints solver (default: `3`).
    ///
    /// The position iterations stop early as soon as every joint reports that its error is
    /// within the allowed slop.
    pub num_position_iterations: usize,

    /// Linear error tolerated before the position solver considers a joint unsatisfied
    /// (default: `0.005`).
    pub linear_slop: N,

    /// Angular error tolerated before the position solver considers a joint unsatisfied
    /// (default: `2` degrees).
    pub angular_slop: N,

    /// Maximum distance a body can travel during a single step (default: `2.0`).
    pub max_translation: N,

    /// Maximum angle a body can rotate during a single step (default: `π / 2`).
    pub max_rotation: N,
}

impl<N: ScalarType> IntegrationParameters<N> {
    /// Creates a set of integration parameters with their default values.
    pub fn new() -> Self {
        Self {
            dt: N::from_ratio(1, 60),
            warmstart: true,
            num_velocity_iterations: 8,
            num_position_iterations: 3,
            linear_slop: N::from_ratio(5, 1000),
            angular_slop: N::pi() * N::from_ratio(2, 180),
            max_translation: N::two(),
            max_rotation: N::pi() * N::half(),
        }
    }

    /// The inverse of the time-stepping length, i.e. the steps per seconds (Hz).
    ///
    /// This is zero if `self.dt` is zero.
    #[inline(always)]
    pub fn inv_dt(&self) -> N {
        if self.dt == N::zero() {
            N::zero()
        } else {
            N::one() / self.dt
        }
    }

    /// Sets the time-stepping length.
    #[inline]
    pub fn set_dt(&mut self, dt: N) {
        assert!(dt >= N::zero(), "The time-stepping length cannot be negative.");
        self.dt = dt;
    }

    /// Sets the inverse time-stepping length (i.e. the frequency).
    ///
    /// This automatically recompute `self.dt`.
    #[inline]
    pub fn set_inv_dt(&mut self, inv_dt: N) {
        if inv_dt == N::zero() {
            self.dt = N::zero()
        } else {
            self.dt = N::one() / inv_dt
        }
    }
}

impl<N: ScalarType> Default for IntegrationParameters<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// The time-stepping information seen by the constraints during a single step.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TimeStep<N> {
    /// The length of the current step.
    pub dt: N,
    /// The inverse of `dt`, or zero if `dt` is zero.
    pub inv_dt: N,
    /// `dt` of the current step divided by `dt` of the previous step.
    ///
    /// Warm-starting impulses are rescaled by this ratio so that they stay consistent with a
    /// step length change.
    pub dt_ratio: N,
    /// Whether the accumulated impulses should be reused.
    pub warmstart: bool,
    /// Linear error tolerated by the position solver.
    pub linear_slop: N,
    /// Angular error tolerated by the position solver.
    pub angular_slop: N,
}

impl<N: ScalarType> TimeStep<N> {
    /// Builds the time step for the given parameters, given the inverse length of the
    /// previous step (zero if there was none).
    pub fn new(params: &IntegrationParameters<N>, prev_inv_dt: N) -> Self {
        Self {
            dt: params.dt,
            inv_dt: params.inv_dt(),
            dt_ratio: prev_inv_dt * params.dt,
            warmstart: params.warmstart,
            linear_slop: params.linear_slop,
            angular_slop: params.angular_slop,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{IntegrationParameters, TimeStep};
    use crate::utils::{Fix64, ScalarType};
    use approx::assert_relative_eq;

    #[test]
    fn default_values() {
        let params = IntegrationParameters::<f64>::default();
        assert_relative_eq!(params.dt, 1.0 / 60.0);
        assert_relative_eq!(params.inv_dt(), 60.0, epsilon = 1.0e-9);
        assert_relative_eq!(params.linear_slop, 0.005);
        assert_relative_eq!(params.angular_slop, 2.0f64.to_radians(), epsilon = 1.0e-12);
        assert_relative_eq!(params.max_rotation, std::f64::consts::FRAC_PI_2);
        assert_eq!(params.num_velocity_iterations, 8);
        assert_eq!(params.num_position_iterations, 3);
        assert!(params.warmstart);
    }

    #[test]
    fn fixed_point_defaults_are_close_to_floats() {
        let params = IntegrationParameters::<Fix64>::default();
        assert_relative_eq!(params.dt.to_f64(), 1.0 / 60.0, epsilon = 1.0e-9);
        assert_relative_eq!(params.linear_slop.to_f64(), 0.005, epsilon = 1.0e-9);
    }

    #[test]
    fn inv_dt_of_zero_step() {
        let mut params = IntegrationParameters::<f32>::default();
        params.set_inv_dt(0.0);
        assert_eq!(params.dt, 0.0);
        assert_eq!(params.inv_dt(), 0.0);
        params.set_inv_dt(30.0);
        assert_relative_eq!(params.dt, 1.0 / 30.0);
    }

    #[test]
    fn dt_ratio() {
        let mut params = IntegrationParameters::<f64>::default();
        let first = TimeStep::new(&params, 0.0);
        assert_eq!(first.dt_ratio, 0.0);

        params.dt = 1.0 / 30.0;
        let second = TimeStep::new(&params, 60.0);
        assert_relative_eq!(second.dt_ratio, 2.0, epsilon = 1.0e-12);
    }
}
