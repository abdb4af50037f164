use crate::counters::Counters;
use crate::dynamics::solver::{SolverData, SolverPosition, SolverVelocity};
use crate::dynamics::{
    ImpulseJointHandle, ImpulseJointSet, IntegrationParameters, RigidBodyHandle, RigidBodySet,
    TimeStep,
};
use crate::math::{Rotation, Vector};
use crate::utils::ScalarType;

/// Solves all the awake bodies and the joints attached to them as a single island.
pub(crate) struct IslandSolver<N: ScalarType> {
    bodies: Vec<RigidBodyHandle>,
    joints: Vec<ImpulseJointHandle>,
    positions: Vec<SolverPosition<N>>,
    velocities: Vec<SolverVelocity<N>>,
}

impl<N: ScalarType> Default for IslandSolver<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: ScalarType> IslandSolver<N> {
    pub fn new() -> Self {
        Self {
            bodies: vec![],
            joints: vec![],
            positions: vec![],
            velocities: vec![],
        }
    }

    pub fn init_and_solve(
        &mut self,
        counters: &mut Counters,
        gravity: &Vector<N>,
        params: &IntegrationParameters<N>,
        step: TimeStep<N>,
        bodies: &mut RigidBodySet<N>,
        impulse_joints: &mut ImpulseJointSet<N>,
    ) {
        Self::wake_up_jointed_bodies(bodies, impulse_joints);
        self.collect_bodies(step.dt, gravity, bodies);
        self.collect_joints(bodies, impulse_joints);
        counters.set_nconstraints(self.joints.len());

        let mut data = SolverData {
            step,
            positions: &mut self.positions,
            velocities: &mut self.velocities,
        };

        counters.solver.velocity_assembly_time.resume();
        for handle in &self.joints {
            impulse_joints[*handle].init_velocity_constraints(bodies, &mut data);
        }
        counters.solver.velocity_assembly_time.pause();

        counters.solver.velocity_resolution_time.resume();
        for _ in 0..params.num_velocity_iterations {
            for handle in &self.joints {
                impulse_joints[*handle].solve_velocity_constraints(&mut data);
            }
        }
        counters.solver.velocity_resolution_time.pause();

        Self::integrate_positions(params, &mut data);

        counters.solver.position_resolution_time.resume();
        let mut converged = self.joints.is_empty();
        let mut iterations = 0;
        while !converged && iterations < params.num_position_iterations {
            iterations += 1;
            let mut joints_okay = true;
            for handle in &self.joints {
                let joint_okay = impulse_joints[*handle].solve_position_constraints(&mut data);
                joints_okay = joints_okay && joint_okay;
            }
            converged = joints_okay;
        }
        counters.solver.position_resolution_time.pause();
        counters.solver.position_iterations = iterations;
        counters.solver.positions_converged = converged;

        if !converged {
            log::debug!(
                "Joint positions did not converge after {} iterations.",
                iterations
            );
        }

        self.writeback(bodies);
    }

    /// Wakes up every sleeping body connected, through a chain of joints, to an awake dynamic
    /// body.
    fn wake_up_jointed_bodies(bodies: &mut RigidBodySet<N>, impulse_joints: &ImpulseJointSet<N>) {
        let is_awake = |bodies: &RigidBodySet<N>, handle| {
            bodies
                .get(handle)
                .map(|rb| rb.is_dynamic() && !rb.is_sleeping())
                .unwrap_or(false)
        };

        let mut changed = true;
        while changed {
            changed = false;
            for (_, joint) in impulse_joints.iter() {
                let awake1 = is_awake(bodies, joint.body1);
                let awake2 = is_awake(bodies, joint.body2);

                if awake1 != awake2 {
                    let sleeper = if awake1 { joint.body2 } else { joint.body1 };
                    if let Some(rb) = bodies.get_mut(sleeper) {
                        if rb.is_dynamic() {
                            rb.wake_up();
                            changed = true;
                        }
                    }
                }
            }
        }
    }

    /// Assigns island indices, and integrates the velocities of the awake bodies.
    fn collect_bodies(&mut self, dt: N, gravity: &Vector<N>, bodies: &mut RigidBodySet<N>) {
        self.bodies.clear();
        self.positions.clear();
        self.velocities.clear();

        for (handle, rb) in bodies.iter_mut() {
            if rb.is_dynamic() && rb.is_sleeping() {
                rb.island_index = usize::MAX;
                continue;
            }

            rb.island_index = self.bodies.len();
            self.bodies.push(handle);
            self.positions.push(SolverPosition {
                center: rb.center,
                angle: rb.angle,
            });

            if rb.is_dynamic() {
                let mut linear = rb.linvel + *gravity * (dt * rb.gravity_scale);
                let mut angular = rb.angvel;

                // Padé approximation of the exponential damping.
                linear *= N::one() / (N::one() + dt * rb.linear_damping);
                angular *= N::one() / (N::one() + dt * rb.angular_damping);

                self.velocities.push(SolverVelocity { linear, angular });
            } else {
                self.velocities.push(SolverVelocity::zero());
            }
        }
    }

    fn collect_joints(&mut self, bodies: &RigidBodySet<N>, impulse_joints: &ImpulseJointSet<N>) {
        self.joints.clear();

        for (handle, joint) in impulse_joints.iter() {
            match (bodies.get(joint.body1), bodies.get(joint.body2)) {
                (Some(rb1), Some(rb2)) => {
                    let in_island =
                        rb1.island_index != usize::MAX && rb2.island_index != usize::MAX;
                    if in_island && (rb1.is_dynamic() || rb2.is_dynamic()) {
                        self.joints.push(handle);
                    }
                }
                // Let the joint report the missing body.
                _ => self.joints.push(handle),
            }
        }
    }

    fn integrate_positions(params: &IntegrationParameters<N>, data: &mut SolverData<N>) {
        let dt = data.step.dt;
        let max_translation = params.max_translation;
        let max_rotation = params.max_rotation;

        for (pos, vel) in data.positions.iter_mut().zip(data.velocities.iter_mut()) {
            let translation = vel.linear * dt;
            let sq_translation = translation.dot(&translation);
            if sq_translation > max_translation * max_translation {
                vel.linear *= max_translation / sq_translation.sqrt();
            }

            let rotation = dt * vel.angular;
            if rotation * rotation > max_rotation * max_rotation {
                vel.angular *= max_rotation / rotation.abs();
            }

            pos.center += vel.linear * dt;
            pos.angle += dt * vel.angular;
        }
    }

    fn writeback(&self, bodies: &mut RigidBodySet<N>) {
        for ((handle, pos), vel) in self
            .bodies
            .iter()
            .zip(self.positions.iter())
            .zip(self.velocities.iter())
        {
            if let Some(rb) = bodies.get_mut(*handle) {
                if rb.is_dynamic() {
                    rb.center = pos.center;
                    rb.angle = pos.angle;
                    rb.rotation = Rotation::new(pos.angle);
                    rb.linvel = vel.linear;
                    rb.angvel = vel.angular;
                }
            }
        }
    }
}
