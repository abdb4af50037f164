//! Physics pipeline structures.

use crate::counters::Counters;
use crate::dynamics::{ImpulseJointSet, IntegrationParameters, IslandSolver, RigidBodySet, TimeStep};
use crate::math::Vector;
use crate::utils::ScalarType;

/// The physics pipeline, responsible for stepping the whole physics simulation.
///
/// This structure only contains temporary data buffers, and the length of the previous
/// timestep. It can be dropped and replaced by a fresh copy at any time, at the cost of
/// losing the rescaling of the warm-starting impulses at the next step.
pub struct PhysicsPipeline<N: ScalarType> {
    /// Counters used for benchmarking only.
    pub counters: Counters,
    solver: IslandSolver<N>,
    prev_inv_dt: N,
}

impl<N: ScalarType> Default for PhysicsPipeline<N> {
    fn default() -> Self {
        PhysicsPipeline::new()
    }
}

impl<N: ScalarType> PhysicsPipeline<N> {
    /// Initializes a new physics pipeline.
    pub fn new() -> PhysicsPipeline<N> {
        PhysicsPipeline {
            counters: Counters::new(true),
            solver: IslandSolver::new(),
            prev_inv_dt: N::zero(),
        }
    }

    /// Executes one timestep of the physics simulation.
    ///
    /// A zero-length timestep leaves the simulation untouched.
    pub fn step(
        &mut self,
        gravity: &Vector<N>,
        integration_parameters: &IntegrationParameters<N>,
        bodies: &mut RigidBodySet<N>,
        impulse_joints: &mut ImpulseJointSet<N>,
    ) {
        if integration_parameters.dt <= N::zero() {
            return;
        }

        self.counters.reset();
        self.counters.step_started();

        let step = TimeStep::new(integration_parameters, self.prev_inv_dt);
        self.solver.init_and_solve(
            &mut self.counters,
            gravity,
            integration_parameters,
            step,
            bodies,
            impulse_joints,
        );
        self.prev_inv_dt = step.inv_dt;

        self.counters.step_completed();
    }
}

#[cfg(test)]
mod test {
    use super::PhysicsPipeline;
    use crate::dynamics::{
        ImpulseJointHandle, ImpulseJointSet, IntegrationParameters, PrismaticJointBuilder,
        RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
    };
    use crate::math::Vector;
    use crate::utils::{Fix64, ScalarType};
    use approx::assert_relative_eq;

    struct World<N: ScalarType> {
        pipeline: PhysicsPipeline<N>,
        params: IntegrationParameters<N>,
        gravity: Vector<N>,
        bodies: RigidBodySet<N>,
        joints: ImpulseJointSet<N>,
    }

    impl<N: ScalarType> World<N> {
        fn new(gravity: Vector<N>) -> Self {
            Self {
                pipeline: PhysicsPipeline::new(),
                params: IntegrationParameters::default(),
                gravity,
                bodies: RigidBodySet::new(),
                joints: ImpulseJointSet::new(),
            }
        }

        fn step(&mut self, nsteps: usize) {
            for _ in 0..nsteps {
                self.pipeline.step(
                    &self.gravity,
                    &self.params,
                    &mut self.bodies,
                    &mut self.joints,
                );
            }
        }
    }

    /// A fixed ground, and a dynamic body one unit to its right, sliding along the x axis.
    fn slider(
        world: &mut World<f64>,
        joint: PrismaticJointBuilder<f64>,
    ) -> (RigidBodyHandle, ImpulseJointHandle) {
        let ground = world.bodies.insert(RigidBodyBuilder::fixed());
        let body = world
            .bodies
            .insert(RigidBodyBuilder::dynamic().translation(Vector::new(1.0, 0.0)));
        let joint = world.joints.insert(ground, body, joint);
        (body, joint)
    }

    #[test]
    fn sliding_body_keeps_its_axial_velocity() {
        let mut world = World::new(Vector::zeros());
        let (body, joint) = slider(&mut world, PrismaticJointBuilder::new(Vector::x()));
        world.bodies[body].set_linvel(Vector::new(2.0, 3.0));
        world.bodies[body].set_angvel(1.0);

        world.step(1);

        let rb = &world.bodies[body];
        assert_relative_eq!(*rb.linvel(), Vector::new(2.0, 0.0), epsilon = 1.0e-9);
        assert_relative_eq!(rb.angvel(), 0.0, epsilon = 1.0e-9);

        let joint = &world.joints[joint];
        assert_relative_eq!(
            joint.translation(&world.bodies).unwrap(),
            1.0 + 2.0 / 60.0,
            epsilon = 1.0e-9
        );
        assert_relative_eq!(joint.speed(&world.bodies).unwrap(), 2.0, epsilon = 1.0e-9);
        assert!(world.pipeline.counters.solver.positions_converged);
        assert_eq!(world.pipeline.counters.solver.nconstraints, 1);
        assert_eq!(world.pipeline.counters.solver.position_iterations, 1);
    }

    #[test]
    fn upper_limit_stops_the_body() {
        let mut world = World::new(Vector::zeros());
        let (body, joint) = slider(
            &mut world,
            PrismaticJointBuilder::new(Vector::x())
                .limits([0.0, 1.5])
                .limits_enabled(true),
        );
        world.bodies[body].set_linvel(Vector::new(5.0, 0.0));

        world.step(60);

        let joint = &world.joints[joint];
        let translation = joint.translation(&world.bodies).unwrap();
        assert!(translation <= 1.5 + world.params.linear_slop);
        assert!(translation >= 1.5 - world.params.linear_slop);
        assert_relative_eq!(joint.speed(&world.bodies).unwrap(), 0.0, epsilon = 1.0e-6);
        assert!(joint.velocity_constraint().upper_impulse() >= 0.0);
        assert_eq!(joint.velocity_constraint().lower_impulse(), 0.0);
    }

    #[test]
    fn lower_limit_holds_against_gravity() {
        let mut world = World::new(Vector::new(0.0, -10.0));
        let (_, joint) = slider(
            &mut world,
            PrismaticJointBuilder::new(Vector::y())
                .local_anchor1(Vector::new(1.0, 0.0))
                .limits([-0.5, 0.5])
                .limits_enabled(true),
        );

        world.step(120);

        let joint = &world.joints[joint];
        let translation = joint.translation(&world.bodies).unwrap();
        assert!(translation >= -0.5 - world.params.linear_slop);
        // The limit carries the weight of the body.
        assert_relative_eq!(
            joint.reaction_force(world.params.inv_dt()),
            Vector::new(0.0, 10.0),
            epsilon = 1.0e-6
        );
    }

    #[test]
    fn motor_reaches_its_target_speed() {
        let mut world = World::new(Vector::zeros());
        let (_, joint) = slider(
            &mut world,
            PrismaticJointBuilder::new(Vector::x())
                .motor_enabled(true)
                .motor_speed(1.0)
                .max_motor_force(1000.0),
        );

        world.step(3);
        let joint = &world.joints[joint];
        assert_relative_eq!(joint.speed(&world.bodies).unwrap(), 1.0, epsilon = 1.0e-9);
    }

    #[test]
    fn motor_force_is_clamped() {
        let mut world = World::new(Vector::zeros());
        let (_, joint) = slider(
            &mut world,
            PrismaticJointBuilder::new(Vector::x())
                .motor_enabled(true)
                .motor_speed(10.0)
                .max_motor_force(0.6),
        );

        world.step(10);
        let joint = &world.joints[joint];
        // A unit mass accelerated by 0.6 during 10 / 60 seconds.
        assert_relative_eq!(joint.speed(&world.bodies).unwrap(), 0.1, epsilon = 1.0e-9);
        assert_relative_eq!(joint.motor_force(world.params.inv_dt()), 0.6, epsilon = 1.0e-9);
    }

    fn hanging_chain_residual(warmstart: bool) -> f64 {
        let mut world = World::new(Vector::new(0.0, -10.0));
        world.params.warmstart = warmstart;
        world.params.num_velocity_iterations = 1;

        let mut prev = world.bodies.insert(RigidBodyBuilder::fixed());
        let mut chain = vec![];
        for i in 1..=5 {
            let body = world.bodies.insert(
                RigidBodyBuilder::dynamic().translation(Vector::new(i as f64, 0.0)),
            );
            let joint = PrismaticJointBuilder::new(Vector::x())
                .local_anchor1(Vector::new(0.5, 0.0))
                .local_anchor2(Vector::new(-0.5, 0.0));
            let _ = world.joints.insert(prev, body, joint);
            chain.push(body);
            prev = body;
        }

        world.step(30);
        chain
            .iter()
            .map(|h| world.bodies[*h].linvel().y.abs())
            .sum()
    }

    #[test]
    fn warmstarting_reduces_the_residual() {
        let warm = hanging_chain_residual(true);
        let cold = hanging_chain_residual(false);
        assert!(warm < cold, "warm: {}, cold: {}", warm, cold);
    }

    #[test]
    fn sleeping_bodies_are_woken_up_through_joints() {
        let mut world = World::new(Vector::new(0.0, -10.0));
        let awake = world.bodies.insert(RigidBodyBuilder::dynamic());
        let asleep = world.bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(1.0, 0.0))
                .sleeping(true),
        );
        let isolated = world.bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(5.0, 0.0))
                .sleeping(true),
        );
        let _ = world
            .joints
            .insert(awake, asleep, PrismaticJointBuilder::new(Vector::x()));

        world.step(1);
        assert!(!world.bodies[asleep].is_sleeping());
        assert!(world.bodies[asleep].linvel().y < 0.0);
        assert!(world.bodies[isolated].is_sleeping());
        assert_eq!(world.bodies[isolated].translation(), Vector::new(5.0, 0.0));
    }

    #[test]
    fn zero_length_step_is_a_no_op() {
        let mut world = World::new(Vector::new(0.0, -10.0));
        let (body, _) = slider(&mut world, PrismaticJointBuilder::new(Vector::y()));
        world.params.dt = 0.0;
        world.step(5);
        assert_eq!(world.bodies[body].translation(), Vector::new(1.0, 0.0));
        assert_eq!(*world.bodies[body].linvel(), Vector::zeros());
    }

    #[test]
    fn removed_bodies_remove_their_joints() {
        let mut world = World::new(Vector::new(0.0, -10.0));
        let (body, joint) = slider(&mut world, PrismaticJointBuilder::new(Vector::y()));
        let _ = world.bodies.remove(body, &mut world.joints);
        assert!(!world.joints.contains(joint));
        world.step(1);
        assert_eq!(world.pipeline.counters.solver.nconstraints, 0);
    }

    fn fixed_point_run() -> Vec<(Fix64, Fix64, Fix64)> {
        let gravity = Vector::new(Fix64::from_int(0), Fix64::from_int(-10));
        let mut world = World::new(gravity);

        let ground = world.bodies.insert(RigidBodyBuilder::fixed());
        let body = world.bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(Fix64::from_ratio(1, 2), Fix64::from_ratio(1, 4)))
                .angvel(Fix64::from_ratio(1, 2)),
        );
        let joint = PrismaticJointBuilder::new(Vector::new(Fix64::from_int(1), Fix64::from_int(1)))
            .local_anchor2(Vector::new(Fix64::from_ratio(-1, 4), Fix64::from_int(0)))
            .limits([Fix64::from_int(-1), Fix64::from_int(1)])
            .limits_enabled(true)
            .motor_enabled(true)
            .motor_speed(Fix64::from_int(2))
            .max_motor_force(Fix64::from_int(5));
        let _ = world.joints.insert(ground, body, joint);

        let mut trajectory = vec![];
        for _ in 0..60 {
            world.step(1);
            let rb = &world.bodies[body];
            trajectory.push((rb.center_of_mass().x, rb.center_of_mass().y, rb.angle()));
        }
        trajectory
    }

    #[test]
    fn fixed_point_simulation_is_reproducible() {
        let run1 = fixed_point_run();
        let run2 = fixed_point_run();
        assert_eq!(run1, run2);

        // And it stays close to what floating points compute.
        let mut world = World::new(Vector::new(0.0, -10.0));
        let ground = world.bodies.insert(RigidBodyBuilder::fixed());
        let body = world.bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(0.5, 0.25))
                .angvel(0.5),
        );
        let joint = PrismaticJointBuilder::new(Vector::new(1.0, 1.0))
            .local_anchor2(Vector::new(-0.25, 0.0))
            .limits([-1.0, 1.0])
            .limits_enabled(true)
            .motor_enabled(true)
            .motor_speed(2.0)
            .max_motor_force(5.0);
        let _ = world.joints.insert(ground, body, joint);

        for (x, y, angle) in run1 {
            world.step(1);
            let rb = &world.bodies[body];
            assert_relative_eq!(x.to_f64(), rb.center_of_mass().x, epsilon = 1.0e-4);
            assert_relative_eq!(y.to_f64(), rb.center_of_mass().y, epsilon = 1.0e-4);
            assert_relative_eq!(angle.to_f64(), rb.angle(), epsilon = 1.0e-4);
        }
    }
}
