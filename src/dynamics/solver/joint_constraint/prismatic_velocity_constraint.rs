use crate::dynamics::solver::{SolverData, SolverVelocity};
use crate::dynamics::{PrismaticJoint, RigidBody};
use crate::math::{BlockImpulse, Rotation, SdpMatrix2, Vector};
use crate::utils::{CrossProduct, ScalarType};

/// The velocity-level state of a prismatic joint.
///
/// The Jacobian terms are refreshed by [`Self::init`] at the beginning of every step, while
/// the accumulated impulses persist across steps for warm-starting.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PrismaticVelocityConstraint<N: ScalarType> {
    pub(crate) index1: usize,
    pub(crate) index2: usize,
    pub(crate) local_center1: Vector<N>,
    pub(crate) local_center2: Vector<N>,
    pub(crate) im1: N,
    pub(crate) im2: N,
    pub(crate) ii1: N,
    pub(crate) ii2: N,

    pub(crate) axis: Vector<N>,
    pub(crate) perp: Vector<N>,
    pub(crate) s1: N,
    pub(crate) s2: N,
    pub(crate) a1: N,
    pub(crate) a2: N,
    pub(crate) k: SdpMatrix2<N>,
    pub(crate) axial_mass: N,
    pub(crate) translation: N,

    pub(crate) impulse: BlockImpulse<N>,
    pub(crate) motor_impulse: N,
    pub(crate) lower_impulse: N,
    pub(crate) upper_impulse: N,
}

impl<N: ScalarType> Default for PrismaticVelocityConstraint<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: ScalarType> PrismaticVelocityConstraint<N> {
    /// A constraint with no accumulated impulse.
    pub fn new() -> Self {
        Self {
            index1: usize::MAX,
            index2: usize::MAX,
            local_center1: Vector::zeros(),
            local_center2: Vector::zeros(),
            im1: N::zero(),
            im2: N::zero(),
            ii1: N::zero(),
            ii2: N::zero(),
            axis: Vector::x(),
            perp: Vector::y(),
            s1: N::zero(),
            s2: N::zero(),
            a1: N::zero(),
            a2: N::zero(),
            k: SdpMatrix2::zero(),
            axial_mass: N::zero(),
            translation: N::zero(),
            impulse: BlockImpulse::zeros(),
            motor_impulse: N::zero(),
            lower_impulse: N::zero(),
            upper_impulse: N::zero(),
        }
    }

    /// The impulse accumulated by the two locked degrees of freedom.
    ///
    /// The first component is the linear impulse along the direction perpendicular to the
    /// axis, the second one the angular impulse.
    pub fn impulse(&self) -> BlockImpulse<N> {
        self.impulse
    }

    /// The impulse accumulated by the motor.
    pub fn motor_impulse(&self) -> N {
        self.motor_impulse
    }

    /// The impulse accumulated by the lower limit.
    pub fn lower_impulse(&self) -> N {
        self.lower_impulse
    }

    /// The impulse accumulated by the upper limit.
    pub fn upper_impulse(&self) -> N {
        self.upper_impulse
    }

    /// The signed impulse applied along the axis by the motor and both limits.
    #[inline]
    pub(crate) fn axial_impulse(&self) -> N {
        self.motor_impulse + self.lower_impulse - self.upper_impulse
    }

    pub(crate) fn reset_limit_impulses(&mut self) {
        self.lower_impulse = N::zero();
        self.upper_impulse = N::zero();
    }

    pub(crate) fn reset_motor_impulse(&mut self) {
        self.motor_impulse = N::zero();
    }

    /// Computes the Jacobians and effective masses for the current step, then applies the
    /// warm-starting impulses.
    pub fn init(
        &mut self,
        joint: &PrismaticJoint<N>,
        rb1: &RigidBody<N>,
        rb2: &RigidBody<N>,
        data: &mut SolverData<N>,
    ) {
        self.index1 = rb1.island_index;
        self.index2 = rb2.island_index;
        self.local_center1 = rb1.local_center;
        self.local_center2 = rb2.local_center;
        self.im1 = rb1.inv_mass;
        self.im2 = rb2.inv_mass;
        self.ii1 = rb1.inv_inertia;
        self.ii2 = rb2.inv_inertia;

        let pos1 = data.positions[self.index1];
        let pos2 = data.positions[self.index2];
        let mut vel1 = data.velocities[self.index1];
        let mut vel2 = data.velocities[self.index2];

        let rot1 = Rotation::new(pos1.angle);
        let rot2 = Rotation::new(pos2.angle);

        let (im1, im2, ii1, ii2) = (self.im1, self.im2, self.ii1, self.ii2);

        let r1 = rot1.transform_vector(&(joint.local_anchor1 - self.local_center1));
        let r2 = rot2.transform_vector(&(joint.local_anchor2 - self.local_center2));
        let d = (pos2.center - pos1.center) + r2 - r1;
        let arm1 = d + r1;

        // Motor and limits, along the sliding axis.
        self.axis = rot1.transform_vector(&joint.local_axis1);
        self.a1 = arm1.gcross(self.axis);
        self.a2 = r2.gcross(self.axis);

        self.axial_mass = im1 + im2 + ii1 * self.a1 * self.a1 + ii2 * self.a2 * self.a2;
        if self.axial_mass > N::zero() {
            self.axial_mass = N::one() / self.axial_mass;
        }

        // Locked translation along the perpendicular and locked rotation.
        self.perp = rot1.transform_vector(&joint.local_perp1());
        self.s1 = arm1.gcross(self.perp);
        self.s2 = r2.gcross(self.perp);

        let k11 = im1 + im2 + ii1 * self.s1 * self.s1 + ii2 * self.s2 * self.s2;
        let k12 = ii1 * self.s1 + ii2 * self.s2;
        let mut k22 = ii1 + ii2;
        if k22 == N::zero() {
            // For bodies with fixed rotation.
            k22 = N::one();
        }
        self.k = SdpMatrix2::new(k11, k12, k22);

        if joint.limits_enabled {
            self.translation = self.axis.dot(&d);
        } else {
            self.reset_limit_impulses();
        }

        if !joint.motor_enabled {
            self.reset_motor_impulse();
        }

        if data.step.warmstart {
            let dt_ratio = data.step.dt_ratio;
            self.impulse *= dt_ratio;
            self.motor_impulse *= dt_ratio;
            self.lower_impulse *= dt_ratio;
            self.upper_impulse *= dt_ratio;

            let axial = self.axial_impulse();
            let p = self.perp * self.impulse.x + self.axis * axial;
            let l1 = self.impulse.x * self.s1 + self.impulse.y + axial * self.a1;
            let l2 = self.impulse.x * self.s2 + self.impulse.y + axial * self.a2;

            vel1.linear -= p * im1;
            vel1.angular -= ii1 * l1;
            vel2.linear += p * im2;
            vel2.angular += ii2 * l2;
        } else {
            self.impulse = BlockImpulse::zeros();
            self.motor_impulse = N::zero();
            self.lower_impulse = N::zero();
            self.upper_impulse = N::zero();
        }

        data.velocities[self.index1] = vel1;
        data.velocities[self.index2] = vel2;
    }

    /// Performs one sequential-impulse iteration: motor, lower limit, upper limit, and finally
    /// the two locked degrees of freedom.
    pub fn solve(&mut self, joint: &PrismaticJoint<N>, data: &mut SolverData<N>) {
        let mut vel1 = data.velocities[self.index1];
        let mut vel2 = data.velocities[self.index2];

        if joint.motor_enabled {
            let cdot = self.axial_velocity(&vel1, &vel2);
            let mut impulse = self.axial_mass * (joint.motor_speed - cdot);
            let old_impulse = self.motor_impulse;
            let max_impulse = data.step.dt * joint.max_motor_force;
            self.motor_impulse = (old_impulse + impulse).clamp(-max_impulse, max_impulse);
            impulse = self.motor_impulse - old_impulse;

            self.apply_axial_impulse(impulse, &mut vel1, &mut vel2);
        }

        if joint.limits_enabled {
            let inv_dt = data.step.inv_dt;

            // Lower limit.
            {
                let c = self.translation - joint.limits[0];
                let cdot = self.axial_velocity(&vel1, &vel2);
                let mut impulse = -self.axial_mass * (cdot + c.max(N::zero()) * inv_dt);
                let old_impulse = self.lower_impulse;
                self.lower_impulse = (old_impulse + impulse).max(N::zero());
                impulse = self.lower_impulse - old_impulse;

                self.apply_axial_impulse(impulse, &mut vel1, &mut vel2);
            }

            // Upper limit. Both the constraint and the impulse point the other way.
            {
                let c = joint.limits[1] - self.translation;
                let cdot = -self.axial_velocity(&vel1, &vel2);
                let mut impulse = -self.axial_mass * (cdot + c.max(N::zero()) * inv_dt);
                let old_impulse = self.upper_impulse;
                self.upper_impulse = (old_impulse + impulse).max(N::zero());
                impulse = self.upper_impulse - old_impulse;

                self.apply_axial_impulse(-impulse, &mut vel1, &mut vel2);
            }
        }

        // Locked degrees of freedom.
        {
            let cdot = BlockImpulse::new(
                self.perp.dot(&(vel2.linear - vel1.linear)) + self.s2 * vel2.angular
                    - self.s1 * vel1.angular,
                vel2.angular - vel1.angular,
            );

            let df = self.k.solve(&-cdot);
            self.impulse += df;

            let p = self.perp * df.x;
            let l1 = df.x * self.s1 + df.y;
            let l2 = df.x * self.s2 + df.y;

            vel1.linear -= p * self.im1;
            vel1.angular -= self.ii1 * l1;
            vel2.linear += p * self.im2;
            vel2.angular += self.ii2 * l2;
        }

        data.velocities[self.index1] = vel1;
        data.velocities[self.index2] = vel2;
    }

    #[inline]
    fn axial_velocity(&self, vel1: &SolverVelocity<N>, vel2: &SolverVelocity<N>) -> N {
        self.axis.dot(&(vel2.linear - vel1.linear)) + self.a2 * vel2.angular
            - self.a1 * vel1.angular
    }

    #[inline]
    fn apply_axial_impulse(
        &self,
        impulse: N,
        vel1: &mut SolverVelocity<N>,
        vel2: &mut SolverVelocity<N>,
    ) {
        let p = self.axis * impulse;
        let l1 = impulse * self.a1;
        let l2 = impulse * self.a2;

        vel1.linear -= p * self.im1;
        vel1.angular -= self.ii1 * l1;
        vel2.linear += p * self.im2;
        vel2.angular += self.ii2 * l2;
    }
}

#[cfg(test)]
mod test {
    use super::PrismaticVelocityConstraint;
    use crate::dynamics::solver::{SolverData, SolverPosition, SolverVelocity};
    use crate::dynamics::{
        IntegrationParameters, PrismaticJoint, PrismaticJointBuilder, RigidBody,
        RigidBodyBuilder, TimeStep,
    };
    use crate::math::Vector;
    use crate::utils::CrossProduct;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    struct Scene {
        rb1: RigidBody<f64>,
        rb2: RigidBody<f64>,
        joint: PrismaticJoint<f64>,
        positions: Vec<SolverPosition<f64>>,
        velocities: Vec<SolverVelocity<f64>>,
    }

    fn random_vector(rng: &mut Pcg32, extent: f64) -> Vector<f64> {
        Vector::new(
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
        )
    }

    fn random_body(rng: &mut Pcg32, island_index: usize) -> RigidBody<f64> {
        let mut rb = RigidBodyBuilder::dynamic()
            .translation(random_vector(rng, 2.0))
            .rotation(rng.gen_range(-3.0..3.0))
            .linvel(random_vector(rng, 3.0))
            .angvel(rng.gen_range(-3.0..3.0))
            .mass(rng.gen_range(0.5..4.0))
            .angular_inertia(rng.gen_range(0.2..2.0))
            .local_center_of_mass(random_vector(rng, 0.5))
            .build();
        rb.island_index = island_index;
        rb
    }

    fn random_scene(rng: &mut Pcg32) -> Scene {
        let rb1 = random_body(rng, 0);
        let rb2 = random_body(rng, 1);
        let lower = rng.gen_range(-1.0..0.0);
        let upper = rng.gen_range(0.0..1.0);
        let joint = PrismaticJointBuilder::new(random_vector(rng, 1.0) + Vector::x() * 2.0)
            .local_anchor1(random_vector(rng, 1.0))
            .local_anchor2(random_vector(rng, 1.0))
            .reference_angle(rng.gen_range(-1.0..1.0))
            .limits([lower, upper])
            .limits_enabled(true)
            .motor_enabled(true)
            .motor_speed(rng.gen_range(-2.0..2.0))
            .max_motor_force(rng.gen_range(0.0..50.0))
            .build();

        let positions = [&rb1, &rb2]
            .iter()
            .map(|rb| SolverPosition {
                center: rb.center,
                angle: rb.angle,
            })
            .collect();
        let velocities = [&rb1, &rb2]
            .iter()
            .map(|rb| SolverVelocity {
                linear: rb.linvel,
                angular: rb.angvel,
            })
            .collect();

        Scene {
            rb1,
            rb2,
            joint,
            positions,
            velocities,
        }
    }

    fn momentum(scene: &Scene) -> (Vector<f64>, f64) {
        let mut linear = Vector::zeros();
        let mut angular = 0.0;

        for (rb, (pos, vel)) in [&scene.rb1, &scene.rb2]
            .iter()
            .zip(scene.positions.iter().zip(scene.velocities.iter()))
        {
            let p = vel.linear / rb.inv_mass;
            linear += p;
            angular += vel.angular / rb.inv_inertia + pos.center.gcross(p);
        }

        (linear, angular)
    }

    fn step(warmstart: bool) -> TimeStep<f64> {
        let params = IntegrationParameters {
            warmstart,
            ..IntegrationParameters::default()
        };
        TimeStep::new(&params, params.inv_dt())
    }

    #[test]
    fn impulses_conserve_momentum() {
        let mut rng = Pcg32::seed_from_u64(42);

        for _ in 0..50 {
            let mut scene = random_scene(&mut rng);
            let mut constraint = PrismaticVelocityConstraint::new();
            constraint.impulse = random_vector(&mut rng, 1.0);
            constraint.motor_impulse = rng.gen_range(-0.1..0.1);
            constraint.lower_impulse = rng.gen_range(0.0..0.1);
            constraint.upper_impulse = rng.gen_range(0.0..0.1);

            let (linear0, angular0) = momentum(&scene);
            {
                let mut data = SolverData {
                    step: step(true),
                    positions: &mut scene.positions,
                    velocities: &mut scene.velocities,
                };
                constraint.init(&scene.joint, &scene.rb1, &scene.rb2, &mut data);
                for _ in 0..4 {
                    constraint.solve(&scene.joint, &mut data);
                }
            }
            let (linear1, angular1) = momentum(&scene);

            assert_relative_eq!(linear0, linear1, epsilon = 1.0e-9);
            assert_relative_eq!(angular0, angular1, epsilon = 1.0e-9);
        }
    }

    #[test]
    fn limit_and_motor_impulses_stay_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);

        for _ in 0..50 {
            let mut scene = random_scene(&mut rng);
            let mut constraint = PrismaticVelocityConstraint::new();
            let step = step(true);
            let max_impulse = step.dt * scene.joint.max_motor_force();

            let mut data = SolverData {
                step,
                positions: &mut scene.positions,
                velocities: &mut scene.velocities,
            };
            constraint.init(&scene.joint, &scene.rb1, &scene.rb2, &mut data);

            for _ in 0..8 {
                constraint.solve(&scene.joint, &mut data);
                assert!(constraint.lower_impulse() >= 0.0);
                assert!(constraint.upper_impulse() >= 0.0);
                assert!(constraint.motor_impulse().abs() <= max_impulse + 1.0e-12);
            }
        }
    }

    #[test]
    fn locked_degrees_of_freedom_are_satisfied() {
        let mut rng = Pcg32::seed_from_u64(1234);
        let mut scene = random_scene(&mut rng);
        scene.joint = PrismaticJointBuilder::new(Vector::x())
            .local_anchor1(scene.joint.local_anchor1())
            .local_anchor2(scene.joint.local_anchor2())
            .build();

        let mut constraint = PrismaticVelocityConstraint::new();
        let mut data = SolverData {
            step: step(false),
            positions: &mut scene.positions,
            velocities: &mut scene.velocities,
        };
        constraint.init(&scene.joint, &scene.rb1, &scene.rb2, &mut data);
        constraint.solve(&scene.joint, &mut data);

        // Without motor or limits, a single block solve zeroes the constrained velocities.
        let (v1, v2) = (data.velocities[0], data.velocities[1]);
        let perp_vel = constraint.perp.dot(&(v2.linear - v1.linear)) + constraint.s2 * v2.angular
            - constraint.s1 * v1.angular;
        assert_relative_eq!(perp_vel, 0.0, epsilon = 1.0e-9);
        assert_relative_eq!(v2.angular - v1.angular, 0.0, epsilon = 1.0e-9);
    }

    #[test]
    fn disabled_features_reset_their_impulses() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut scene = random_scene(&mut rng);
        scene.joint.limits_enabled = false;
        scene.joint.motor_enabled = false;

        let mut constraint = PrismaticVelocityConstraint::new();
        constraint.impulse = Vector::new(0.3, -0.2);
        constraint.motor_impulse = 1.0;
        constraint.lower_impulse = 2.0;
        constraint.upper_impulse = 3.0;

        let mut data = SolverData {
            step: step(true),
            positions: &mut scene.positions,
            velocities: &mut scene.velocities,
        };
        constraint.init(&scene.joint, &scene.rb1, &scene.rb2, &mut data);
        assert_eq!(constraint.motor_impulse(), 0.0);
        assert_eq!(constraint.lower_impulse(), 0.0);
        assert_eq!(constraint.upper_impulse(), 0.0);
        assert_relative_eq!(constraint.impulse(), Vector::new(0.3, -0.2));

        // Without warmstart, everything is reset.
        data.step.warmstart = false;
        constraint.init(&scene.joint, &scene.rb1, &scene.rb2, &mut data);
        assert_eq!(constraint.impulse(), Vector::zeros());
    }

    #[test]
    fn warmstart_impulses_are_rescaled() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut scene = random_scene(&mut rng);

        let mut constraint = PrismaticVelocityConstraint::new();
        constraint.impulse = Vector::new(0.5, 0.25);
        constraint.motor_impulse = 0.125;
        constraint.lower_impulse = 1.0;

        let mut step = step(true);
        step.dt_ratio = 0.5;
        let mut data = SolverData {
            step,
            positions: &mut scene.positions,
            velocities: &mut scene.velocities,
        };
        constraint.init(&scene.joint, &scene.rb1, &scene.rb2, &mut data);
        assert_eq!(constraint.impulse(), Vector::new(0.25, 0.125));
        assert_eq!(constraint.motor_impulse(), 0.0625);
        assert_eq!(constraint.lower_impulse(), 0.5);
    }

    #[test]
    fn fixed_rotations_floor_the_angular_mass() {
        let mut rb1 = RigidBodyBuilder::<f64>::fixed().build();
        let mut rb2 = RigidBodyBuilder::dynamic()
            .translation(Vector::new(1.0, 0.0))
            .lock_rotations()
            .build();
        rb1.island_index = 0;
        rb2.island_index = 1;
        let joint = PrismaticJointBuilder::new(Vector::x()).build();

        let mut positions = vec![
            SolverPosition {
                center: rb1.center,
                angle: 0.0,
            },
            SolverPosition {
                center: rb2.center,
                angle: 0.0,
            },
        ];
        let mut velocities = vec![SolverVelocity::zero(); 2];
        let mut data = SolverData {
            step: step(true),
            positions: &mut positions,
            velocities: &mut velocities,
        };

        let mut constraint = PrismaticVelocityConstraint::new();
        constraint.init(&joint, &rb1, &rb2, &mut data);
        assert_eq!(constraint.k.m22, 1.0);
        assert_eq!(constraint.axial_mass, 1.0);
    }
}
