use super::{modulate, DebugRenderBackend, DebugRenderObject, DebugRenderStyle};
use crate::dynamics::{ImpulseJointSet, RigidBodySet};
use crate::math::Vector;
use crate::utils::ScalarType;

bitflags::bitflags! {
    /// Flags indicating what part of the physics engine should be rendered.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DebugRenderMode: u32 {
        /// If this flag is set, the local coordinate axes of rigid-bodies will be rendered.
        const RIGID_BODY_AXES = 1 << 0;
        /// If this flag is set, the anchors, axes, and limits of impulse joints will be
        /// rendered.
        const IMPULSE_JOINTS = 1 << 1;
    }
}

impl Default for DebugRenderMode {
    fn default() -> Self {
        Self::IMPULSE_JOINTS
    }
}

/// Pipeline responsible for rendering the state of the physics engine for debugging purpose.
pub struct DebugRenderPipeline {
    /// The style used to compute the line colors and sizes.
    pub style: DebugRenderStyle,
    /// Flags controlling what part of the physics engine need to be rendered.
    pub mode: DebugRenderMode,
}

impl Default for DebugRenderPipeline {
    fn default() -> Self {
        Self::render_all(DebugRenderStyle::default())
    }
}

impl DebugRenderPipeline {
    /// Creates a new debug-render pipeline from a given style and flags.
    pub fn new(style: DebugRenderStyle, mode: DebugRenderMode) -> Self {
        Self { style, mode }
    }

    /// Creates a new debug-render pipeline that renders everything it can.
    pub fn render_all(style: DebugRenderStyle) -> Self {
        Self::new(style, DebugRenderMode::all())
    }

    /// Render the scene.
    pub fn render<N: ScalarType>(
        &mut self,
        backend: &mut impl DebugRenderBackend<N>,
        bodies: &RigidBodySet<N>,
        impulse_joints: &ImpulseJointSet<N>,
    ) {
        self.render_bodies(backend, bodies);
        self.render_joints(backend, bodies, impulse_joints);
    }

    /// Render only the joints from the scene.
    ///
    /// Joints attached to a missing body are not rendered.
    pub fn render_joints<N: ScalarType>(
        &mut self,
        backend: &mut impl DebugRenderBackend<N>,
        bodies: &RigidBodySet<N>,
        impulse_joints: &ImpulseJointSet<N>,
    ) {
        if !self.mode.contains(DebugRenderMode::IMPULSE_JOINTS) {
            return;
        }

        let style = &self.style;
        let tick = N::from_f64(style.joint_limit_tick_half_length);
        let half_axis = N::from_f64(style.joint_axis_half_length);

        for (handle, joint) in impulse_joints.iter() {
            let (rb1, rb2) = match (bodies.get(joint.body1), bodies.get(joint.body2)) {
                (Some(rb1), Some(rb2)) => (rb1, rb2),
                _ => continue,
            };
            let object = DebugRenderObject::ImpulseJoint(handle, joint);

            let coeff = if (rb1.is_fixed() || rb1.is_sleeping())
                && (rb2.is_fixed() || rb2.is_sleeping())
            {
                style.sleep_color_multiplier
            } else {
                [1.0; 4]
            };

            let anchor1 = rb1.world_point(&joint.data.local_anchor1());
            let anchor2 = rb2.world_point(&joint.data.local_anchor2());
            let axis = rb1.world_vector(&joint.data.local_axis1());
            let perp = rb1.world_vector(&joint.data.local_perp1());

            backend.draw_line(
                object,
                anchor1,
                anchor2,
                modulate(style.joint_anchors_color, coeff),
            );

            if joint.is_limit_enabled() {
                let lower = anchor1 + axis * joint.lower_limit();
                let upper = anchor1 + axis * joint.upper_limit();
                let tick = perp * tick;

                backend.draw_line(object, lower, upper, modulate(style.joint_axis_color, coeff));
                backend.draw_line(
                    object,
                    lower - tick,
                    lower + tick,
                    modulate(style.joint_lower_limit_color, coeff),
                );
                backend.draw_line(
                    object,
                    upper - tick,
                    upper + tick,
                    modulate(style.joint_upper_limit_color, coeff),
                );
            } else {
                let axis = axis * half_axis;
                backend.draw_line(
                    object,
                    anchor1 - axis,
                    anchor1 + axis,
                    modulate(style.joint_axis_color, coeff),
                );
            }

            backend.draw_point(
                object,
                anchor1,
                style.joint_anchor_size,
                modulate(style.joint_anchor1_color, coeff),
            );
            backend.draw_point(
                object,
                anchor2,
                style.joint_anchor_size,
                modulate(style.joint_anchor2_color, coeff),
            );
        }
    }

    /// Render only the rigid-bodies from the scene.
    pub fn render_bodies<N: ScalarType>(
        &mut self,
        backend: &mut impl DebugRenderBackend<N>,
        bodies: &RigidBodySet<N>,
    ) {
        if self.style.rigid_body_axes_length == 0.0
            || !self.mode.contains(DebugRenderMode::RIGID_BODY_AXES)
        {
            return;
        }

        let length = N::from_f64(self.style.rigid_body_axes_length);

        for (handle, rb) in bodies.iter() {
            let object = DebugRenderObject::RigidBody(handle, rb);
            let coeff = if rb.is_sleeping() {
                self.style.sleep_color_multiplier
            } else {
                [1.0; 4]
            };
            let colors = [
                modulate([0.0, 1.0, 0.25, 1.0], coeff),
                modulate([120.0, 1.0, 0.1, 1.0], coeff),
            ];

            let center = rb.center_of_mass();
            let axes = [Vector::x(), Vector::y()];

            for (axis, color) in axes.iter().zip(colors.iter()) {
                let end = center + rb.world_vector(axis) * length;
                backend.draw_line(object, center, end, *color);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{DebugRenderMode, DebugRenderPipeline};
    use crate::dynamics::{
        ImpulseJointSet, PrismaticJointBuilder, RigidBodyBuilder, RigidBodySet,
    };
    use crate::math::Vector;
    use crate::pipeline::{DebugColor, DebugRenderBackend, DebugRenderObject, DebugRenderStyle};
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<(Vector<f64>, Vector<f64>, DebugColor)>,
        points: Vec<(Vector<f64>, DebugColor)>,
    }

    impl DebugRenderBackend<f64> for Recorder {
        fn draw_line(
            &mut self,
            _: DebugRenderObject<f64>,
            a: Vector<f64>,
            b: Vector<f64>,
            color: DebugColor,
        ) {
            self.lines.push((a, b, color));
        }

        fn draw_point(
            &mut self,
            _: DebugRenderObject<f64>,
            point: Vector<f64>,
            _: f32,
            color: DebugColor,
        ) {
            self.points.push((point, color));
        }
    }

    fn scene(limits_enabled: bool) -> (RigidBodySet<f64>, ImpulseJointSet<f64>) {
        let mut bodies = RigidBodySet::new();
        let mut joints = ImpulseJointSet::new();
        let b1 = bodies.insert(RigidBodyBuilder::fixed().translation(Vector::new(1.0, 0.0)));
        let b2 = bodies.insert(RigidBodyBuilder::dynamic().translation(Vector::new(1.0, 2.0)));
        let joint = PrismaticJointBuilder::new(Vector::y())
            .local_anchor2(Vector::new(0.5, 0.0))
            .limits([-1.0, 3.0])
            .limits_enabled(limits_enabled);
        let _ = joints.insert(b1, b2, joint);
        (bodies, joints)
    }

    #[test]
    fn joint_with_limits() {
        let (bodies, joints) = scene(true);
        let mut pipeline = DebugRenderPipeline::default();
        let mut recorder = Recorder::default();
        pipeline.render_joints(&mut recorder, &bodies, &joints);

        let style = DebugRenderStyle::default();
        assert_eq!(recorder.lines.len(), 4);
        assert_eq!(recorder.points.len(), 2);

        let (a, b, _) = recorder.lines[0];
        assert_relative_eq!(a, Vector::new(1.0, 0.0));
        assert_relative_eq!(b, Vector::new(1.5, 2.0));

        let (lower, upper, color) = recorder.lines[1];
        assert_relative_eq!(lower, Vector::new(1.0, -1.0));
        assert_relative_eq!(upper, Vector::new(1.0, 3.0));
        assert_eq!(color, style.joint_axis_color);

        // The ticks are perpendicular to the axis.
        let (t1, t2, color) = recorder.lines[2];
        assert_relative_eq!(t1, Vector::new(1.5, -1.0));
        assert_relative_eq!(t2, Vector::new(0.5, -1.0));
        assert_eq!(color, style.joint_lower_limit_color);
        let (t1, t2, _) = recorder.lines[3];
        assert_relative_eq!((t1 + t2) * 0.5, Vector::new(1.0, 3.0));

        assert_relative_eq!(recorder.points[0].0, Vector::new(1.0, 0.0));
        assert_relative_eq!(recorder.points[1].0, Vector::new(1.5, 2.0));
    }

    #[test]
    fn joint_without_limits() {
        let (bodies, joints) = scene(false);
        let mut pipeline = DebugRenderPipeline::new(
            DebugRenderStyle::default(),
            DebugRenderMode::IMPULSE_JOINTS,
        );
        let mut recorder = Recorder::default();
        pipeline.render(&mut recorder, &bodies, &joints);

        assert_eq!(recorder.lines.len(), 2);
        let (a, b, _) = recorder.lines[1];
        assert_relative_eq!(a, Vector::new(1.0, -1.0));
        assert_relative_eq!(b, Vector::new(1.0, 1.0));
    }

    #[test]
    fn body_axes() {
        let mut bodies = RigidBodySet::new();
        let _ = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(2.0, 0.0))
                .rotation(std::f64::consts::FRAC_PI_2),
        );
        let joints = ImpulseJointSet::new();
        let mut pipeline = DebugRenderPipeline::new(
            DebugRenderStyle::default(),
            DebugRenderMode::RIGID_BODY_AXES,
        );
        let mut recorder = Recorder::default();
        pipeline.render(&mut recorder, &bodies, &joints);

        assert_eq!(recorder.lines.len(), 2);
        assert!(recorder.points.is_empty());
        let (a, b, _) = recorder.lines[0];
        assert_relative_eq!(a, Vector::new(2.0, 0.0));
        assert_relative_eq!(b, Vector::new(2.0, 0.5), epsilon = 1.0e-12);
    }
}
