use crate::dynamics::{ImpulseJoint, ImpulseJointHandle, RigidBody, RigidBodyHandle};
use crate::math::Vector;
use crate::pipeline::debug_render_pipeline::DebugColor;
use crate::utils::ScalarType;

/// The physics object being rendered.
#[derive(Copy, Clone)]
pub enum DebugRenderObject<'a, N: ScalarType> {
    /// A rigid-body and its local axes.
    RigidBody(RigidBodyHandle, &'a RigidBody<N>),
    /// An impulse joint and its anchors, axis and limits.
    ImpulseJoint(ImpulseJointHandle, &'a ImpulseJoint<N>),
    /// Anything else.
    Other,
}

/// Trait implemented by graphics backends responsible for the debug-rendering of the
/// physics world.
pub trait DebugRenderBackend<N: ScalarType> {
    /// Draws a colored line segment between `a` and `b`.
    fn draw_line(
        &mut self,
        object: DebugRenderObject<N>,
        a: Vector<N>,
        b: Vector<N>,
        color: DebugColor,
    );

    /// Draws a colored point of the given size, in pixels.
    fn draw_point(
        &mut self,
        object: DebugRenderObject<N>,
        point: Vector<N>,
        size: f32,
        color: DebugColor,
    );

    /// Draws a chain of segments joining consecutive vertices.
    fn draw_line_strip(
        &mut self,
        object: DebugRenderObject<N>,
        vertices: &[Vector<N>],
        color: DebugColor,
    ) {
        for vtx in vertices.windows(2) {
            self.draw_line(object, vtx[0], vtx[1], color);
        }
    }
}
