//! Structure for combining the various physics components to perform an actual simulation.

pub use debug_render_pipeline::{
    DebugColor, DebugRenderBackend, DebugRenderMode, DebugRenderObject, DebugRenderPipeline,
    DebugRenderStyle,
};
pub use physics_pipeline::PhysicsPipeline;

mod debug_render_pipeline;
mod physics_pipeline;
