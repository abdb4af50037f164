/// A color for debug-rendering.
///
/// The default colors are provided in HSLA (Hue Saturation Lightness Alpha) format.
pub type DebugColor = [f32; 4];

/// Style used for computing colors and sizes when rendering the scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DebugRenderStyle {
    /// The color of the segment between the two anchors of a joint.
    pub joint_anchors_color: DebugColor,
    /// The color of the joint axis, or of the translation range when limits are enabled.
    pub joint_axis_color: DebugColor,
    /// The color of the tick marking the lower translation limit.
    pub joint_lower_limit_color: DebugColor,
    /// The color of the tick marking the upper translation limit.
    pub joint_upper_limit_color: DebugColor,
    /// The color of the anchor point attached to the first body of a joint.
    pub joint_anchor1_color: DebugColor,
    /// The color of the anchor point attached to the second body of a joint.
    pub joint_anchor2_color: DebugColor,
    /// Half the length of the axis drawn when the limits are disabled.
    pub joint_axis_half_length: f64,
    /// Half the length of the ticks drawn at the limits.
    pub joint_limit_tick_half_length: f64,
    /// The size of the anchor points, in pixels.
    pub joint_anchor_size: f32,
    /// If a rigid-body is sleeping, its attached entities will have their colors
    /// multiplied by this array. (For a joint, both attached rigid-bodies must be sleeping
    /// or fixed for this multiplier to be applied).
    pub sleep_color_multiplier: DebugColor,
    /// The length of the local coordinate axes rendered for a rigid-body.
    pub rigid_body_axes_length: f64,
}

impl Default for DebugRenderStyle {
    fn default() -> Self {
        Self {
            joint_anchors_color: [0.0, 0.0, 0.4, 1.0],
            joint_axis_color: [0.0, 0.0, 0.7, 1.0],
            joint_lower_limit_color: [120.0, 0.6, 0.6, 1.0],
            joint_upper_limit_color: [0.0, 0.6, 0.6, 1.0],
            joint_anchor1_color: [0.0, 0.0, 0.7, 1.0],
            joint_anchor2_color: [240.0, 0.6, 0.6, 1.0],
            joint_axis_half_length: 1.0,
            joint_limit_tick_half_length: 0.5,
            joint_anchor_size: 5.0,
            sleep_color_multiplier: [1.0, 1.0, 0.2, 1.0],
            rigid_body_axes_length: 0.5,
        }
    }
}

pub(crate) fn modulate(mut color: DebugColor, coeff: DebugColor) -> DebugColor {
    for k in 0..4 {
        color[k] *= coeff[k];
    }
    color
}
