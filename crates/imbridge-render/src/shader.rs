//! Shader sources and push constants for the command-buffer renderers.

use glam::Vec2;
use imbridge_core::{DrawVert, ShaderSource};

const VERTEX_SOURCE: &str = r"
#version 450

layout(location = 0) in vec2 in_pos;
layout(location = 1) in vec2 in_uv;
layout(location = 2) in vec4 in_color;

layout(push_constant, std430) uniform Transform {
    vec2 scale;
    vec2 translate;
} pc;

layout(location = 0) out vec4 frag_color;
layout(location = 1) out vec2 frag_uv;

void main() {
    frag_color = in_color;
    frag_uv = in_uv;
    gl_Position = vec4(in_pos * pc.scale + pc.translate, 0.0, 1.0);
}
";

const FRAGMENT_SOURCE: &str = r"
#version 450

layout(location = 0) in vec4 frag_color;
layout(location = 1) in vec2 frag_uv;

layout(set = 0, binding = 0) uniform sampler2D tex;

layout(location = 0) out vec4 out_color;

void main() {
    out_color = frag_color * texture(tex, frag_uv);
}
";

/// The textured, vertex-colored triangle shader.
pub const GUI_SHADER: ShaderSource = ShaderSource {
    vertex: VERTEX_SOURCE,
    fragment: FRAGMENT_SOURCE,
};

/// Byte stride of one [`DrawVert`].
#[allow(clippy::cast_possible_truncation)]
pub const VERTEX_STRIDE: u32 = std::mem::size_of::<DrawVert>() as u32;

/// Maps display coordinates to clip space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PushConstants {
    pub scale: [f32; 2],
    pub translate: [f32; 2],
}

impl PushConstants {
    /// Transform for a viewport whose top-left corner is `display_pos`.
    #[must_use]
    pub fn for_viewport(display_pos: Vec2, display_size: Vec2) -> Self {
        let scale = Vec2::new(2.0 / display_size.x, 2.0 / display_size.y);
        let translate = Vec2::splat(-1.0) - display_pos * scale;
        Self {
            scale: scale.to_array(),
            translate: translate.to_array(),
        }
    }
}
