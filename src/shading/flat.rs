//! Unlit single-colour shading, used for light markers.

use crate::data_structures::uniforms::{Color, UniformSet};

use super::ShaderProgram;

pub const VERTEX: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
};

@vertex
fn vs_main(v: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * model.matrix * vec4<f32>(v.position, 1.0);
    return out;
}
"#;

pub const FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(u.color, 1.0);
}
"#;

pub fn program() -> ShaderProgram {
    ShaderProgram {
        label: "Flat Shader",
        vertex: VERTEX,
        fragment: FRAGMENT,
        textured: false,
    }
}

pub fn uniforms(color: Color) -> UniformSet {
    UniformSet::new().with("color", color)
}
