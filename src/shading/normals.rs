//! Normal-coloured shading, blended towards a base colour.

use crate::data_structures::uniforms::{Color, UniformSet};

use super::ShaderProgram;

pub const VERTEX: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
};

@vertex
fn vs_main(v: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * model.matrix * vec4<f32>(v.position, 1.0);
    out.normal = (model.normal * vec4<f32>(v.normal, 0.0)).xyz;
    return out;
}
"#;

pub const FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.normal) * 0.5 + vec3<f32>(0.5);
    return vec4<f32>(mix(u.base_color, n, u.normal_mix), 1.0);
}
"#;

pub fn program() -> ShaderProgram {
    ShaderProgram {
        label: "Normals Shader",
        vertex: VERTEX,
        fragment: FRAGMENT,
        textured: false,
    }
}

pub fn uniforms() -> UniformSet {
    UniformSet::new()
        .with("time", 0.0_f32)
        .with("base_color", Color::from_rgb_u32(0x8844ff))
        .with("normal_mix", 0.85_f32)
}

/// Linear RGB for a unit `normal`.
pub fn color_for(normal: [f32; 3], base: Color, normal_mix: f32) -> [f32; 3] {
    let encoded = normal.map(|c| c * 0.5 + 0.5);
    super::mix(base.to_linear(), encoded, normal_mix)
}
