//! Waving flag: a textured plane pushed along Z by two travelling sine waves.

use crate::data_structures::uniforms::{Color, UniformError, UniformSet};

use super::ShaderProgram;

pub const VERTEX: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coords: vec2<f32>,
    @location(1) elevation: f32,
};

@vertex
fn vs_main(v: VertexInput) -> VertexOutput {
    var world = model.matrix * vec4<f32>(v.position, 1.0);
    let e = sin(world.x * u.frequency.x - u.time) * u.amplitude
        + sin(world.y * u.frequency.y - u.time) * u.amplitude;
    world.z = world.z + e;

    var out: VertexOutput;
    out.clip_position = camera.view_proj * world;
    out.tex_coords = v.tex_coords;
    out.elevation = e;
    return out;
}
"#;

pub const FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(t_map, s_map, in.tex_coords);
    return vec4<f32>(texel.rgb * u.tint * (in.elevation * 2.0 + 0.5), texel.a);
}
"#;

pub fn program() -> ShaderProgram {
    ShaderProgram {
        label: "Flag Shader",
        vertex: VERTEX,
        fragment: FRAGMENT,
        textured: true,
    }
}

pub fn uniforms() -> UniformSet {
    UniformSet::new()
        .with("time", 0.0_f32)
        .with("frequency", [10.0_f32, 5.0])
        .with("amplitude", 0.1_f32)
        .with("tint", Color::from_rgb_u32(0xff8800))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlagParams {
    pub time: f32,
    pub frequency: [f32; 2],
    pub amplitude: f32,
    pub tint: Color,
}

impl FlagParams {
    pub fn from_uniforms(u: &UniformSet) -> Result<Self, UniformError> {
        Ok(Self {
            time: u.scalar("time")?,
            frequency: u.vec2("frequency")?,
            amplitude: u.scalar("amplitude")?,
            tint: u.color("tint")?,
        })
    }

    /// Offset along Z for a world-space point at (`x`, `y`).
    pub fn elevation_at(&self, x: f32, y: f32) -> f32 {
        (x * self.frequency[0] - self.time).sin() * self.amplitude
            + (y * self.frequency[1] - self.time).sin() * self.amplitude
    }

    /// Linear RGB for a texel (already linear) displaced by `elevation`.
    pub fn shade(&self, texel: [f32; 3], elevation: f32) -> [f32; 3] {
        let tint = self.tint.to_linear();
        let light = elevation * 2.0 + 0.5;
        [
            texel[0] * tint[0] * light,
            texel[1] * tint[1] * light,
            texel[2] * tint[2] * light,
        ]
    }
}
