//! Shader programs and their CPU mirrors.
//!
//! A [`ShaderProgram`] is a pair of WGSL source blocks, one per stage. Before
//! compilation the two blocks are joined behind a generated prelude that
//! declares the camera, the model transform, the demo's uniform block (built
//! from its [`UniformSet`]) and, for textured programs, the colour map. Shader
//! authors therefore only write the stage bodies and refer to `camera`,
//! `model`, `u`, `t_map` and `s_map`.
//!
//! The displacement and colouring formulas of each program are mirrored as
//! plain Rust functions so they can be checked without a GPU.

pub mod flag;
pub mod flat;
pub mod normals;
pub mod waves;

use crate::data_structures::uniforms::UniformSet;

#[derive(Clone, Debug, PartialEq)]
pub struct ShaderProgram {
    pub label: &'static str,
    pub vertex: &'static str,
    pub fragment: &'static str,
    /// Whether the program samples a colour map (`t_map` / `s_map`).
    pub textured: bool,
}

const PRELUDE: &str = r#"
struct Camera {
    view_pos: vec4<f32>,
    view_proj: mat4x4<f32>,
};
@group(0) @binding(0)
var<uniform> camera: Camera;

struct Model {
    matrix: mat4x4<f32>,
    normal: mat4x4<f32>,
};
@group(1) @binding(0)
var<uniform> model: Model;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) tex_coords: vec2<f32>,
    @location(2) normal: vec3<f32>,
};
"#;

const MAP_BINDINGS: &str = r#"
@group(2) @binding(1)
var t_map: texture_2d<f32>;
@group(2) @binding(2)
var s_map: sampler;
"#;

impl ShaderProgram {
    /// Full WGSL module for this program with `uniforms` as its parameter block.
    pub fn compose(&self, uniforms: &UniformSet) -> String {
        let mut source = String::from(PRELUDE);
        source.push('\n');
        source.push_str(&uniforms.wgsl_struct("Uniforms"));
        source.push_str("@group(2) @binding(0)\nvar<uniform> u: Uniforms;\n");
        if self.textured {
            source.push_str(MAP_BINDINGS);
        }
        source.push('\n');
        source.push_str(self.vertex);
        source.push('\n');
        source.push_str(self.fragment);
        source
    }
}

/// GLSL-style `mix` on linear RGB triples.
pub fn mix(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}
