//! Rippling sea: a plane displaced by two crossed sine waves and shaded by height.

use crate::data_structures::uniforms::{Color, UniformError, UniformSet};

use super::ShaderProgram;

pub const VERTEX: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) elevation: f32,
};

fn wave_elevation(p: vec3<f32>) -> f32 {
    return sin(p.x * u.frequency.x + u.time * u.speed)
        * sin(p.z * u.frequency.y + u.time * u.speed)
        * u.elevation;
}

@vertex
fn vs_main(v: VertexInput) -> VertexOutput {
    var world = model.matrix * vec4<f32>(v.position, 1.0);
    let e = wave_elevation(world.xyz);
    world.y = world.y + e;

    var out: VertexOutput;
    out.clip_position = camera.view_proj * world;
    out.elevation = e;
    return out;
}
"#;

pub const FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let strength = (in.elevation + u.color_offset) * u.color_multiplier;
    return vec4<f32>(mix(u.depth_color, u.surface_color, strength), 1.0);
}
"#;

pub fn program() -> ShaderProgram {
    ShaderProgram {
        label: "Waves Shader",
        vertex: VERTEX,
        fragment: FRAGMENT,
        textured: false,
    }
}

/// Default parameter block.
pub fn uniforms() -> UniformSet {
    UniformSet::new()
        .with("time", 0.0_f32)
        .with("elevation", 0.2_f32)
        .with("frequency", [4.0_f32, 1.5])
        .with("speed", 0.75_f32)
        .with("depth_color", Color::from_rgb_u32(0x186691))
        .with("surface_color", Color::from_rgb_u32(0x9bd8ff))
        .with("color_offset", 0.08_f32)
        .with("color_multiplier", 5.0_f32)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParams {
    pub time: f32,
    pub elevation: f32,
    pub frequency: [f32; 2],
    pub speed: f32,
    pub depth_color: Color,
    pub surface_color: Color,
    pub color_offset: f32,
    pub color_multiplier: f32,
}

impl WaveParams {
    pub fn from_uniforms(u: &UniformSet) -> Result<Self, UniformError> {
        Ok(Self {
            time: u.scalar("time")?,
            elevation: u.scalar("elevation")?,
            frequency: u.vec2("frequency")?,
            speed: u.scalar("speed")?,
            depth_color: u.color("depth_color")?,
            surface_color: u.color("surface_color")?,
            color_offset: u.scalar("color_offset")?,
            color_multiplier: u.scalar("color_multiplier")?,
        })
    }

    /// Height added to a world-space point at (`x`, `z`).
    pub fn elevation_at(&self, x: f32, z: f32) -> f32 {
        let phase = self.time * self.speed;
        (x * self.frequency[0] + phase).sin() * (z * self.frequency[1] + phase).sin() * self.elevation
    }

    /// Linear RGB written for a fragment displaced by `elevation`.
    pub fn color_for(&self, elevation: f32) -> [f32; 3] {
        let strength = (elevation + self.color_offset) * self.color_multiplier;
        super::mix(
            self.depth_color.to_linear(),
            self.surface_color.to_linear(),
            strength,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn params() -> WaveParams {
        WaveParams::from_uniforms(&uniforms()).unwrap()
    }

    #[test]
    fn same_inputs_same_height() {
        let mut p = params();
        p.time = 3.7;
        assert_eq!(p.elevation_at(0.31, -0.42), p.elevation_at(0.31, -0.42));
        assert_eq!(p.color_for(0.1), p.color_for(0.1));
    }

    #[test]
    fn crest_reaches_full_elevation() {
        let p = params();
        // sin(x*4) == 1 and sin(z*1.5) == 1 at t = 0
        let x = FRAC_PI_2 / 4.0;
        let z = FRAC_PI_2 / 1.5;
        assert_relative_eq!(p.elevation_at(x, z), 0.2, epsilon = 1e-6);
        assert_relative_eq!(p.elevation_at(0.0, z), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn time_shifts_phase_by_speed() {
        let mut p = params();
        let x = 0.2;
        let z = 0.7;
        p.time = 2.0;
        let expected = (x * 4.0 + 2.0 * 0.75_f32).sin() * (z * 1.5 + 2.0 * 0.75_f32).sin() * 0.2;
        assert_relative_eq!(p.elevation_at(x, z), expected, epsilon = 1e-6);
    }

    #[test]
    fn colour_stops_hit_at_expected_heights() {
        let p = params();
        let depth = p.depth_color.to_linear();
        let surface = p.surface_color.to_linear();
        let at_depth = p.color_for(-0.08);
        let at_surface = p.color_for(0.2 - 0.08);
        for i in 0..3 {
            assert_relative_eq!(at_depth[i], depth[i], epsilon = 1e-6);
            assert_relative_eq!(at_surface[i], surface[i], epsilon = 1e-5);
        }
    }
}
