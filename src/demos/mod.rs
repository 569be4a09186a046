//! The bundled demos.
//!
//! | name    | shows |
//! |---------|-------|
//! | `earth` | textured globe lit by a sun and an orbiting point light |
//! | `waves` | procedurally displaced sea with a debug panel |
//! | `flag`  | textured flag waving in a procedural wind |
//! | `orbit` | spinning box seen from a camera on a circular path |
//!
//! Every demo keeps its CPU state (uniforms, light and camera paths) outside
//! the GPU so it can be stepped in tests without a device.

pub mod earth;
pub mod flag;
pub mod orbit;
pub mod waves;

use crate::flow::Demo;

pub const NAMES: [&str; 4] = ["earth", "waves", "flag", "orbit"];

pub fn by_name(name: &str) -> Option<Box<dyn Demo>> {
    match name {
        "earth" => Some(Box::new(earth::Earth::new())),
        "waves" => Some(Box::new(waves::Waves::new())),
        "flag" => Some(Box::new(flag::Flag::new())),
        "orbit" => Some(Box::new(orbit::Orbit::new())),
        _ => None,
    }
}

/// Write the elapsed time into the `time` uniform.
pub(crate) fn set_time(uniforms: &mut crate::data_structures::uniforms::UniformSet, seconds: f32) {
    if let Err(e) = uniforms.set_scalar("time", seconds) {
        log::warn!("{}", e);
    }
}
