//! ripple-ngin
//!
//! Small animated WebGPU scenes for native and WASM: a textured globe, a
//! procedurally displaced sea, a waving flag and an orbiting camera. Each demo
//! is a scene root with meshes and materials, a perspective camera, optional
//! orbit controls and debug controls over its shader uniforms, and a render
//! loop that runs until cancelled.
//!
//! High-level modules
//! - `camera`: camera, projection, orbit controller and camera uniforms
//! - `context`: GPU device/queue/surface and shared bind group layouts
//! - `config`: per-demo window and camera settings
//! - `session`: per-demo mutable state (camera, viewport, clock, loop token)
//! - `flow`: the `Demo` trait, the per-tick update and the winit runner
//! - `data_structures`: uniforms, geometry, textures, materials, scene root
//! - `controls`: debug panel over named uniforms
//! - `shading`: shader programs and CPU mirrors of their formulas
//! - `pipelines`: render pipeline construction
//! - `resources`: asset loading
//! - `render`: frame recording and offscreen capture
//! - `demos`: the bundled demos
//!

pub mod camera;
pub mod clock;
pub mod config;
pub mod context;
pub mod controls;
pub mod data_structures;
pub mod demos;
pub mod flow;
pub mod motion;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod session;
pub mod shading;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use flow::{Demo, LoopState, LoopToken, advance, run, run_with_token};
pub use instant::Duration;
pub use session::Session;
pub use winit::event::WindowEvent;
