//! Scene data: uniforms, geometry, textures, materials and the scene root.
//!
//! - `uniforms` holds the tagged uniform values and their GPU layout
//! - `geometry` builds primitive shapes and uploads them as meshes
//! - `texture` wraps GPU textures
//! - `material` pairs a pipeline with its bind group
//! - `scene` is the root owning mesh nodes and lights

pub mod geometry;
pub mod material;
pub mod scene;
pub mod texture;
pub mod uniforms;
