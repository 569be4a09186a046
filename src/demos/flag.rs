use cgmath::Point3;
use instant::Duration;

use crate::{
    config::{Config, OrbitSettings},
    context::Context,
    controls::{Control, ControlPanel},
    data_structures::{
        geometry::MeshData,
        material::Material,
        scene::{MeshNode, Scene, Transform},
        uniforms::UniformSet,
    },
    flow::{ControlBinding, Demo},
    session::Session,
    shading::flag,
};

const FLAG: &str = "flag";
pub const TEXTURE: &str = "flag.png";

/// Unit square in XY, fine enough for the ripple to read as a curve.
fn cloth() -> MeshData {
    MeshData::plane(1.0, 1.0, 32, 32)
}

#[derive(Debug)]
pub struct Flag {
    uniforms: UniformSet,
    panel: ControlPanel,
    scene: Scene,
}

impl Flag {
    pub fn new() -> Self {
        let panel = ControlPanel::new("Flag")
            .add(Control::component("frequency x", "frequency", 0, 0.0, 20.0, 0.01))
            .add(Control::component("frequency y", "frequency", 1, 0.0, 20.0, 0.01))
            .add(Control::range("amplitude", "amplitude", 0.0, 0.5, 0.001))
            .add(Control::color("tint", "tint"));
        Self {
            uniforms: flag::uniforms(),
            panel,
            scene: Scene::new(),
        }
    }

    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }
}

impl Default for Flag {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for Flag {
    fn config(&self) -> Config {
        Config {
            title: String::from("Flag"),
            camera_position: Point3::new(0.25, -0.25, 1.0),
            orbit_controls: Some(OrbitSettings {
                damping: Some(0.05),
                ..OrbitSettings::default()
            }),
            ..Config::default()
        }
    }

    fn on_init(&mut self, ctx: &Context) -> anyhow::Result<()> {
        self.panel.validate(&self.uniforms)?;
        let map = ctx.loader.load_texture(TEXTURE);
        // seen from both sides
        let material = Material::procedural(ctx, &flag::program(), &self.uniforms, Some(map), None);
        self.scene
            .add(MeshNode::new(ctx, FLAG, &cloth(), material, Transform::new()));
        Ok(())
    }

    fn on_update(&mut self, _session: &mut Session, elapsed: Duration) {
        super::set_time(&mut self.uniforms, elapsed.as_secs_f32());
    }

    fn write_to_buffer(&mut self, ctx: &Context) {
        self.scene.write_to_buffer(ctx);
        if let Some(node) = self.scene.node(FLAG) {
            node.material.write_uniforms(&ctx.queue, &self.uniforms);
        }
    }

    fn on_render(&self, ctx: &Context, render_pass: &mut wgpu::RenderPass<'_>) {
        self.scene.draw(ctx, render_pass);
    }

    fn controls(&mut self) -> Option<ControlBinding<'_>> {
        Some(ControlBinding {
            panel: &mut self.panel,
            uniforms: &mut self.uniforms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloth_is_a_unit_square() {
        let cloth = cloth();
        assert_eq!(cloth.vertices.len(), 33 * 33);
        for axis in 0..2 {
            let coords = cloth.vertices.iter().map(|v| v.position[axis]);
            let (lo, hi) = coords.fold((f32::MAX, f32::MIN), |(lo, hi), c| (lo.min(c), hi.max(c)));
            assert_eq!((lo, hi), (-0.5, 0.5), "axis {axis}");
        }
        assert!(cloth.vertices.iter().all(|v| v.position[2] == 0.0));
    }

    #[test]
    fn frequency_cannot_exceed_its_range() {
        let mut demo = Flag::new();
        let binding = demo.controls().unwrap();
        let stored = binding.panel.set(binding.uniforms, "frequency y", 99.0).unwrap();
        assert_eq!(stored, 20.0);
        assert_eq!(demo.uniforms().vec2("frequency").unwrap(), [10.0, 20.0]);
    }
}
