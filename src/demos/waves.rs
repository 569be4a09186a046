use cgmath::{Deg, Point3, Quaternion, Rad, Rotation3};
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
    shading::waves,
};

const SEA: &str = "sea";

#[derive(Debug)]
pub struct Waves {
    uniforms: UniformSet,
    panel: ControlPanel,
    scene: Scene,
}

impl Waves {
    pub fn new() -> Self {
        let panel = ControlPanel::new("Waves")
            .add(Control::range("elevation", "elevation", 0.0, 1.0, 0.001))
            .add(Control::component("frequency x", "frequency", 0, 0.0, 10.0, 0.001))
            .add(Control::component("frequency y", "frequency", 1, 0.0, 10.0, 0.001))
            .add(Control::range("speed", "speed", 0.0, 4.0, 0.001))
            .add(Control::color("depth colour", "depth_color"))
            .add(Control::color("surface colour", "surface_color"))
            .add(Control::range("colour offset", "color_offset", 0.0, 1.0, 0.001))
            .add(Control::range("colour multiplier", "color_multiplier", 0.0, 10.0, 0.001));
        Self {
            uniforms: waves::uniforms(),
            panel,
            scene: Scene::new(),
        }
    }

    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }
}

impl Default for Waves {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for Waves {
    fn config(&self) -> Config {
        Config {
            title: String::from("Waves"),
            fov_y: Deg(75.0),
            znear: 0.1,
            zfar: 100.0,
            camera_position: Point3::new(1.0, 1.0, 1.0),
            orbit_controls: Some(OrbitSettings {
                damping: Some(0.05),
                ..OrbitSettings::default()
            }),
            ..Config::default()
        }
    }

    fn on_init(&mut self, ctx: &Context) -> anyhow::Result<()> {
        self.panel.validate(&self.uniforms)?;
        let material = Material::procedural(ctx, &waves::program(), &self.uniforms, None, None);
        // lay the plane flat in XZ
        let transform = Transform {
            rotation: Quaternion::from_angle_x(Rad(-std::f32::consts::FRAC_PI_2)),
            ..Transform::new()
        };
        let plane = MeshData::plane(2.0, 2.0, 128, 128);
        self.scene.add(MeshNode::new(ctx, SEA, &plane, material, transform));
        Ok(())
    }

    fn on_update(&mut self, _session: &mut Session, elapsed: Duration) {
        super::set_time(&mut self.uniforms, elapsed.as_secs_f32());
    }

    fn write_to_buffer(&mut self, ctx: &Context) {
        self.scene.write_to_buffer(ctx);
        if let Some(node) = self.scene.node(SEA) {
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
    fn panel_covers_every_tunable_uniform() {
        let demo = Waves::new();
        demo.panel().validate(demo.uniforms()).unwrap();
        assert_eq!(demo.panel().controls().len(), 8);
    }

    #[test]
    fn tick_writes_elapsed_seconds() {
        let mut demo = Waves::new();
        let mut session = Session::new(&demo.config(), 800, 600);
        demo.on_update(&mut session, Duration::from_millis(2500));
        assert_eq!(demo.uniforms().scalar("time").unwrap(), 2.5);
    }
}
