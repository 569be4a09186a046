use cgmath::{Deg, Point3, Quaternion, Vector3};
use instant::Duration;

use crate::{
    config::Config,
    context::Context,
    controls::{Control, ControlPanel},
    data_structures::{
        geometry::MeshData,
        material::Material,
        scene::{MeshNode, Scene, Transform},
        uniforms::{Color, UniformSet},
    },
    flow::{ControlBinding, Demo},
    motion::{CircularOrbit, Spin},
    session::Session,
    shading::normals,
};

const BOX: &str = "box";

pub const CAMERA_PATH: CircularOrbit = CircularOrbit {
    radius: 6.0,
    angular_speed: 0.5,
    height: 2.0,
};

#[derive(Debug)]
pub struct Orbit {
    spin: Spin,
    rotation: Quaternion<f32>,
    uniforms: UniformSet,
    panel: ControlPanel,
    scene: Scene,
}

impl Orbit {
    pub fn new() -> Self {
        Self {
            spin: Spin {
                axis: Vector3::unit_y(),
                angular_speed: 0.5,
            },
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            uniforms: normals::uniforms(),
            panel: ControlPanel::new("Orbit")
                .add(Control::range("normal mix", "normal_mix", 0.0, 1.0, 0.01))
                .add(Control::color("base colour", "base_color")),
            scene: Scene::new(),
        }
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        self.rotation
    }
}

impl Default for Orbit {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for Orbit {
    fn config(&self) -> Config {
        Config {
            title: String::from("Orbit"),
            clear_colour: Color::from_rgb_u32(0x111122),
            fov_y: Deg(75.0),
            camera_position: CAMERA_PATH.position(0.0),
            camera_target: Point3::new(0.0, 0.0, 0.0),
            // the loop owns the camera
            orbit_controls: None,
            ..Config::default()
        }
    }

    fn on_init(&mut self, ctx: &Context) -> anyhow::Result<()> {
        self.panel.validate(&self.uniforms)?;
        let material = Material::procedural(
            ctx,
            &normals::program(),
            &self.uniforms,
            None,
            Some(wgpu::Face::Back),
        );
        self.scene.add(MeshNode::new(
            ctx,
            BOX,
            &MeshData::cuboid(1.0, 1.0, 1.0),
            material,
            Transform::new(),
        ));
        Ok(())
    }

    fn on_update(&mut self, session: &mut Session, elapsed: Duration) {
        let seconds = elapsed.as_secs_f32();
        super::set_time(&mut self.uniforms, seconds);
        session.camera.position = CAMERA_PATH.position(seconds);
        self.rotation = self.spin.rotation(seconds);
        if let Some(node) = self.scene.node_mut(BOX) {
            node.transform.rotation = self.rotation;
        }
    }

    fn write_to_buffer(&mut self, ctx: &Context) {
        self.scene.write_to_buffer(ctx);
        if let Some(node) = self.scene.node(BOX) {
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
