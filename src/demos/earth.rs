use cgmath::{Deg, Point3, Vector3};
use instant::Duration;

use crate::{
    config::{Config, OrbitSettings},
    context::Context,
    data_structures::{
        geometry::MeshData,
        material::Material,
        scene::{MeshNode, Scene, Transform},
        uniforms::Color,
    },
    flow::Demo,
    pipelines::light::{DirectionalLight, LightResources, LightUniform, PointLight},
    session::Session,
    shading::flat,
};

const GLOBE: &str = "globe";
const LIGHT_HELPER: &str = "light helper";
pub const TEXTURE: &str = "earth.png";

/// Where the point light is `ms` milliseconds into the demo.
pub fn point_light_position(ms: f64) -> Point3<f32> {
    Point3::new(
        (200.0 * (ms / 500.0).sin()) as f32,
        (200.0 * (ms / 1000.0).sin()) as f32,
        (200.0 * (ms / 500.0).cos()) as f32,
    )
}

#[derive(Debug)]
pub struct Earth {
    sun: DirectionalLight,
    point_light: PointLight,
    scene: Scene,
}

impl Earth {
    pub fn new() -> Self {
        Self {
            sun: DirectionalLight {
                color: Color::WHITE,
                intensity: 2.0,
                position: Vector3::new(1.0, 1.0, 1.0),
            },
            point_light: PointLight {
                color: Color::WHITE,
                intensity: 1.0,
                position: Point3::new(-200.0, -200.0, -200.0),
            },
            scene: Scene::new(),
        }
    }

    pub fn point_light(&self) -> &PointLight {
        &self.point_light
    }
}

impl Default for Earth {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for Earth {
    fn config(&self) -> Config {
        Config {
            title: String::from("Earth"),
            fov_y: Deg(50.0),
            znear: 0.1,
            zfar: 1000.0,
            camera_position: Point3::new(0.0, 0.0, 500.0),
            orbit_controls: Some(OrbitSettings::default()),
            ..Config::default()
        }
    }

    fn on_init(&mut self, ctx: &Context) -> anyhow::Result<()> {
        let lights = LightResources::new(
            &ctx.device,
            LightUniform::new(&self.sun, &self.point_light, Color::BLACK),
        );
        let globe = Material::textured(ctx, &lights, ctx.loader.load_texture(TEXTURE));
        self.scene.add(MeshNode::new(
            ctx,
            GLOBE,
            &MeshData::sphere(100.0, 64, 32),
            globe,
            Transform::new(),
        ));

        let helper_uniforms = flat::uniforms(self.point_light.color);
        let helper = Material::procedural(
            ctx,
            &flat::program(),
            &helper_uniforms,
            None,
            Some(wgpu::Face::Back),
        );
        let position = self.point_light.position;
        self.scene.add(MeshNode::new(
            ctx,
            LIGHT_HELPER,
            &MeshData::sphere(30.0, 16, 8),
            helper,
            Transform::at([position.x, position.y, position.z]),
        ));
        self.scene.set_lights(lights);
        Ok(())
    }

    fn on_update(&mut self, _session: &mut Session, elapsed: Duration) {
        let position = point_light_position(elapsed.as_secs_f64() * 1000.0);
        self.point_light.position = position;
        if let Some(lights) = self.scene.lights_mut() {
            lights.uniform.set_point(&self.point_light);
        }
        if let Some(helper) = self.scene.node_mut(LIGHT_HELPER) {
            helper.transform.position = Vector3::new(position.x, position.y, position.z);
        }
    }

    fn write_to_buffer(&mut self, ctx: &Context) {
        self.scene.write_to_buffer(ctx);
    }

    fn on_render(&self, ctx: &Context, render_pass: &mut wgpu::RenderPass<'_>) {
        self.scene.draw(ctx, render_pass);
    }
}
