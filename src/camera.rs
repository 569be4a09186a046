//! Camera, projection and orbit controls.
//!
//! - [`Camera`] is a position looking at a target point
//! - [`Projection`] holds the perspective frustum and tracks the viewport aspect
//! - [`CameraUniform`] / [`CameraResources`] mirror both on the GPU
//! - [`OrbitController`] turns pointer drags and scrolling into rotation and
//!   zoom around the target, optionally with damping

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};
use wgpu::util::DeviceExt;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::config::OrbitSettings;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>, T: Into<Point3<f32>>>(position: P, target: T) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU side of the camera: uniform buffer plus bind group (group 0 in every pipeline).
#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform = CameraUniform::new();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = crate::pipelines::uniform_layout(device, "camera_bind_group_layout");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, camera: &Camera, projection: &Projection) {
        self.uniform.update_view_proj(camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

/// Spherical coordinates of the camera around its target.
///
/// `theta` is the azimuth around +Y measured from +Z towards +X, `phi` the
/// polar angle from +Y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vector3<f32>) -> Self {
        let radius = offset.magnitude();
        if radius == 0.0 {
            return Self {
                radius,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(&self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

const POLE_EPSILON: f32 = 1e-6;

/// Orbit-style camera manipulator.
///
/// Input only accumulates deltas; [`OrbitController::update`] applies them to
/// the camera once per frame. With damping enabled a fraction of the pending
/// rotation is applied each frame and the remainder decays, giving inertia.
#[derive(Clone, Debug)]
pub struct OrbitController {
    pub settings: OrbitSettings,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
    viewport_height: f32,
}

impl OrbitController {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            settings,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            dragging: false,
            last_cursor: None,
            viewport_height: 1.0,
        }
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height.max(1) as f32;
    }

    /// Queue a rotation for a pointer drag of (`dx`, `dy`) pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let per_pixel = 2.0 * PI * self.settings.rotate_speed / self.viewport_height;
        self.delta_theta -= dx * per_pixel;
        self.delta_phi -= dy * per_pixel;
    }

    /// Queue a zoom; positive `steps` move closer.
    pub fn zoom(&mut self, steps: f32) {
        self.scale *= 0.95_f32.powf(self.settings.zoom_speed * steps);
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = *state == ElementState::Pressed;
                if !self.dragging {
                    self.last_cursor = None;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.dragging {
                    if let Some((x, y)) = self.last_cursor {
                        self.rotate((position.x - x) as f32, (position.y - y) as f32);
                    }
                }
                self.last_cursor = Some((position.x, position.y));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / 100.0) as f32,
                };
                self.zoom(steps);
            }
            _ => (),
        }
    }

    /// Reconcile pending input into the camera position.
    pub fn update(&mut self, camera: &mut Camera) {
        let offset = camera.position - camera.target;
        let mut spherical = Spherical::from_offset(offset);

        match self.settings.damping {
            Some(factor) => {
                spherical.theta += self.delta_theta * factor;
                spherical.phi += self.delta_phi * factor;
                self.delta_theta *= 1.0 - factor;
                self.delta_phi *= 1.0 - factor;
            }
            None => {
                spherical.theta += self.delta_theta;
                spherical.phi += self.delta_phi;
                self.delta_theta = 0.0;
                self.delta_phi = 0.0;
            }
        }
        spherical.phi = spherical.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);
        spherical.radius = (spherical.radius * self.scale)
            .clamp(self.settings.min_distance, self.settings.max_distance);
        self.scale = 1.0;

        camera.position = camera.target + spherical.to_offset();
    }

    /// Whether a damped rotation is still settling.
    pub fn is_moving(&self) -> bool {
        self.delta_theta.abs() > 1e-6 || self.delta_phi.abs() > 1e-6
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn settings(damping: Option<f32>) -> OrbitSettings {
        OrbitSettings {
            damping,
            ..OrbitSettings::default()
        }
    }

    #[test]
    fn projection_aspect_tracks_viewport() {
        let mut projection = Projection::new(800, 600, cgmath::Deg(50.0), 0.1, 1000.0);
        assert_eq!(projection.aspect, 800.0 / 600.0);
        projection.resize(1920, 1080);
        assert_eq!(projection.aspect, 1920.0 / 1080.0);
    }

    #[test]
    fn spherical_round_trips() {
        let offset = Vector3::new(3.0, 4.0, -2.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert_relative_eq!(back.x, offset.x, epsilon = 1e-5);
        assert_relative_eq!(back.y, offset.y, epsilon = 1e-5);
        assert_relative_eq!(back.z, offset.z, epsilon = 1e-5);
    }

    #[test]
    fn idle_controller_keeps_camera_in_place() {
        let mut camera = Camera::new((0.0, 0.0, 500.0), (0.0, 0.0, 0.0));
        let mut orbit = OrbitController::new(settings(None));
        orbit.update(&mut camera);
        assert_relative_eq!(camera.position.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(camera.position.y, 0.0, epsilon = 1e-3);
        assert_relative_eq!(camera.position.z, 500.0, epsilon = 1e-3);
    }

    #[test]
    fn undamped_drag_applies_at_once() {
        let mut camera = Camera::new((0.0, 0.0, 10.0), (0.0, 0.0, 0.0));
        let mut orbit = OrbitController::new(settings(None));
        orbit.set_viewport_height(100);
        // a quarter turn: 2*PI*dx/height == PI/2
        orbit.rotate(-25.0, 0.0);
        orbit.update(&mut camera);
        assert_relative_eq!(camera.position.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(camera.position.z, 0.0, epsilon = 1e-4);
        assert!(!orbit.is_moving());
    }

    #[test]
    fn damped_drag_eases_in() {
        let mut camera = Camera::new((0.0, 0.0, 10.0), (0.0, 0.0, 0.0));
        let mut orbit = OrbitController::new(settings(Some(0.05)));
        orbit.set_viewport_height(100);
        orbit.rotate(-25.0, 0.0);
        orbit.update(&mut camera);
        let theta = Spherical::from_offset(camera.position - camera.target).theta;
        assert_relative_eq!(theta, PI / 2.0 * 0.05, epsilon = 1e-5);
        assert!(orbit.is_moving());
        for _ in 0..1000 {
            orbit.update(&mut camera);
        }
        let theta = Spherical::from_offset(camera.position - camera.target).theta;
        assert_relative_eq!(theta, PI / 2.0, epsilon = 1e-3);
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let mut camera = Camera::new((0.0, 0.0, 10.0), (0.0, 0.0, 0.0));
        let mut orbit = OrbitController::new(OrbitSettings {
            min_distance: 5.0,
            max_distance: 20.0,
            ..settings(None)
        });
        orbit.zoom(1000.0);
        orbit.update(&mut camera);
        assert_relative_eq!((camera.position - camera.target).magnitude(), 5.0, epsilon = 1e-4);
        orbit.zoom(-1000.0);
        orbit.update(&mut camera);
        assert_relative_eq!((camera.position - camera.target).magnitude(), 20.0, epsilon = 1e-3);
    }
}
