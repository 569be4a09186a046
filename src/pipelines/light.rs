use cgmath::{InnerSpace, Point3, Vector3};
use wgpu::util::DeviceExt;

use crate::data_structures::uniforms::Color;

/// A light shining along a fixed direction from infinitely far away.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    /// Position the light shines *from*, towards the origin.
    pub position: Vector3<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Point3<f32>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    // xyz: unit vector towards the light, w: intensity
    directional: [f32; 4],
    directional_color: [f32; 4],
    // xyz: world position, w: intensity
    point: [f32; 4],
    point_color: [f32; 4],
    ambient: [f32; 4],
}

impl LightUniform {
    pub fn new(directional: &DirectionalLight, point: &PointLight, ambient: Color) -> Self {
        let mut uniform = Self {
            directional: [0.0; 4],
            directional_color: [0.0; 4],
            point: [0.0; 4],
            point_color: [0.0; 4],
            ambient: rgb(ambient),
        };
        uniform.set_directional(directional);
        uniform.set_point(point);
        uniform
    }

    pub fn set_directional(&mut self, light: &DirectionalLight) {
        let direction = if light.position.magnitude2() > 0.0 {
            light.position.normalize()
        } else {
            Vector3::unit_y()
        };
        self.directional = [direction.x, direction.y, direction.z, light.intensity];
        self.directional_color = rgb(light.color);
    }

    pub fn set_point(&mut self, light: &PointLight) {
        let p = light.position;
        self.point = [p.x, p.y, p.z, light.intensity];
        self.point_color = rgb(light.color);
    }

    pub fn point_position(&self) -> Point3<f32> {
        Point3::new(self.point[0], self.point[1], self.point[2])
    }
}

fn rgb(color: Color) -> [f32; 4] {
    let [r, g, b] = color.to_linear();
    [r, g, b, 1.0]
}

/// Scene lights on the GPU (group 3 of lit pipelines).
#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, uniform: LightUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = super::uniform_layout(device, "light_bind_group_layout");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("light_bind_group"),
        });
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
