//! The scene root and its mesh nodes.

use cgmath::{Matrix, One, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::{
    context::Context,
    data_structures::{
        geometry::{Mesh, MeshData},
        material::{Capability, Material},
    },
    pipelines::light::LightResources,
};

/// Position, rotation and scale of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn at<P: Into<cgmath::Vector3<f32>>>(position: P) -> Self {
        Self {
            position: position.into(),
            ..Self::new()
        }
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_uniform(&self) -> ModelUniform {
        let model = self.to_matrix();
        // inverse transpose keeps normals perpendicular under non-uniform scale
        let normal = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(cgmath::Matrix4::identity);
        ModelUniform {
            model: model.into(),
            normal: normal.into(),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

/// One geometry drawn with one material.
#[derive(Debug)]
pub struct MeshNode {
    pub name: String,
    pub mesh: Mesh,
    pub material: Material,
    pub transform: Transform,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl MeshNode {
    pub fn new(
        ctx: &Context,
        name: &str,
        data: &MeshData,
        material: Material,
        transform: Transform,
    ) -> Self {
        let mesh = Mesh::new(&ctx.device, data, name);
        log::debug!(
            "{name}: {} textured={} procedural={} lit={}",
            material.label,
            material.has(Capability::TexturedSurface),
            material.has(Capability::ProceduralShaded),
            material.is_lit(),
        );
        let buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Model Buffer", name)),
            contents: bytemuck::cast_slice(&[transform.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &ctx.model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("model_bind_group"),
        });
        Self {
            name: name.to_string(),
            mesh,
            material,
            transform,
            buffer,
            bind_group,
        }
    }
}

/// Scene graph root. Owns every mesh node and the optional scene lights.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<MeshNode>,
    lights: Option<LightResources>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: MeshNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn node(&self, name: &str) -> Option<&MeshNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut MeshNode> {
        self.nodes.iter_mut().find(|node| node.name == name)
    }

    pub fn set_lights(&mut self, lights: LightResources) {
        self.lights = Some(lights);
    }

    pub fn lights_mut(&mut self) -> Option<&mut LightResources> {
        self.lights.as_mut()
    }

    /// Upload transforms and lights and pick up finished texture loads.
    pub fn write_to_buffer(&mut self, ctx: &Context) {
        for node in &mut self.nodes {
            if node.material.is_loading() {
                node.material.poll(&ctx.device, &ctx.queue);
            }
            ctx.queue.write_buffer(
                &node.buffer,
                0,
                bytemuck::cast_slice(&[node.transform.to_uniform()]),
            );
        }
        if let Some(lights) = &self.lights {
            lights.write(&ctx.queue);
        }
    }

    /// Whether any colour map is still on its way.
    pub fn is_loading(&self) -> bool {
        self.nodes.iter().any(|node| node.material.is_loading())
    }

    pub fn draw(&self, ctx: &Context, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
        for node in &self.nodes {
            node.material.bind(render_pass);
            render_pass.set_bind_group(1, &node.bind_group, &[]);
            if node.material.is_lit() {
                match &self.lights {
                    Some(lights) => render_pass.set_bind_group(3, &lights.bind_group, &[]),
                    None => {
                        log::warn!("{} needs scene lights, skipping it", node.name);
                        continue;
                    }
                }
            }
            node.mesh.draw(render_pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Rad, Rotation3, Vector4};

    #[test]
    fn identity_transform() {
        let uniform = Transform::new().to_uniform();
        let identity: [[f32; 4]; 4] = cgmath::Matrix4::identity().into();
        assert_eq!(uniform.model, identity);
        assert_eq!(uniform.normal, identity);
    }

    #[test]
    fn translation_then_rotation() {
        let transform = Transform {
            rotation: cgmath::Quaternion::from_angle_y(Rad(std::f32::consts::FRAC_PI_2)),
            ..Transform::at([1.0, 0.0, 0.0])
        };
        let p = transform.to_matrix() * Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn normals_survive_non_uniform_scale() {
        let transform = Transform {
            scale: cgmath::Vector3::new(2.0, 1.0, 1.0),
            ..Transform::new()
        };
        let normal: cgmath::Matrix4<f32> = transform.to_uniform().normal.into();
        let n = normal * Vector4::new(1.0, 0.0, 0.0, 0.0);
        assert_relative_eq!(n.x, 0.5, epsilon = 1e-6);
    }
}
