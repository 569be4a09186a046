//! Primitive shapes and their GPU buffers.
//!
//! The builders produce plain [`MeshData`] (vertices + triangle list) so shapes
//! can be inspected without a device. [`Mesh::new`] uploads them.

use std::f32::consts::PI;

use cgmath::{ElementWise, InnerSpace, Vector3};
use wgpu::util::DeviceExt;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// CPU-side triangle list.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// UV sphere centred at the origin.
    ///
    /// Seams and pole handling follow the usual longitude/latitude layout:
    /// `(width_segments + 1) * (height_segments + 1)` vertices, with the
    /// degenerate triangles at both poles dropped.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let mut vertices = Vec::new();
        let mut grid = Vec::new();

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            // nudge pole texels to the middle of their segment
            let u_offset = if iy == 0 {
                0.5 / width_segments as f32
            } else if iy == height_segments {
                -0.5 / width_segments as f32
            } else {
                0.0
            };
            let mut row = Vec::new();
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let (phi, theta) = (u * 2.0 * PI, v * PI);
                let position = Vector3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                let normal = if position.magnitude2() > 0.0 {
                    position.normalize()
                } else {
                    Vector3::unit_y()
                };
                row.push(vertices.len() as u32);
                vertices.push(ModelVertex {
                    position: position.into(),
                    tex_coords: [u + u_offset, v],
                    normal: normal.into(),
                });
            }
            grid.push(row);
        }

        let mut indices = Vec::new();
        for iy in 0..height_segments as usize {
            for ix in 0..width_segments as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments as usize - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        Self { vertices, indices }
    }

    /// Subdivided plane in the XY plane facing +Z.
    pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Self {
        let (gx, gy) = (width_segments.max(1), height_segments.max(1));
        let (segment_w, segment_h) = (width / gx as f32, height / gy as f32);
        let mut vertices = Vec::with_capacity(((gx + 1) * (gy + 1)) as usize);

        for iy in 0..=gy {
            let y = iy as f32 * segment_h - height / 2.0;
            for ix in 0..=gx {
                let x = ix as f32 * segment_w - width / 2.0;
                vertices.push(ModelVertex {
                    position: [x, -y, 0.0],
                    tex_coords: [ix as f32 / gx as f32, iy as f32 / gy as f32],
                    normal: [0.0, 0.0, 1.0],
                });
            }
        }

        let row = gx + 1;
        let mut indices = Vec::with_capacity((gx * gy * 6) as usize);
        for iy in 0..gy {
            for ix in 0..gx {
                let a = ix + row * iy;
                let b = ix + row * (iy + 1);
                let c = (ix + 1) + row * (iy + 1);
                let d = (ix + 1) + row * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        Self { vertices, indices }
    }

    /// Axis-aligned box with one quad per face and flat normals.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vector3::new(width / 2.0, height / 2.0, depth / 2.0);
        // (normal, u, v) with u x v == normal so corners wind CCW from outside
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        let corners = [
            (-1.0, -1.0, [0.0, 1.0]),
            (1.0, -1.0, [1.0, 1.0]),
            (1.0, 1.0, [1.0, 0.0]),
            (-1.0, 1.0, [0.0, 0.0]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (n, u, v) in faces {
            let (n, u, v) = (Vector3::from(n), Vector3::from(u), Vector3::from(v));
            let base = vertices.len() as u32;
            for (su, sv, tex_coords) in corners {
                let position = n.mul_element_wise(half)
                    + u.mul_element_wise(half) * su
                    + v.mul_element_wise(half) * sv;
                vertices.push(ModelVertex {
                    position: position.into(),
                    tex_coords,
                    normal: n.into(),
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self { vertices, indices }
    }
}

/// A mesh living on the GPU.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl Mesh {
    pub fn new(device: &wgpu::Device, data: &MeshData, name: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: data.indices.len() as u32,
        }
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.num_elements, 0, 0..1);
    }
}
