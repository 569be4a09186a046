//! Lit, textured surfaces (the globe).

use crate::data_structures::{
    geometry::{ModelVertex, Vertex},
    texture::DepthTexture,
};

pub fn mk_textured_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    model_bind_group_layout: &wgpu::BindGroupLayout,
    material_bind_group_layout: &wgpu::BindGroupLayout,
    light_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Textured Pipeline Layout"),
        bind_group_layouts: &[
            camera_bind_group_layout,
            model_bind_group_layout,
            material_bind_group_layout,
            light_bind_group_layout,
        ],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Textured Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("textured.wgsl").into()),
    };
    super::mk_render_pipeline(
        device,
        "Textured Pipeline",
        &layout,
        color_format,
        Some(DepthTexture::FORMAT),
        &[ModelVertex::desc()],
        shader,
        Some(wgpu::Face::Back),
    )
}
