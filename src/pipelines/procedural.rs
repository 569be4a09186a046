//! Pipelines compiled from a [`ShaderProgram`].

use crate::{
    data_structures::{
        geometry::{ModelVertex, Vertex},
        texture::DepthTexture,
        uniforms::UniformSet,
    },
    shading::ShaderProgram,
};

pub fn mk_procedural_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    model_bind_group_layout: &wgpu::BindGroupLayout,
    material_bind_group_layout: &wgpu::BindGroupLayout,
    program: &ShaderProgram,
    uniforms: &UniformSet,
    cull_mode: Option<wgpu::Face>,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(program.label),
        bind_group_layouts: &[
            camera_bind_group_layout,
            model_bind_group_layout,
            material_bind_group_layout,
        ],
        push_constant_ranges: &[],
    });
    let source = program.compose(uniforms);
    log::debug!("{} compiled as:\n{}", program.label, source);
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some(program.label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    };
    super::mk_render_pipeline(
        device,
        program.label,
        &layout,
        color_format,
        Some(DepthTexture::FORMAT),
        &[ModelVertex::desc()],
        shader,
        cull_mode,
    )
}
