//! Materials: a pipeline plus the bind group it reads at group 2.
//!
//! A material has one or both [`Capability`]s. A *textured surface* samples a
//! colour map, which may still be loading: until it arrives a white 1x1
//! placeholder is bound. A *procedurally shaded* material owns a uniform
//! buffer laid out from a [`UniformSet`] and re-uploaded every frame.

use crate::{
    context::Context,
    data_structures::{texture::Texture, uniforms::UniformSet},
    pipelines::{self, light::LightResources},
    resources::PendingTexture,
    shading::ShaderProgram,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    TexturedSurface,
    ProceduralShaded,
}

#[derive(Debug)]
pub struct Material {
    pub label: String,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    uniform_buffer: Option<wgpu::Buffer>,
    map: Option<Texture>,
    pending: Option<PendingTexture>,
    lit: bool,
}

const PLACEHOLDER: [u8; 4] = [255, 255, 255, 255];

impl Material {
    /// Lit material sampling `map` (drawn with the scene lights at group 3).
    pub fn textured(ctx: &Context, lights: &LightResources, map: PendingTexture) -> Self {
        let bind_group_layout = pipelines::material_layout(&ctx.device, false, true);
        let pipeline = pipelines::textured::mk_textured_pipeline(
            &ctx.device,
            ctx.config.format,
            &ctx.camera.bind_group_layout,
            &ctx.model_layout,
            &bind_group_layout,
            &lights.bind_group_layout,
        );
        let placeholder = Texture::create_solid(PLACEHOLDER, &ctx.device, &ctx.queue, &map.name);
        let bind_group = create_bind_group(&ctx.device, &bind_group_layout, None, Some(&placeholder));
        Self {
            label: map.name.clone(),
            pipeline,
            bind_group_layout,
            bind_group,
            uniform_buffer: None,
            map: Some(placeholder),
            pending: Some(map),
            lit: true,
        }
    }

    /// Material running `program` with `uniforms` as its parameter block,
    /// optionally sampling `map`.
    pub fn procedural(
        ctx: &Context,
        program: &ShaderProgram,
        uniforms: &UniformSet,
        map: Option<PendingTexture>,
        cull_mode: Option<wgpu::Face>,
    ) -> Self {
        let textured = program.textured;
        let bind_group_layout = pipelines::material_layout(&ctx.device, true, textured);
        let pipeline = pipelines::procedural::mk_procedural_pipeline(
            &ctx.device,
            ctx.config.format,
            &ctx.camera.bind_group_layout,
            &ctx.model_layout,
            &bind_group_layout,
            program,
            uniforms,
            cull_mode,
        );
        let uniform_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Uniform Buffer", program.label)),
            size: uniforms.byte_size() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        ctx.queue.write_buffer(&uniform_buffer, 0, &uniforms.to_bytes());
        let map_texture = textured
            .then(|| Texture::create_solid(PLACEHOLDER, &ctx.device, &ctx.queue, program.label));
        if !textured && map.is_some() {
            log::warn!("{} does not sample a colour map, ignoring it", program.label);
        }
        let bind_group = create_bind_group(
            &ctx.device,
            &bind_group_layout,
            Some(&uniform_buffer),
            map_texture.as_ref(),
        );
        Self {
            label: program.label.to_string(),
            pipeline,
            bind_group_layout,
            bind_group,
            uniform_buffer: Some(uniform_buffer),
            map: map_texture,
            pending: map.filter(|_| textured),
            lit: false,
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::TexturedSurface => self.map.is_some(),
            Capability::ProceduralShaded => self.uniform_buffer.is_some(),
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &UniformSet) {
        match &self.uniform_buffer {
            Some(buffer) => queue.write_buffer(buffer, 0, &uniforms.to_bytes()),
            None => log::warn!("{} is not procedurally shaded", self.label),
        }
    }

    /// Swap in the colour map once its load has finished.
    pub fn poll(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let Some(pending) = &mut self.pending else {
            return;
        };
        let Some(loaded) = pending.poll(device, queue) else {
            return;
        };
        self.pending = None;
        if let Some(texture) = loaded {
            self.bind_group = create_bind_group(
                device,
                &self.bind_group_layout,
                self.uniform_buffer.as_ref(),
                Some(&texture),
            );
            self.map = Some(texture);
        }
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(2, &self.bind_group, &[]);
    }
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniforms: Option<&wgpu::Buffer>,
    map: Option<&Texture>,
) -> wgpu::BindGroup {
    let mut entries = Vec::new();
    if let Some(buffer) = uniforms {
        entries.push(wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        });
    }
    if let Some(texture) = map {
        entries.push(wgpu::BindGroupEntry {
            binding: 1,
            resource: wgpu::BindingResource::TextureView(&texture.view),
        });
        entries.push(wgpu::BindGroupEntry {
            binding: 2,
            resource: wgpu::BindingResource::Sampler(&texture.sampler),
        });
    }
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &entries,
        label: Some("material_bind_group"),
    })
}
