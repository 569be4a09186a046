//! Frame recording and offscreen capture.

use crate::{context::Context, flow::Demo};

/// Record one frame of `demo` into `target`, cleared to the context's clear colour.
pub fn draw_frame(
    ctx: &Context,
    demo: &dyn Demo,
    target: &wgpu::TextureView,
    depth: &wgpu::TextureView,
) -> wgpu::CommandBuffer {
    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(ctx.clear_colour),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        demo.on_render(ctx, &mut render_pass);
    }
    encoder.finish()
}

/// Draw one frame of `demo` offscreen and read it back.
///
/// The caller is expected to have run the tick (`flow::advance`, camera and
/// demo buffer uploads) beforehand.
#[cfg(feature = "integration-tests")]
pub async fn render_to_image(ctx: &Context, demo: &dyn Demo) -> anyhow::Result<image::RgbaImage> {
    use anyhow::Context as _;

    let (width, height) = ctx.size();
    let extent = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Output Texture"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: ctx.config.format,
        usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let draw = draw_frame(ctx, demo, &view, ctx.depth_view());

    // rows of a buffer copy must be 256 byte aligned
    let unpadded_row = 4 * width;
    let padded_row = unpadded_row.next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
    let output_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        size: (padded_row * height) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        label: Some("Offscreen Readback Buffer"),
        mapped_at_creation: false,
    });
    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Readback Encoder"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(height),
            },
        },
        extent,
    );
    ctx.queue.submit([draw, encoder.finish()]);

    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    let buffer_slice = output_buffer.slice(..);
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    ctx.device
        .poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(std::time::Duration::from_secs(3)),
        })
        .context("GPU did not finish the offscreen frame")?;
    rx.receive()
        .await
        .context("Readback was dropped")?
        .context("Could not map the readback buffer")?;

    let data = buffer_slice.get_mapped_range();
    let mut pixels = Vec::with_capacity((unpadded_row * height) as usize);
    for row in data.chunks(padded_row as usize) {
        pixels.extend_from_slice(&row[..unpadded_row as usize]);
    }
    drop(data);
    output_buffer.unmap();

    image::RgbaImage::from_raw(width, height, pixels).context("Readback has the wrong size")
}
