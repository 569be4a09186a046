//! Sampled image textures and the depth buffer.

use anyhow::Context as _;

/// An sRGB image texture ready to be bound as a material map.
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// A 1x1 texture of a single colour.
    ///
    /// Bound in place of an image that has not finished loading (or failed to
    /// load) so the material renders untextured instead of not at all.
    pub fn create_solid(
        rgba: [u8; 4],
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
    ) -> Self {
        let pixel = image::RgbaImage::from_pixel(1, 1, image::Rgba(rgba));
        Self::from_rgba(device, queue, &pixel, label)
    }

    /// Decode PNG or JPEG file contents.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> anyhow::Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .with_context(|| format!("Could not decode image {label}"))?
            .to_rgba8();
        log::debug!(
            "Decoded {label} ({}x{})",
            decoded.width(),
            decoded.height()
        );
        Ok(Self::from_rgba(device, queue, &decoded, label))
    }

    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &image::RgbaImage,
        label: &str,
    ) -> Self {
        let (width, height) = pixels.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            pixels.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            sampler: map_sampler(device),
            texture,
        }
    }
}

/// Wraps horizontally (the globe's seam) and clamps vertically (its poles,
/// the flag's edges).
fn map_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("map_sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

/// Depth attachment sized to the output surface.
#[derive(Debug)]
pub struct DepthTexture {
    #[allow(unused)]
    texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Zero dimensions are bumped to one.
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}
