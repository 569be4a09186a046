use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    camera::CameraResources, config::Config, data_structures::texture::DepthTexture, pipelines,
    resources::Loader,
};

/// GPU state shared by everything a demo draws.
///
/// Created either for a window ([`Context::new`]) or without one for offscreen
/// rendering ([`Context::headless`]).
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Option<Arc<Window>>,
    pub(crate) depth_texture: DepthTexture,
    pub surface: Option<wgpu::Surface<'static>>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    /// Layout of the per-node transform bind group (group 1).
    pub model_layout: wgpu::BindGroupLayout,
    pub clear_colour: wgpu::Color,
    pub loader: Loader,
}

impl Context {
    pub async fn new(window: Arc<Window>, loader: Loader, demo: &Config) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = create_instance();
        let surface = instance
            .create_surface(window.clone())
            .context("Could not create a drawing surface for the window")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No graphics adapter can render to this window")?;
        let (device, queue) = request_device(&adapter).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Shaders write linear colour, so prefer an sRGB surface.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("The surface supports no texture formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self::assemble(
            Some(window),
            Some(surface),
            device,
            queue,
            config,
            loader,
            demo,
        ))
    }

    /// Context rendering into offscreen targets of the given size.
    pub async fn headless(width: u32, height: u32, loader: Loader, demo: &Config) -> anyhow::Result<Self> {
        let instance = create_instance();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("No graphics adapter available")?;
        let (device, queue) = request_device(&adapter).await?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        Ok(Self::assemble(None, None, device, queue, config, loader, demo))
    }

    fn assemble(
        window: Option<Arc<Window>>,
        surface: Option<wgpu::Surface<'static>>,
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: wgpu::SurfaceConfiguration,
        loader: Loader,
        demo: &Config,
    ) -> Self {
        let camera = CameraResources::new(&device);
        let model_layout = pipelines::uniform_layout(&device, "model_bind_group_layout");
        let depth_texture = DepthTexture::new(&device, config.width, config.height);
        Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            model_layout,
            clear_colour: demo.clear_colour.into(),
            loader,
        }
    }

    /// Resize the output surface and its depth buffer right away.
    /// Zero-sized requests (minimised windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        if let Some(surface) = &self.surface {
            surface.configure(&self.device, &self.config);
        }
        self.depth_texture = DepthTexture::new(&self.device, width, height);
        true
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_texture.view
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }
}

fn create_instance() -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        #[cfg(not(target_arch = "wasm32"))]
        backends: wgpu::Backends::PRIMARY,
        #[cfg(target_arch = "wasm32")]
        backends: wgpu::Backends::GL,
        ..Default::default()
    })
}

async fn request_device(adapter: &wgpu::Adapter) -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    let info = adapter.get_info();
    log::info!("Using adapter \"{}\" ({:?})", info.name, info.backend);
    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: None,
            required_features: wgpu::Features::empty(),
            // WebGL doesn't support all of wgpu's features
            required_limits: if cfg!(target_arch = "wasm32") {
                wgpu::Limits::downlevel_webgl2_defaults()
            } else {
                wgpu::Limits::default()
            },
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
            experimental_features: Default::default(),
        })
        .await
        .context("Could not acquire a rendering device")?;
    device.on_uncaptured_error(Arc::new(|e| {
        log::error!("Uncaptured GPU error: {e}");
    }));
    Ok((device, queue))
}
