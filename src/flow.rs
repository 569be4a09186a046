//! Flow control and application event loop.
//!
//! A [`Demo`] is one self-contained animated scene. The runner owns the GPU
//! [`Context`], the demo's [`Session`] and the demo itself, and drives them
//! from winit's event loop:
//!
//! 1. on start: create the window and GPU context, call `on_init`
//! 2. route pointer input to the orbit controller and keys to the control panel
//! 3. on every redraw: [`advance`] one tick, upload buffers, draw, request the next redraw
//! 4. on resize: update the session and reconfigure the surface right away
//!
//! The loop runs until its [`LoopToken`] is cancelled, the window is closed or
//! `Escape` is pressed.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use instant::Duration;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    config::Config,
    context::Context,
    controls::ControlPanel,
    data_structures::uniforms::UniformSet,
    render::draw_frame,
    resources::Loader,
    session::Session,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Cancellation token checked once per tick. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct LoopToken(Arc<AtomicBool>);

impl LoopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// A demo's debug panel together with the uniforms it edits.
pub struct ControlBinding<'a> {
    pub panel: &'a mut ControlPanel,
    pub uniforms: &'a mut UniformSet,
}

/// One animated scene.
///
/// CPU state (uniforms, transforms, light positions) lives in the demo and is
/// changed in [`Demo::on_update`]; GPU copies are refreshed in
/// [`Demo::write_to_buffer`] right before drawing.
pub trait Demo {
    /// Window, camera and orbit-control settings.
    fn config(&self) -> Config;

    /// Build meshes, materials and lights. Called once the GPU context exists.
    fn on_init(&mut self, ctx: &Context) -> anyhow::Result<()>;

    /// Advance time-dependent state to `elapsed` since the session started.
    fn on_update(&mut self, session: &mut Session, elapsed: Duration);

    /// Upload changed state to the GPU.
    fn write_to_buffer(&mut self, ctx: &Context);

    fn on_render(&self, ctx: &Context, render_pass: &mut wgpu::RenderPass<'_>);

    /// The debug panel, for demos that expose one.
    fn controls(&mut self) -> Option<ControlBinding<'_>> {
        None
    }
}

impl std::fmt::Debug for dyn Demo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Demo").field("title", &self.config().title).finish()
    }
}

/// Run a single tick of the render loop's state update.
///
/// Returns [`LoopState::Stopped`] without touching any state once the
/// session's token is cancelled.
pub fn advance(session: &mut Session, demo: &mut dyn Demo) -> LoopState {
    if session.token().is_cancelled() {
        return LoopState::Stopped;
    }
    let elapsed = session.elapsed();
    demo.on_update(session, elapsed);
    if let Some(orbit) = &mut session.orbit {
        orbit.update(&mut session.camera);
    }
    LoopState::Running
}

/// Everything that exists once initialisation finished.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    pub(crate) session: Session,
    demo: Box<dyn Demo>,
}

impl AppState {
    fn new(ctx: Context, mut demo: Box<dyn Demo>, config: &Config, token: LoopToken) -> anyhow::Result<Self> {
        demo.on_init(&ctx)?;
        let (width, height) = ctx.size();
        let mut session = Session::with_token(config, width, height, token);
        if let Some(window) = ctx.window() {
            session.set_scale_factor(window.scale_factor());
        }
        Ok(Self { ctx, session, demo })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.session.resize(width, height) {
            self.ctx.resize(width, height);
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ctx
            .camera
            .write(&self.ctx.queue, &self.session.camera, &self.session.projection);
        self.demo.write_to_buffer(&self.ctx);

        let Some(surface) = &self.ctx.surface else {
            return Ok(());
        };
        let output = surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let commands = draw_frame(&self.ctx, self.demo.as_ref(), &view, self.ctx.depth_view());
        self.ctx.queue.submit(std::iter::once(commands));
        output.present();
        Ok(())
    }
}

pub(crate) enum FlowEvent {
    #[allow(dead_code)]
    Initialized(anyhow::Result<AppState>),
}

impl std::fmt::Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(Ok(_)) => f.write_str("Initialized(Ok)"),
            Self::Initialized(Err(e)) => write!(f, "Initialized(Err({e}))"),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    config: Config,
    token: LoopToken,
    // Held until the context exists, then moved into `state`.
    demo: Option<Box<dyn Demo>>,
    state: Option<AppState>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, demo: Box<dyn Demo>, token: LoopToken) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config: demo.config(),
            token,
            demo: Some(demo),
            state: None,
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        self.token.cancel();
        event_loop.exit();
    }

    fn initialized(&mut self, event_loop: &ActiveEventLoop, state: anyhow::Result<AppState>) {
        match state {
            Ok(mut state) => {
                if let Some(window) = state.ctx.window().cloned() {
                    let size = window.inner_size();
                    state.resize(size.width, size.height);
                    window.request_redraw();
                }
                log::info!("{} running", self.config.title);
                self.state = Some(state);
            }
            Err(e) => self.fail(event_loop, e.context("Demo initialization failed")),
        }
    }

    fn window_attributes(&self) -> anyhow::Result<winit::window::WindowAttributes> {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title(&self.config.title);

        #[cfg(target_arch = "wasm32")]
        {
            use anyhow::Context as _;
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let window = web_sys::window().context("No browser window")?;
            let document = window.document().context("No document")?;
            let canvas = document
                .get_element_by_id(&self.config.canvas_id)
                .with_context(|| format!("No element with id {:?}", self.config.canvas_id))?;
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        Ok(window_attributes)
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(demo) = self.demo.take() else {
            return;
        };
        let window = match self
            .window_attributes()
            .and_then(|attributes| Ok(event_loop.create_window(attributes)?))
        {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.context("Could not open a window")),
        };

        #[cfg(not(target_arch = "wasm32"))]
        let loader = Loader::new(self.async_runtime.handle().clone());
        #[cfg(target_arch = "wasm32")]
        let loader = Loader::new();

        let config = self.config.clone();
        let token = self.token.clone();
        let init_future = async move {
            let ctx = Context::new(window, loader, &config).await?;
            AppState::new(ctx, demo, &config, token)
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let state = self.async_runtime.block_on(init_future);
            self.initialized(event_loop, state);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let state = init_future.await;
                if proxy.send_event(FlowEvent::Initialized(state)).is_err() {
                    log::error!("Event loop closed before the demo was initialized");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            // sent by the wasm `spawn_local` in `resumed`
            FlowEvent::Initialized(state) => self.initialized(event_loop, state),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        if let Some(orbit) = &mut state.session.orbit {
            orbit.handle_window_events(&event);
        }

        match event {
            WindowEvent::CloseRequested => {
                self.token.cancel();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                state.session.set_scale_factor(scale_factor);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => {
                    self.token.cancel();
                    event_loop.exit();
                }
                code => {
                    if let Some(binding) = state.demo.controls() {
                        binding.panel.handle_key(code, binding.uniforms);
                    }
                }
            },
            WindowEvent::RedrawRequested => {
                if advance(&mut state.session, state.demo.as_mut()) == LoopState::Stopped {
                    log::info!("Render loop stopped");
                    event_loop.exit();
                    return;
                }
                match state.render() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let (width, height) = state.ctx.size();
                        state.ctx.resize(width, height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
                if let Some(window) = state.ctx.window() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.token.is_cancelled() {
            event_loop.exit();
        }
    }
}

/// Run `demo` in a window until it is closed.
pub fn run(demo: Box<dyn Demo>) -> anyhow::Result<()> {
    run_with_token(demo, LoopToken::new())
}

/// Run `demo` until the window is closed or `token` is cancelled.
pub fn run_with_token(demo: Box<dyn Demo>, token: LoopToken) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        // a second demo on the same page keeps the first logger
        console_log::init_with_level(log::Level::Info).ok();
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, demo, token)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn run_demo(name: &str) -> Result<(), JsValue> {
    let demo = crate::demos::by_name(name)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown demo {name:?}")))?;
    run(demo).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_clones_share_cancellation() {
        let token = LoopToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
