#![allow(dead_code)]

use ripple_ngin::{
    Demo, Duration, Session, config::Config, context::Context, flow::ControlBinding,
};

/// Demo that draws nothing and records how it was driven.
pub(crate) struct Counting {
    pub(crate) config: Config,
    pub(crate) updates: u32,
    pub(crate) last_elapsed: Option<Duration>,
}

impl Counting {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config,
            updates: 0,
            last_elapsed: None,
        }
    }
}

impl Default for Counting {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Demo for Counting {
    fn config(&self) -> Config {
        self.config.clone()
    }

    fn on_init(&mut self, _: &Context) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_update(&mut self, _: &mut Session, elapsed: Duration) {
        self.updates += 1;
        self.last_elapsed = Some(elapsed);
    }

    fn write_to_buffer(&mut self, _: &Context) {}

    fn on_render(&self, _: &Context, _: &mut wgpu::RenderPass<'_>) {}

    fn controls(&mut self) -> Option<ControlBinding<'_>> {
        None
    }
}

/// Runtime, offscreen context and an initialised demo with a frozen clock.
#[cfg(feature = "integration-tests")]
pub(crate) fn headless(
    mut demo: Box<dyn Demo>,
    width: u32,
    height: u32,
    elapsed: Duration,
) -> (tokio::runtime::Runtime, Context, Session, Box<dyn Demo>) {
    use ripple_ngin::{clock::Clock, resources::Loader};

    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let config = demo.config();
    let loader = Loader::new(runtime.handle().clone());
    let ctx = runtime
        .block_on(Context::headless(width, height, loader, &config))
        .expect("headless context");
    demo.on_init(&ctx).expect("demo init");
    let mut session = Session::new(&config, width, height);
    session.clock = Clock::frozen_at(elapsed);
    (runtime, ctx, session, demo)
}

/// One full tick rendered offscreen.
#[cfg(feature = "integration-tests")]
pub(crate) fn capture(
    runtime: &tokio::runtime::Runtime,
    ctx: &mut Context,
    session: &mut Session,
    demo: &mut dyn Demo,
) -> image::RgbaImage {
    assert_eq!(ripple_ngin::advance(session, demo), ripple_ngin::LoopState::Running);
    ctx.camera
        .write(&ctx.queue, &session.camera, &session.projection);
    demo.write_to_buffer(ctx);
    runtime
        .block_on(ripple_ngin::render::render_to_image(ctx, demo))
        .expect("offscreen render")
}
