//! The demo session: all mutable per-demo state that is not a GPU resource.
//!
//! A [`Session`] is created once the output surface size is known and is owned
//! by the runner (or by a test). It holds the camera, its projection, the
//! viewport, the clock, the optional orbit controller and the loop token.

use instant::Duration;

use crate::{
    camera::{Camera, OrbitController, Projection},
    clock::Clock,
    config::Config,
    flow::LoopToken,
};

/// Output surface size in physical pixels plus the display's pixel density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

impl Viewport {
    pub fn logical_size(&self) -> (f64, f64) {
        (
            self.width as f64 / self.scale_factor,
            self.height as f64 / self.scale_factor,
        )
    }
}

#[derive(Debug)]
pub struct Session {
    pub camera: Camera,
    pub projection: Projection,
    pub viewport: Viewport,
    pub orbit: Option<OrbitController>,
    pub clock: Clock,
    token: LoopToken,
}

impl Session {
    pub fn new(config: &Config, width: u32, height: u32) -> Self {
        Self::with_token(config, width, height, LoopToken::new())
    }

    pub fn with_token(config: &Config, width: u32, height: u32, token: LoopToken) -> Self {
        let camera = Camera::new(config.camera_position, config.camera_target);
        let projection = Projection::new(width, height, config.fov_y, config.znear, config.zfar);
        let orbit = config.orbit_controls.clone().map(|settings| {
            let mut orbit = OrbitController::new(settings);
            orbit.set_viewport_height(height);
            orbit
        });
        Self {
            camera,
            projection,
            viewport: Viewport {
                width,
                height,
                scale_factor: 1.0,
            },
            orbit,
            clock: Clock::start(),
            token,
        }
    }

    /// Track a new surface size. Zero-sized (minimised) surfaces are ignored;
    /// returns whether anything changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.viewport.width = width;
        self.viewport.height = height;
        self.projection.resize(width, height);
        if let Some(orbit) = &mut self.orbit {
            orbit.set_viewport_height(height);
        }
        true
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.viewport.scale_factor = scale_factor;
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn token(&self) -> &LoopToken {
        &self.token
    }
}
