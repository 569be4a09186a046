//! Per-demo configuration.
//!
//! Every demo hands the runner a [`Config`] describing its window, clear colour,
//! camera frustum and pose, and whether orbit controls are bound. Values not
//! overridden fall back to [`Config::default`].

use cgmath::{Deg, Point3};

use crate::data_structures::uniforms::Color;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub title: String,
    /// Id of the `<canvas>` element the demo attaches to on the web.
    pub canvas_id: String,
    pub clear_colour: Color,
    pub fov_y: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub camera_position: Point3<f32>,
    pub camera_target: Point3<f32>,
    /// `None` leaves the camera to the demo itself.
    pub orbit_controls: Option<OrbitSettings>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: String::from("ripple-ngin"),
            canvas_id: String::from("canvas"),
            clear_colour: Color::BLACK,
            fov_y: Deg(75.0),
            znear: 0.1,
            zfar: 100.0,
            camera_position: Point3::new(0.0, 0.0, 3.0),
            camera_target: Point3::new(0.0, 0.0, 0.0),
            orbit_controls: Some(OrbitSettings::default()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitSettings {
    /// Fraction of pending rotation applied per frame; `None` disables inertia.
    pub damping: Option<f32>,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            damping: None,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }
}
