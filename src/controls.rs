//! Debug control panel bound to shader uniforms.
//!
//! A [`ControlPanel`] lists the uniforms a demo exposes for live tweaking. Each
//! [`Control`] declares a range and a step (or takes a hex colour); every edit
//! is clamped, snapped and written straight into the [`UniformSet`].
//!
//! The panel is driven from the keyboard: `Tab` walks through the controls and
//! the up/down arrows nudge the selected one by a single step.

use thiserror::Error;
use winit::keyboard::KeyCode;

use crate::data_structures::uniforms::{Color, UniformError, UniformKind, UniformSet};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlKind {
    /// A scalar uniform.
    Range { min: f32, max: f32, step: f32 },
    /// One component of a vec2 uniform.
    Component {
        index: usize,
        min: f32,
        max: f32,
        step: f32,
    },
    Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Control {
    pub label: String,
    pub uniform: String,
    pub kind: ControlKind,
}

impl Control {
    pub fn range(label: &str, uniform: &str, min: f32, max: f32, step: f32) -> Self {
        Self {
            label: label.to_string(),
            uniform: uniform.to_string(),
            kind: ControlKind::Range { min, max, step },
        }
    }

    pub fn component(label: &str, uniform: &str, index: usize, min: f32, max: f32, step: f32) -> Self {
        Self {
            label: label.to_string(),
            uniform: uniform.to_string(),
            kind: ControlKind::Component {
                index,
                min,
                max,
                step,
            },
        }
    }

    pub fn color(label: &str, uniform: &str) -> Self {
        Self {
            label: label.to_string(),
            uniform: uniform.to_string(),
            kind: ControlKind::Color,
        }
    }

    fn bounds(&self) -> Option<(f32, f32, f32)> {
        match self.kind {
            ControlKind::Range { min, max, step } => Some((min, max, step)),
            ControlKind::Component { min, max, step, .. } => Some((min, max, step)),
            ControlKind::Color => None,
        }
    }

    /// The value an edit to `value` would store, or `None` for colour controls.
    pub fn constrain(&self, value: f32) -> Option<f32> {
        self.bounds().map(|(min, max, step)| snap(value, min, max, step))
    }

    fn read(&self, uniforms: &UniformSet) -> Result<f32, UniformError> {
        match self.kind {
            ControlKind::Component { index, .. } => uniforms
                .vec2(&self.uniform)?
                .get(index)
                .copied()
                .ok_or_else(|| UniformError::Component {
                    name: self.uniform.clone(),
                    index,
                }),
            _ => uniforms.scalar(&self.uniform),
        }
    }

    fn write(&self, uniforms: &mut UniformSet, value: f32) -> Result<(), UniformError> {
        match self.kind {
            ControlKind::Component { index, .. } => {
                uniforms.set_vec2_component(&self.uniform, index, value)
            }
            _ => uniforms.set_scalar(&self.uniform, value),
        }
    }

    fn expected_kind(&self) -> UniformKind {
        match self.kind {
            ControlKind::Range { .. } => UniformKind::Scalar,
            ControlKind::Component { .. } => UniformKind::Vec2,
            ControlKind::Color => UniformKind::Color,
        }
    }
}

/// Clamp `value` into `[min, max]` and snap it onto the `min + k·step` grid.
///
/// The bounds themselves are always reachable exactly, even when the range is
/// not a whole number of steps. A value already on the grid is returned
/// unchanged rather than recomputed, so `0.005` stays `0.005`.
pub fn snap(value: f32, min: f32, max: f32, step: f32) -> f32 {
    if value.is_nan() || value <= min {
        return min;
    }
    if value >= max {
        return max;
    }
    if step <= 0.0 {
        return value;
    }
    let candidate = min + ((value - min) / step).round() * step;
    if (candidate - value).abs() <= step * 1e-4 {
        return value;
    }
    candidate.clamp(min, max)
}

#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("no control labelled `{0}`")]
    Unknown(String),
    #[error("control `{0}` does not take numbers")]
    NotNumeric(String),
    #[error("control `{0}` does not take colours")]
    NotColor(String),
    #[error(transparent)]
    Uniform(#[from] UniformError),
}

#[derive(Clone, Debug, Default)]
pub struct ControlPanel {
    pub title: String,
    controls: Vec<Control>,
    selected: usize,
}

impl ControlPanel {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn add(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn get(&self, label: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.label == label)
    }

    fn control(&self, label: &str) -> Result<&Control, ControlError> {
        self.get(label)
            .ok_or_else(|| ControlError::Unknown(label.to_string()))
    }

    /// Check that every control points at an existing uniform of the right shape.
    pub fn validate(&self, uniforms: &UniformSet) -> Result<(), ControlError> {
        for control in &self.controls {
            let value = uniforms
                .get(&control.uniform)
                .ok_or_else(|| UniformError::Unknown(control.uniform.clone()))?;
            if value.kind() != control.expected_kind() {
                return Err(UniformError::KindMismatch {
                    name: control.uniform.clone(),
                    expected: value.kind(),
                    found: control.expected_kind(),
                }
                .into());
            }
            match control.kind {
                ControlKind::Component { index, .. } if index >= 2 => {
                    return Err(UniformError::Component {
                        name: control.uniform.clone(),
                        index,
                    }
                    .into());
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Edit a numeric control. Returns the value actually stored.
    pub fn set(&self, uniforms: &mut UniformSet, label: &str, value: f32) -> Result<f32, ControlError> {
        let control = self.control(label)?;
        let stored = control
            .constrain(value)
            .ok_or_else(|| ControlError::NotNumeric(label.to_string()))?;
        control.write(uniforms, stored)?;
        log::info!("{}: {} = {}", self.title, control.label, stored);
        Ok(stored)
    }

    /// Edit a colour control from a `#rrggbb` string.
    pub fn set_hex(&self, uniforms: &mut UniformSet, label: &str, hex: &str) -> Result<Color, ControlError> {
        let control = self.control(label)?;
        if control.kind != ControlKind::Color {
            return Err(ControlError::NotColor(label.to_string()));
        }
        let colour = Color::from_hex(hex)?;
        uniforms.set_color(&control.uniform, colour)?;
        log::info!("{}: {} = {}", self.title, control.label, colour.to_hex());
        Ok(colour)
    }

    pub fn selected(&self) -> Option<&Control> {
        self.controls.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.controls.is_empty() {
            self.selected = (self.selected + 1) % self.controls.len();
            if let Some(control) = self.selected() {
                log::info!("{}: selected {}", self.title, control.label);
            }
        }
    }

    /// Move the selected numeric control by `steps` steps.
    ///
    /// Returns `Ok(None)` when the selection is a colour control.
    pub fn nudge(&self, uniforms: &mut UniformSet, steps: i32) -> Result<Option<f32>, ControlError> {
        let Some(control) = self.selected() else {
            return Ok(None);
        };
        let Some((_, _, step)) = control.bounds() else {
            return Ok(None);
        };
        let current = control.read(uniforms)?;
        let label = control.label.clone();
        self.set(uniforms, &label, current + steps as f32 * step).map(Some)
    }

    /// Keyboard binding. Returns whether the key was meant for the panel.
    pub fn handle_key(&mut self, key: KeyCode, uniforms: &mut UniformSet) -> bool {
        let result = match key {
            KeyCode::Tab => {
                self.select_next();
                return true;
            }
            KeyCode::ArrowUp => self.nudge(uniforms, 1),
            KeyCode::ArrowDown => self.nudge(uniforms, -1),
            _ => return false,
        };
        if let Err(e) = result {
            log::warn!("{}: {}", self.title, e);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sea() -> (ControlPanel, UniformSet) {
        let uniforms = UniformSet::new()
            .with("elevation", 0.2_f32)
            .with("frequency", [4.0_f32, 1.5])
            .with("depth_color", Color::from_rgb_u32(0x186691));
        let panel = ControlPanel::new("sea")
            .add(Control::range("elevation", "elevation", 0.0, 1.0, 0.001))
            .add(Control::component("frequency x", "frequency", 0, 0.0, 10.0, 0.001))
            .add(Control::component("frequency y", "frequency", 1, 0.0, 10.0, 0.001))
            .add(Control::color("depth colour", "depth_color"));
        (panel, uniforms)
    }

    #[test]
    fn snaps_and_clamps() {
        assert_eq!(snap(0.37, 0.0, 1.0, 0.25), 0.25);
        assert_eq!(snap(0.38, 0.0, 1.0, 0.25), 0.5);
        assert_eq!(snap(-3.0, 0.0, 1.0, 0.25), 0.0);
        assert_eq!(snap(7.0, 0.0, 1.0, 0.25), 1.0);
        assert_eq!(snap(f32::NAN, 0.5, 1.0, 0.25), 0.5);
        // 1.0 is not on the 0.3 grid but stays reachable
        assert_eq!(snap(1.0, 0.0, 1.0, 0.3), 1.0);
        assert_relative_eq!(snap(0.95, 0.0, 1.0, 0.3), 0.9, epsilon = 1e-6);
    }

    #[test]
    fn on_grid_values_are_stored_exactly() {
        let (panel, mut uniforms) = sea();
        for k in 0..=1000 {
            let value: f32 = format!("{}", k as f64 / 1000.0).parse().unwrap();
            assert_eq!(snap(value, 0.0, 1.0, 0.001), value, "snap({value})");
            assert_eq!(panel.set(&mut uniforms, "elevation", value).unwrap(), value);
            assert_eq!(uniforms.scalar("elevation").unwrap(), value);
        }
    }

    #[test]
    fn out_of_range_component_is_rejected_not_indexed() {
        let (panel, mut uniforms) = sea();
        let mut broken = panel.add(Control::component("frequency z", "frequency", 2, 0.0, 10.0, 0.001));
        let component_error = || {
            ControlError::Uniform(UniformError::Component {
                name: "frequency".into(),
                index: 2,
            })
        };
        assert_eq!(broken.validate(&uniforms), Err(component_error()));
        assert_eq!(
            broken.set(&mut uniforms, "frequency z", 1.0),
            Err(component_error())
        );
        for _ in 0..4 {
            broken.handle_key(KeyCode::Tab, &mut uniforms);
        }
        assert_eq!(broken.selected().unwrap().label, "frequency z");
        assert_eq!(broken.nudge(&mut uniforms, 1), Err(component_error()));
        let before = uniforms.clone();
        assert!(broken.handle_key(KeyCode::ArrowUp, &mut uniforms));
        assert_eq!(uniforms, before);
    }

    #[test]
    fn frequency_at_maximum_reads_exactly_maximum() {
        let (panel, mut uniforms) = sea();
        assert_eq!(panel.set(&mut uniforms, "frequency x", 10.0).unwrap(), 10.0);
        assert_eq!(uniforms.vec2("frequency").unwrap(), [10.0, 1.5]);
        assert_eq!(panel.set(&mut uniforms, "frequency y", 99.0).unwrap(), 10.0);
        assert_eq!(uniforms.vec2("frequency").unwrap(), [10.0, 10.0]);
    }

    #[test]
    fn in_range_edit_lands_on_step_grid() {
        let (panel, mut uniforms) = sea();
        let stored = panel.set(&mut uniforms, "elevation", 0.5).unwrap();
        assert_relative_eq!(stored, 0.5, epsilon = 1e-6);
        assert_eq!(uniforms.scalar("elevation").unwrap(), stored);
    }

    #[test]
    fn colour_edits_reencode_hex() {
        let (panel, mut uniforms) = sea();
        let colour = panel.set_hex(&mut uniforms, "depth colour", "#ff0000").unwrap();
        assert_eq!(colour, Color::new(1.0, 0.0, 0.0));
        assert_eq!(uniforms.color("depth_color").unwrap(), colour);
        assert_eq!(
            panel.set_hex(&mut uniforms, "depth colour", "red"),
            Err(ControlError::Uniform(UniformError::InvalidHex("red".into())))
        );
        assert_eq!(
            panel.set(&mut uniforms, "depth colour", 1.0),
            Err(ControlError::NotNumeric("depth colour".into()))
        );
        assert_eq!(
            panel.set_hex(&mut uniforms, "elevation", "#ffffff"),
            Err(ControlError::NotColor("elevation".into()))
        );
    }

    #[test]
    fn unknown_labels_are_reported() {
        let (panel, mut uniforms) = sea();
        assert_eq!(
            panel.set(&mut uniforms, "speed", 1.0),
            Err(ControlError::Unknown("speed".into()))
        );
    }

    #[test]
    fn validation_catches_mismatched_bindings() {
        let (panel, uniforms) = sea();
        assert_eq!(panel.validate(&uniforms), Ok(()));
        let broken = panel.add(Control::range("oops", "frequency", 0.0, 1.0, 0.1));
        assert!(matches!(
            broken.validate(&uniforms),
            Err(ControlError::Uniform(UniformError::KindMismatch { .. }))
        ));
    }

    #[test]
    fn keyboard_walks_and_nudges() {
        let (mut panel, mut uniforms) = sea();
        assert!(panel.handle_key(KeyCode::ArrowUp, &mut uniforms));
        assert_relative_eq!(uniforms.scalar("elevation").unwrap(), 0.201, epsilon = 1e-6);
        assert!(panel.handle_key(KeyCode::Tab, &mut uniforms));
        assert_eq!(panel.selected().unwrap().label, "frequency x");
        assert!(panel.handle_key(KeyCode::ArrowDown, &mut uniforms));
        assert_relative_eq!(uniforms.vec2("frequency").unwrap()[0], 3.999, epsilon = 1e-5);
        panel.handle_key(KeyCode::Tab, &mut uniforms);
        panel.handle_key(KeyCode::Tab, &mut uniforms);
        // colour controls ignore nudges
        let before = uniforms.clone();
        assert!(panel.handle_key(KeyCode::ArrowUp, &mut uniforms));
        assert_eq!(uniforms, before);
        assert!(!panel.handle_key(KeyCode::KeyQ, &mut uniforms));
    }
}
