//! Closed-form motion driven by elapsed time.

use cgmath::{Point3, Quaternion, Rad, Rotation3, Vector3};

/// Circular path around the Y axis at a fixed height.
///
/// At time `t` (seconds) the position is `(R·sin(ω·t), h, R·cos(ω·t))`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircularOrbit {
    pub radius: f32,
    /// Radians per second.
    pub angular_speed: f32,
    pub height: f32,
}

impl CircularOrbit {
    pub fn position(&self, seconds: f32) -> Point3<f32> {
        let angle = self.angular_speed * seconds;
        Point3::new(
            self.radius * angle.sin(),
            self.height,
            self.radius * angle.cos(),
        )
    }
}

/// Constant rotation about an axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    pub axis: Vector3<f32>,
    /// Radians per second.
    pub angular_speed: f32,
}

impl Spin {
    pub fn rotation(&self, seconds: f32) -> Quaternion<f32> {
        Quaternion::from_axis_angle(self.axis, Rad(self.angular_speed * seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn orbit_matches_closed_form_at_quarter_turns() {
        let orbit = CircularOrbit {
            radius: 6.0,
            angular_speed: 0.5,
            height: 2.0,
        };
        assert_eq!(orbit.position(0.0), Point3::new(0.0, 2.0, 6.0));
        let quarter = orbit.position(PI / (2.0 * 0.5));
        assert_relative_eq!(quarter.x, 6.0, epsilon = 1e-5);
        assert_relative_eq!(quarter.z, 0.0, epsilon = 1e-5);
        let half = orbit.position(PI / 0.5);
        assert_relative_eq!(half.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(half.z, -6.0, epsilon = 1e-5);
    }

    #[test]
    fn spin_turns_x_into_minus_z_after_quarter_turn() {
        let spin = Spin {
            axis: Vector3::unit_y(),
            angular_speed: 0.5,
        };
        let turned = spin.rotation(PI) * Vector3::unit_x();
        assert_relative_eq!(turned.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(turned.z, -1.0, epsilon = 1e-5);
    }
}
