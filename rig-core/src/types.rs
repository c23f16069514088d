use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Four ordered corners of a rotated rectangle:
/// front-left, front-right, rear-right, rear-left.
pub type Corners = [Vec2; 4];

/// Position and heading of a rigid body in world space.
///
/// World space is y-down (screen convention). Heading `0` faces `-Y`
/// and positive heading turns the nose clockwise, so the forward unit
/// vector is `(sin(heading), -cos(heading))`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2D {
    pub x: f32,
    pub y: f32,
    /// Radians, kept in `(-π, π]` by every mutating operation in this crate.
    pub heading: f32,
}

impl Pose2D {
    /// Builds a pose, wrapping `heading` into `(-π, π]`.
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self {
            x,
            y,
            heading: normalize_angle(heading),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn set_position(&mut self, pos: Vec2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    #[inline]
    pub fn forward(&self) -> Vec2 {
        forward_dir(self.heading)
    }
}

/// One tick worth of player intent.
///
/// The throttle axis (`accelerate`/`brake`) and the steering axis
/// (`steer_left`/`steer_right`) are sampled independently. When both
/// buttons of one axis are held, `accelerate` and `steer_left` win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlInput {
    pub accelerate: bool,
    /// Brake while rolling forward, reverse once stopped.
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
}

impl ControlInput {
    pub const IDLE: Self = Self {
        accelerate: false,
        brake: false,
        steer_left: false,
        steer_right: false,
    };
}

/// Forward unit vector for a heading (`0` = up / `-Y`).
#[inline]
pub fn forward_dir(heading: f32) -> Vec2 {
    let (sin, cos) = heading.sin_cos();
    Vec2::new(sin, -cos)
}

/// Wraps an angle into `(-π, π]`.
///
/// Values already in range come back bit-for-bit, so wrapping is
/// idempotent. Anything else goes through a closed form whose cost does
/// not grow with the magnitude of the input. Non-finite input is returned
/// untouched so NaN propagates.
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() || (angle > -PI && angle <= PI) {
        return angle;
    }
    // rem_euclid lands in [0, TAU]; shift to [-π, π] and fold -π onto π.
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn normalize_keeps_values_in_half_open_range() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(PI), PI);
        // -π maps onto the closed end of the range.
        assert_eq!(normalize_angle(-PI), PI);
        // 3π sits on the seam; either side of it is within rounding of ±π.
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < EPS);
        assert!((normalize_angle(-2.5 * PI) - (-0.5 * PI)).abs() < EPS);
        assert!((normalize_angle(7.0 * TAU + 0.25) - 0.25).abs() < 1e-4);
    }

    #[test]
    fn normalize_returns_for_huge_finite_angles() {
        for angle in [3.0e8, -3.0e8, 2.0e8, 1.0e20, f32::MAX, f32::MIN] {
            let a = normalize_angle(angle);
            assert!(a > -PI && a <= PI, "normalize_angle({angle}) = {a}");
        }
    }

    #[test]
    fn normalize_is_stable_on_wrapped_values() {
        for angle in [-3.0, -1.0, 0.5, 2.0, 3.1] {
            assert_eq!(normalize_angle(angle), angle);
            let once = normalize_angle(angle + 40.0 * TAU);
            assert!((once - angle).abs() < 1e-3, "{angle} -> {once}");
        }
    }

    #[test]
    fn normalize_passes_nan_through() {
        assert!(normalize_angle(f32::NAN).is_nan());
        assert_eq!(normalize_angle(f32::INFINITY), f32::INFINITY);
    }

    #[test]
    fn forward_dir_follows_screen_convention() {
        let up = forward_dir(0.0);
        assert!((up - Vec2::new(0.0, -1.0)).length() < EPS);

        let right = forward_dir(PI / 2.0);
        assert!((right - Vec2::new(1.0, 0.0)).length() < EPS);

        let down = forward_dir(PI);
        assert!((down - Vec2::new(0.0, 1.0)).length() < EPS);
    }

    #[test]
    fn pose_new_wraps_heading() {
        let pose = Pose2D::new(1.0, 2.0, 3.0 * PI);
        assert_eq!(pose.position(), Vec2::new(1.0, 2.0));
        assert!(pose.heading > -PI && pose.heading <= PI);
    }

    #[test]
    fn idle_input_is_default() {
        assert_eq!(ControlInput::IDLE, ControlInput::default());
    }
}
