//! Tractor (cab) kinematics: steering, throttle and pose integration.
//!
//! The tractor is the only body that receives control input. One tick is
//! three steps, always in this order:
//! 1. [`TractorState::update_steering`]
//! 2. [`TractorState::update_speed`], gated by the current [`ReverseGate`]
//! 3. [`TractorState::update_position`]

use crate::{
    config::{HandlingConfig, TractorTuning},
    geometry::compute_corners,
    types::{ControlInput, Corners, Pose2D, forward_dir, normalize_angle},
};
use glam::Vec2;

/// How much reverse the current articulation angle still allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReverseGate {
    /// Normal reverse, capped at `reverse_speed_cap * max_speed`.
    Free,
    /// Close to jackknife: reverse builds slowly and is capped lower.
    Throttled,
    /// Jackknifed: reverse is refused, only forward motion recovers.
    Locked,
}

impl ReverseGate {
    /// Classifies an articulation angle (sign is ignored).
    pub fn from_articulation(articulation: f32, handling: &HandlingConfig) -> Self {
        let a = articulation.abs();
        if a > handling.jackknife_lock_angle {
            ReverseGate::Locked
        } else if a > handling.jackknife_warn_angle() {
            ReverseGate::Throttled
        } else {
            ReverseGate::Free
        }
    }
}

/// Tractor pose plus drive state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TractorState {
    pub pose: Pose2D,
    /// Signed speed in world units per tick; negative means reversing.
    pub speed: f32,
    /// Signed front-wheel angle; positive steers right (clockwise).
    pub steering_angle: f32,
    pub tuning: TractorTuning,
}

impl TractorState {
    /// A tractor at rest with centred wheels.
    pub fn new(pose: Pose2D, tuning: TractorTuning) -> Self {
        Self {
            pose,
            speed: 0.0,
            steering_angle: 0.0,
            tuning,
        }
    }

    /// Puts the tractor at `pose`, stopped, wheels straight.
    pub fn reset(&mut self, pose: Pose2D) {
        self.pose = pose;
        self.speed = 0.0;
        self.steering_angle = 0.0;
    }

    /// Hitch point: `hitch_offset` behind the tractor centre.
    ///
    /// Derived on demand; it moves with the tractor and is never stored.
    #[inline]
    pub fn hitch_point(&self) -> Vec2 {
        self.pose.position() - self.pose.forward() * self.tuning.hitch_offset
    }

    #[inline]
    pub fn corners(&self) -> Corners {
        compute_corners(&self.pose, self.tuning.width, self.tuning.height)
    }

    /// Moves the wheel angle one step toward the held direction, or back
    /// toward centre when no steering is held.
    ///
    /// The return-to-centre snaps to exactly `0.0` once the angle is
    /// within one return step, so it never oscillates around zero.
    pub fn update_steering(&mut self, input: ControlInput) {
        let t = &self.tuning;

        if input.steer_left {
            self.steering_angle =
                (self.steering_angle - t.steering_rate).max(-t.max_steering_angle);
        } else if input.steer_right {
            self.steering_angle =
                (self.steering_angle + t.steering_rate).min(t.max_steering_angle);
        } else if self.steering_angle.abs() < t.steering_return_rate {
            self.steering_angle = 0.0;
        } else if self.steering_angle > 0.0 {
            self.steering_angle -= t.steering_return_rate;
        } else {
            self.steering_angle += t.steering_return_rate;
        }
    }

    /// Applies throttle, brake/reverse, or coast-down for one tick.
    ///
    /// Accelerate is always honoured since driving forward is the only way
    /// out of a jackknife. Brake behaves according to `gate`:
    ///
    /// - [`ReverseGate::Locked`] with `speed <= 0`: speed is pinned at `0`.
    /// - [`ReverseGate::Throttled`] while already reversing: speed drops by
    ///   `brake_force * near_jackknife_brake_factor`, capped at
    ///   `-max_speed * near_jackknife_reverse_cap`.
    /// - otherwise: speed drops by `brake_force`, capped at
    ///   `-max_speed * reverse_speed_cap`.
    ///
    /// With no pedal held speed decays linearly by `decel`, snapping to
    /// exactly `0.0` inside the last step.
    pub fn update_speed(
        &mut self,
        input: ControlInput,
        gate: ReverseGate,
        handling: &HandlingConfig,
    ) {
        let t = &self.tuning;

        if input.accelerate {
            self.speed = (self.speed + t.accel).min(t.max_speed);
        } else if input.brake {
            self.speed = match gate {
                ReverseGate::Locked if self.speed <= 0.0 => 0.0,
                ReverseGate::Throttled if self.speed < 0.0 => {
                    let step = t.brake_force * handling.near_jackknife_brake_factor;
                    (self.speed - step).max(-t.max_speed * handling.near_jackknife_reverse_cap)
                }
                _ => (self.speed - t.brake_force).max(-t.max_speed * handling.reverse_speed_cap),
            };
        } else if self.speed.abs() < t.decel {
            self.speed = 0.0;
        } else if self.speed > 0.0 {
            self.speed -= t.decel;
        } else {
            self.speed += t.decel;
        }
    }

    /// Integrates heading and position for one tick.
    ///
    /// A stopped tractor is left completely untouched. Otherwise the yaw
    /// change is `steering_angle * sign(speed) * |speed| * turn_coupling`,
    /// so turning is slow at low speed and inverts in reverse, and the
    /// centre then advances `speed` units along the new heading.
    pub fn update_position(&mut self, handling: &HandlingConfig) {
        if self.speed == 0.0 {
            return;
        }

        let turn = self.steering_angle * self.speed.signum();
        self.pose.heading =
            normalize_angle(self.pose.heading + turn * self.speed.abs() * handling.turn_coupling);

        let next = self.pose.position() + forward_dir(self.pose.heading) * self.speed;
        self.pose.set_position(next);
    }
}
