//! The articulated rig: one tractor dragging one trailer.
//!
//! [`Rig`] owns both bodies and is the only thing that mutates them.
//! Hosts read it through the copy-out snapshots ([`TractorSnapshot`],
//! [`TrailerSnapshot`], [`RigSnapshot`]) instead of holding references
//! into the live state.

use crate::{
    config::{HandlingConfig, RigConfig},
    tractor::{ReverseGate, TractorState},
    trailer::TrailerState,
    types::{ControlInput, Corners, Pose2D, normalize_angle},
};
use glam::Vec2;
use tracing::{debug, info, trace};

/// What a renderer or HUD needs to know about the tractor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TractorSnapshot {
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    pub speed: f32,
    pub max_speed: f32,
    pub steering_angle: f32,
    pub max_steering_angle: f32,
}

/// What a renderer needs to know about the trailer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailerSnapshot {
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    pub width: f32,
    pub height: f32,
}

/// Immutable copy of the whole rig after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigSnapshot {
    pub tractor: TractorSnapshot,
    pub trailer: TrailerSnapshot,
    pub tractor_corners: Corners,
    pub trailer_corners: Corners,
    pub hitch: Vec2,
    pub jackknife_angle: f32,
    pub jackknife_warning: bool,
    pub jackknifed: bool,
}

#[derive(Debug, Clone)]
pub struct Rig {
    tractor: TractorState,
    trailer: TrailerState,
    handling: HandlingConfig,
    gate: ReverseGate,
}

impl Rig {
    /// Builds a rig at rest with the trailer straight behind the tractor.
    pub fn new(start: Pose2D, cfg: &RigConfig) -> Self {
        let start = Pose2D::new(start.x, start.y, start.heading);
        let tractor = TractorState::new(start, cfg.tractor);
        let trailer = TrailerState::behind(tractor.hitch_point(), start.heading, cfg.trailer);

        Self {
            tractor,
            trailer,
            handling: cfg.handling,
            gate: ReverseGate::Free,
        }
    }

    /// Reinitialises both bodies: tractor stopped at the given pose with
    /// straight wheels, trailer realigned behind it. Nothing carries over.
    pub fn reset(&mut self, x: f32, y: f32, heading: f32) {
        let pose = Pose2D::new(x, y, heading);
        self.tractor.reset(pose);
        self.trailer.align_behind(self.tractor.hitch_point(), pose.heading);
        self.gate = ReverseGate::Free;
        info!(x, y, heading = pose.heading, "rig reset");
    }

    /// Advances the rig by one tick.
    ///
    /// Steering, then speed (gated by the articulation angle measured
    /// before this tick's motion), then tractor pose, then the trailer
    /// follows the new hitch position.
    pub fn update(&mut self, input: ControlInput) {
        self.tractor.update_steering(input);

        let articulation = self.jackknife_angle();
        let gate = ReverseGate::from_articulation(articulation, &self.handling);
        if gate != self.gate {
            debug!(from = ?self.gate, to = ?gate, articulation, "reverse gate changed");
            self.gate = gate;
        }

        let reversing = input.brake && !input.accelerate && self.tractor.speed <= 0.0;
        if gate == ReverseGate::Locked && reversing {
            debug!(articulation, "reverse refused while jackknifed");
        }

        self.tractor.update_speed(input, gate, &self.handling);
        self.tractor.update_position(&self.handling);

        self.trailer.follow_hitch(
            self.tractor.hitch_point(),
            self.handling.trailer_damping,
            self.handling.min_follow_distance,
        );

        trace!(
            x = self.tractor.pose.x,
            y = self.tractor.pose.y,
            heading = self.tractor.pose.heading,
            speed = self.tractor.speed,
            trailer_heading = self.trailer.pose.heading,
            "rig tick"
        );
    }

    /// Signed articulation angle `tractor.heading - trailer.heading`,
    /// wrapped into `(-π, π]`.
    pub fn jackknife_angle(&self) -> f32 {
        normalize_angle(self.tractor.pose.heading - self.trailer.pose.heading)
    }

    /// Past the lock angle: reverse is refused until the driver pulls forward.
    pub fn is_jackknifed(&self) -> bool {
        self.jackknife_angle().abs() > self.handling.jackknife_lock_angle
    }

    /// Past the warning angle, reverse is throttled.
    pub fn jackknife_warning(&self) -> bool {
        self.jackknife_angle().abs() > self.handling.jackknife_warn_angle()
    }

    #[inline]
    pub fn hitch_point(&self) -> Vec2 {
        self.tractor.hitch_point()
    }

    #[inline]
    pub fn trailer_front_point(&self) -> Vec2 {
        self.trailer.front_point()
    }

    #[inline]
    pub fn tractor_corners(&self) -> Corners {
        self.tractor.corners()
    }

    #[inline]
    pub fn trailer_corners(&self) -> Corners {
        self.trailer.corners()
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.tractor.speed
    }

    #[inline]
    pub fn tractor(&self) -> &TractorState {
        &self.tractor
    }

    #[inline]
    pub fn trailer(&self) -> &TrailerState {
        &self.trailer
    }

    #[inline]
    pub fn handling(&self) -> &HandlingConfig {
        &self.handling
    }

    /// Swaps the handling rules without touching either body.
    pub fn set_handling(&mut self, handling: HandlingConfig) {
        self.handling = handling;
    }

    pub fn tractor_snapshot(&self) -> TractorSnapshot {
        let t = &self.tractor;
        TractorSnapshot {
            x: t.pose.x,
            y: t.pose.y,
            heading: t.pose.heading,
            speed: t.speed,
            max_speed: t.tuning.max_speed,
            steering_angle: t.steering_angle,
            max_steering_angle: t.tuning.max_steering_angle,
        }
    }

    pub fn trailer_snapshot(&self) -> TrailerSnapshot {
        let t = &self.trailer;
        TrailerSnapshot {
            x: t.pose.x,
            y: t.pose.y,
            heading: t.pose.heading,
            width: t.tuning.width,
            height: t.tuning.height,
        }
    }

    pub fn snapshot(&self) -> RigSnapshot {
        let jackknife_angle = self.jackknife_angle();
        RigSnapshot {
            tractor: self.tractor_snapshot(),
            trailer: self.trailer_snapshot(),
            tractor_corners: self.tractor_corners(),
            trailer_corners: self.trailer_corners(),
            hitch: self.hitch_point(),
            jackknife_angle,
            jackknife_warning: jackknife_angle.abs() > self.handling.jackknife_warn_angle(),
            jackknifed: jackknife_angle.abs() > self.handling.jackknife_lock_angle,
        }
    }

    /// Test hook: force an articulation angle by turning the trailer.
    #[cfg(test)]
    pub(crate) fn set_trailer_heading(&mut self, heading: f32) {
        self.trailer.pose.heading = normalize_angle(heading);
    }

    /// Test hook: override the tractor speed.
    #[cfg(test)]
    pub(crate) fn set_speed(&mut self, speed: f32) {
        self.tractor.speed = speed;
    }
}
