//! Trailer that is dragged by the tractor's hitch.
//!
//! The trailer never sees control input. Each tick it:
//! 1. turns a fixed fraction (`damping`) of the way toward the bearing of
//!    the hitch, which is a proportional servo rather than an exact
//!    rigid-rod solution, and
//! 2. slides along the centre-to-hitch line so the link length is exactly
//!    [`TrailerState::link_length`] again.

use crate::{
    config::TrailerTuning,
    geometry::compute_corners,
    types::{Corners, Pose2D, forward_dir, normalize_angle},
};
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailerState {
    pub pose: Pose2D,
    pub tuning: TrailerTuning,
}

impl TrailerState {
    /// A trailer lined up straight behind `hitch`, facing `heading`.
    pub fn behind(hitch: Vec2, heading: f32, tuning: TrailerTuning) -> Self {
        let mut trailer = Self {
            pose: Pose2D::default(),
            tuning,
        };
        trailer.align_behind(hitch, heading);
        trailer
    }

    /// Centre-to-hitch distance the follower maintains:
    /// `pivot_distance + height / 2`.
    #[inline]
    pub fn link_length(&self) -> f32 {
        self.tuning.pivot_distance + self.tuning.height / 2.0
    }

    /// Re-seats the trailer straight behind `hitch` at rest.
    pub fn align_behind(&mut self, hitch: Vec2, heading: f32) {
        let heading = normalize_angle(heading);
        let center = hitch - forward_dir(heading) * self.link_length();
        self.pose = Pose2D::new(center.x, center.y, heading);
    }

    /// Midpoint of the trailer's front face.
    #[inline]
    pub fn front_point(&self) -> Vec2 {
        self.pose.position() + self.pose.forward() * (self.tuning.height / 2.0)
    }

    #[inline]
    pub fn corners(&self) -> Corners {
        compute_corners(&self.pose, self.tuning.width, self.tuning.height)
    }

    /// Drags the trailer one tick toward `hitch`.
    ///
    /// Does nothing while the hitch is closer than `min_distance` to the
    /// trailer centre; there is no usable bearing at that range.
    ///
    /// ### Parameters
    /// - `hitch` - World position of the tractor's hitch this tick.
    /// - `damping` - Fraction of the heading error removed per tick.
    /// - `min_distance` - Dead zone around the trailer centre.
    pub fn follow_hitch(&mut self, hitch: Vec2, damping: f32, min_distance: f32) {
        let to_hitch = hitch - self.pose.position();
        let dist = to_hitch.length();
        if dist < min_distance {
            return;
        }

        // Bearing in the same convention as `forward_dir`.
        let target = to_hitch.x.atan2(-to_hitch.y);
        let error = normalize_angle(target - self.pose.heading);
        self.pose.heading = normalize_angle(self.pose.heading + error * damping);

        // Snap the link length; no spring, no compliance.
        let correction = dist - self.link_length();
        let center = self.pose.position() + (to_hitch / dist) * correction;
        self.pose.set_position(center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-3;

    fn trailer_behind(hitch: Vec2, heading: f32) -> TrailerState {
        TrailerState::behind(hitch, heading, TrailerTuning::default())
    }

    #[test]
    fn behind_places_trailer_on_the_link() {
        let hitch = Vec2::new(200.0, 200.0);
        let t = trailer_behind(hitch, 0.0);

        // Heading 0 faces -Y, so the trailer hangs toward +Y.
        assert!((t.pose.position() - Vec2::new(200.0, 288.0)).length() < EPS);
        assert!((t.pose.position().distance(hitch) - t.link_length()).abs() < EPS);
        assert_eq!(t.pose.heading, 0.0);
    }

    #[test]
    fn front_point_is_pivot_distance_short_of_hitch() {
        let hitch = Vec2::new(0.0, 0.0);
        let t = trailer_behind(hitch, FRAC_PI_2);
        assert!((t.front_point().distance(hitch) - t.tuning.pivot_distance).abs() < EPS);
    }

    #[test]
    fn dead_zone_leaves_trailer_untouched() {
        let mut t = trailer_behind(Vec2::new(0.0, 0.0), 0.0);
        let before = t.pose;
        let hitch = t.pose.position() + Vec2::new(0.05, 0.0);
        t.follow_hitch(hitch, 0.15, 0.1);
        assert_eq!(t.pose, before);
    }

    #[test]
    fn follow_snaps_link_length_exactly() {
        let mut t = trailer_behind(Vec2::new(0.0, 0.0), 0.0);
        let hitch = Vec2::new(30.0, -25.0);
        t.follow_hitch(hitch, 0.15, 0.1);
        assert!((t.pose.position().distance(hitch) - t.link_length()).abs() < EPS);

        // Hitch pushed closer than the link length pushes the trailer back.
        let hitch = t.pose.position() + Vec2::new(0.0, -10.0);
        t.follow_hitch(hitch, 0.15, 0.1);
        assert!((t.pose.position().distance(hitch) - t.link_length()).abs() < EPS);
    }

    #[test]
    fn heading_moves_a_damped_fraction_toward_hitch_bearing() {
        let mut t = trailer_behind(Vec2::new(0.0, 0.0), 0.0);
        let center = t.pose.position();
        // Hitch directly to the right of the centre: bearing is +π/2.
        let hitch = center + Vec2::new(t.link_length(), 0.0);
        t.follow_hitch(hitch, 0.15, 0.1);
        assert!((t.pose.heading - FRAC_PI_2 * 0.15).abs() < EPS);
    }

    #[test]
    fn full_damping_points_straight_at_hitch() {
        let mut t = trailer_behind(Vec2::new(0.0, 0.0), 0.0);
        let hitch = t.pose.position() + Vec2::new(-50.0, 0.0);
        t.follow_hitch(hitch, 1.0, 0.1);
        assert!((t.pose.heading + FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn heading_error_takes_the_short_way_round() {
        // Trailer faces just under +π; hitch bearing is just over -π.
        let mut t = trailer_behind(Vec2::new(0.0, 0.0), PI - 0.05);
        let center = t.pose.position();
        let bearing = -PI + 0.05;
        let hitch = center + forward_dir(bearing) * t.link_length();
        t.follow_hitch(hitch, 0.5, 0.1);

        // A 0.1 rad error halved: heading crosses π instead of swinging back.
        assert!(t.pose.heading > -PI && t.pose.heading <= PI);
        let moved = normalize_angle(t.pose.heading - (PI - 0.05));
        assert!((moved - 0.05).abs() < EPS);
    }
}
