//! Rotated-rectangle corner math shared by every body in the simulation.

use crate::types::{Corners, Pose2D};
use glam::Vec2;

/// Corners of a `width` x `height` rectangle centred on `pose`.
///
/// `height` runs along the heading, `width` across it. Corners are
/// returned front-left, front-right, rear-right, rear-left, so the
/// first edge is always the front bumper.
pub fn compute_corners(pose: &Pose2D, width: f32, height: f32) -> Corners {
    rotated_rect(pose.position(), width, height, pose.heading)
}

/// Corners of a rectangle of the given size rotated by `angle` about `center`.
///
/// Same ordering as [`compute_corners`]: the unrotated local offsets are
/// `(-hw, -hh)`, `(hw, -hh)`, `(hw, hh)`, `(-hw, hh)`.
pub fn rotated_rect(center: Vec2, width: f32, height: f32, angle: f32) -> Corners {
    let rot = Vec2::from_angle(angle);
    let hw = width / 2.0;
    let hh = height / 2.0;

    [
        Vec2::new(-hw, -hh),
        Vec2::new(hw, -hh),
        Vec2::new(hw, hh),
        Vec2::new(-hw, hh),
    ]
    .map(|local| center + rot.rotate(local))
}

/// Corners of an axis-aligned rectangle whose top-left corner is `(x, y)`.
pub fn rect_corners(x: f32, y: f32, width: f32, height: f32) -> Corners {
    [
        Vec2::new(x, y),
        Vec2::new(x + width, y),
        Vec2::new(x + width, y + height),
        Vec2::new(x, y + height),
    ]
}

/// Arithmetic mean of the corners (the rectangle centre).
pub fn centroid(corners: &Corners) -> Vec2 {
    corners.iter().copied().sum::<Vec2>() / corners.len() as f32
}
