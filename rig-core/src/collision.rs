//! Polygon tests used for obstacle hits, world bounds and parking.
//!
//! Everything here is a pure function over vertex slices. Polygons are
//! ordered vertex lists with an implicit closing edge from the last vertex
//! back to the first.
//!
//! [`polygons_intersect`] only checks vertex containment plus edge
//! crossings. That is exact for convex inputs (every body and obstacle in
//! this crate is a rectangle) but can miss some overlaps of non-convex
//! shapes.

use crate::geometry::rotated_rect;
use crate::types::Corners;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Render hint for an obstacle. Collision treats every kind the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObstacleKind {
    #[default]
    Wall,
    Barrier,
    ParkedTrailer,
    Car,
    Cone,
}

/// Static rectangle the rig must not touch.
///
/// `(x, y)` is the top-left corner of the unrotated rectangle; `angle`
/// rotates it about its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub angle: f32,
    #[serde(default, rename = "type")]
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            angle: 0.0,
            kind,
        }
    }

    pub fn corners(&self) -> Corners {
        rect_with_angle(self.x, self.y, self.width, self.height, self.angle)
    }
}

/// Target rectangle for parking, same placement rules as [`Obstacle`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParkingZone {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub angle: f32,
}

impl ParkingZone {
    pub fn corners(&self) -> Corners {
        rect_with_angle(self.x, self.y, self.width, self.height, self.angle)
    }
}

/// Playable area `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Inclusive containment; points on the border are inside.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

fn rect_with_angle(x: f32, y: f32, width: f32, height: f32, angle: f32) -> Corners {
    let center = Vec2::new(x + width / 2.0, y + height / 2.0);
    rotated_rect(center, width, height, angle)
}

/// Even-odd ray cast: is `point` inside `polygon`?
///
/// A horizontal ray is cast toward `+X` and edge crossings are counted.
/// Works for convex and simple non-convex polygons in O(n). Points lying
/// exactly on an edge may land on either side. Fewer than three vertices
/// never contain anything.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];

        // The straddle check guarantees a.y != b.y, so the division is safe.
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Cross product sign of `p` relative to the directed line `a -> b`.
#[inline]
fn direction(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (p - a).perp_dot(b - a)
}

/// Is `p` inside the bounding box of segment `a`-`b`?
///
/// Only meaningful once `p` is known to be collinear with the segment.
#[inline]
fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    a.x.min(b.x) <= p.x && p.x <= a.x.max(b.x) && a.y.min(b.y) <= p.y && p.y <= a.y.max(b.y)
}

/// Do segments `p1`-`p2` and `p3`-`p4` share at least one point?
///
/// Proper crossings are found by the four orientation signs; touching
/// endpoints and collinear overlaps are found by the on-segment checks.
pub fn segments_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> bool {
    let d1 = direction(p3, p4, p1);
    let d2 = direction(p3, p4, p2);
    let d3 = direction(p1, p2, p3);
    let d4 = direction(p1, p2, p4);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(p3, p4, p1))
        || (d2 == 0.0 && on_segment(p3, p4, p2))
        || (d3 == 0.0 && on_segment(p1, p2, p3))
        || (d4 == 0.0 && on_segment(p1, p2, p4))
}

/// Iterates the closed edge loop of a polygon.
fn edges(polygon: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

/// Do two polygons overlap?
///
/// True as soon as a vertex of either polygon lies inside the other, or
/// any pair of edges intersects. Symmetric in its arguments.
pub fn polygons_intersect(a: &[Vec2], b: &[Vec2]) -> bool {
    if a.iter().any(|&p| point_in_polygon(p, b)) {
        return true;
    }
    if b.iter().any(|&p| point_in_polygon(p, a)) {
        return true;
    }

    edges(a).any(|(p1, p2)| edges(b).any(|(p3, p4)| segments_intersect(p1, p2, p3, p4)))
}

/// Index of the first obstacle the polygon overlaps, if any.
///
/// Obstacles are checked in slice order and the scan stops at the first hit.
pub fn obstacle_hit(corners: &[Vec2], obstacles: &[Obstacle]) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| polygons_intersect(corners, &o.corners()))
}

/// Is any corner outside the world bounds?
pub fn out_of_bounds(corners: &[Vec2], bounds: &WorldBounds) -> bool {
    corners.iter().any(|&c| !bounds.contains(c) && !c.is_nan())
}

/// Is the whole body inside the parking zone?
///
/// Requires full containment of every corner, not just overlap. Speed is
/// not considered here.
pub fn inside_zone(corners: &[Vec2], zone: &ParkingZone) -> bool {
    let zone = zone.corners();
    corners.iter().all(|&c| point_in_polygon(c, &zone))
}
