use crate::collision::{Obstacle, ParkingZone, WorldBounds};
use crate::types::Pose2D;
use serde::{Deserialize, Serialize};

/// Which body has to end up inside the parking zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParkingTarget {
    #[default]
    Trailer,
    Tractor,
}

/// Static description of one parking exercise.
///
/// Levels are authored elsewhere; the simulation only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Tractor spawn pose; the trailer is placed straight behind it.
    pub start: Pose2D,
    #[serde(default)]
    pub parking_target: ParkingTarget,
    pub parking_zone: ParkingZone,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    pub bounds: WorldBounds,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::ObstacleKind;

    #[test]
    fn level_deserializes_with_defaults() {
        let level: Level = toml::from_str(
            r#"
            name = "First Delivery"

            [start]
            x = 600.0
            y = 600.0
            heading = 3.14159

            [parking_zone]
            x = 572.0
            y = 50.0
            width = 56.0
            height = 170.0

            [bounds]
            width = 1200.0
            height = 800.0

            [[obstacles]]
            type = "wall"
            x = 400.0
            y = 30.0
            width = 400.0
            height = 15.0

            [[obstacles]]
            type = "barrier"
            x = 560.0
            y = 45.0
            width = 10.0
            height = 180.0
            "#,
        )
        .expect("level");

        assert_eq!(level.parking_target, ParkingTarget::Trailer);
        assert!(level.description.is_empty());
        assert_eq!(level.obstacles.len(), 2);
        assert_eq!(level.obstacles[1].kind, ObstacleKind::Barrier);
        assert_eq!(level.parking_zone.angle, 0.0);
        assert_eq!(level.bounds, WorldBounds::new(1200.0, 800.0));
    }
}
