//! Per-tick simulation phases for the tractor–trailer rig.
//!
//! The typical update loop looks like:
//! 1. [`drive_phase`] — apply the sampled [`ControlInput`] to the tractor
//!    and drag the trailer after the hitch.
//! 2. [`collision_phase`] — test both bodies against the level's obstacles
//!    and the world bounds.
//! 3. [`parking_phase`] — test whether the target body sits fully inside
//!    the parking zone at (near) rest.
//!
//! [`Simulation`] strings the phases together, tracks the [`Outcome`] and
//! hands the host an immutable [`TickReport`] once per tick.

use crate::{
    collision::{inside_zone, obstacle_hit, out_of_bounds},
    config::{HandlingConfig, RigConfig},
    level::{Level, ParkingTarget},
    rig::{Rig, RigSnapshot},
    types::ControlInput,
};
use tracing::info;

/// One of the two rigid bodies of the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    Tractor,
    Trailer,
}

/// Why a run ended in failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// `body` overlaps `level.obstacles[index]`.
    Obstacle { body: Body, index: usize },
    /// A corner of `body` left the world bounds.
    OutOfBounds { body: Body },
}

/// State of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Driving,
    Collided(Collision),
    Parked,
}

impl Outcome {
    /// Terminal outcomes freeze the simulation until restart.
    pub fn is_finished(&self) -> bool {
        !matches!(self, Outcome::Driving)
    }
}

/// Everything the host needs after one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub rig: RigSnapshot,
    pub outcome: Outcome,
}

/// Applies one tick of player input to the rig.
///
/// Runs the tractor's steering, speed and pose update and then lets the
/// trailer follow the new hitch position; see [`Rig::update`].
pub fn drive_phase(rig: &mut Rig, input: ControlInput) {
    rig.update(input);
}

/// Finds the first collision of the rig with the level, if any.
///
/// Checks run in a fixed order and stop at the first hit:
///
/// 1. tractor vs obstacles
/// 2. trailer vs obstacles
/// 3. tractor vs world bounds
/// 4. trailer vs world bounds
///
/// ### Parameters
/// - `rig` - The rig after this tick's [`drive_phase`].
/// - `level` - Obstacles and bounds to test against; read only.
///
/// ### Returns
/// The first [`Collision`] found, or `None` when the rig is clear.
pub fn collision_phase(rig: &Rig, level: &Level) -> Option<Collision> {
    let tractor = rig.tractor_corners();
    let trailer = rig.trailer_corners();

    if let Some(index) = obstacle_hit(&tractor, &level.obstacles) {
        return Some(Collision::Obstacle {
            body: Body::Tractor,
            index,
        });
    }
    if let Some(index) = obstacle_hit(&trailer, &level.obstacles) {
        return Some(Collision::Obstacle {
            body: Body::Trailer,
            index,
        });
    }
    if out_of_bounds(&tractor, &level.bounds) {
        return Some(Collision::OutOfBounds {
            body: Body::Tractor,
        });
    }
    if out_of_bounds(&trailer, &level.bounds) {
        return Some(Collision::OutOfBounds {
            body: Body::Trailer,
        });
    }
    None
}

/// Is the level's target body parked?
///
/// Every corner of the target body has to lie inside the parking zone
/// and the tractor has to be crawling (`|speed| < parked_speed_limit`).
///
/// ### Parameters
/// - `rig` - The rig after this tick's [`drive_phase`].
/// - `level` - Supplies the zone and which body is the target.
/// - `handling` - Supplies the speed limit for a valid park.
pub fn parking_phase(rig: &Rig, level: &Level, handling: &HandlingConfig) -> bool {
    let corners = match level.parking_target {
        ParkingTarget::Trailer => rig.trailer_corners(),
        ParkingTarget::Tractor => rig.tractor_corners(),
    };

    inside_zone(&corners, &level.parking_zone) && rig.speed().abs() < handling.parked_speed_limit
}

/// A level plus the rig driving in it.
///
/// The host calls [`Simulation::step`] once per frame. Once the outcome
/// is terminal further steps are ignored until [`Simulation::restart`].
#[derive(Debug, Clone)]
pub struct Simulation {
    level: Level,
    rig: Rig,
    outcome: Outcome,
    tick: u64,
}

impl Simulation {
    /// Spawns the rig at the level's start pose.
    pub fn new(level: Level, cfg: &RigConfig) -> Self {
        let rig = Rig::new(level.start, cfg);
        info!(level = %level.name, obstacles = level.obstacles.len(), "level loaded");
        Self {
            level,
            rig,
            outcome: Outcome::Driving,
            tick: 0,
        }
    }

    /// Runs one tick: drive, then collisions, then parking.
    ///
    /// Collision is checked before parking, so a body that is parked but
    /// also scraping an obstacle counts as a collision.
    ///
    /// ### Parameters
    /// - `input` - Control state sampled by the host for this frame.
    ///
    /// ### Returns
    /// A [`TickReport`] with a copy of the rig state and the outcome.
    pub fn step(&mut self, input: ControlInput) -> TickReport {
        if self.outcome.is_finished() {
            return self.report();
        }

        drive_phase(&mut self.rig, input);
        self.tick += 1;

        if let Some(collision) = collision_phase(&self.rig, &self.level) {
            info!(tick = self.tick, ?collision, "rig collided");
            self.outcome = Outcome::Collided(collision);
        } else if parking_phase(&self.rig, &self.level, self.rig.handling()) {
            info!(tick = self.tick, target = ?self.level.parking_target, "rig parked");
            self.outcome = Outcome::Parked;
        }

        self.report()
    }

    /// Puts the rig back at the level start and clears the outcome.
    pub fn restart(&mut self) {
        let start = self.level.start;
        self.reset(start.x, start.y, start.heading);
    }

    /// Puts the rig at an arbitrary pose and clears the outcome.
    pub fn reset(&mut self, x: f32, y: f32, heading: f32) {
        self.rig.reset(x, y, heading);
        self.outcome = Outcome::Driving;
        self.tick = 0;
    }

    pub fn report(&self) -> TickReport {
        TickReport {
            tick: self.tick,
            rig: self.rig.snapshot(),
            outcome: self.outcome,
        }
    }

    pub fn set_handling(&mut self, handling: HandlingConfig) {
        self.rig.set_handling(handling);
    }

    #[inline]
    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    #[inline]
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[inline]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }
}
