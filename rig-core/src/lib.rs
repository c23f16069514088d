//! Core kinematics and collision library for a tractor–trailer parking
//! simulation.
//!
//! Main components:
//! - [`types`] — poses, control input and angle helpers.
//! - [`config`] — tuning for both bodies and the handling rules.
//! - [`geometry`] — rotated-rectangle corner computation.
//! - [`collision`] — point/segment/polygon tests, obstacles and zones.
//! - [`tractor`] — steering, throttle and pose integration of the cab.
//! - [`trailer`] — trailer heading servo and rigid link to the hitch.
//! - [`rig`] — the coupled tractor+trailer body and its snapshots.
//! - [`level`] — static level description consumed by the simulation.
//! - [`phases`] — per-tick pipeline, outcome tracking and [`Simulation`].

pub mod collision;
pub mod config;
pub mod geometry;
pub mod level;
pub mod phases;
pub mod rig;
pub mod tractor;
pub mod trailer;
pub mod types;

pub use config::{ConfigError, RigConfig};
pub use level::Level;
pub use phases::{Outcome, Simulation, TickReport};
pub use rig::{Rig, RigSnapshot};
pub use types::{ControlInput, Pose2D};
