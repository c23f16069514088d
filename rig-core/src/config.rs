//! Tuning for the tractor, the trailer, and the handling rules that
//! couple them.
//!
//! Every knob the simulation reads lives here so hosts can override it
//! from a TOML file. All sections use `#[serde(default)]`, so a file only
//! has to name the fields it changes:
//!
//! ```toml
//! [tractor]
//! max_speed = 4.0
//!
//! [handling]
//! trailer_damping = 0.2
//! ```

use serde::Deserialize;
use std::f32::consts::{FRAC_PI_4, PI};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a [`RigConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Tractor dimensions and drive characteristics.
///
/// Speeds are in world units per tick, angles in radians, rates per tick.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TractorTuning {
    pub width: f32,
    pub height: f32,
    pub max_speed: f32,
    pub accel: f32,
    /// Coast-down applied when neither pedal is held.
    pub decel: f32,
    pub brake_force: f32,
    pub max_steering_angle: f32,
    pub steering_rate: f32,
    pub steering_return_rate: f32,
    /// Distance from the tractor centre back to the fifth-wheel hitch.
    pub hitch_offset: f32,
}

impl Default for TractorTuning {
    fn default() -> Self {
        Self {
            width: 36.0,
            height: 50.0,
            max_speed: 3.0,
            accel: 0.08,
            decel: 0.03,
            brake_force: 0.1,
            max_steering_angle: FRAC_PI_4,
            steering_rate: 0.02,
            steering_return_rate: 0.015,
            hitch_offset: 20.0,
        }
    }
}

/// Trailer dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrailerTuning {
    pub width: f32,
    /// Trailer length along its heading.
    pub height: f32,
    /// Gap between the hitch and the trailer's front face (kingpin setback).
    pub pivot_distance: f32,
}

impl Default for TrailerTuning {
    fn default() -> Self {
        Self {
            width: 44.0,
            height: 160.0,
            pivot_distance: 8.0,
        }
    }
}

/// Handling rules that are not a property of either body alone.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct HandlingConfig {
    /// Articulation angle past which reverse is blocked.
    pub jackknife_lock_angle: f32,
    /// Fraction of the lock angle at which reverse gets throttled.
    pub jackknife_warn_factor: f32,
    /// Proportional gain of the trailer heading servo, per tick.
    pub trailer_damping: f32,
    /// Couples yaw rate to steering angle and speed magnitude.
    pub turn_coupling: f32,
    /// Reverse speed cap as a fraction of `max_speed`.
    pub reverse_speed_cap: f32,
    /// Reverse speed cap near jackknife, as a fraction of `max_speed`.
    pub near_jackknife_reverse_cap: f32,
    /// Scale on `brake_force` while reversing near jackknife.
    pub near_jackknife_brake_factor: f32,
    /// Below this hitch distance the trailer does not react.
    pub min_follow_distance: f32,
    /// `|speed|` must be under this for a parked trailer to count.
    pub parked_speed_limit: f32,
}

impl Default for HandlingConfig {
    fn default() -> Self {
        Self {
            jackknife_lock_angle: PI / 2.5,
            jackknife_warn_factor: 0.8,
            trailer_damping: 0.15,
            turn_coupling: 0.02,
            reverse_speed_cap: 0.6,
            near_jackknife_reverse_cap: 0.3,
            near_jackknife_brake_factor: 0.3,
            min_follow_distance: 0.1,
            parked_speed_limit: 0.5,
        }
    }
}

impl HandlingConfig {
    #[inline]
    pub fn jackknife_warn_angle(&self) -> f32 {
        self.jackknife_lock_angle * self.jackknife_warn_factor
    }
}

/// Complete configuration for one articulated rig.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub tractor: TractorTuning,
    pub trailer: TrailerTuning,
    pub handling: HandlingConfig,
}

impl RigConfig {
    /// Parses a TOML document and validates the result.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let cfg: RigConfig = toml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&src)
    }

    /// Rejects values that would make the simulation meaningless.
    ///
    /// The tick functions themselves never check their inputs; this is
    /// the one place non-finite or non-positive tuning is caught.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.tractor;
        positive("tractor.width", t.width)?;
        positive("tractor.height", t.height)?;
        positive("tractor.max_speed", t.max_speed)?;
        positive("tractor.accel", t.accel)?;
        positive("tractor.decel", t.decel)?;
        positive("tractor.brake_force", t.brake_force)?;
        positive("tractor.max_steering_angle", t.max_steering_angle)?;
        positive("tractor.steering_rate", t.steering_rate)?;
        positive("tractor.steering_return_rate", t.steering_return_rate)?;
        non_negative("tractor.hitch_offset", t.hitch_offset)?;

        let tr = &self.trailer;
        positive("trailer.width", tr.width)?;
        positive("trailer.height", tr.height)?;
        non_negative("trailer.pivot_distance", tr.pivot_distance)?;

        let h = &self.handling;
        positive("handling.jackknife_lock_angle", h.jackknife_lock_angle)?;
        if h.jackknife_lock_angle > PI {
            return Err(ConfigError::Invalid {
                field: "handling.jackknife_lock_angle",
                reason: "must not exceed pi",
            });
        }
        fraction("handling.jackknife_warn_factor", h.jackknife_warn_factor)?;
        fraction("handling.trailer_damping", h.trailer_damping)?;
        non_negative("handling.turn_coupling", h.turn_coupling)?;
        fraction("handling.reverse_speed_cap", h.reverse_speed_cap)?;
        fraction("handling.near_jackknife_reverse_cap", h.near_jackknife_reverse_cap)?;
        fraction("handling.near_jackknife_brake_factor", h.near_jackknife_brake_factor)?;
        non_negative("handling.min_follow_distance", h.min_follow_distance)?;
        positive("handling.parked_speed_limit", h.parked_speed_limit)?;

        Ok(())
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if !v.is_finite() {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be finite",
        });
    }
    if v < 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: "must not be negative",
        });
    }
    Ok(())
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    non_negative(field, v)?;
    if v == 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be greater than zero",
        });
    }
    Ok(())
}

// Fractions live in (0, 1].
fn fraction(field: &'static str, v: f32) -> Result<(), ConfigError> {
    positive(field, v)?;
    if v > 1.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be at most 1",
        });
    }
    Ok(())
}
