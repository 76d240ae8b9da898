//! Per-agent tuning loaded from JSON.
//!
//! Every field defaults to the matching value in [`crate::constants`], so a
//! tunables file only needs to name what it overrides:
//!
//! ```
//! use tiller::tunables::AgentTunables;
//!
//! let tunables = AgentTunables::from_json_str(r#"{ "camera": { "max_distance": 20.0 } }"#)
//!     .expect("valid tunables");
//! assert!((tunables.camera.max_distance - 20.0).abs() < f32::EPSILON);
//! assert!((tunables.slowdown_radius - 5.0).abs() < f32::EPSILON);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CAMERA_COLLISION_MARGIN, CAMERA_DEFAULT_DISTANCE, CAMERA_DISTANCE_SNAP, CAMERA_DISTANCE_STEP,
    CAMERA_MAX_DISTANCE, CAMERA_MIN_DISTANCE, CAMERA_PITCH_MAX, CAMERA_PITCH_MIN,
    MAX_MOVE_SPEED, MAX_TURN_PER_TICK, MIN_MOVE_SPEED, MIN_MOVE_TOLERANCE, PITCH_DEADBAND,
    SLOWDOWN_RADIUS, STUCK_TEST_DELAY, STUCK_TOLERANCE, WALK_DISTANCE_PER_TICK,
};

/// Failure to load or validate tunables.
#[derive(Debug, Error)]
pub enum TunablesError {
    /// The tunables file could not be read.
    #[error("failed to read tunables from {path}: {source}")]
    Io {
        /// File that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid tunables JSON.
    #[error("failed to parse tunables: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside its permitted range.
    #[error("invalid tunable `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Steering tunables for one agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentTunables {
    /// Largest yaw change per tick (radians).
    pub max_turn_per_tick: f32,
    /// Radius within which slowdown-on-approach scales the speed.
    pub slowdown_radius: f32,
    /// Floor for the arrival tolerance.
    pub min_tolerance: f32,
    /// Pitch corrections below this magnitude are ignored.
    pub pitch_deadband: f32,
    /// Movement below this distance per tick counts as stuck; zero demands
    /// exact equality.
    pub stuck_tolerance: f32,
    /// Ticks after a new destination before stuck detection starts.
    pub stuck_test_delay: u32,
    /// Lowest accepted move speed.
    pub min_speed: f32,
    /// Highest accepted move speed.
    pub max_speed: f32,
    /// Distance covered per tick by the reference locomotion at full speed.
    pub walk_distance_per_tick: f32,
    /// Follow camera tuning.
    pub camera: CameraTunables,
}

impl Default for AgentTunables {
    fn default() -> Self {
        Self {
            max_turn_per_tick: MAX_TURN_PER_TICK,
            slowdown_radius: SLOWDOWN_RADIUS,
            min_tolerance: MIN_MOVE_TOLERANCE,
            pitch_deadband: PITCH_DEADBAND,
            stuck_tolerance: STUCK_TOLERANCE,
            stuck_test_delay: STUCK_TEST_DELAY,
            min_speed: MIN_MOVE_SPEED,
            max_speed: MAX_MOVE_SPEED,
            walk_distance_per_tick: WALK_DISTANCE_PER_TICK,
            camera: CameraTunables::default(),
        }
    }
}

/// Follow camera tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraTunables {
    /// Closest orbit distance.
    pub min_distance: f32,
    /// Furthest orbit distance.
    pub max_distance: f32,
    /// Desired distance of a new rig.
    pub initial_distance: f32,
    /// Per-tick step of the realised distance towards the desired one.
    pub distance_step: f32,
    /// Gap below which the realised distance snaps to the desired one.
    pub snap_threshold: f32,
    /// Lowest orbit pitch (radians).
    pub pitch_min: f32,
    /// Highest orbit pitch (radians).
    pub pitch_max: f32,
    /// Margin kept between the camera and occluding surfaces.
    pub collision_margin: f32,
}

impl Default for CameraTunables {
    fn default() -> Self {
        Self {
            min_distance: CAMERA_MIN_DISTANCE,
            max_distance: CAMERA_MAX_DISTANCE,
            initial_distance: CAMERA_DEFAULT_DISTANCE,
            distance_step: CAMERA_DISTANCE_STEP,
            snap_threshold: CAMERA_DISTANCE_SNAP,
            pitch_min: CAMERA_PITCH_MIN,
            pitch_max: CAMERA_PITCH_MAX,
            collision_margin: CAMERA_COLLISION_MARGIN,
        }
    }
}

fn ensure(condition: bool, field: &'static str, reason: impl Into<String>) -> Result<(), TunablesError> {
    if condition {
        Ok(())
    } else {
        Err(TunablesError::Invalid {
            field,
            reason: reason.into(),
        })
    }
}

impl AgentTunables {
    /// Parses and validates tunables from a JSON document.
    ///
    /// # Errors
    /// Returns [`TunablesError::Parse`] for malformed JSON or unknown fields
    /// and [`TunablesError::Invalid`] when a value fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, TunablesError> {
        let tunables: Self = serde_json::from_str(json)?;
        tunables.validate()?;
        Ok(tunables)
    }

    /// Reads, parses and validates a tunables file.
    ///
    /// # Errors
    /// Returns [`TunablesError::Io`] when the file cannot be read, otherwise
    /// the errors of [`AgentTunables::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TunablesError> {
        let file = path.as_ref();
        let json = fs::read_to_string(file).map_err(|source| TunablesError::Io {
            path: file.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks every range constraint.
    ///
    /// # Errors
    /// Returns the first [`TunablesError::Invalid`] encountered.
    pub fn validate(&self) -> Result<(), TunablesError> {
        ensure(
            self.max_turn_per_tick > 0.0,
            "max_turn_per_tick",
            "must be positive",
        )?;
        ensure(
            self.slowdown_radius > 0.0,
            "slowdown_radius",
            "must be positive",
        )?;
        ensure(self.min_tolerance >= 0.0, "min_tolerance", "must not be negative")?;
        ensure(self.pitch_deadband >= 0.0, "pitch_deadband", "must not be negative")?;
        ensure(
            self.stuck_tolerance >= 0.0,
            "stuck_tolerance",
            "must not be negative",
        )?;
        ensure(
            (0.0..=1.0).contains(&self.min_speed) && (0.0..=1.0).contains(&self.max_speed),
            "max_speed",
            "speed bounds must lie in [0, 1]",
        )?;
        ensure(
            self.min_speed <= self.max_speed,
            "min_speed",
            format!("{} exceeds max_speed {}", self.min_speed, self.max_speed),
        )?;
        ensure(
            self.walk_distance_per_tick >= 0.0,
            "walk_distance_per_tick",
            "must not be negative",
        )?;
        self.camera.validate()
    }
}

impl CameraTunables {
    /// Checks the camera range constraints.
    ///
    /// # Errors
    /// Returns the first [`TunablesError::Invalid`] encountered.
    pub fn validate(&self) -> Result<(), TunablesError> {
        ensure(
            self.min_distance >= 0.0,
            "camera.min_distance",
            "must not be negative",
        )?;
        ensure(
            self.min_distance <= self.max_distance,
            "camera.min_distance",
            format!(
                "{} exceeds max_distance {}",
                self.min_distance, self.max_distance
            ),
        )?;
        ensure(
            self.distance_step > 0.0,
            "camera.distance_step",
            "must be positive",
        )?;
        ensure(
            self.snap_threshold >= 0.0,
            "camera.snap_threshold",
            "must not be negative",
        )?;
        ensure(
            self.pitch_min < self.pitch_max,
            "camera.pitch_min",
            "pitch arc is empty",
        )?;
        ensure(
            self.collision_margin >= 0.0,
            "camera.collision_margin",
            "must not be negative",
        )
    }
}
