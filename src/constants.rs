//! Tuning constants for steering and the follow camera.
//!
//! These are the defaults behind [`crate::tunables::AgentTunables`]. Per-agent
//! overrides are loaded from JSON; the values here reproduce the reference
//! behaviour exactly when no override is supplied.

use std::f32::consts::PI;

/// Largest yaw change the controller commands in a single tick (radians).
pub const MAX_TURN_PER_TICK: f32 = PI / 20.0;
/// Distance at which slowdown-on-approach starts scaling speed down.
pub const SLOWDOWN_RADIUS: f32 = 5.0;
/// Floor applied to the arrival tolerance.
pub const MIN_MOVE_TOLERANCE: f32 = 0.1;
/// Default arrival tolerance for a fresh intent store.
pub const DEFAULT_MOVE_TOLERANCE: f32 = 0.25;
/// Pitch corrections smaller than this are ignored to avoid jitter (radians).
pub const PITCH_DEADBAND: f32 = 0.01;
/// Values whose magnitude is below this are treated as zero.
pub const ZERO_EPSILON: f32 = 1.0e-4;
/// Stuck tolerance; zero means "exactly the same position as last tick".
pub const STUCK_TOLERANCE: f32 = 0.0;
/// Ticks after a new destination during which stuck detection is skipped.
pub const STUCK_TEST_DELAY: u32 = 0;
/// Lower bound for the normalised move speed.
pub const MIN_MOVE_SPEED: f32 = 0.0;
/// Upper bound for the normalised move speed.
pub const MAX_MOVE_SPEED: f32 = 1.0;
/// Distance the reference locomotion covers per tick at full speed.
pub const WALK_DISTANCE_PER_TICK: f32 = 0.2;

/// Step by which the realised camera distance approaches the desired one.
pub const CAMERA_DISTANCE_STEP: f32 = 0.03;
/// Remaining camera distance gap below which the rig snaps to the target.
pub const CAMERA_DISTANCE_SNAP: f32 = 0.03;
/// Lowest camera orbit pitch (radians, -45°).
pub const CAMERA_PITCH_MIN: f32 = -PI / 4.0;
/// Highest camera orbit pitch (radians, 89°).
pub const CAMERA_PITCH_MAX: f32 = 89.0 * PI / 180.0;
/// Closest the camera may orbit.
pub const CAMERA_MIN_DISTANCE: f32 = 0.5;
/// Furthest the camera may orbit.
pub const CAMERA_MAX_DISTANCE: f32 = 12.0;
/// Desired distance of a freshly constructed rig.
pub const CAMERA_DEFAULT_DISTANCE: f32 = 4.0;
/// Margin kept between the camera and an occluding surface.
pub const CAMERA_COLLISION_MARGIN: f32 = 0.1;
