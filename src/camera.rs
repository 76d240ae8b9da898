//! Third-person spring-arm camera.
//!
//! [`CameraRig`] orbits the agent's eye. Operator input nudges the orbit
//! angles and the desired distance; the realised distance dollies towards the
//! desired one by a fixed step each tick; finally the arm is shortened when a
//! camera occluder sits between the eye and the desired camera position.

use std::f32::consts::PI;
use std::mem;

use glam::{Mat3, Vec3};
use log::trace;

use crate::angle::{heading_towards, wrap_to_range};
use crate::collision::{CollisionMask, RayCastService, RayHit, RayQuery};
use crate::pose::PoseSource;
use crate::tunables::CameraTunables;
use crate::vector_math::{is_zero, try_unit};

/// One tick's worth of operator camera input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraInput {
    /// Orbit pitch change (radians, positive looks further down).
    pub pitch_delta: f32,
    /// Orbit yaw change (radians).
    pub yaw_delta: f32,
    /// Desired distance change.
    pub zoom_delta: f32,
}

/// Collects input events between ticks; the rig consumes and resets it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraInputAccumulator {
    pending: CameraInput,
}

impl CameraInputAccumulator {
    /// Adds `input` to the pending totals.
    pub fn accumulate(&mut self, input: CameraInput) {
        self.pending.pitch_delta += input.pitch_delta;
        self.pending.yaw_delta += input.yaw_delta;
        self.pending.zoom_delta += input.zoom_delta;
    }

    /// Pending totals, without consuming them.
    #[must_use]
    pub const fn pending(&self) -> CameraInput {
        self.pending
    }

    /// Returns the pending totals and resets them to zero.
    pub fn take(&mut self) -> CameraInput {
        mem::take(&mut self.pending)
    }
}

/// Orbit angles and arm length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// Orbit pitch, clamped to the configured arc.
    pub pitch: f32,
    /// Orbit yaw relative to the agent's view heading, wrapped to `[-π, π)`.
    pub yaw: f32,
    /// Arm length realised this tick.
    pub distance: f32,
    /// Arm length the operator asked for.
    pub target_distance: f32,
}

/// Camera position and orientation for rendering.
///
/// The basis columns are right, forward and up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
    /// World-space camera position.
    pub position: Vec3,
    /// Orthonormal orientation.
    pub basis: Mat3,
}

impl CameraTransform {
    /// Direction the camera looks along.
    #[must_use]
    pub const fn forward(&self) -> Vec3 {
        self.basis.y_axis
    }

    /// Camera right vector.
    #[must_use]
    pub const fn right(&self) -> Vec3 {
        self.basis.x_axis
    }

    /// Camera up vector.
    #[must_use]
    pub const fn up(&self) -> Vec3 {
        self.basis.z_axis
    }
}

/// Unit direction for an orbit at `yaw` and `pitch`, pointing from the camera
/// towards what it looks at.
#[must_use]
pub fn orbit_direction(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(
        yaw.sin() * pitch.cos(),
        yaw.cos() * pitch.cos(),
        -pitch.sin(),
    )
}

/// Builds a right/forward/up basis from a view direction and world up.
#[must_use]
pub fn look_basis(view: Vec3) -> Mat3 {
    let forward = try_unit(view).unwrap_or(Vec3::Y);
    let right = try_unit(forward.cross(Vec3::Z)).unwrap_or(Vec3::X);
    let up = right.cross(forward);
    Mat3::from_cols(right, forward, up)
}

/// Pulls the camera back towards `eye` so it stays `margin` off the surface
/// that `hit` reports along the `eye`..`desired` segment.
///
/// Collapses to `eye` when no usable arm remains.
#[must_use]
pub fn reproject(eye: Vec3, desired: Vec3, hit: RayHit, margin: f32) -> Vec3 {
    let arm = desired - eye;
    let length_sq = arm.length_squared();
    if is_zero(length_sq) {
        return eye;
    }
    let t = hit.distance / length_sq.sqrt();
    let backoff = (-arm.dot(hit.normal) / length_sq) * margin;
    let scale = (t - backoff).max(0.0);
    if is_zero(scale) {
        eye
    } else {
        eye + arm * scale
    }
}

/// Orbit camera attached to one agent.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraRig {
    tunables: CameraTunables,
    state: CameraState,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(&CameraTunables::default())
    }
}

impl CameraRig {
    /// Creates a level rig whose arm starts at the configured initial length.
    #[must_use]
    pub fn new(tunables: &CameraTunables) -> Self {
        let distance = tunables
            .initial_distance
            .clamp(tunables.min_distance, tunables.max_distance);
        Self {
            tunables: tunables.clone(),
            state: CameraState {
                pitch: 0.0_f32.clamp(tunables.pitch_min, tunables.pitch_max),
                yaw: 0.0,
                distance,
                target_distance: distance,
            },
        }
    }

    /// Current orbit state.
    #[must_use]
    pub const fn state(&self) -> &CameraState {
        &self.state
    }

    /// Rig tuning.
    #[must_use]
    pub const fn tunables(&self) -> &CameraTunables {
        &self.tunables
    }

    /// Sets the desired arm length, clamped to the configured range.
    pub fn set_target_distance(&mut self, distance: f32) {
        if distance.is_nan() {
            return;
        }
        self.state.target_distance =
            distance.clamp(self.tunables.min_distance, self.tunables.max_distance);
    }

    /// Folds one tick of operator input into the orbit state.
    pub fn apply_input(&mut self, input: CameraInput) {
        let state = &mut self.state;
        if input.pitch_delta.is_finite() {
            state.pitch = (state.pitch + input.pitch_delta)
                .clamp(self.tunables.pitch_min, self.tunables.pitch_max);
        }
        if input.yaw_delta.is_finite() {
            state.yaw = wrap_to_range(state.yaw + input.yaw_delta, PI);
        }
        if input.zoom_delta.is_finite() {
            let target = state.target_distance + input.zoom_delta;
            self.set_target_distance(target);
        }
    }

    /// Moves the realised distance one step towards the desired one.
    pub fn converge(&mut self) {
        let state = &mut self.state;
        let gap = state.target_distance - state.distance;
        if gap.abs() <= self.tunables.snap_threshold {
            state.distance = state.target_distance;
        } else {
            state.distance += self.tunables.distance_step.min(gap.abs()).copysign(gap);
        }
    }

    /// Consumes `input`, converges the arm and returns this tick's transform.
    pub fn update(
        &mut self,
        input: CameraInput,
        pose: &dyn PoseSource,
        rays: &dyn RayCastService,
    ) -> CameraTransform {
        self.apply_input(input);
        self.converge();
        self.transform(pose, rays)
    }

    /// Resolves the camera transform for the current state without changing it.
    #[must_use]
    pub fn transform(&self, pose: &dyn PoseSource, rays: &dyn RayCastService) -> CameraTransform {
        let eye = pose.eye_position();
        let look = pose.eye_forward();
        let heading = if is_zero(look.x) && is_zero(look.y) {
            pose.yaw()
        } else {
            heading_towards(look.x, look.y)
        };
        let forward = orbit_direction(heading + self.state.yaw, self.state.pitch);
        let desired = eye - forward * self.state.distance;

        let exclude: Vec<_> = [pose.body(), pose.mount()].into_iter().flatten().collect();
        let probe =
            RayQuery::new(eye, desired, CollisionMask::CAMERA_OCCLUDERS).excluding(&exclude);
        let position = rays.cast_ray(&probe).map_or(desired, |hit| {
            let pulled = reproject(eye, desired, hit, self.tunables.collision_margin);
            trace!("camera arm blocked at {:.3}; pulled in to {pulled:?}", hit.distance);
            pulled
        });

        CameraTransform {
            position,
            basis: look_basis(forward),
        }
    }
}
