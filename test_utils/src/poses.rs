//! Convenience constructors for agent poses used in tests.

use glam::Vec3;
use tiller::AgentPose;

/// Level pose at `(x, y, 0)` facing `+Y`.
///
/// # Examples
/// ```
/// use test_utils::poses::at;
/// let pose = at(1.0, 2.0);
/// assert_eq!(pose.eye.y, 2.0);
/// assert_eq!(pose.yaw, 0.0);
/// ```
#[must_use]
pub const fn at(x: f32, y: f32) -> AgentPose {
    AgentPose::new(Vec3::new(x, y, 0.0), 0.0)
}

/// Level pose at `eye` facing `yaw`.
#[must_use]
pub const fn facing(eye: Vec3, yaw: f32) -> AgentPose {
    AgentPose::new(eye, yaw)
}
