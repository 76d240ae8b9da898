//! Reference locomotion: advances a pose by one [`MoveCommand`].
//!
//! Real hosts feed the command to their own animation and physics step. This
//! kinematic version keeps the demo binary and the ECS plugin self-contained
//! and lets tests drive an agent towards its destination.

use glam::Vec2;

use crate::pose::AgentPose;
use crate::steering::MoveCommand;
use crate::vector_math::local_to_world;

/// Applies `command` to `pose`, moving at most `walk_distance` per axis unit.
///
/// The turn is applied first, so the agent-local axes of the command are
/// interpreted against the new heading.
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use tiller::locomotion::apply_move_command;
/// use tiller::pose::AgentPose;
/// use tiller::steering::MoveCommand;
///
/// let command = MoveCommand { y: 1.0, ..MoveCommand::default() };
/// let moved = apply_move_command(AgentPose::new(Vec3::ZERO, 0.0), &command, 0.5);
/// assert!((moved.eye - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-6);
/// ```
#[must_use]
pub fn apply_move_command(pose: AgentPose, command: &MoveCommand, walk_distance: f32) -> AgentPose {
    let yaw = pose.yaw + command.yaw;
    let planar = local_to_world(Vec2::new(command.x, command.y), yaw) * walk_distance;
    let step = planar.extend(command.z * walk_distance);
    AgentPose {
        eye: pose.eye + step,
        yaw,
        head_pitch: pose.head_pitch + command.pitch,
        ..pose
    }
}
