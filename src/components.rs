//! ECS components attaching agents to Bevy entities.
use bevy::prelude::*;

use crate::actor::Agent;
use crate::camera::CameraTransform;
use crate::pose::AgentPose;
use crate::steering::{MoveCommand, TRIGGER_COUNT};

/// The agent's pose as seen by steering and the camera.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Deref, DerefMut)]
pub struct Pose(pub AgentPose);

/// The agent driven by [`crate::plugin::AgentControlPlugin`].
#[derive(Component, Debug, Clone, Deref, DerefMut)]
#[require(Pose, Triggers, LastMoveCommand)]
pub struct ControlledAgent(pub Agent);

/// Trigger states sampled by the next steering tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct Triggers(pub [bool; TRIGGER_COUNT]);

/// Command produced by the most recent steering tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Deref)]
pub struct LastMoveCommand(pub MoveCommand);

/// Opts an agent into camera updates and holds the latest camera transform.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct FollowCamera {
    /// Transform resolved on the last fixed tick, if any.
    pub transform: Option<CameraTransform>,
}
