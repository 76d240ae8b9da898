//! Bevy plugin running agents on the fixed timestep.
//!
//! Each `FixedUpdate` the plugin steers every [`ControlledAgent`], optionally
//! applies the reference locomotion, and then resolves follow cameras from
//! the updated pose. Agent notifications are triggered as [`AgentNotice`]
//! observer events.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::info;

use crate::actor::WorldView;
use crate::collision::{OpenSky, RayCastService};
use crate::components::{ControlledAgent, FollowCamera, LastMoveCommand, Pose, Triggers};
use crate::events::AgentEvent;
use crate::locomotion::apply_move_command;
use crate::pose::{NoObjects, ObjectLookup};

/// Collision and object services shared by every agent.
#[derive(Resource)]
pub struct CollisionWorld {
    /// Live object positions.
    pub objects: Box<dyn ObjectLookup + Send + Sync>,
    /// Ray casts against the level.
    pub rays: Box<dyn RayCastService + Send + Sync>,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self {
            objects: Box::new(NoObjects),
            rays: Box::new(OpenSky),
        }
    }
}

impl CollisionWorld {
    /// Borrows both services for one tick.
    #[must_use]
    pub fn view(&self) -> WorldView<'_> {
        WorldView {
            objects: self.objects.as_ref(),
            rays: self.rays.as_ref(),
        }
    }
}

/// Observer event carrying a notification raised by one agent.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentNotice {
    /// Entity of the agent that raised the event.
    pub agent: Entity,
    /// What happened.
    pub event: AgentEvent,
}

/// Steers every agent and triggers an [`AgentNotice`] per raised event.
pub fn steer_agents_system(
    mut commands: Commands,
    world: Res<CollisionWorld>,
    mut agents: Query<(
        Entity,
        &mut ControlledAgent,
        &Pose,
        &Triggers,
        &mut LastMoveCommand,
    )>,
) {
    for (entity, mut agent, pose, triggers, mut last) in &mut agents {
        let mut events: Vec<AgentEvent> = Vec::new();
        last.0 = agent.tick(&pose.0, world.view(), triggers.0, &mut events);
        for event in events {
            commands.trigger(AgentNotice {
                agent: entity,
                event,
            });
        }
    }
}

/// Advances each pose by its agent's last command.
pub fn apply_locomotion_system(mut agents: Query<(&ControlledAgent, &LastMoveCommand, &mut Pose)>) {
    for (agent, command, mut pose) in &mut agents {
        let walk = agent.tunables().walk_distance_per_tick;
        pose.0 = apply_move_command(pose.0, &command.0, walk);
    }
}

/// Resolves follow cameras from the current poses.
pub fn update_follow_cameras_system(
    world: Res<CollisionWorld>,
    mut agents: Query<(&mut ControlledAgent, &Pose, &mut FollowCamera)>,
) {
    for (mut agent, pose, mut camera) in &mut agents {
        camera.transform = Some(agent.update_camera(&pose.0, world.rays.as_ref()));
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_agent_notice(notice: On<AgentNotice>) {
    let AgentNotice { agent, event } = notice.event();
    info!("agent {agent:?}: {}", event.callback_name());
}

/// Installs the agent systems and a default, empty [`CollisionWorld`].
#[derive(Debug, Clone, Copy)]
pub struct AgentControlPlugin {
    /// Apply [`apply_move_command`] to poses; disable when the host moves
    /// agents itself.
    pub reference_locomotion: bool,
}

impl Default for AgentControlPlugin {
    fn default() -> Self {
        Self {
            reference_locomotion: true,
        }
    }
}

impl Plugin for AgentControlPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CollisionWorld>();
        app.add_observer(log_agent_notice);
        if self.reference_locomotion {
            app.add_systems(
                FixedUpdate,
                (
                    steer_agents_system,
                    apply_locomotion_system,
                    update_follow_cameras_system,
                )
                    .chain(),
            );
        } else {
            app.add_systems(
                FixedUpdate,
                (steer_agents_system, update_follow_cameras_system).chain(),
            );
        }
    }
}
