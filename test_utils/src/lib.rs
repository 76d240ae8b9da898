//! Utility helpers for tests.
//!
//! Scripted collision services, pose constructors and a closed-loop walking
//! helper shared by the integration tests.
pub mod poses;
pub mod rays;

pub use poses::{at, facing};
pub use rays::{hit, RecordedQuery, RecordingRays, ScriptedRays};

use tiller::{apply_move_command, Agent, AgentEvent, AgentPose, WorldView, TRIGGER_COUNT};

/// Outcome of [`walk`].
#[derive(Clone, Debug, PartialEq)]
pub struct Walk {
    /// Pose after the last tick.
    pub pose: AgentPose,
    /// Number of ticks run.
    pub ticks: u32,
    /// Events raised along the way, in order.
    pub events: Vec<AgentEvent>,
}

/// Ticks `agent` with the reference locomotion until it stops or `max_ticks`
/// elapse.
#[must_use]
pub fn walk(agent: &mut Agent, start: AgentPose, world: WorldView<'_>, max_ticks: u32) -> Walk {
    let walk_distance = agent.tunables().walk_distance_per_tick;
    let mut pose = start;
    let mut events: Vec<AgentEvent> = Vec::new();
    let mut ticks = 0;
    while ticks < max_ticks {
        ticks += 1;
        let command = agent.tick(&pose, world, [false; TRIGGER_COUNT], &mut events);
        pose = apply_move_command(pose, &command, walk_distance);
        if agent.intent().move_state() == tiller::MoveState::Stopped {
            break;
        }
    }
    Walk {
        pose,
        ticks,
        events,
    }
}
