//! Notifications raised by the controller on state transitions.
//!
//! Delivery is fire-and-forget: the controller never inspects a result and
//! never retries. Implement [`EventSink`] on whatever subsystem wants to hear
//! about arrivals, stuck agents and sight changes.

use log::info;
use serde::Serialize;

/// The four transitions the controller reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AgentEvent {
    /// The agent came within tolerance of its destination.
    ReachDestination,
    /// The agent was commanded to move but did not.
    MoveStuck,
    /// The aim object became visible.
    TargetEnterLos,
    /// The aim object became occluded.
    TargetExitLos,
}

impl AgentEvent {
    /// Conventional callback name for the event.
    #[must_use]
    pub const fn callback_name(self) -> &'static str {
        match self {
            Self::ReachDestination => "onReachDestination",
            Self::MoveStuck => "onMoveStuck",
            Self::TargetEnterLos => "onTargetEnterLOS",
            Self::TargetExitLos => "onTargetExitLOS",
        }
    }
}

/// Receiver of controller notifications.
pub trait EventSink {
    /// The agent reached its destination and stopped.
    fn on_reach_destination(&mut self);
    /// The agent failed to move and was stopped.
    fn on_move_stuck(&mut self);
    /// The aim object entered the agent's line of sight.
    fn on_target_enter_los(&mut self);
    /// The aim object left the agent's line of sight.
    fn on_target_exit_los(&mut self);
}

/// Routes `event` to the matching [`EventSink`] method.
pub fn dispatch(sink: &mut dyn EventSink, event: AgentEvent) {
    match event {
        AgentEvent::ReachDestination => sink.on_reach_destination(),
        AgentEvent::MoveStuck => sink.on_move_stuck(),
        AgentEvent::TargetEnterLos => sink.on_target_enter_los(),
        AgentEvent::TargetExitLos => sink.on_target_exit_los(),
    }
}

/// Collects events in arrival order.
impl EventSink for Vec<AgentEvent> {
    fn on_reach_destination(&mut self) {
        self.push(AgentEvent::ReachDestination);
    }

    fn on_move_stuck(&mut self) {
        self.push(AgentEvent::MoveStuck);
    }

    fn on_target_enter_los(&mut self) {
        self.push(AgentEvent::TargetEnterLos);
    }

    fn on_target_exit_los(&mut self) {
        self.push(AgentEvent::TargetExitLos);
    }
}

/// Sink that only logs, tagging each line with the agent's name.
#[derive(Clone, Debug)]
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Creates a sink logging under `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log(&self, event: AgentEvent) {
        info!("{}: {}", self.name, event.callback_name());
    }
}

impl EventSink for LogSink {
    fn on_reach_destination(&mut self) {
        self.log(AgentEvent::ReachDestination);
    }

    fn on_move_stuck(&mut self) {
        self.log(AgentEvent::MoveStuck);
    }

    fn on_target_enter_los(&mut self) {
        self.log(AgentEvent::TargetEnterLos);
    }

    fn on_target_exit_los(&mut self) {
        self.log(AgentEvent::TargetExitLos);
    }
}
