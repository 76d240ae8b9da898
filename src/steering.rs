//! Per-tick steering: turns intent plus pose into a [`MoveCommand`].
//!
//! The controller never fails. Degenerate geometry (an aim point directly
//! above the eye, a destination already underfoot) is defused with epsilon
//! checks that select a neutral behaviour instead of dividing by zero.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec3};
use log::debug;

use crate::angle::{clamp_turn, heading_towards, shortest_delta, wrap_to_range};
use crate::events::EventSink;
use crate::intent::{MoveIntentStore, MoveState, ResolvedAim};
use crate::pose::{ObjectLookup, PoseSource};
use crate::tunables::AgentTunables;
use crate::vector_math::{is_zero, planar_length, sign_or_zero, world_to_local};

/// Number of trigger slots carried by a [`MoveCommand`].
pub const TRIGGER_COUNT: usize = 6;

/// Low-level control for one tick.
///
/// `x` and `y` are expressed in the agent's frame *after* applying `yaw`
/// (`+y` forward, `+x` right) and are already scaled by the move speed.
/// `z` is a unit up/down request.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveCommand {
    /// Yaw change to apply this tick (radians).
    pub yaw: f32,
    /// Head pitch change to apply this tick (radians).
    pub pitch: f32,
    /// Strafe axis.
    pub x: f32,
    /// Forward axis.
    pub y: f32,
    /// Vertical request (-1, 0 or 1).
    pub z: f32,
    /// Trigger states sampled this tick.
    pub triggers: [bool; TRIGGER_COUNT],
}

impl MoveCommand {
    /// Returns `true` when the command requests no translation.
    #[must_use]
    pub const fn is_stationary(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// Remembers last tick's eye position to spot an agent that is commanded to
/// move but does not.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StickyTracker {
    last: Option<Vec3>,
}

impl StickyTracker {
    /// Position recorded on the previous tick.
    #[must_use]
    pub const fn last_position(&self) -> Option<Vec3> {
        self.last
    }

    /// Stores `position` for the next comparison.
    pub const fn record(&mut self, position: Vec3) {
        self.last = Some(position);
    }

    /// Forgets the stored position.
    pub const fn clear(&mut self) {
        self.last = None;
    }

    /// Compares `position` with the stored one.
    ///
    /// A zero `tolerance` demands exact equality; otherwise any move shorter
    /// than `tolerance` counts as stuck.
    #[must_use]
    pub fn is_stuck(&self, position: Vec3, tolerance: f32) -> bool {
        match self.last {
            None => false,
            Some(last) if tolerance == 0.0 => last == position,
            Some(last) => last.distance(position) < tolerance,
        }
    }
}

/// World-space planar move direction towards a target offset `(dx, dy)`.
///
/// The dominant axis gets unit magnitude and the other the ratio of the minor
/// to the major delta, so the agent walks a straight line rather than an
/// axis-aligned zig-zag.
///
/// # Examples
/// ```
/// use tiller::steering::proportional_blend;
/// let dir = proportional_blend(10.0, 1.0);
/// assert!((dir.x - 1.0).abs() < 1e-6);
/// assert!((dir.y - 0.1).abs() < 1e-6);
/// ```
#[must_use]
pub fn proportional_blend(dx: f32, dy: f32) -> Vec2 {
    let toward = |delta: f32| if delta < 0.0 { -1.0 } else { 1.0 };
    match (is_zero(dx), is_zero(dy)) {
        (true, true) => Vec2::ZERO,
        (true, false) => Vec2::new(0.0, toward(dy)),
        (false, true) => Vec2::new(toward(dx), 0.0),
        (false, false) if dx.abs() > dy.abs() => {
            Vec2::new(toward(dx), toward(dy) * (dy / dx).abs())
        }
        (false, false) => Vec2::new(toward(dx) * (dx / dy).abs(), toward(dy)),
    }
}

/// Speed factor for a move, including slowdown-on-approach.
///
/// With `slowdown` set the speed ramps linearly to zero inside `radius`.
#[must_use]
pub fn speed_scale(speed: f32, slowdown: bool, distance: f32, radius: f32) -> f32 {
    if slowdown && radius > 0.0 {
        speed * (distance / radius).min(1.0)
    } else {
        speed
    }
}

/// The steering algorithm plus its per-agent bookkeeping.
#[derive(Clone, Debug, PartialEq)]
pub struct SteeringController {
    max_turn_per_tick: f32,
    slowdown_radius: f32,
    pitch_deadband: f32,
    stuck_tolerance: f32,
    stuck_test_delay: u32,
    sticky: StickyTracker,
    stuck_countdown: u32,
    seen_destination: u64,
}

impl Default for SteeringController {
    fn default() -> Self {
        Self::new(&AgentTunables::default())
    }
}

impl SteeringController {
    /// Creates a controller tuned by `tunables`.
    #[must_use]
    pub fn new(tunables: &AgentTunables) -> Self {
        Self {
            max_turn_per_tick: tunables.max_turn_per_tick,
            slowdown_radius: tunables.slowdown_radius,
            pitch_deadband: tunables.pitch_deadband,
            stuck_tolerance: tunables.stuck_tolerance,
            stuck_test_delay: tunables.stuck_test_delay,
            sticky: StickyTracker::default(),
            stuck_countdown: 0,
            seen_destination: 0,
        }
    }

    /// Stuck-detection memory.
    #[must_use]
    pub const fn sticky(&self) -> &StickyTracker {
        &self.sticky
    }

    /// Produces this tick's command and applies arrival/stuck transitions to
    /// `store`, notifying `sink`.
    pub fn tick(
        &mut self,
        store: &mut MoveIntentStore,
        pose: &dyn PoseSource,
        objects: &dyn ObjectLookup,
        triggers: [bool; TRIGGER_COUNT],
        sink: &mut dyn EventSink,
    ) -> MoveCommand {
        let location = pose.eye_position();
        if store.destination_serial() != self.seen_destination {
            self.seen_destination = store.destination_serial();
            self.sticky.clear();
            self.stuck_countdown = self.stuck_test_delay;
        }

        let (yaw, pitch) = store
            .resolve_aim(objects)
            .map_or((0.0, -pose.head_pitch()), |aim| {
                self.orient(aim, location, pose)
            });
        let mut command = MoveCommand {
            yaw,
            pitch,
            triggers,
            ..MoveCommand::default()
        };

        if store.move_state() == MoveState::Moving {
            self.translate(&mut command, store, location, pose.yaw(), sink);
        }

        self.sticky.record(location);
        command
    }

    /// Yaw and pitch deltas that face `aim` from `location`.
    fn orient(&self, aim: ResolvedAim, location: Vec3, pose: &dyn PoseSource) -> (f32, f32) {
        let level = -pose.head_pitch();
        let offset = aim.point - location;
        if is_zero(offset.x) && is_zero(offset.y) {
            return (0.0, level);
        }

        let current = wrap_to_range(pose.yaw(), PI);
        let desired = heading_towards(offset.x, offset.y);
        let yaw = clamp_turn(shortest_delta(desired, current), self.max_turn_per_tick);

        if !aim.explicit {
            return (yaw, level);
        }
        let pitch = planar_length(offset).atan2(offset.z) - FRAC_PI_2;
        if pitch.abs() > self.pitch_deadband {
            (yaw, pitch - pose.head_pitch())
        } else {
            (yaw, 0.0)
        }
    }

    fn translate(
        &mut self,
        command: &mut MoveCommand,
        store: &mut MoveIntentStore,
        location: Vec3,
        yaw: f32,
        sink: &mut dyn EventSink,
    ) {
        let intent = *store.intent();
        let delta = intent.destination - location;
        if delta.x.abs() < intent.tolerance && delta.y.abs() < intent.tolerance {
            store.arrive();
            debug!("reached destination {:?}", intent.destination);
            sink.on_reach_destination();
            return;
        }

        let world = proportional_blend(delta.x, delta.y);
        let local = world_to_local(world, yaw + command.yaw);
        let scale = speed_scale(
            intent.speed,
            intent.slowdown,
            planar_length(delta),
            self.slowdown_radius,
        );
        command.x = local.x * scale;
        command.y = local.y * scale;
        command.z = sign_or_zero(delta.z, intent.tolerance);

        if self.stuck_countdown > 0 {
            self.stuck_countdown -= 1;
        } else if self.sticky.is_stuck(location, self.stuck_tolerance) {
            store.stop();
            command.x = 0.0;
            command.y = 0.0;
            command.z = 0.0;
            debug!("stuck at {location:?} on the way to {:?}", intent.destination);
            sink.on_move_stuck();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::AgentEvent;
    use crate::pose::{AgentPose, NoObjects, ObjectHandle, ObjectTable};
    use approx::assert_relative_eq;
    use rstest::rstest;

    const NO_TRIGGERS: [bool; TRIGGER_COUNT] = [false; TRIGGER_COUNT];

    fn tick(
        controller: &mut SteeringController,
        store: &mut MoveIntentStore,
        pose: &AgentPose,
        events: &mut Vec<AgentEvent>,
    ) -> MoveCommand {
        controller.tick(store, pose, &NoObjects, NO_TRIGGERS, events)
    }

    #[rstest]
    #[case::east_dominant(10.0, 1.0, Vec2::new(1.0, 0.1))]
    #[case::north_dominant(-1.0, 4.0, Vec2::new(-0.25, 1.0))]
    #[case::pure_south(0.0, -3.0, Vec2::new(0.0, -1.0))]
    #[case::pure_west(-2.0, 0.0, Vec2::new(-1.0, 0.0))]
    #[case::exact_diagonal(-2.0, -2.0, Vec2::new(-1.0, -1.0))]
    #[case::degenerate(0.0, 0.0, Vec2::ZERO)]
    fn blend_is_proportional(#[case] dx: f32, #[case] dy: f32, #[case] expected: Vec2) {
        let dir = proportional_blend(dx, dy);
        assert_relative_eq!(dir.x, expected.x, epsilon = 1e-6);
        assert_relative_eq!(dir.y, expected.y, epsilon = 1e-6);
    }

    #[rstest]
    #[case::far(10.0, true, 0.8)]
    #[case::halfway(2.5, true, 0.4)]
    #[case::no_slowdown(2.5, false, 0.8)]
    fn slowdown_scales_inside_radius(
        #[case] distance: f32,
        #[case] slowdown: bool,
        #[case] expected: f32,
    ) {
        assert_relative_eq!(speed_scale(0.8, slowdown, distance, 5.0), expected);
    }

    #[test]
    fn idle_agent_only_levels_head() {
        let mut controller = SteeringController::default();
        let mut store = MoveIntentStore::default();
        let mut pose = AgentPose::new(Vec3::ZERO, 0.3);
        pose.head_pitch = 0.2;
        let mut events = Vec::new();
        let command = tick(&mut controller, &mut store, &pose, &mut events);
        assert_eq!(command.yaw, 0.0);
        assert_relative_eq!(command.pitch, -0.2);
        assert!(command.is_stationary());
        assert!(events.is_empty());
    }

    #[test]
    fn turn_rate_is_capped() {
        let mut controller = SteeringController::default();
        let mut store = MoveIntentStore::default();
        store.set_aim_location(Vec3::new(0.0, -10.0, 0.0));
        let pose = AgentPose::new(Vec3::ZERO, 0.0);
        let mut events = Vec::new();
        let command = tick(&mut controller, &mut store, &pose, &mut events);
        assert_relative_eq!(command.yaw.abs(), PI / 20.0);
    }

    #[test]
    fn small_turns_are_not_capped() {
        let mut controller = SteeringController::default();
        let mut store = MoveIntentStore::default();
        store.set_aim_location(Vec3::new(1.0, 100.0, 0.0));
        let pose = AgentPose::new(Vec3::ZERO, 0.0);
        let mut events = Vec::new();
        let command = tick(&mut controller, &mut store, &pose, &mut events);
        assert_relative_eq!(command.yaw, 1.0_f32.atan2(100.0), epsilon = 1e-6);
    }

    #[test]
    fn explicit_aim_pitches_towards_target() {
        let mut controller = SteeringController::default();
        let mut store = MoveIntentStore::default();
        store.set_aim_location(Vec3::new(0.0, 10.0, 10.0));
        let mut pose = AgentPose::new(Vec3::ZERO, 0.0);
        pose.head_pitch = 0.1;
        let mut events = Vec::new();
        let command = tick(&mut controller, &mut store, &pose, &mut events);
        assert_relative_eq!(command.pitch, -PI / 4.0 - 0.1, epsilon = 1e-5);
    }

    #[test]
    fn pitch_inside_deadband_is_ignored() {
        let mut controller = SteeringController::default();
        let mut store = MoveIntentStore::default();
        store.set_aim_location(Vec3::new(0.0, 100.0, 0.5));
        let mut pose = AgentPose::new(Vec3::ZERO, 0.0);
        pose.head_pitch = 0.3;
        let mut events = Vec::new();
        let command = tick(&mut controller, &mut store, &pose, &mut events);
        assert_eq!(command.pitch, 0.0);
    }

    #[test]
    fn aim_directly_overhead_skips_yaw_and_levels() {
        let mut controller = SteeringController::default();
        let mut store = MoveIntentStore::default();
        store.set_aim_location(Vec3::new(0.0, 0.0, 5.0));
        let mut pose = AgentPose::new(Vec3::ZERO, 1.0);
        pose.head_pitch = -0.4;
        let mut events = Vec::new();
        let command = tick(&mut controller, &mut store, &pose, &mut events);
        assert_eq!(command.yaw, 0.0);
        assert_relative_eq!(command.pitch, 0.4);
    }

    #[test]
    fn walking_agent_looks_ahead_and_levels() {
        let mut controller = SteeringController::default();
        let mut store = MoveIntentStore::default();
        store.set_destination(Vec3::new(10.0, 0.0, 3.0), false);
        let mut pose = AgentPose::new(Vec3::ZERO, FRAC_PI_2);
        pose.head_pitch = 0.25;
        let mut events = Vec::new();
        let command = tick(&mut controller, &mut store, &pose, &mut events);
        assert_relative_eq!(command.yaw, 0.0, epsilon = 1e-6);
        assert_relative_eq!(command.pitch, -0.25);
        assert_relative_eq!(command.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(command.y, 1.0, epsilon = 1e-6);
        assert_eq!(command.z, 1.0);
    }

    #[test]
    fn move_is_expressed_after_this_ticks_turn() {
        let mut controller = SteeringController::default();
        let mut store = MoveIntentStore::default();
        store.set_destination(Vec3::new(0.0, 10.0, 0.0), false);
        let pose = AgentPose::new(Vec3::ZERO, FRAC_PI_2);
        let mut events = Vec::new();
        let command = tick(&mut controller, &mut store, &pose, &mut events);
        let heading = FRAC_PI_2 + command.yaw;
        let expected = world_to_local(Vec2::Y, heading);
        assert_relative_eq!(command.x, expected.x, epsilon = 1e-6);
        assert_relative_eq!(command.y, expected.y, epsilon = 1e-6);
    }

    #[test]
    fn triggers_pass_through() {
        let mut controller = SteeringController::default();
        let mut store = MoveIntentStore::default();
        let pose = AgentPose::new(Vec3::ZERO, 0.0);
        let triggers = [true, false, true, false, false, true];
        let mut events: Vec<AgentEvent> = Vec::new();
        let command = controller.tick(&mut store, &pose, &NoObjects, triggers, &mut events);
        assert_eq!(command.triggers, triggers);
    }

    #[test]
    fn arrival_wins_over_stuck_check() {
        let mut controller = SteeringController::default();
        let mut store = MoveIntentStore::default();
        let pose = AgentPose::new(Vec3::ZERO, 0.0);
        store.set_destination(Vec3::new(3.0, 0.0, 0.0), false);
        let mut events = Vec::new();
        tick(&mut controller, &mut store, &pose, &mut events);
        store.set_destination(Vec3::new(0.05, 0.0, 0.0), false);
        tick(&mut controller, &mut store, &pose, &mut events);
        tick(&mut controller, &mut store, &pose, &mut events);
        assert_eq!(events, vec![AgentEvent::ReachDestination]);
    }

    #[test]
    fn stuck_grace_delay_postpones_detection() {
        let tunables = AgentTunables {
            stuck_test_delay: 2,
            ..AgentTunables::default()
        };
        let mut controller = SteeringController::new(&tunables);
        let mut store = MoveIntentStore::new(&tunables);
        store.set_destination(Vec3::new(10.0, 0.0, 0.0), false);
        let pose = AgentPose::new(Vec3::ZERO, FRAC_PI_2);
        let mut events = Vec::new();
        for _ in 0..2 {
            tick(&mut controller, &mut store, &pose, &mut events);
        }
        assert!(events.is_empty());
        tick(&mut controller, &mut store, &pose, &mut events);
        assert_eq!(events, vec![AgentEvent::MoveStuck]);
        assert_eq!(store.move_state(), MoveState::Stopped);
    }

    #[test]
    fn tolerance_makes_stuck_detection_fuzzy() {
        let tunables = AgentTunables {
            stuck_tolerance: 0.01,
            ..AgentTunables::default()
        };
        let mut controller = SteeringController::new(&tunables);
        let mut store = MoveIntentStore::new(&tunables);
        store.set_destination(Vec3::new(10.0, 0.0, 0.0), false);
        let mut events = Vec::new();
        tick(
            &mut controller,
            &mut store,
            &AgentPose::new(Vec3::ZERO, FRAC_PI_2),
            &mut events,
        );
        let command = tick(
            &mut controller,
            &mut store,
            &AgentPose::new(Vec3::new(0.001, 0.0, 0.0), FRAC_PI_2),
            &mut events,
        );
        assert_eq!(events, vec![AgentEvent::MoveStuck]);
        assert!(command.is_stationary());
    }

    #[test]
    fn object_aim_follows_the_object() {
        let mut controller = SteeringController::default();
        let mut store = MoveIntentStore::default();
        let target = ObjectHandle(5);
        let mut objects = ObjectTable::new();
        objects.insert(target, Vec3::new(-1.0, 0.0, 0.0));
        store.set_aim_object(target, Vec3::ZERO);
        let pose = AgentPose::new(Vec3::ZERO, -FRAC_PI_2 + 0.05);
        let mut events: Vec<AgentEvent> = Vec::new();
        let command = controller.tick(&mut store, &pose, &objects, NO_TRIGGERS, &mut events);
        assert_relative_eq!(command.yaw, -0.05, epsilon = 1e-5);
    }
}
