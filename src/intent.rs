//! Movement and aim intent owned by a single agent.
//!
//! [`MoveIntentStore`] is mutated only through its own setters. It holds the
//! destination, tolerance, speed and slowdown flag, the discrete
//! [`MoveState`], the [`AimTarget`], and the line-of-sight flag that must be
//! cleared whenever the aim target changes.

use glam::Vec3;
use log::debug;

use crate::constants::DEFAULT_MOVE_TOLERANCE;
use crate::pose::{ObjectHandle, ObjectLookup};
use crate::sight::LosState;
use crate::tunables::AgentTunables;

/// Whether the agent is currently walking to its destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MoveState {
    /// Not moving.
    #[default]
    Stopped,
    /// Walking towards the destination.
    Moving,
}

/// What the agent orients its view towards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum AimTarget {
    /// No explicit aim; the agent looks where it walks.
    #[default]
    None,
    /// A live object; the aim point follows the object plus `offset`.
    Object {
        /// Tracked object.
        handle: ObjectHandle,
        /// Offset added to the object's position.
        offset: Vec3,
    },
    /// A fixed world location.
    Location(Vec3),
}

/// Destination and pacing of a move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveIntent {
    /// Where the agent is walking to.
    pub destination: Vec3,
    /// Planar arrival tolerance on each axis.
    pub tolerance: f32,
    /// Normalised speed in `[0, 1]`.
    pub speed: f32,
    /// Decelerate when closing in on the destination.
    pub slowdown: bool,
}

impl Default for MoveIntent {
    fn default() -> Self {
        Self {
            destination: Vec3::ZERO,
            tolerance: DEFAULT_MOVE_TOLERANCE,
            speed: 1.0,
            slowdown: true,
        }
    }
}

/// An effective aim point resolved for the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedAim {
    /// World point to face.
    pub point: Vec3,
    /// `true` for an object or location aim, `false` when merely looking at
    /// the walk destination.
    pub explicit: bool,
}

/// Per-agent intent state.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveIntentStore {
    intent: MoveIntent,
    state: MoveState,
    aim: AimTarget,
    los: LosState,
    last_aim_point: Option<Vec3>,
    destination_serial: u64,
    min_tolerance: f32,
    speed_bounds: (f32, f32),
}

impl Default for MoveIntentStore {
    fn default() -> Self {
        Self::new(&AgentTunables::default())
    }
}

impl MoveIntentStore {
    /// Creates a stopped store using the tolerance floor and speed bounds of
    /// `tunables`.
    #[must_use]
    pub fn new(tunables: &AgentTunables) -> Self {
        let mut intent = MoveIntent::default();
        intent.tolerance = intent.tolerance.max(tunables.min_tolerance);
        intent.speed = intent.speed.clamp(tunables.min_speed, tunables.max_speed);
        Self {
            intent,
            state: MoveState::Stopped,
            aim: AimTarget::None,
            los: LosState::default(),
            last_aim_point: None,
            destination_serial: 0,
            min_tolerance: tunables.min_tolerance,
            speed_bounds: (tunables.min_speed, tunables.max_speed),
        }
    }

    /// Sets the normalised move speed, clamped to the configured bounds.
    pub fn set_speed(&mut self, speed: f32) {
        let (lo, hi) = self.speed_bounds;
        self.intent.speed = if speed.is_nan() { lo } else { speed.clamp(lo, hi) };
    }

    /// Sets the arrival tolerance, never below the configured floor.
    pub fn set_tolerance(&mut self, tolerance: f32) {
        self.intent.tolerance = if tolerance.is_nan() {
            self.min_tolerance
        } else {
            tolerance.max(self.min_tolerance)
        };
    }

    /// Starts moving towards `destination`.
    pub fn set_destination(&mut self, destination: Vec3, slowdown: bool) {
        self.intent.destination = destination;
        self.intent.slowdown = slowdown;
        self.state = MoveState::Moving;
        self.destination_serial = self.destination_serial.wrapping_add(1);
        debug!("destination set to {destination:?} (slowdown: {slowdown})");
    }

    /// Stops moving immediately.
    pub const fn stop(&mut self) {
        self.state = MoveState::Stopped;
    }

    /// Aims at a live object plus `offset`.
    pub fn set_aim_object(&mut self, handle: ObjectHandle, offset: Vec3) {
        self.replace_aim(AimTarget::Object { handle, offset });
    }

    /// Aims at a fixed location.
    pub fn set_aim_location(&mut self, location: Vec3) {
        self.replace_aim(AimTarget::Location(location));
    }

    /// Drops any explicit aim.
    pub fn clear_aim(&mut self) {
        self.replace_aim(AimTarget::None);
    }

    fn replace_aim(&mut self, aim: AimTarget) {
        debug!("aim target changed from {:?} to {aim:?}", self.aim);
        self.aim = aim;
        self.los.reset();
    }

    /// Resolves this tick's aim point.
    ///
    /// An object aim whose handle no longer resolves is cleared. With no
    /// explicit aim, a moving agent looks at its destination; a stopped one
    /// has no aim point.
    pub fn resolve_aim(&mut self, objects: &dyn ObjectLookup) -> Option<ResolvedAim> {
        let resolved = match self.aim {
            AimTarget::Object { handle, offset } => objects.position(handle).map_or_else(
                || {
                    debug!("aim object {handle:?} vanished; clearing aim");
                    self.clear_aim();
                    self.destination_aim()
                },
                |position| {
                    Some(ResolvedAim {
                        point: position + offset,
                        explicit: true,
                    })
                },
            ),
            AimTarget::Location(point) => Some(ResolvedAim {
                point,
                explicit: true,
            }),
            AimTarget::None => self.destination_aim(),
        };
        self.last_aim_point = resolved.map(|aim| aim.point);
        resolved
    }

    fn destination_aim(&self) -> Option<ResolvedAim> {
        (self.state == MoveState::Moving).then_some(ResolvedAim {
            point: self.intent.destination,
            explicit: false,
        })
    }

    pub(crate) const fn arrive(&mut self) {
        self.state = MoveState::Stopped;
    }

    pub(crate) const fn los_mut(&mut self) -> &mut LosState {
        &mut self.los
    }

    /// Current move intent.
    #[must_use]
    pub const fn intent(&self) -> &MoveIntent {
        &self.intent
    }

    /// Current move state.
    #[must_use]
    pub const fn move_state(&self) -> MoveState {
        self.state
    }

    /// Current aim target.
    #[must_use]
    pub const fn aim(&self) -> AimTarget {
        self.aim
    }

    /// Destination of the current (or last) move.
    #[must_use]
    pub const fn move_destination(&self) -> Vec3 {
        self.intent.destination
    }

    /// Normalised move speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.intent.speed
    }

    /// Arrival tolerance.
    #[must_use]
    pub const fn tolerance(&self) -> f32 {
        self.intent.tolerance
    }

    /// Aim point used on the most recent tick, if any.
    #[must_use]
    pub const fn aim_location(&self) -> Option<Vec3> {
        self.last_aim_point
    }

    /// Whether the aim object is currently visible.
    #[must_use]
    pub const fn target_in_los(&self) -> bool {
        self.los.is_visible()
    }

    /// Counter bumped by every [`MoveIntentStore::set_destination`] call.
    #[must_use]
    pub const fn destination_serial(&self) -> u64 {
        self.destination_serial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::ObjectTable;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> MoveIntentStore {
        MoveIntentStore::default()
    }

    #[rstest]
    #[case::below(-0.5, 0.0)]
    #[case::inside(0.4, 0.4)]
    #[case::above(3.0, 1.0)]
    #[case::nan(f32::NAN, 0.0)]
    fn speed_is_clamped(mut store: MoveIntentStore, #[case] speed: f32, #[case] expected: f32) {
        store.set_speed(speed);
        assert_eq!(store.speed(), expected);
    }

    #[rstest]
    #[case::below_floor(0.01, 0.1)]
    #[case::above_floor(0.5, 0.5)]
    fn tolerance_has_floor(
        mut store: MoveIntentStore,
        #[case] tolerance: f32,
        #[case] expected: f32,
    ) {
        store.set_tolerance(tolerance);
        assert_eq!(store.tolerance(), expected);
    }

    #[rstest]
    fn destination_starts_moving_and_stop_halts(mut store: MoveIntentStore) {
        assert_eq!(store.move_state(), MoveState::Stopped);
        store.set_destination(Vec3::new(3.0, 4.0, 0.0), false);
        assert_eq!(store.move_state(), MoveState::Moving);
        assert_eq!(store.destination_serial(), 1);
        assert!(!store.intent().slowdown);
        store.stop();
        assert_eq!(store.move_state(), MoveState::Stopped);
    }

    #[rstest]
    fn aim_variants_are_exclusive(mut store: MoveIntentStore) {
        store.set_aim_object(ObjectHandle(3), Vec3::Z);
        store.set_aim_location(Vec3::X);
        assert_eq!(store.aim(), AimTarget::Location(Vec3::X));
        store.clear_aim();
        assert_eq!(store.aim(), AimTarget::None);
    }

    #[rstest]
    fn changing_aim_resets_sight(mut store: MoveIntentStore) {
        store.set_aim_object(ObjectHandle(3), Vec3::ZERO);
        store.los_mut().observe(true);
        assert!(store.target_in_los());
        store.set_aim_location(Vec3::ZERO);
        assert!(!store.target_in_los());
    }

    #[rstest]
    fn object_aim_tracks_live_position(mut store: MoveIntentStore) {
        let mut objects = ObjectTable::new();
        objects.insert(ObjectHandle(9), Vec3::new(1.0, 2.0, 0.0));
        store.set_aim_object(ObjectHandle(9), Vec3::new(0.0, 0.0, 1.5));
        let first = store.resolve_aim(&objects).map(|aim| aim.point);
        assert_eq!(first, Some(Vec3::new(1.0, 2.0, 1.5)));

        objects.insert(ObjectHandle(9), Vec3::new(5.0, 2.0, 0.0));
        let second = store.resolve_aim(&objects).map(|aim| aim.point);
        assert_eq!(second, Some(Vec3::new(5.0, 2.0, 1.5)));
        assert_eq!(store.aim_location(), second);
    }

    #[rstest]
    fn vanished_object_clears_aim(mut store: MoveIntentStore) {
        store.set_aim_object(ObjectHandle(4), Vec3::ZERO);
        store.set_destination(Vec3::new(2.0, 0.0, 0.0), true);
        let resolved = store.resolve_aim(&ObjectTable::new());
        assert_eq!(store.aim(), AimTarget::None);
        assert_eq!(
            resolved,
            Some(ResolvedAim {
                point: Vec3::new(2.0, 0.0, 0.0),
                explicit: false,
            })
        );
    }

    #[rstest]
    fn idle_store_has_no_aim(mut store: MoveIntentStore) {
        assert_eq!(store.resolve_aim(&ObjectTable::new()), None);
        assert_eq!(store.aim_location(), None);
    }
}
