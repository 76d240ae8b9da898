//! Edge-triggered line-of-sight tracking for object aim targets.
//!
//! Each tick the monitor casts a ray from the agent's eye to the centre of
//! the aim object's bounding box, against static occluders only. A
//! notification is raised only when visibility flips.

use log::debug;

use crate::collision::{CollisionMask, RayCastService, RayQuery};
use crate::events::{dispatch, AgentEvent, EventSink};
use crate::intent::{AimTarget, MoveIntentStore};
use crate::pose::{ObjectHandle, ObjectLookup, PoseSource};

/// Whether the aim object was visible on the last check.
///
/// Starts not-visible, and returns to not-visible whenever the aim target
/// changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LosState {
    visible: bool,
}

impl LosState {
    /// Visibility as of the last check.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        self.visible
    }

    pub(crate) const fn reset(&mut self) {
        self.visible = false;
    }

    /// Records a fresh observation and returns the transition it causes.
    pub fn observe(&mut self, visible: bool) -> Option<AgentEvent> {
        if visible == self.visible {
            return None;
        }
        self.visible = visible;
        Some(if visible {
            AgentEvent::TargetEnterLos
        } else {
            AgentEvent::TargetExitLos
        })
    }
}

/// Runs the per-tick sight check for object aim targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineOfSightMonitor {
    occluders: CollisionMask,
}

impl Default for LineOfSightMonitor {
    fn default() -> Self {
        Self {
            occluders: CollisionMask::SIGHT_OCCLUDERS,
        }
    }
}

impl LineOfSightMonitor {
    /// Checks visibility of the current aim object from the eye of `pose`.
    ///
    /// The target itself and the agent's body and mount never block the ray.
    /// Does nothing unless the aim target is an object that still resolves.
    /// Returns (and dispatches to `sink`) the event raised by a transition.
    pub fn update(
        &self,
        store: &mut MoveIntentStore,
        pose: &dyn PoseSource,
        objects: &dyn ObjectLookup,
        rays: &dyn RayCastService,
        sink: &mut dyn EventSink,
    ) -> Option<AgentEvent> {
        let AimTarget::Object { handle, .. } = store.aim() else {
            return None;
        };
        let target = objects.box_center(handle)?;
        let exclude: Vec<ObjectHandle> = [Some(handle), pose.body(), pose.mount()]
            .into_iter()
            .flatten()
            .collect();
        let query = RayQuery::new(pose.eye_position(), target, self.occluders).excluding(&exclude);
        let blocked = rays.cast_ray(&query).is_some();
        let event = store.los_mut().observe(!blocked)?;
        debug!("aim object {handle:?}: {}", event.callback_name());
        dispatch(sink, event);
        Some(event)
    }
}
