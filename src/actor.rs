//! The controlled agent: intent, steering, sight and camera in one place.
//!
//! [`Agent`] owns every piece of per-agent state and runs the per-tick
//! pipeline in the required order: steering first, then the line-of-sight
//! check. The camera rig is updated separately, after the host has applied
//! the movement command to the pose.

use log::debug;

use crate::camera::{CameraInputAccumulator, CameraRig, CameraTransform};
use crate::collision::RayCastService;
use crate::events::EventSink;
use crate::intent::MoveIntentStore;
use crate::pose::{ObjectLookup, PoseSource};
use crate::sight::LineOfSightMonitor;
use crate::steering::{MoveCommand, SteeringController, TRIGGER_COUNT};
use crate::tunables::AgentTunables;

/// External world services read during a tick.
#[derive(Clone, Copy)]
pub struct WorldView<'a> {
    /// Live object positions for aim targets.
    pub objects: &'a dyn ObjectLookup,
    /// Ray casts for sight checks and camera collision.
    pub rays: &'a dyn RayCastService,
}

/// An autonomous agent.
#[derive(Clone, Debug)]
pub struct Agent {
    name: String,
    tunables: AgentTunables,
    intent: MoveIntentStore,
    steering: SteeringController,
    sight: LineOfSightMonitor,
    camera: CameraRig,
    camera_input: CameraInputAccumulator,
}

impl Agent {
    /// Creates a stopped agent with no aim target.
    #[must_use]
    pub fn new(name: impl Into<String>, tunables: &AgentTunables) -> Self {
        let label = name.into();
        debug!("creating agent {label}");
        Self {
            name: label,
            tunables: tunables.clone(),
            intent: MoveIntentStore::new(tunables),
            steering: SteeringController::new(tunables),
            sight: LineOfSightMonitor::default(),
            camera: CameraRig::new(&tunables.camera),
            camera_input: CameraInputAccumulator::default(),
        }
    }

    /// Display name used in log lines.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tunables the agent was built with.
    #[must_use]
    pub const fn tunables(&self) -> &AgentTunables {
        &self.tunables
    }

    /// Movement and aim intent.
    #[must_use]
    pub const fn intent(&self) -> &MoveIntentStore {
        &self.intent
    }

    /// Mutable access to the intent setters.
    pub const fn intent_mut(&mut self) -> &mut MoveIntentStore {
        &mut self.intent
    }

    /// Steering bookkeeping.
    #[must_use]
    pub const fn steering(&self) -> &SteeringController {
        &self.steering
    }

    /// Follow camera.
    #[must_use]
    pub const fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Mutable follow camera, for zoom requests.
    pub const fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    /// Buffer collecting operator camera input until the next camera update.
    pub const fn camera_input_mut(&mut self) -> &mut CameraInputAccumulator {
        &mut self.camera_input
    }

    /// Runs steering and the sight check for one simulation tick.
    pub fn tick(
        &mut self,
        pose: &dyn PoseSource,
        world: WorldView<'_>,
        triggers: [bool; TRIGGER_COUNT],
        sink: &mut dyn EventSink,
    ) -> MoveCommand {
        let command = self
            .steering
            .tick(&mut self.intent, pose, world.objects, triggers, sink);
        self.sight.update(
            &mut self.intent,
            pose,
            world.objects,
            world.rays,
            sink,
        );
        command
    }

    /// Consumes buffered camera input and resolves the camera transform for
    /// `pose`.
    pub fn update_camera(
        &mut self,
        pose: &dyn PoseSource,
        rays: &dyn RayCastService,
    ) -> CameraTransform {
        let input = self.camera_input.take();
        self.camera.update(input, pose, rays)
    }
}
