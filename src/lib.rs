//! Steering and follow-camera control for autonomous agents.
//!
//! Each tick an [`Agent`] turns its movement and aim intent into a
//! [`MoveCommand`], watches whether its aim object is in sight, and, once the
//! host has moved it, resolves a collision-aware third-person camera.
//! Notifications flow through an [`EventSink`]; collision and object queries
//! come from the host through [`RayCastService`] and [`ObjectLookup`].
//!
//! [`AgentControlPlugin`] runs the same pipeline inside a Bevy app.
pub mod actor;
pub mod angle;
pub mod camera;
pub mod collision;
pub mod components;
pub mod constants;
pub mod events;
pub mod intent;
pub mod locomotion;
pub mod logging;
pub mod plugin;
pub mod pose;
pub mod sight;
pub mod steering;
pub mod tunables;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use actor::{Agent, WorldView};
pub use angle::{shortest_delta, wrap_to_range};
pub use camera::{CameraInput, CameraInputAccumulator, CameraRig, CameraState, CameraTransform};
pub use collision::{CollisionMask, OccluderSet, OpenSky, RayCastService, RayHit, RayQuery};
pub use components::{ControlledAgent, FollowCamera, LastMoveCommand, Pose, Triggers};
pub use events::{AgentEvent, EventSink, LogSink};
pub use intent::{AimTarget, MoveIntent, MoveIntentStore, MoveState};
pub use locomotion::apply_move_command;
pub use logging::init as init_logging;
pub use plugin::{AgentControlPlugin, AgentNotice, CollisionWorld};
pub use pose::{AgentPose, ObjectHandle, ObjectLookup, ObjectTable, PoseSource};
pub use sight::{LineOfSightMonitor, LosState};
pub use steering::{MoveCommand, SteeringController, StickyTracker, TRIGGER_COUNT};
pub use tunables::{AgentTunables, CameraTunables, TunablesError};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use tiller::prelude::*;
    //! ```

    pub use crate::Agent;
    pub use crate::AgentPose;
    pub use crate::AgentTunables;
    pub use crate::EventSink;
    pub use crate::MoveCommand;
    pub use crate::MoveIntentStore;
    pub use crate::ObjectHandle;
    pub use crate::WorldView;
}
