//! Read-only pose and object queries consumed by the controller.
//!
//! The controlled agent's transform lives outside this crate. Steering and
//! the camera rig read it through [`PoseSource`], and resolve aim objects
//! through [`ObjectLookup`]. [`AgentPose`] is the plain-data implementation
//! used by the ECS plugin, the reference locomotion and tests.

use hashbrown::HashMap;

use glam::Vec3;

/// Opaque identifier of a simulation object (an aim target, the agent's own
/// body, or the vehicle it is mounted on).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(pub u64);

/// Per-tick view of the controlled agent's pose.
pub trait PoseSource {
    /// World-space eye position. Steering measures every offset from here.
    fn eye_position(&self) -> Vec3;
    /// Body yaw in radians (zero faces `+Y`).
    fn yaw(&self) -> f32;
    /// Head pitch relative to the body, in radians.
    fn head_pitch(&self) -> f32;
    /// Unit forward vector of the eye transform.
    fn eye_forward(&self) -> Vec3 {
        let yaw = self.yaw();
        let pitch = self.head_pitch();
        Vec3::new(
            yaw.sin() * pitch.cos(),
            yaw.cos() * pitch.cos(),
            -pitch.sin(),
        )
    }
    /// The agent's own collision body, excluded from camera probes.
    fn body(&self) -> Option<ObjectHandle> {
        None
    }
    /// The object the agent is mounted on, if any.
    fn mount(&self) -> Option<ObjectHandle> {
        None
    }
}

/// Plain snapshot of an agent's pose.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct AgentPose {
    /// World-space eye position.
    pub eye: Vec3,
    /// Body yaw (radians).
    pub yaw: f32,
    /// Head pitch relative to the body (radians).
    pub head_pitch: f32,
    /// Own collision body.
    pub body: Option<ObjectHandle>,
    /// Mount the agent rides on.
    pub mount: Option<ObjectHandle>,
}

impl AgentPose {
    /// Creates a pose at `eye` facing `yaw` with a level head.
    #[must_use]
    pub const fn new(eye: Vec3, yaw: f32) -> Self {
        Self {
            eye,
            yaw,
            head_pitch: 0.0,
            body: None,
            mount: None,
        }
    }

    /// Returns the pose with the given collision body attached.
    #[must_use]
    pub fn with_body(mut self, body: ObjectHandle) -> Self {
        self.body = Some(body);
        self
    }
}

impl PoseSource for AgentPose {
    fn eye_position(&self) -> Vec3 {
        self.eye
    }

    fn yaw(&self) -> f32 {
        self.yaw
    }

    fn head_pitch(&self) -> f32 {
        self.head_pitch
    }

    fn body(&self) -> Option<ObjectHandle> {
        self.body
    }

    fn mount(&self) -> Option<ObjectHandle> {
        self.mount
    }
}

/// Resolves live object positions for aim targets and sight checks.
pub trait ObjectLookup {
    /// Current world position of `handle`, or `None` when it no longer exists.
    fn position(&self, handle: ObjectHandle) -> Option<Vec3>;
    /// Centre of the object's bounding box; defaults to its position.
    fn box_center(&self, handle: ObjectHandle) -> Option<Vec3> {
        self.position(handle)
    }
}

/// Lookup that knows no objects; every handle resolves to `None`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObjects;

impl ObjectLookup for NoObjects {
    fn position(&self, _handle: ObjectHandle) -> Option<Vec3> {
        None
    }
}

/// Positions (and optional box centres) keyed by handle.
#[derive(Clone, Debug, Default)]
pub struct ObjectTable {
    entries: HashMap<ObjectHandle, (Vec3, Vec3)>,
}

impl ObjectTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or moves an object whose box centre equals its position.
    pub fn insert(&mut self, handle: ObjectHandle, position: Vec3) {
        self.entries.insert(handle, (position, position));
    }

    /// Inserts or moves an object with a distinct box centre.
    pub fn insert_with_center(&mut self, handle: ObjectHandle, position: Vec3, center: Vec3) {
        self.entries.insert(handle, (position, center));
    }

    /// Removes an object, returning whether it was present.
    pub fn remove(&mut self, handle: ObjectHandle) -> bool {
        self.entries.remove(&handle).is_some()
    }
}

impl ObjectLookup for ObjectTable {
    fn position(&self, handle: ObjectHandle) -> Option<Vec3> {
        self.entries.get(&handle).map(|(position, _)| *position)
    }

    fn box_center(&self, handle: ObjectHandle) -> Option<Vec3> {
        self.entries.get(&handle).map(|(_, center)| *center)
    }
}
