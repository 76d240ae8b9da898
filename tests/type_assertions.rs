//! Compile-time guards on the plain-data types handed across the API.
use static_assertions::{assert_impl_all, assert_not_impl_any, const_assert_eq};
use tiller::{
    AgentEvent, AgentPose, CameraInput, CameraTransform, CollisionWorld, ControlledAgent,
    MoveCommand, MoveIntentStore, ObjectHandle, TRIGGER_COUNT,
};

const_assert_eq!(TRIGGER_COUNT, 6);

assert_impl_all!(MoveCommand: Copy, Send, Sync, Default);
assert_impl_all!(CameraTransform: Copy, Send, Sync);
assert_impl_all!(CameraInput: Copy, Default);
assert_impl_all!(AgentPose: Copy, Send, Sync);
assert_impl_all!(ObjectHandle: Copy, Eq, std::hash::Hash);
assert_impl_all!(AgentEvent: Copy, Eq, serde::Serialize);
assert_impl_all!(ControlledAgent: Send, Sync);
assert_impl_all!(CollisionWorld: Send, Sync);

assert_not_impl_any!(MoveIntentStore: Copy);
