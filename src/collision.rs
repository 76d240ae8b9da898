//! Ray-cast interface used for sight checks and camera collision.
//!
//! The physical collision service is external. Steering and the camera rig
//! only need "does a segment hit anything of these categories, and where",
//! which [`RayCastService`] expresses. [`OccluderSet`] is a small
//! axis-aligned-box implementation used by the demo binary and tests.

use std::ops::BitOr;

use glam::Vec3;

use crate::pose::ObjectHandle;

/// Bit set of collision categories a ray should stop at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CollisionMask(pub u32);

impl CollisionMask {
    /// Matches nothing.
    pub const NONE: Self = Self(0);
    /// Static scenery placed in the level.
    pub const STATIC: Self = Self(1 << 0);
    /// Terrain height fields.
    pub const TERRAIN: Self = Self(1 << 1);
    /// Building interiors.
    pub const INTERIOR: Self = Self(1 << 2);
    /// Static shapes (props that never move).
    pub const STATIC_SHAPE: Self = Self(1 << 3);
    /// Water volumes.
    pub const WATER: Self = Self(1 << 4);
    /// Moving bodies such as characters and vehicles.
    pub const DYNAMIC: Self = Self(1 << 5);
    /// Gameplay objects (pickups, projectiles, items).
    pub const GAMEPLAY: Self = Self(1 << 6);
    /// Trigger volumes.
    pub const TRIGGER: Self = Self(1 << 7);

    /// Categories that block an agent's line of sight. Dynamic bodies never
    /// occlude.
    pub const SIGHT_OCCLUDERS: Self =
        Self(Self::STATIC.0 | Self::TERRAIN.0 | Self::INTERIOR.0 | Self::STATIC_SHAPE.0);
    /// Surfaces the follow camera must not pass through.
    pub const CAMERA_OCCLUDERS: Self =
        Self(Self::WATER.0 | Self::TERRAIN.0 | Self::INTERIOR.0 | Self::STATIC_SHAPE.0);

    /// Returns `true` when the two masks share any category.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` when every category in `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CollisionMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A segment query against the collision world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayQuery<'a> {
    /// Segment start.
    pub from: Vec3,
    /// Segment end.
    pub to: Vec3,
    /// Categories that stop the ray.
    pub mask: CollisionMask,
    /// Objects ignored for the duration of this query.
    pub exclude: &'a [ObjectHandle],
}

impl<'a> RayQuery<'a> {
    /// Query between two points with no exclusions.
    #[must_use]
    pub const fn new(from: Vec3, to: Vec3, mask: CollisionMask) -> Self {
        Self {
            from,
            to,
            mask,
            exclude: &[],
        }
    }

    /// Ignores `exclude` while the query runs.
    #[must_use]
    pub const fn excluding(self, exclude: &'a [ObjectHandle]) -> Self {
        Self { exclude, ..self }
    }
}

/// First surface hit along a [`RayQuery`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from `from` to the hit point.
    pub distance: f32,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

/// Read-only segment casts against the world.
pub trait RayCastService {
    /// Returns the nearest hit along the query segment, if any.
    fn cast_ray(&self, query: &RayQuery<'_>) -> Option<RayHit>;
}

/// A world with nothing in it.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenSky;

impl RayCastService for OpenSky {
    fn cast_ray(&self, _query: &RayQuery<'_>) -> Option<RayHit> {
        None
    }
}

/// Axis-aligned box occluder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Occluder {
    /// Owning object, used for query exclusions.
    pub handle: ObjectHandle,
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
    /// Collision category of the box.
    pub category: CollisionMask,
}

/// Collection of box occluders answering ray queries with a slab test.
#[derive(Clone, Debug, Default)]
pub struct OccluderSet {
    occluders: Vec<Occluder>,
}

impl OccluderSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a box spanning `min`..`max`.
    pub fn add(&mut self, handle: ObjectHandle, min: Vec3, max: Vec3, category: CollisionMask) {
        self.occluders.push(Occluder {
            handle,
            min: min.min(max),
            max: min.max(max),
            category,
        });
    }
}

/// Entry distance and normal of a segment against a box, using the slab
/// method. `None` if the segment misses or starts inside the box.
fn slab_hit(from: Vec3, dir: Vec3, length: f32, occluder: &Occluder) -> Option<RayHit> {
    let mut t_enter = 0.0_f32;
    let mut t_exit = length;
    let mut normal = Vec3::ZERO;
    let slabs = from
        .to_array()
        .into_iter()
        .zip(dir.to_array())
        .zip(occluder.min.to_array().into_iter().zip(occluder.max.to_array()))
        .zip(Vec3::AXES);
    for (((origin, d), (lo, hi)), axis) in slabs {
        if d.abs() < f32::EPSILON {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }
        let (near, far, facing) = if d > 0.0 {
            ((lo - origin) / d, (hi - origin) / d, -1.0_f32)
        } else {
            ((hi - origin) / d, (lo - origin) / d, 1.0)
        };
        if near > t_enter {
            t_enter = near;
            normal = axis * facing;
        }
        t_exit = t_exit.min(far);
        if t_enter > t_exit {
            return None;
        }
    }
    if normal == Vec3::ZERO {
        return None;
    }
    Some(RayHit {
        distance: t_enter,
        normal,
    })
}

impl RayCastService for OccluderSet {
    fn cast_ray(&self, query: &RayQuery<'_>) -> Option<RayHit> {
        let segment = query.to - query.from;
        let length = segment.length();
        let dir = segment.try_normalize()?;
        self.occluders
            .iter()
            .filter(|o| o.category.intersects(query.mask))
            .filter(|o| !query.exclude.contains(&o.handle))
            .filter_map(|o| slab_hit(query.from, dir, length, o))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
