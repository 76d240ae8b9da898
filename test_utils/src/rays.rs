//! Ray services answering from a script instead of geometry.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use glam::Vec3;
use tiller::{CollisionMask, ObjectHandle, RayCastService, RayHit, RayQuery};

/// A hit `distance` along the ray with a normal facing back along `-Y`.
#[must_use]
pub const fn hit(distance: f32) -> RayHit {
    RayHit {
        distance,
        normal: Vec3::new(0.0, -1.0, 0.0),
    }
}

/// Returns queued results in order, then misses forever.
#[derive(Debug, Default)]
pub struct ScriptedRays {
    script: RefCell<VecDeque<Option<RayHit>>>,
    casts: Cell<usize>,
}

impl ScriptedRays {
    /// Service answering with `results`, one per cast.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use test_utils::rays::{hit, ScriptedRays};
    /// use tiller::{CollisionMask, RayCastService, RayQuery};
    ///
    /// let rays = ScriptedRays::new([Some(hit(1.0)), None]);
    /// let query = RayQuery::new(Vec3::ZERO, Vec3::X, CollisionMask::STATIC);
    /// assert!(rays.cast_ray(&query).is_some());
    /// assert!(rays.cast_ray(&query).is_none());
    /// assert_eq!(rays.casts(), 2);
    /// ```
    pub fn new(results: impl IntoIterator<Item = Option<RayHit>>) -> Self {
        Self {
            script: RefCell::new(results.into_iter().collect()),
            casts: Cell::new(0),
        }
    }

    /// Service reporting a hit (`true`) or miss (`false`) per cast.
    pub fn from_hits(hits: impl IntoIterator<Item = bool>) -> Self {
        Self::new(hits.into_iter().map(|blocked| blocked.then(|| hit(1.0))))
    }

    /// Number of casts answered so far.
    #[must_use]
    pub fn casts(&self) -> usize {
        self.casts.get()
    }
}

impl RayCastService for ScriptedRays {
    fn cast_ray(&self, _query: &RayQuery<'_>) -> Option<RayHit> {
        self.casts.set(self.casts.get() + 1);
        self.script.borrow_mut().pop_front().flatten()
    }
}

/// Owned copy of a [`RayQuery`] seen by [`RecordingRays`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedQuery {
    /// Segment start.
    pub from: Vec3,
    /// Segment end.
    pub to: Vec3,
    /// Categories the ray stopped at.
    pub mask: CollisionMask,
    /// Objects excluded from the query.
    pub exclude: Vec<ObjectHandle>,
}

/// Answers every cast with the same result and remembers each query.
#[derive(Debug, Default)]
pub struct RecordingRays {
    answer: Option<RayHit>,
    queries: RefCell<Vec<RecordedQuery>>,
}

impl RecordingRays {
    /// Service answering every cast with `answer`.
    #[must_use]
    pub fn answering(answer: Option<RayHit>) -> Self {
        Self {
            answer,
            queries: RefCell::default(),
        }
    }

    /// Queries seen so far, oldest first.
    #[must_use]
    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.borrow().clone()
    }
}

impl RayCastService for RecordingRays {
    fn cast_ray(&self, query: &RayQuery<'_>) -> Option<RayHit> {
        self.queries.borrow_mut().push(RecordedQuery {
            from: query.from,
            to: query.to,
            mask: query.mask,
            exclude: query.exclude.to_vec(),
        });
        self.answer
    }
}
