//! Small geometry helpers shared by the controller and the camera rig.
//! Epsilon tests, planar lengths and the world-to-local heading rotation.
use glam::{Vec2, Vec3};

use crate::constants::ZERO_EPSILON;

/// Returns `true` when `value` is within [`ZERO_EPSILON`] of zero.
///
/// # Examples
/// ```
/// use tiller::vector_math::is_zero;
/// assert!(is_zero(0.00001));
/// assert!(!is_zero(0.1));
/// ```
#[must_use]
pub fn is_zero(value: f32) -> bool {
    value.abs() < ZERO_EPSILON
}

/// Length of the horizontal (XY) part of a vector.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use tiller::vector_math::planar_length;
/// let length = planar_length(Vec3::new(3.0, 4.0, 12.0));
/// assert!((length - 5.0).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn planar_length(vector: Vec3) -> f32 {
    vector.truncate().length()
}

/// Unit sign of `value`, or zero when it lies within `dead_zone` of zero.
#[must_use]
pub fn sign_or_zero(value: f32, dead_zone: f32) -> f32 {
    if value.abs() <= dead_zone || !value.is_finite() {
        0.0
    } else {
        value.signum()
    }
}

/// Rotates a world-space planar vector into the frame of an agent facing
/// `heading`.
///
/// Local `+Y` is the agent's forward direction and local `+X` its right hand.
/// An agent facing east (`heading = π/2`) sees a world `+X` move as straight
/// ahead.
///
/// # Examples
/// ```
/// use std::f32::consts::FRAC_PI_2;
/// use glam::Vec2;
/// use tiller::vector_math::world_to_local;
///
/// let local = world_to_local(Vec2::X, FRAC_PI_2);
/// assert!((local - Vec2::Y).length() < 1e-6);
/// ```
#[must_use]
pub fn world_to_local(world: Vec2, heading: f32) -> Vec2 {
    Vec2::from_angle(heading).rotate(world)
}

/// Rotates an agent-local planar vector back into world space.
#[must_use]
pub fn local_to_world(local: Vec2, heading: f32) -> Vec2 {
    Vec2::from_angle(-heading).rotate(local)
}

/// Returns the unit vector along `vector`, or `None` when it is degenerate.
///
/// Non-finite components and vectors shorter than [`ZERO_EPSILON`] yield
/// `None` so callers can pick a fallback instead of dividing by zero.
#[must_use]
pub fn try_unit(vector: Vec3) -> Option<Vec3> {
    if !vector.is_finite() || vector.length() < ZERO_EPSILON {
        return None;
    }
    vector.try_normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[rstest]
    #[case::north_is_ahead(Vec2::Y, 0.0, Vec2::Y)]
    #[case::east_when_facing_east(Vec2::X, FRAC_PI_2, Vec2::Y)]
    #[case::north_when_facing_east(Vec2::Y, FRAC_PI_2, Vec2::new(-1.0, 0.0))]
    #[case::south_when_facing_north(Vec2::new(0.0, -1.0), 0.0, Vec2::new(0.0, -1.0))]
    #[case::north_when_facing_south(Vec2::Y, PI, Vec2::new(0.0, -1.0))]
    fn rotates_into_agent_frame(#[case] world: Vec2, #[case] heading: f32, #[case] local: Vec2) {
        let actual = world_to_local(world, heading);
        assert_relative_eq!(actual.x, local.x, epsilon = 1e-6);
        assert_relative_eq!(actual.y, local.y, epsilon = 1e-6);
    }

    #[test]
    fn local_round_trips_through_world() {
        let local = Vec2::new(0.3, -0.7);
        let back = world_to_local(local_to_world(local, 1.1), 1.1);
        assert_relative_eq!(back.x, local.x, epsilon = 1e-6);
        assert_relative_eq!(back.y, local.y, epsilon = 1e-6);
    }

    #[rstest]
    #[case::positive(2.0, 0.1, 1.0)]
    #[case::negative(-0.5, 0.1, -1.0)]
    #[case::inside_dead_zone(0.05, 0.1, 0.0)]
    #[case::nan(f32::NAN, 0.1, 0.0)]
    fn sign_respects_dead_zone(#[case] value: f32, #[case] dead_zone: f32, #[case] expected: f32) {
        assert_eq!(sign_or_zero(value, dead_zone), expected);
    }

    #[test]
    fn degenerate_vectors_have_no_unit() {
        assert!(try_unit(Vec3::ZERO).is_none());
        assert!(try_unit(Vec3::new(f32::NAN, 1.0, 0.0)).is_none());
        let unit = try_unit(Vec3::new(0.0, 3.0, 4.0));
        assert!(unit.is_some_and(|u| (u.length() - 1.0).abs() < 1e-6));
    }
}
