//! Angle wrapping and shortest-turn helpers.
//!
//! Headings follow a north-up convention: a yaw of zero faces `+Y` and the
//! yaw grows clockwise towards `+X`, so `atan2(dx, dy)` yields the heading of
//! a planar offset.

use std::f32::consts::{PI, TAU};

/// Reduces `angle` into `[-range, range)`.
///
/// Equivalent to repeatedly adding or subtracting `range * 2` until the value
/// falls inside the interval, but computed in constant time so large inputs
/// do not loop. Non-finite inputs and non-positive ranges are returned
/// unchanged.
///
/// # Examples
/// ```
/// use std::f32::consts::PI;
/// use tiller::angle::wrap_to_range;
///
/// let wrapped = wrap_to_range(2.5 * PI, PI);
/// assert!((wrapped - 0.5 * PI).abs() < 1e-5);
/// ```
#[must_use]
pub fn wrap_to_range(angle: f32, range: f32) -> f32 {
    if !angle.is_finite() || range <= 0.0 {
        return angle;
    }
    let span = range * 2.0;
    let wrapped = (angle + range).rem_euclid(span) - range;
    // rem_euclid may round up to exactly `span`.
    if wrapped >= range {
        wrapped - span
    } else {
        wrapped
    }
}

/// Returns the signed turn from `current` to `target` with the smallest
/// magnitude, in `(-π, π]`.
///
/// The raw difference is first normalised into `[0, 2π)` and then folded so
/// that any turn larger than a half circle goes the other way round.
///
/// # Examples
/// ```
/// use std::f32::consts::PI;
/// use tiller::angle::shortest_delta;
///
/// let turn = shortest_delta(-0.05 * PI, 3.9 * PI);
/// assert!(turn.abs() <= PI);
/// ```
#[must_use]
pub fn shortest_delta(target: f32, current: f32) -> f32 {
    let mut delta = (target - current).rem_euclid(TAU);
    if delta >= TAU {
        delta -= TAU;
    }
    if delta > PI {
        delta - TAU
    } else {
        delta
    }
}

/// Clamps a turn to `±max_turn`.
#[must_use]
pub fn clamp_turn(delta: f32, max_turn: f32) -> f32 {
    let limit = max_turn.abs();
    delta.clamp(-limit, limit)
}

/// Heading that faces along the planar offset `(dx, dy)`.
#[must_use]
pub fn heading_towards(dx: f32, dy: f32) -> f32 {
    dx.atan2(dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::inside(0.5, PI, 0.5)]
    #[case::upper_edge_wraps(PI, PI, -PI)]
    #[case::lower_edge_kept(-PI, PI, -PI)]
    #[case::one_turn_over(2.5 * PI, PI, 0.5 * PI)]
    #[case::many_turns_under(-7.5 * PI, PI, 0.5 * PI)]
    fn wraps_into_half_open_range(#[case] angle: f32, #[case] range: f32, #[case] expected: f32) {
        assert_relative_eq!(wrap_to_range(angle, range), expected, epsilon = 1e-5);
    }

    #[test]
    fn wrap_leaves_non_finite_input_alone() {
        assert!(wrap_to_range(f32::NAN, PI).is_nan());
        assert_eq!(wrap_to_range(f32::INFINITY, PI), f32::INFINITY);
    }

    #[rstest]
    #[case::small_left(0.1, 0.0, 0.1)]
    #[case::small_right(0.0, 0.1, -0.1)]
    #[case::across_seam(-0.9 * PI, 0.9 * PI, 0.2 * PI)]
    #[case::half_turn(PI, 0.0, PI)]
    #[case::multiple_wraps(-0.05 * PI, 3.9 * PI, 0.05 * PI)]
    fn shortest_delta_picks_smaller_turn(
        #[case] target: f32,
        #[case] current: f32,
        #[case] expected: f32,
    ) {
        assert_relative_eq!(shortest_delta(target, current), expected, epsilon = 1e-4);
    }

    #[test]
    fn shortest_delta_is_bounded_by_half_turn() {
        let samples = (-40..=40).map(|i| i as f32 * 0.37);
        for target in samples.clone() {
            for current in samples.clone() {
                let delta = shortest_delta(target, current);
                assert!(
                    delta.abs() <= PI + 1e-5,
                    "turn {delta} from {current} to {target} exceeds π"
                );
            }
        }
    }

    #[rstest]
    #[case::within(0.05, 0.1, 0.05)]
    #[case::over(0.3, 0.1, 0.1)]
    #[case::under(-0.3, 0.1, -0.1)]
    fn clamps_turn_rate(#[case] delta: f32, #[case] max: f32, #[case] expected: f32) {
        assert_relative_eq!(clamp_turn(delta, max), expected);
    }

    #[test]
    fn heading_faces_north_at_zero() {
        assert_relative_eq!(heading_towards(0.0, 1.0), 0.0);
        assert_relative_eq!(heading_towards(1.0, 0.0), PI / 2.0);
    }
}
