//! Geometry helpers for enemy movement and hit tests
//!
//! Vector arithmetic comes from `glam::Vec2`; this module adds the few
//! queries the simulation needs on top of it.

use glam::Vec2;

/// Result of stepping toward a waypoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Still travelling, new position
    Moving(Vec2),
    /// Reached (and snapped onto) the target
    Arrived(Vec2),
}

/// Move `from` toward `to` by at most `speed`.
///
/// Snaps onto the target when the remaining distance is within one step, so
/// walkers never overshoot a waypoint.
pub fn step_toward(from: Vec2, to: Vec2, speed: f32) -> Step {
    let delta = to - from;
    if delta.length() <= speed {
        Step::Arrived(to)
    } else {
        Step::Moving(from + delta.normalize_or_zero() * speed)
    }
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
///
/// This is a line distance, not a segment distance: points past either end
/// still measure their lateral offset. A degenerate line falls back to the
/// distance from `a`.
pub fn distance_to_line(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    let dir = b - a;
    let len = dir.length();
    if len <= f32::EPSILON {
        return a.distance(p);
    }
    dir.perp_dot(p - a).abs() / len
}

/// Unit vector pointing from `from` to `to` (zero if they coincide)
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Facing angle (radians) from `from` toward `to`
#[inline]
pub fn facing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Point on a circle of `radius` around `center` at `angle`
#[inline]
pub fn orbit_point(center: Vec2, angle: f32, radius: f32) -> Vec2 {
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_toward_moves_by_speed() {
        let step = step_toward(Vec2::ZERO, Vec2::new(10.0, 0.0), 3.0);
        assert_eq!(step, Step::Moving(Vec2::new(3.0, 0.0)));
    }

    #[test]
    fn test_step_toward_snaps_when_close() {
        let target = Vec2::new(2.0, 2.0);
        let step = step_toward(Vec2::new(1.0, 1.0), target, 3.0);
        assert_eq!(step, Step::Arrived(target));
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(direction(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
    }

    #[test]
    fn test_distance_to_line_is_lateral() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(100.0, 0.0);
        assert!((distance_to_line(a, b, Vec2::new(50.0, 7.0)) - 7.0).abs() < 1e-5);
        // Far past the end point: still only the lateral offset counts
        assert!((distance_to_line(a, b, Vec2::new(5000.0, -4.0)) - 4.0).abs() < 1e-3);
        // Behind the start point as well
        assert!((distance_to_line(a, b, Vec2::new(-300.0, 2.0)) - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_distance_to_degenerate_line() {
        let a = Vec2::new(1.0, 1.0);
        assert!((distance_to_line(a, a, Vec2::new(4.0, 5.0)) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_orbit_point() {
        let p = orbit_point(Vec2::new(10.0, 10.0), std::f32::consts::FRAC_PI_2, 40.0);
        assert!((p - Vec2::new(10.0, 50.0)).length() < 1e-4);
    }
}
