//! Steering composer
//!
//! Blends seek, separation and containment into one desired direction, then
//! turns it into a rate-limited horizontal velocity.

use crate::util::vec2::Vec2;

/// Steering parameters for one tick
#[derive(Debug, Clone, Copy)]
pub struct SteeringParams {
    pub max_speed: f32,
    pub max_acceleration: f32,
    pub min_separation: f32,
    /// Fraction of the allowed radius where containment starts
    pub containment_threshold: f32,
    /// Radius containment keeps agents inside; `None` disables containment
    pub allowed_radius: Option<f32>,
}

/// Unit vector toward the target, or toward the arena centre when idle
pub fn seek(position: Vec2, target: Option<Vec2>) -> Vec2 {
    let goal = target.unwrap_or(Vec2::ZERO);
    (goal - position).normalize()
}

/// Sum of repulsions from neighbours closer than `min_separation`.
///
/// Each contributes `(min_separation - d) / min_separation` along the
/// away-direction. Coincident neighbours contribute nothing.
pub fn separation(position: Vec2, neighbors: impl IntoIterator<Item = Vec2>, min_separation: f32) -> Vec2 {
    if min_separation <= 0.0 {
        return Vec2::ZERO;
    }

    let mut push = Vec2::ZERO;
    for other in neighbors {
        let (away, distance) = (position - other).normalize_with_length();
        if distance <= 0.0 || distance >= min_separation {
            continue;
        }
        push += away * ((min_separation - distance) / min_separation);
    }
    push
}

/// Inward pull once past `threshold * allowed_radius`, scaled by how far into
/// the margin the agent is and clamped to [0, 1]
pub fn containment(position: Vec2, allowed_radius: f32, threshold: f32) -> Vec2 {
    let (outward, radius) = position.normalize_with_length();
    let start = allowed_radius * threshold;
    if radius <= start {
        return Vec2::ZERO;
    }
    let margin = allowed_radius - start;
    let strength = if margin > 0.0 {
        ((radius - start) / margin).clamp(0.0, 1.0)
    } else {
        1.0
    };
    -outward * strength
}

/// Combined desired direction (unit length; +Z if everything cancels out)
pub fn desired_direction(
    position: Vec2,
    target: Option<Vec2>,
    neighbors: impl IntoIterator<Item = Vec2>,
    params: &SteeringParams,
) -> Vec2 {
    let mut desired = seek(position, target);
    desired += separation(position, neighbors, params.min_separation);
    if let Some(allowed) = params.allowed_radius {
        desired += containment(position, allowed, params.containment_threshold);
    }
    desired.normalize_or(Vec2::FORWARD)
}

/// Move `current` toward `direction * max_speed`, changing it by at most
/// `max_acceleration * dt`
pub fn steer(current: Vec2, direction: Vec2, max_speed: f32, max_acceleration: f32, dt: f32) -> Vec2 {
    let target_velocity = direction * max_speed;
    let delta = (target_velocity - current).clamp_length(max_acceleration * dt.max(0.0));
    current + delta
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn params() -> SteeringParams {
        SteeringParams {
            max_speed: 6.0,
            max_acceleration: 18.0,
            min_separation: 1.4,
            containment_threshold: 0.9,
            allowed_radius: None,
        }
    }

    #[test]
    fn test_seek_target() {
        let dir = seek(Vec2::ZERO, Some(Vec2::new(0.0, 5.0)));
        assert!(dir.approx_eq(Vec2::FORWARD, EPSILON));
    }

    #[test]
    fn test_seek_centre_when_idle() {
        let dir = seek(Vec2::new(10.0, 0.0), None);
        assert!(dir.approx_eq(Vec2::new(-1.0, 0.0), EPSILON));
    }

    #[test]
    fn test_separation_strength() {
        // Neighbour at half the separation radius: weight 0.5
        let push = separation(Vec2::ZERO, [Vec2::new(0.7, 0.0)], 1.4);
        assert!(push.approx_eq(Vec2::new(-0.5, 0.0), EPSILON));
    }

    #[test]
    fn test_separation_ignores_far_and_coincident() {
        let push = separation(
            Vec2::ZERO,
            [Vec2::new(5.0, 0.0), Vec2::ZERO, Vec2::new(0.0, 1.4)],
            1.4,
        );
        assert_eq!(push, Vec2::ZERO);
        assert_eq!(separation(Vec2::ZERO, [Vec2::new(0.1, 0.0)], 0.0), Vec2::ZERO);
    }

    #[test]
    fn test_separation_perturbs_seek() {
        let p = params();
        let with_neighbor = desired_direction(
            Vec2::ZERO,
            Some(Vec2::new(0.0, 10.0)),
            [Vec2::new(0.5, 0.0)],
            &p,
        );
        // Still heading mostly toward the target, bent away from the neighbour
        assert!(with_neighbor.z > 0.0);
        assert!(with_neighbor.x < 0.0);
        assert!((with_neighbor.length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_containment_inside_threshold() {
        assert_eq!(containment(Vec2::new(5.0, 0.0), 10.0, 0.9), Vec2::ZERO);
    }

    #[test]
    fn test_containment_scales_and_clamps() {
        let half = containment(Vec2::new(9.5, 0.0), 10.0, 0.9);
        assert!(half.approx_eq(Vec2::new(-0.5, 0.0), EPSILON));

        let full = containment(Vec2::new(0.0, 30.0), 10.0, 0.9);
        assert!(full.approx_eq(Vec2::new(0.0, -1.0), EPSILON));
    }

    #[test]
    fn test_degenerate_direction_falls_back() {
        // At the centre with no target: seek is zero, nothing else acts
        let dir = desired_direction(Vec2::ZERO, None, std::iter::empty(), &params());
        assert_eq!(dir, Vec2::FORWARD);
    }

    #[test]
    fn test_steer_acceleration_bound() {
        let dt = 1.0 / 60.0;
        let current = Vec2::new(6.0, 0.0);
        let next = steer(current, Vec2::new(-1.0, 0.0), 6.0, 18.0, dt);
        let change = (next - current).length();
        assert!(change <= 18.0 * dt + EPSILON);
        assert!((change - 0.3).abs() < EPSILON);
    }

    #[test]
    fn test_steer_reaches_target_velocity() {
        let next = steer(Vec2::new(5.9, 0.0), Vec2::RIGHT, 6.0, 18.0, 1.0 / 60.0);
        assert!(next.approx_eq(Vec2::new(6.0, 0.0), EPSILON));
    }
}
