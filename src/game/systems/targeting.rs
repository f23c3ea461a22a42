//! Target acquisition
//!
//! Sticky targeting: an agent keeps its opponent while that opponent lives and
//! only rescans when it has none. A rescan picks the nearest alive agent inside
//! the field of view, lowest id on ties.

use crate::game::pose::PoseSnapshot;
use crate::game::state::{Agent, AgentId};
use crate::util::vec2::Vec2;

/// Forward heading from horizontal velocity; a stationary agent faces +Z
pub fn forward_heading(velocity: Vec2) -> Vec2 {
    velocity.normalize_or(Vec2::FORWARD)
}

/// Whether `offset` (self to candidate) lies within `half_fov` of `forward`.
/// A coincident candidate is always visible.
pub fn is_visible(forward: Vec2, offset: Vec2, half_fov: f32) -> bool {
    if offset.length_sq() == 0.0 {
        return true;
    }
    forward.angle_between(offset) <= half_fov
}

/// Validated target for `me`: the sticky one if still alive, otherwise the
/// nearest visible alive agent.
pub fn select_target(
    me: &Agent,
    roster: &[Agent],
    poses: &PoseSnapshot,
    half_fov: f32,
) -> Option<AgentId> {
    let sticky = me
        .target_id
        .filter(|&id| id != me.id && roster.get(id as usize).is_some_and(|a| a.alive));
    if sticky.is_some() {
        return sticky;
    }
    scan_for_target(me.id, roster, poses, half_fov)
}

/// Nearest visible alive agent other than `me_id`
pub fn scan_for_target(
    me_id: AgentId,
    roster: &[Agent],
    poses: &PoseSnapshot,
    half_fov: f32,
) -> Option<AgentId> {
    let me_pose = poses.get(me_id);
    let origin = me_pose.planar_position();
    let forward = forward_heading(me_pose.planar_velocity());

    let mut best: Option<(AgentId, f32)> = None;
    // Roster is in ascending id order, so strict `<` keeps the lowest id on ties
    for candidate in roster.iter().filter(|a| a.alive && a.id != me_id) {
        let offset = poses.position(candidate.id) - origin;
        if !is_visible(forward, offset, half_fov) {
            continue;
        }
        let dist_sq = offset.length_sq();
        if best.map_or(true, |(_, d)| dist_sq < d) {
            best = Some((candidate.id, dist_sq));
        }
    }

    best.map(|(id, _)| id)
}
