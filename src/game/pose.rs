//! Boundary types between the engine and whoever integrates motion.

use serde::{Deserialize, Serialize};

use crate::game::state::AgentId;
use crate::util::vec2::Vec2;
use crate::util::vec3::Vec3;

/// Position and velocity of one agent at tick start
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Pose {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    #[inline]
    pub fn planar_position(&self) -> Vec2 {
        self.position.planar()
    }

    #[inline]
    pub fn planar_velocity(&self) -> Vec2 {
        self.velocity.planar()
    }
}

/// Frozen poses for one tick, indexed by `AgentId`.
///
/// Agents without a pose yet (before placement) read as origin/zero.
#[derive(Debug, Clone, Default)]
pub struct PoseSnapshot {
    poses: Vec<Option<Pose>>,
}

impl PoseSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(count: usize) -> Self {
        Self {
            poses: vec![None; count],
        }
    }

    pub fn from_poses(poses: impl IntoIterator<Item = Pose>) -> Self {
        Self {
            poses: poses.into_iter().map(Some).collect(),
        }
    }

    pub fn set(&mut self, id: AgentId, pose: Pose) {
        let index = id as usize;
        if index >= self.poses.len() {
            self.poses.resize(index + 1, None);
        }
        self.poses[index] = Some(pose);
    }

    pub fn get(&self, id: AgentId) -> Pose {
        self.poses
            .get(id as usize)
            .copied()
            .flatten()
            .unwrap_or_default()
    }

    #[inline]
    pub fn position(&self, id: AgentId) -> Vec2 {
        self.get(id).planar_position()
    }

    #[inline]
    pub fn velocity(&self, id: AgentId) -> Vec2 {
        self.get(id).planar_velocity()
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

/// Motion request for the pose provider.
///
/// Within one tick all velocity sets come before impulses, so an impulse lands
/// on top of the steered velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionCommand {
    /// Replace the horizontal velocity; vertical velocity is left alone
    SetHorizontalVelocity { id: AgentId, velocity: Vec2 },
    /// Add an instantaneous horizontal velocity change
    Impulse { id: AgentId, impulse: Vec2 },
}

impl MotionCommand {
    pub fn agent(&self) -> AgentId {
        match *self {
            MotionCommand::SetHorizontalVelocity { id, .. } | MotionCommand::Impulse { id, .. } => {
                id
            }
        }
    }
}

/// Participation signal for the physics/render layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Lifecycle {
    Enable(AgentId),
    Disable(AgentId),
}
