//! Close-range combat
//!
//! Both modes share the same gate: a live target within range and the
//! attacker's own cooldown expired. Melee deals a fixed burst of
//! `dps * cooldown`; push shoves the target away from the attacker.

use serde::{Deserialize, Serialize};

use crate::config::CombatMode;
use crate::game::pose::PoseSnapshot;
use crate::game::state::{Agent, AgentId};
use crate::util::vec2::Vec2;

/// A successful combat action decided this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CombatAction {
    Strike {
        attacker: AgentId,
        target: AgentId,
        damage: f32,
    },
    Push {
        attacker: AgentId,
        target: AgentId,
        impulse: Vec2,
    },
}

impl CombatAction {
    pub fn attacker(&self) -> AgentId {
        match *self {
            CombatAction::Strike { attacker, .. } | CombatAction::Push { attacker, .. } => attacker,
        }
    }
}

/// Damage per melee swing
#[inline]
pub fn strike_damage(dps: f32, cooldown: f32) -> f32 {
    dps * cooldown
}

/// Decide whether `attacker` acts on `target` at time `now`.
///
/// `target` must already be validated as alive.
pub fn resolve(
    attacker: &Agent,
    target: Option<AgentId>,
    poses: &PoseSnapshot,
    now: f32,
    mode: &CombatMode,
) -> Option<CombatAction> {
    let target = target?;
    if target == attacker.id || !attacker.can_act(now, mode.cooldown()) {
        return None;
    }

    let offset = poses.position(target) - poses.position(attacker.id);
    if offset.length() > mode.range() {
        return None;
    }

    let action = match *mode {
        CombatMode::Melee { cooldown, dps, .. } => CombatAction::Strike {
            attacker: attacker.id,
            target,
            damage: strike_damage(dps, cooldown),
        },
        CombatMode::Push { impulse, .. } => CombatAction::Push {
            attacker: attacker.id,
            target,
            impulse: offset.normalize_or(Vec2::FORWARD) * impulse,
        },
    };
    Some(action)
}
