//! Round state definitions
//!
//! The roster of agents, the safe zone timer, and the derived round status.
//! Poses are not stored here; they belong to the pose provider and reach the
//! engine through a [`PoseSnapshot`](crate::game::pose::PoseSnapshot).

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, ZoneShape};
use crate::game::constants::agent::{MAX_HP, NEVER_ACTED};
use crate::game::systems::arena::zone_radius;

/// Stable agent identifier, 0-based, equal to the agent's roster index
pub type AgentId = u32;

/// Why an agent left the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationCause {
    /// Health reduced to zero by melee strikes
    Combat,
    /// Health reduced to zero by the storm outside the safe zone
    Storm,
    /// Left the absolute arena radius
    RingOut,
    /// Left the safe zone in instant-elimination mode
    OutsideZone,
    /// Touched the arena wall
    WallContact,
}

/// Agent state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    /// Once false, never true again
    pub alive: bool,
    /// Health in [0, MAX_HP]; `None` when the combat mode has no health model
    pub hp: Option<f32>,
    /// Current opponent. Weak: validate against the roster before use.
    pub target_id: Option<AgentId>,
    /// Round time of the last successful combat action
    pub last_action_at: f32,
    /// Last agent that landed a strike on this one
    pub last_hit_by: Option<AgentId>,
    pub kills: u32,
    pub eliminated_at: Option<f32>,
    pub cause: Option<EliminationCause>,
}

impl Agent {
    pub fn new(id: AgentId, with_health: bool) -> Self {
        Self {
            id,
            alive: true,
            hp: with_health.then_some(MAX_HP),
            target_id: None,
            last_action_at: NEVER_ACTED,
            last_hit_by: None,
            kills: 0,
            eliminated_at: None,
            cause: None,
        }
    }

    pub fn can_act(&self, now: f32, cooldown: f32) -> bool {
        now - self.last_action_at >= cooldown
    }
}

/// Shrinking safe zone timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub shape: ZoneShape,
    /// Seconds since round start
    pub elapsed: f32,
    /// Current radius, always `zone_radius(shape, elapsed)`
    pub radius: f32,
}

impl Zone {
    pub fn new(shape: ZoneShape) -> Self {
        Self {
            shape,
            elapsed: 0.0,
            radius: zone_radius(&shape, 0.0),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
        self.radius = zone_radius(&self.shape, self.elapsed);
    }
}

/// Read-only status for consumers (HUD, logs)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundStatus {
    pub tick: u64,
    pub elapsed: f32,
    pub alive_count: usize,
    pub winner: Option<AgentId>,
    pub zone_radius: Option<f32>,
}

/// Complete simulation state, owned by the caller and threaded through `step`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimState {
    pub tick: u64,
    /// Round time in seconds
    pub now: f32,
    /// Indexed by `AgentId`
    pub agents: Vec<Agent>,
    pub zone: Option<Zone>,
    /// Set once the round-over event has been emitted
    pub finished: bool,
    /// Agent ids in elimination order
    pub elimination_order: Vec<AgentId>,
}

impl SimState {
    /// Fresh round with `count` agents
    pub fn new(count: usize, config: &EngineConfig) -> Self {
        let with_health = config.combat.uses_health();
        Self {
            tick: 0,
            now: 0.0,
            agents: (0..count as AgentId)
                .map(|id| Agent::new(id, with_health))
                .collect(),
            zone: config.zone().map(|zone| Zone::new(zone.shape)),
            finished: false,
            elimination_order: Vec::new(),
        }
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id as usize)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id as usize)
    }

    /// True if the id names an agent that is still in the round
    pub fn is_alive(&self, id: AgentId) -> bool {
        self.agent(id).is_some_and(|a| a.alive)
    }

    pub fn alive_agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive_agents().count()
    }

    /// The sole survivor, if exactly one agent is alive
    pub fn winner(&self) -> Option<AgentId> {
        let mut alive = self.alive_agents();
        match (alive.next(), alive.next()) {
            (Some(agent), None) => Some(agent.id),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.alive_count() <= 1
    }

    pub fn zone_radius(&self) -> Option<f32> {
        self.zone.map(|z| z.radius)
    }

    pub fn status(&self) -> RoundStatus {
        RoundStatus {
            tick: self.tick,
            elapsed: self.now,
            alive_count: self.alive_count(),
            winner: self.winner(),
            zone_radius: self.zone_radius(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoundaryMode, CombatMode, ZoneConfig};

    fn melee_config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_new_round_all_alive() {
        let state = SimState::new(4, &melee_config());
        assert_eq!(state.agents.len(), 4);
        assert_eq!(state.alive_count(), 4);
        for (i, agent) in state.agents.iter().enumerate() {
            assert_eq!(agent.id as usize, i);
            assert_eq!(agent.hp, Some(MAX_HP));
            assert!(agent.target_id.is_none());
        }
        assert!(state.zone.is_some());
    }

    #[test]
    fn test_push_mode_has_no_health() {
        let config = EngineConfig {
            combat: CombatMode::push(),
            boundary: BoundaryMode::RingOut,
            ..Default::default()
        };
        let state = SimState::new(2, &config);
        assert!(state.agents.iter().all(|a| a.hp.is_none()));
        assert!(state.zone.is_none());
    }

    #[test]
    fn test_first_action_never_blocked() {
        let agent = Agent::new(0, true);
        assert!(agent.can_act(0.0, 1000.0));
    }

    #[test]
    fn test_winner_only_with_one_alive() {
        let mut state = SimState::new(3, &melee_config());
        assert_eq!(state.winner(), None);

        state.agents[0].alive = false;
        assert_eq!(state.winner(), None);
        assert!(!state.is_over());

        state.agents[2].alive = false;
        assert_eq!(state.winner(), Some(1));
        assert!(state.is_over());

        state.agents[1].alive = false;
        assert_eq!(state.alive_count(), 0);
        assert_eq!(state.winner(), None);
        assert!(state.is_over());
    }

    #[test]
    fn test_zone_advance_tracks_radius() {
        let mut zone = Zone::new(ZoneConfig::default().shape);
        assert_eq!(zone.radius, 16.0);
        zone.advance(60.0);
        assert!(zone.radius < 16.0);
        zone.advance(-5.0);
        assert_eq!(zone.elapsed, 60.0);
    }

    #[test]
    fn test_status_snapshot() {
        let state = SimState::new(2, &melee_config());
        let status = state.status();
        assert_eq!(status.alive_count, 2);
        assert_eq!(status.winner, None);
        assert_eq!(status.zone_radius, Some(16.0));
    }
}
