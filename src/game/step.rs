//! Per-tick combat step
//!
//! A tick runs in two phases. `decide` reads the frozen pose snapshot and the
//! roster as they were at tick start and produces a [`PendingChanges`] buffer;
//! nothing is mutated. `commit` then applies everything at once: targets,
//! storm damage, combat, the death check, and finally the batch of
//! eliminations. No agent ever observes a half-updated roster.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::config::{BoundaryMode, EngineConfig};
use crate::game::pose::{Lifecycle, MotionCommand, PoseSnapshot};
use crate::game::state::{AgentId, EliminationCause, RoundStatus, SimState};
use crate::game::systems::arena::{self, Exposure};
use crate::game::systems::combat::{self, CombatAction};
use crate::game::systems::steering::{self, SteeringParams};
use crate::game::systems::targeting;
use crate::util::vec2::Vec2;

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    TargetAcquired {
        agent: AgentId,
        target: AgentId,
    },
    TargetLost {
        agent: AgentId,
        target: AgentId,
    },
    Struck {
        attacker: AgentId,
        target: AgentId,
        damage: f32,
        hp_after: f32,
    },
    Pushed {
        attacker: AgentId,
        target: AgentId,
        impulse: Vec2,
    },
    StormDamage {
        agent: AgentId,
        damage: f32,
        hp_after: f32,
    },
    Eliminated {
        agent: AgentId,
        cause: EliminationCause,
        at: f32,
    },
    /// Emitted once, when at most one agent is left
    RoundOver {
        winner: Option<AgentId>,
        at: f32,
    },
}

/// Everything a tick hands back to the caller
#[derive(Debug, Clone, Default)]
pub struct StepOutput {
    /// Velocity sets first, then impulses
    pub commands: Vec<MotionCommand>,
    pub lifecycle: Vec<Lifecycle>,
    pub events: Vec<SimEvent>,
    pub status: Option<RoundStatus>,
}

impl StepOutput {
    pub fn eliminated(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.lifecycle.iter().filter_map(|signal| match *signal {
            Lifecycle::Disable(id) => Some(id),
            Lifecycle::Enable(_) => None,
        })
    }
}

/// Per-agent decision from phase one
#[derive(Debug, Clone, Copy)]
struct Decision {
    agent: AgentId,
    target: Option<AgentId>,
    velocity: Vec2,
}

/// Phase-one output: every state change the tick wants, not yet applied
#[derive(Debug, Default)]
struct PendingChanges {
    decisions: Vec<Decision>,
    storm: Vec<(AgentId, f32)>,
    actions: Vec<CombatAction>,
    eliminations: SmallVec<[(AgentId, EliminationCause); 8]>,
}

/// Advance the round by `dt` seconds.
///
/// `poses` is the provider's snapshot at tick start; `contacts` lists agents
/// that touched the arena wall since the previous tick (only read in wall
/// mode). Once the round is over further calls are no-ops.
pub fn step(
    mut state: SimState,
    config: &EngineConfig,
    dt: f32,
    poses: &PoseSnapshot,
    contacts: &[AgentId],
) -> (SimState, StepOutput) {
    if state.finished {
        let output = StepOutput {
            status: Some(state.status()),
            ..Default::default()
        };
        return (state, output);
    }

    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    state.tick += 1;
    state.now += dt;
    if let Some(zone) = state.zone.as_mut() {
        zone.advance(dt);
    }

    let pending = decide(&state, config, dt, poses, contacts);
    let output = commit(&mut state, pending);
    (state, output)
}

fn decide(
    state: &SimState,
    config: &EngineConfig,
    dt: f32,
    poses: &PoseSnapshot,
    contacts: &[AgentId],
) -> PendingChanges {
    let mut pending = PendingChanges::default();
    let half_fov = config.half_fov();
    let zone = state.zone.as_ref();
    let params = SteeringParams {
        max_speed: config.max_speed,
        max_acceleration: config.max_acceleration,
        min_separation: config.min_separation,
        containment_threshold: config.containment_threshold,
        allowed_radius: arena::allowed_radius(config, zone),
    };

    for me in state.alive_agents() {
        let target = targeting::select_target(me, &state.agents, poses, half_fov);
        let position = poses.position(me.id);

        let neighbors = state
            .alive_agents()
            .filter(|other| other.id != me.id)
            .map(|other| poses.position(other.id));
        let direction = steering::desired_direction(
            position,
            target.map(|id| poses.position(id)),
            neighbors,
            &params,
        );
        let velocity = steering::steer(
            poses.velocity(me.id),
            direction,
            params.max_speed,
            params.max_acceleration,
            dt,
        );
        pending.decisions.push(Decision {
            agent: me.id,
            target,
            velocity,
        });

        match arena::judge(position, config, zone, dt) {
            Exposure::Safe => {}
            Exposure::Damage(amount) => pending.storm.push((me.id, amount)),
            Exposure::Eliminate(cause) => pending.eliminations.push((me.id, cause)),
        }

        if let Some(action) = combat::resolve(me, target, poses, state.now, &config.combat) {
            pending.actions.push(action);
        }
    }

    if matches!(config.boundary, BoundaryMode::Wall) {
        for &id in contacts {
            if state.is_alive(id) {
                pending.eliminations.push((id, EliminationCause::WallContact));
            }
        }
    } else if !contacts.is_empty() {
        debug!("Ignoring {} wall contacts outside wall mode", contacts.len());
    }

    pending
}

fn commit(state: &mut SimState, pending: PendingChanges) -> StepOutput {
    let now = state.now;
    let mut output = StepOutput::default();
    let mut eliminations = pending.eliminations;

    for decision in &pending.decisions {
        let Some(agent) = state.agent_mut(decision.agent) else {
            continue;
        };
        if agent.target_id != decision.target {
            if let Some(old) = agent.target_id {
                output.events.push(SimEvent::TargetLost {
                    agent: agent.id,
                    target: old,
                });
            }
            if let Some(new) = decision.target {
                debug!(agent = agent.id, target = new, "Target acquired");
                output.events.push(SimEvent::TargetAcquired {
                    agent: agent.id,
                    target: new,
                });
            }
            agent.target_id = decision.target;
        }
    }

    // Storm damage lands before combat damage
    for &(id, damage) in &pending.storm {
        let Some(agent) = state.agent_mut(id) else {
            continue;
        };
        if let Some(hp) = agent.hp.as_mut() {
            *hp = (*hp - damage).max(0.0);
            output.events.push(SimEvent::StormDamage {
                agent: id,
                damage,
                hp_after: *hp,
            });
            if *hp <= 0.0 {
                eliminations.push((id, EliminationCause::Storm));
            }
        }
    }

    let mut impulses = Vec::new();
    for action in &pending.actions {
        if let Some(attacker) = state.agent_mut(action.attacker()) {
            attacker.last_action_at = now;
        }
        match *action {
            CombatAction::Strike {
                attacker,
                target,
                damage,
            } => {
                let Some(victim) = state.agent_mut(target) else {
                    continue;
                };
                let Some(hp) = victim.hp.as_mut() else {
                    continue;
                };
                let was_standing = *hp > 0.0;
                *hp = (*hp - damage).max(0.0);
                let hp_after = *hp;
                victim.last_hit_by = Some(attacker);
                debug!(attacker, target, damage, hp_after, "Strike");
                output.events.push(SimEvent::Struck {
                    attacker,
                    target,
                    damage,
                    hp_after,
                });
                if was_standing && hp_after <= 0.0 {
                    eliminations.push((target, EliminationCause::Combat));
                }
            }
            CombatAction::Push {
                attacker,
                target,
                impulse,
            } => {
                debug!(attacker, target, "Push");
                output.events.push(SimEvent::Pushed {
                    attacker,
                    target,
                    impulse,
                });
                impulses.push((target, impulse));
            }
        }
    }

    for (id, cause) in eliminations {
        let Some(agent) = state.agent_mut(id) else {
            continue;
        };
        if !agent.alive {
            continue;
        }
        agent.alive = false;
        agent.eliminated_at = Some(now);
        agent.cause = Some(cause);
        let credited = match cause {
            EliminationCause::Combat => agent.last_hit_by,
            _ => None,
        };
        if let Some(killer) = credited.and_then(|k| state.agent_mut(k)) {
            killer.kills += 1;
        }

        info!(agent = id, ?cause, at = now, "Agent eliminated");
        state.elimination_order.push(id);
        output.events.push(SimEvent::Eliminated {
            agent: id,
            cause,
            at: now,
        });
        output.lifecycle.push(Lifecycle::Disable(id));
    }

    // Targets pointing at agents that just died are cleared
    let alive: Vec<bool> = state.agents.iter().map(|a| a.alive).collect();
    for agent in state.agents.iter_mut().filter(|a| a.alive) {
        if let Some(target) = agent.target_id {
            if !alive.get(target as usize).copied().unwrap_or(false) {
                output.events.push(SimEvent::TargetLost {
                    agent: agent.id,
                    target,
                });
                agent.target_id = None;
            }
        }
    }

    for decision in &pending.decisions {
        if state.is_alive(decision.agent) {
            output.commands.push(MotionCommand::SetHorizontalVelocity {
                id: decision.agent,
                velocity: decision.velocity,
            });
        }
    }
    for (id, impulse) in impulses {
        if state.is_alive(id) {
            output.commands.push(MotionCommand::Impulse { id, impulse });
        }
    }

    if state.is_over() {
        state.finished = true;
        let winner = state.winner();
        match winner {
            Some(id) => info!(winner = id, at = now, "Round over"),
            None => info!(at = now, "Round over with no survivors"),
        }
        output.events.push(SimEvent::RoundOver { winner, at: now });
    }

    output.status = Some(state.status());
    output
}
