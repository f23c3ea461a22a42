//! Round result and ranking system
//!
//! Computes final round results and agent rankings.

use serde::{Deserialize, Serialize};

use crate::game::state::{AgentId, EliminationCause, SimState};

/// Round result information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundResult {
    pub winner: Option<AgentId>,
    pub reason: Option<RoundEndReason>,
    pub rankings: Vec<AgentRanking>,
    pub duration: f32,
    pub ticks: u64,
    pub total_kills: u32,
}

/// Agent ranking in round results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRanking {
    pub agent: AgentId,
    pub rank: u32,
    pub survived: bool,
    pub kills: u32,
    pub final_hp: Option<f32>,
    pub eliminated_at: Option<f32>,
    pub cause: Option<EliminationCause>,
}

/// Reason why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEndReason {
    /// Exactly one agent remaining
    LastStanding,
    /// The last agents went out together
    MutualElimination,
    /// The runner's time cap was reached first
    TimeLimit,
}

/// Check if the round has ended on its own
pub fn check_round_end(state: &SimState) -> Option<RoundEndReason> {
    match state.alive_count() {
        0 => Some(RoundEndReason::MutualElimination),
        1 => Some(RoundEndReason::LastStanding),
        _ => None,
    }
}

/// Determine round result from state.
///
/// `time_limit_hit` marks a round the runner stopped while agents were still
/// fighting.
pub fn determine_result(state: &SimState, time_limit_hit: bool) -> RoundResult {
    let mut rankings: Vec<AgentRanking> = state
        .agents
        .iter()
        .map(|a| AgentRanking {
            agent: a.id,
            rank: 0,
            survived: a.alive,
            kills: a.kills,
            final_hp: a.hp,
            eliminated_at: a.eliminated_at,
            cause: a.cause,
        })
        .collect();

    // Survivors first, then whoever lasted longer, then kills, then id
    rankings.sort_by(|a, b| {
        b.survived
            .cmp(&a.survived)
            .then_with(|| {
                let a_at = a.eliminated_at.unwrap_or(f32::MAX);
                let b_at = b.eliminated_at.unwrap_or(f32::MAX);
                b_at.partial_cmp(&a_at).unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| b.kills.cmp(&a.kills))
            .then_with(|| a.agent.cmp(&b.agent))
    });

    for (i, ranking) in rankings.iter_mut().enumerate() {
        ranking.rank = (i + 1) as u32;
    }

    let reason = check_round_end(state).or(time_limit_hit.then_some(RoundEndReason::TimeLimit));

    RoundResult {
        winner: state.winner(),
        reason,
        total_kills: rankings.iter().map(|r| r.kills).sum(),
        rankings,
        duration: state.now,
        ticks: state.tick,
    }
}
