//! Round runner
//!
//! Owns the engine state and a pose provider and drives them through the
//! per-tick cycle: snapshot, step, apply, integrate.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::game::constants::physics::GROUND_Y;
use crate::game::match_result::{determine_result, RoundResult};
use crate::game::performance::{TickLoad, TickMonitor};
use crate::game::pose::{Lifecycle, Pose};
use crate::game::state::{AgentId, SimState};
use crate::game::step::{step, SimEvent, StepOutput};
use crate::game::systems::arena;
use crate::game::systems::physics::PoseProvider;
use crate::util::vec3::Vec3;

/// Drives a round of the engine against a [`PoseProvider`]
pub struct RoundRunner<P: PoseProvider> {
    config: SimConfig,
    state: SimState,
    provider: P,
    rng: StdRng,
    performance: TickMonitor,
    rounds_started: u32,
}

impl<P: PoseProvider> RoundRunner<P> {
    /// Create a runner and spawn the first round
    pub fn new(config: SimConfig, provider: P) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = SimState::new(config.agent_count, &config.engine);
        let performance = TickMonitor::new(config.tick_rate);
        let mut runner = Self {
            config,
            state,
            provider,
            rng,
            performance,
            rounds_started: 0,
        };
        runner.spawn();
        runner
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Direct access for hosts that move bodies outside the tick
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn performance(&self) -> &TickMonitor {
        &self.performance
    }

    pub fn rounds_started(&self) -> u32 {
        self.rounds_started
    }

    /// Reset engine state and place every agent at a fresh spawn point
    pub fn restart(&mut self) -> Vec<Lifecycle> {
        self.state = SimState::new(self.config.agent_count, &self.config.engine);
        self.spawn()
    }

    fn spawn(&mut self) -> Vec<Lifecycle> {
        let radius = arena::spawn_radius(&self.config.engine);
        let positions = arena::spawn_positions(&mut self.rng, self.config.agent_count, radius);

        let signals: Vec<Lifecycle> = positions
            .into_iter()
            .enumerate()
            .map(|(index, position)| {
                let id = index as AgentId;
                self.provider
                    .place(id, Pose::new(Vec3::from_planar(position, GROUND_Y), Vec3::ZERO));
                Lifecycle::Enable(id)
            })
            .collect();
        self.provider.apply_lifecycle(&signals);

        // Contacts from before the spawn belong to the previous round
        let stale = self.provider.take_contacts();
        if !stale.is_empty() {
            debug!("Dropped {} wall contacts from before the spawn", stale.len());
        }

        self.rounds_started += 1;
        info!(
            "Round {} spawned {} agents within radius {:.1}",
            self.rounds_started, self.config.agent_count, radius
        );
        signals
    }

    /// Run one tick of `dt` seconds
    pub fn tick(&mut self, dt: f32) -> StepOutput {
        self.performance.tick_start();

        let poses = self.provider.snapshot();
        let contacts = self.provider.take_contacts();
        let state = std::mem::replace(&mut self.state, SimState::default());
        let (state, output) = step(state, &self.config.engine, dt, &poses, &contacts);
        self.state = state;

        self.provider.apply_commands(&output.commands);
        self.provider.apply_lifecycle(&output.lifecycle);
        self.provider.integrate(dt);

        self.performance.tick_end();

        for event in &output.events {
            if let SimEvent::Eliminated { agent, cause, .. } = event {
                debug!("Agent {} eliminated ({:?})", agent, cause);
            }
        }

        output
    }

    /// Tick at the configured rate until the round ends or `max_seconds` of
    /// simulated time pass
    pub fn run_to_end(&mut self, max_seconds: f32) -> RoundResult {
        let dt = self.config.dt();
        let max_ticks = (max_seconds.max(0.0) / dt).ceil() as u64;
        let mut ticks = 0u64;

        while !self.state.finished && ticks < max_ticks {
            self.tick(dt);
            ticks += 1;
        }

        if self.performance.load() == TickLoad::Overrun {
            warn!("Ticks exceed budget: {}", self.performance.status_message());
        }

        self.result()
    }

    /// Result of the current round so far
    pub fn result(&self) -> RoundResult {
        determine_result(&self.state, !self.state.finished)
    }
}
