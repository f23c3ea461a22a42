use std::time::Duration;

use anyhow::Context;
use tokio::time::interval;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use brawl_royale_engine::config::{BoundaryMode, SimConfig};
use brawl_royale_engine::game::game_loop::RoundRunner;
use brawl_royale_engine::game::match_result::RoundResult;
use brawl_royale_engine::game::systems::physics::{KinematicWorld, PoseProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Brawl Royale Engine v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = SimConfig::load_or_default();
    config.validate().context("invalid configuration")?;
    info!(
        "Configuration loaded: {} agents, {} Hz, combat={:?}, boundary={:?}",
        config.agent_count, config.tick_rate, config.engine.combat, config.engine.boundary
    );

    let world = match config.engine.boundary {
        BoundaryMode::Wall => KinematicWorld::with_wall(config.engine.arena_radius),
        _ => KinematicWorld::new(),
    };

    let realtime = config.realtime;
    let max_seconds = config.max_round_seconds;
    let mut runner = RoundRunner::new(config, world);

    let result = if realtime {
        run_realtime(&mut runner, max_seconds).await
    } else {
        runner.run_to_end(max_seconds)
    };

    match result.winner {
        Some(winner) => info!("Agent {} wins after {:.1}s", winner, result.duration),
        None => info!("Round ended without a winner ({:?})", result.reason),
    }
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

/// Pace ticks against the wall clock until the round ends, the time cap is
/// reached, or Ctrl+C is pressed
async fn run_realtime<P: PoseProvider>(runner: &mut RoundRunner<P>, max_seconds: f32) -> RoundResult {
    let dt = runner.config().dt();
    let mut ticker = interval(Duration::from_secs_f32(dt));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let log_every = runner.config().tick_rate as u64 * 10;

    info!("Round loop started at {} Hz", runner.config().tick_rate);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                runner.tick(dt);
                let state = runner.state();
                if state.tick % log_every == 0 {
                    let status = state.status();
                    info!(
                        "Round: {:.0}s, tick {}, {} alive, zone {:?} | Perf: {}",
                        status.elapsed,
                        status.tick,
                        status.alive_count,
                        status.zone_radius,
                        runner.performance().status_message()
                    );
                }
                if state.finished || state.now >= max_seconds {
                    break;
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                }
                info!("Shutdown signal received");
                break;
            }
        }
    }

    runner.result()
}
