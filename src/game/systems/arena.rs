//! Arena management system
//!
//! Safe zone schedule, boundary judgement, and spawn placement.

use rand::Rng;

use crate::config::{BoundaryMode, EngineConfig, ZoneExposure, ZoneShape};
use crate::game::constants::arena::{SPAWN_MAX_FRACTION, SPAWN_MIN_FRACTION};
use crate::game::state::{EliminationCause, Zone};
use crate::util::vec2::Vec2;

/// Safe zone radius after `elapsed` seconds. Non-increasing, never below the
/// shape's minimum.
pub fn zone_radius(shape: &ZoneShape, elapsed: f32) -> f32 {
    let t = elapsed.max(0.0);
    match *shape {
        ZoneShape::Linear {
            full_radius,
            shrink_rate,
            min_radius,
        } => (full_radius - shrink_rate.max(0.0) * t).max(min_radius),
        ZoneShape::Timed {
            start_radius,
            end_radius,
            duration,
        } => {
            let progress = if duration > 0.0 {
                (t / duration).clamp(0.0, 1.0)
            } else {
                1.0
            };
            (start_radius + (end_radius - start_radius) * progress).max(end_radius)
        }
    }
}

/// Verdict for one agent's position this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exposure {
    Safe,
    /// Storm damage to apply this tick
    Damage(f32),
    Eliminate(EliminationCause),
}

/// Judge a planar position against the arena and the current zone.
///
/// Wall mode never eliminates geometrically; those eliminations arrive as
/// contact notifications.
pub fn judge(position: Vec2, config: &EngineConfig, zone: Option<&Zone>, dt: f32) -> Exposure {
    let distance = position.length();

    match &config.boundary {
        BoundaryMode::Wall => Exposure::Safe,
        BoundaryMode::RingOut => {
            if distance > config.arena_radius {
                Exposure::Eliminate(EliminationCause::RingOut)
            } else {
                Exposure::Safe
            }
        }
        BoundaryMode::Zone(zone_config) => {
            if distance > config.arena_radius {
                return Exposure::Eliminate(EliminationCause::RingOut);
            }
            let radius = zone
                .map(|z| z.radius)
                .unwrap_or_else(|| zone_config.shape.initial_radius());
            match zone_config.exposure {
                ZoneExposure::Damage { dps } if distance > radius => {
                    Exposure::Damage(dps * dt.max(0.0))
                }
                ZoneExposure::Eliminate { epsilon } if distance > radius + epsilon => {
                    Exposure::Eliminate(EliminationCause::OutsideZone)
                }
                _ => Exposure::Safe,
            }
        }
    }
}

/// Radius the containment bias steers agents inside of, if any
pub fn allowed_radius(config: &EngineConfig, zone: Option<&Zone>) -> Option<f32> {
    match &config.boundary {
        BoundaryMode::Wall => None,
        BoundaryMode::RingOut => Some(config.arena_radius),
        BoundaryMode::Zone(zone_config) => Some(
            zone.map(|z| z.radius)
                .unwrap_or_else(|| zone_config.shape.initial_radius())
                .min(config.arena_radius),
        ),
    }
}

/// Outer radius of the spawn area: the starting zone if there is one
pub fn spawn_radius(config: &EngineConfig) -> f32 {
    config
        .zone()
        .map(|zone| zone.shape.initial_radius())
        .unwrap_or(config.arena_radius)
        .min(config.arena_radius)
}

/// Random spawn position: uniform angle, radius drawn from an annulus so
/// agents do not stack at the centre
pub fn random_spawn_position<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
    let min_radius = radius * SPAWN_MIN_FRACTION;
    let max_radius = radius * SPAWN_MAX_FRACTION;
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let r = if max_radius > min_radius {
        rng.gen_range(min_radius..max_radius)
    } else {
        min_radius
    };
    Vec2::from_angle(angle) * r
}

/// Spawn positions for a whole round
pub fn spawn_positions<R: Rng + ?Sized>(rng: &mut R, count: usize, radius: f32) -> Vec<Vec2> {
    (0..count)
        .map(|_| random_spawn_position(rng, radius))
        .collect()
}
