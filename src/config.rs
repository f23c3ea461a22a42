use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::constants::{arena, combat, physics, round, steering, targeting};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("zone damage needs the melee health model (combat mode is push)")]
    ZoneDamageWithoutHealth,
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// How close-range combat resolves. Chosen once per round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CombatMode {
    /// Discrete damage bursts of `dps * cooldown` against the target's hp
    Melee { range: f32, cooldown: f32, dps: f32 },
    /// Fixed-magnitude impulse away from the attacker, no health model
    Push { range: f32, cooldown: f32, impulse: f32 },
}

impl CombatMode {
    pub fn melee() -> Self {
        CombatMode::Melee {
            range: combat::MELEE_RANGE,
            cooldown: combat::MELEE_COOLDOWN,
            dps: combat::MELEE_DPS,
        }
    }

    pub fn push() -> Self {
        CombatMode::Push {
            range: combat::PUSH_RANGE,
            cooldown: combat::PUSH_COOLDOWN,
            impulse: combat::PUSH_IMPULSE,
        }
    }

    pub fn range(&self) -> f32 {
        match *self {
            CombatMode::Melee { range, .. } | CombatMode::Push { range, .. } => range,
        }
    }

    pub fn cooldown(&self) -> f32 {
        match *self {
            CombatMode::Melee { cooldown, .. } | CombatMode::Push { cooldown, .. } => cooldown,
        }
    }

    /// Whether agents carry hit points in this mode
    pub fn uses_health(&self) -> bool {
        matches!(self, CombatMode::Melee { .. })
    }
}

impl Default for CombatMode {
    fn default() -> Self {
        Self::melee()
    }
}

/// Shape of the safe zone radius over time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ZoneShape {
    /// `max(min_radius, full_radius - shrink_rate * t)`
    Linear {
        full_radius: f32,
        shrink_rate: f32,
        min_radius: f32,
    },
    /// Linear interpolation from start to end radius over `duration` seconds
    Timed {
        start_radius: f32,
        end_radius: f32,
        duration: f32,
    },
}

impl ZoneShape {
    pub fn initial_radius(&self) -> f32 {
        match *self {
            ZoneShape::Linear { full_radius, .. } => full_radius,
            ZoneShape::Timed { start_radius, .. } => start_radius,
        }
    }

    pub fn min_radius(&self) -> f32 {
        match *self {
            ZoneShape::Linear { min_radius, .. } => min_radius,
            ZoneShape::Timed { end_radius, .. } => end_radius,
        }
    }
}

/// What happens to an agent caught outside the safe zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "exposure", rename_all = "snake_case")]
pub enum ZoneExposure {
    /// Continuous damage per second (requires the melee health model)
    Damage { dps: f32 },
    /// Immediate elimination beyond `radius + epsilon`
    Eliminate { epsilon: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub shape: ZoneShape,
    pub exposure: ZoneExposure,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            shape: ZoneShape::Timed {
                start_radius: arena::ZONE_START_RADIUS,
                end_radius: arena::ZONE_END_RADIUS,
                duration: arena::ZONE_DURATION,
            },
            exposure: ZoneExposure::Damage {
                dps: arena::STORM_DPS,
            },
        }
    }
}

/// How agents get eliminated by the arena itself
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Eliminated on a contact notification from the pose provider
    Wall,
    /// Eliminated once outside the arena radius
    RingOut,
    /// Shrinking safe zone, plus the arena radius as an absolute bound
    Zone(ZoneConfig),
}

impl Default for BoundaryMode {
    fn default() -> Self {
        BoundaryMode::Zone(ZoneConfig::default())
    }
}

/// Tunables for the per-tick combat engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Full field of view in degrees
    pub fov_degrees: f32,
    pub max_speed: f32,
    pub max_acceleration: f32,
    pub min_separation: f32,
    /// Fraction of the allowed radius where containment kicks in
    pub containment_threshold: f32,
    /// Absolute arena radius
    pub arena_radius: f32,
    pub combat: CombatMode,
    pub boundary: BoundaryMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fov_degrees: targeting::FOV_DEGREES,
            max_speed: steering::MAX_SPEED,
            max_acceleration: steering::MAX_ACCELERATION,
            min_separation: steering::MIN_SEPARATION,
            containment_threshold: steering::CONTAINMENT_THRESHOLD,
            arena_radius: arena::RADIUS,
            combat: CombatMode::default(),
            boundary: BoundaryMode::default(),
        }
    }
}

impl EngineConfig {
    /// Half the field of view, in radians
    pub fn half_fov(&self) -> f32 {
        (self.fov_degrees * 0.5).to_radians()
    }

    pub fn zone(&self) -> Option<&ZoneConfig> {
        match &self.boundary {
            BoundaryMode::Zone(zone) => Some(zone),
            _ => None,
        }
    }

    /// Load an engine config from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees <= 360.0) {
            return Err(invalid("fov_degrees", "must be in (0, 360]"));
        }
        if self.max_speed <= 0.0 {
            return Err(invalid("max_speed", "must be positive"));
        }
        if self.max_acceleration <= 0.0 {
            return Err(invalid("max_acceleration", "must be positive"));
        }
        if self.min_separation < 0.0 {
            return Err(invalid("min_separation", "cannot be negative"));
        }
        if !(self.containment_threshold > 0.0 && self.containment_threshold < 1.0) {
            return Err(invalid("containment_threshold", "must be in (0, 1)"));
        }
        if self.arena_radius <= 0.0 {
            return Err(invalid("arena_radius", "must be positive"));
        }
        if self.combat.range() < 0.0 {
            return Err(invalid("combat.range", "cannot be negative"));
        }
        if self.combat.cooldown() <= 0.0 {
            return Err(invalid("combat.cooldown", "must be positive"));
        }
        if let Some(zone) = self.zone() {
            match zone.shape {
                ZoneShape::Linear {
                    full_radius,
                    shrink_rate,
                    min_radius,
                } => {
                    if min_radius <= 0.0 || full_radius < min_radius {
                        return Err(invalid("zone.shape", "need 0 < min_radius <= full_radius"));
                    }
                    if shrink_rate < 0.0 {
                        return Err(invalid("zone.shape.shrink_rate", "cannot be negative"));
                    }
                }
                ZoneShape::Timed {
                    start_radius,
                    end_radius,
                    duration,
                } => {
                    if end_radius <= 0.0 || start_radius < end_radius {
                        return Err(invalid("zone.shape", "need 0 < end_radius <= start_radius"));
                    }
                    if duration <= 0.0 {
                        return Err(invalid("zone.shape.duration", "must be positive"));
                    }
                }
            }
            if zone.shape.initial_radius() > self.arena_radius {
                return Err(invalid("zone.shape", "zone cannot start wider than the arena"));
            }
            match zone.exposure {
                ZoneExposure::Damage { dps } => {
                    if !self.combat.uses_health() {
                        return Err(ConfigError::ZoneDamageWithoutHealth);
                    }
                    if dps < 0.0 {
                        return Err(invalid("zone.exposure.dps", "cannot be negative"));
                    }
                }
                ZoneExposure::Eliminate { epsilon } => {
                    if epsilon < 0.0 {
                        return Err(invalid("zone.exposure.epsilon", "cannot be negative"));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Runner configuration
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Agents spawned each round
    pub agent_count: usize,
    /// RNG seed for spawn placement (random when unset)
    pub seed: Option<u64>,
    /// Ticks per second
    pub tick_rate: u32,
    /// Stop a round that has not finished after this many seconds
    pub max_round_seconds: f32,
    /// Pace ticks against the wall clock instead of running flat out
    pub realtime: bool,
    pub engine: EngineConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            agent_count: round::AGENT_COUNT,
            seed: None,
            tick_rate: physics::TICK_RATE,
            max_round_seconds: round::MAX_ROUND_SECONDS,
            realtime: false,
            engine: EngineConfig::default(),
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Invalid {} '{}', using default", key, raw);
            None
        }
    }
}

impl SimConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("ENGINE_CONFIG_PATH") {
            match EngineConfig::from_json_file(&path) {
                Ok(engine) => config.engine = engine,
                Err(e) => tracing::warn!("Ignoring ENGINE_CONFIG_PATH: {}", e),
            }
        }

        if let Some(count) = env_parse::<usize>("AGENT_COUNT") {
            if (1..=1000).contains(&count) {
                config.agent_count = count;
            } else {
                tracing::warn!("AGENT_COUNT must be 1-1000, using default");
            }
        }

        if let Some(seed) = env_parse::<u64>("SEED") {
            config.seed = Some(seed);
        }

        if let Some(rate) = env_parse::<u32>("TICK_RATE") {
            if (1..=1000).contains(&rate) {
                config.tick_rate = rate;
            } else {
                tracing::warn!("TICK_RATE must be 1-1000, using default");
            }
        }

        if let Some(seconds) = env_parse::<f32>("MAX_ROUND_SECONDS") {
            if seconds > 0.0 {
                config.max_round_seconds = seconds;
            } else {
                tracing::warn!("MAX_ROUND_SECONDS must be > 0, using default");
            }
        }

        if let Some(realtime) = env_parse::<bool>("REALTIME") {
            config.realtime = realtime;
        }

        if let Ok(mode) = std::env::var("COMBAT_MODE") {
            match mode.to_ascii_lowercase().as_str() {
                "melee" => config.engine.combat = CombatMode::melee(),
                "push" => config.engine.combat = CombatMode::push(),
                _ => tracing::warn!("Invalid COMBAT_MODE '{}', using default", mode),
            }
        }

        if let Ok(mode) = std::env::var("BOUNDARY_MODE") {
            match mode.to_ascii_lowercase().as_str() {
                "wall" => config.engine.boundary = BoundaryMode::Wall,
                "ringout" | "ring_out" => config.engine.boundary = BoundaryMode::RingOut,
                "zone" => config.engine.boundary = BoundaryMode::Zone(ZoneConfig::default()),
                _ => tracing::warn!("Invalid BOUNDARY_MODE '{}', using default", mode),
            }
        }

        // Storm damage has nothing to hurt without hit points
        if let BoundaryMode::Zone(zone) = &mut config.engine.boundary {
            if !config.engine.combat.uses_health() {
                if let ZoneExposure::Damage { .. } = zone.exposure {
                    tracing::warn!("Push combat has no health model, zone eliminates instead");
                    zone.exposure = ZoneExposure::Eliminate {
                        epsilon: arena::ZONE_EPSILON,
                    };
                }
            }
        }

        config
    }

    /// Seconds per tick
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent_count == 0 {
            return Err(invalid("agent_count", "must be at least 1"));
        }
        if self.tick_rate == 0 {
            return Err(invalid("tick_rate", "must be at least 1"));
        }
        if self.max_round_seconds <= 0.0 {
            return Err(invalid("max_round_seconds", "must be positive"));
        }
        self.engine.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.agent_count, 16);
        assert_eq!(config.tick_rate, 60);
        assert!(config.validate().is_ok());
        assert!(config.engine.combat.uses_health());
    }

    #[test]
    fn test_load_or_default() {
        let config = SimConfig::load_or_default();
        assert!(config.tick_rate > 0);
        assert!(config.agent_count > 0);
    }

    #[test]
    fn test_half_fov() {
        let config = EngineConfig::default();
        assert!((config.half_fov() - 100f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_zone_damage_requires_health() {
        let config = EngineConfig {
            combat: CombatMode::push(),
            boundary: BoundaryMode::Zone(ZoneConfig::default()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZoneDamageWithoutHealth)
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.fov_degrees = 0.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.combat = CombatMode::Melee {
            range: 1.0,
            cooldown: 0.0,
            dps: 10.0,
        };
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.boundary = BoundaryMode::Zone(ZoneConfig {
            shape: ZoneShape::Timed {
                start_radius: 3.0,
                end_radius: 10.0,
                duration: 60.0,
            },
            exposure: ZoneExposure::Eliminate { epsilon: 0.05 },
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_with_defaults() {
        let json = r#"{ "combat": { "mode": "push", "range": 2.0, "cooldown": 0.5, "impulse": 4.0 },
                        "boundary": { "mode": "ring_out" } }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.boundary, BoundaryMode::RingOut);
        assert_eq!(config.combat.range(), 2.0);
        assert_eq!(config.max_speed, EngineConfig::default().max_speed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zone_json() {
        let json = r#"{ "boundary": { "mode": "zone",
            "shape": { "shape": "linear", "full_radius": 16.0, "shrink_rate": 0.5, "min_radius": 4.0 },
            "exposure": { "exposure": "eliminate", "epsilon": 0.05 } } }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        let zone = config.zone().unwrap();
        assert_eq!(zone.shape.min_radius(), 4.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EngineConfig::from_json_file("/nonexistent/engine.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
