/// Simulation timing
pub mod physics {
    /// Default tick rate in Hz
    pub const TICK_RATE: u32 = 60;
    /// Delta time per tick in seconds
    pub const DT: f32 = 1.0 / 60.0;
    /// Height agents are held at by the built-in integrator
    pub const GROUND_Y: f32 = 0.5;
    /// Collision radius of an agent body against the arena wall
    pub const BODY_RADIUS: f32 = 0.5;
    /// Hard speed cap in the built-in integrator
    pub const MAX_VELOCITY: f32 = 40.0;
}

/// Agent defaults
pub mod agent {
    /// Starting (and maximum) health in the damage model
    pub const MAX_HP: f32 = 100.0;
    /// `last_action_at` for an agent that has never acted.
    /// Far enough in the past that no cooldown can block the first action.
    pub const NEVER_ACTED: f32 = -1.0e6;
}

/// Target acquisition
pub mod targeting {
    /// Full field of view in degrees (wide on purpose so idle agents still find targets)
    pub const FOV_DEGREES: f32 = 200.0;
}

/// Steering
pub mod steering {
    /// Cruise speed agents steer toward (units/s)
    pub const MAX_SPEED: f32 = 6.0;
    /// Maximum change of horizontal velocity per second
    pub const MAX_ACCELERATION: f32 = 18.0;
    /// Agents closer than this push each other apart
    pub const MIN_SEPARATION: f32 = 1.4;
    /// Fraction of the allowed radius where the inward pull starts
    pub const CONTAINMENT_THRESHOLD: f32 = 0.9;
}

/// Combat
pub mod combat {
    /// Planar reach of a melee swing
    pub const MELEE_RANGE: f32 = 1.6;
    /// Seconds between swings of the same attacker
    pub const MELEE_COOLDOWN: f32 = 0.45;
    /// Damage per second; delivered as `MELEE_DPS * MELEE_COOLDOWN` per swing
    pub const MELEE_DPS: f32 = 22.0;
    /// Planar reach of a shove
    pub const PUSH_RANGE: f32 = 1.6;
    /// Seconds between shoves of the same attacker
    pub const PUSH_COOLDOWN: f32 = 0.6;
    /// Velocity added to the shoved agent
    pub const PUSH_IMPULSE: f32 = 9.0;
}

/// Arena and safe zone
pub mod arena {
    /// Absolute playable radius
    pub const RADIUS: f32 = 32.0;
    /// Spawn annulus as fractions of the spawn radius
    pub const SPAWN_MIN_FRACTION: f32 = 0.35;
    pub const SPAWN_MAX_FRACTION: f32 = 0.85;
    /// Safe zone radius at round start
    pub const ZONE_START_RADIUS: f32 = 16.0;
    /// Safe zone radius once fully shrunk
    pub const ZONE_END_RADIUS: f32 = 3.5;
    /// Seconds for the timed zone to go from start to end radius
    pub const ZONE_DURATION: f32 = 120.0;
    /// Damage per second outside the zone (storm damage)
    pub const STORM_DPS: f32 = 8.0;
    /// Slack past the zone edge before an instant elimination
    pub const ZONE_EPSILON: f32 = 0.05;
}

/// Runner defaults
pub mod round {
    /// Number of agents in a round
    pub const AGENT_COUNT: usize = 16;
    /// Safety cap for a headless round in seconds
    pub const MAX_ROUND_SECONDS: f32 = 600.0;
}
