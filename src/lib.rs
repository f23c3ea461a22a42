//! Brawl Royale Engine Library
//!
//! A per-tick combat engine for arena rounds between autonomous agents.
//!
//! # Modes
//!
//! - Combat: `melee` (hit points, damage per swing) or `push` (impulses, no health)
//! - Boundary: `wall` (contact eliminates), `ringout` (leaving the arena eliminates)
//!   or `zone` (a shrinking safe zone that damages or eliminates)

pub mod config;
pub mod util;
pub mod game;
