pub mod physics;
pub mod arena;
pub mod targeting;
pub mod steering;
pub mod combat;
