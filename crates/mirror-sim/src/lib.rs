//! Simulation engine for Mirror Clone Survival.
//!
//! Owns the hecs ECS world, the history ledger and the player, runs all
//! systems at a fixed tick rate, and produces GameStateSnapshots for the
//! driver. Also hosts leaderboard and replay-log persistence.

pub mod armory;
pub mod engine;
pub mod persistence;
pub mod player;
pub mod progression;
pub mod systems;
pub mod upgrades;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use mirror_core as core;
