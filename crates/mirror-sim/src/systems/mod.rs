//! Per-tick systems that operate on the simulation world.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only
//! passes). Long-lived schedule state (spawn timers, active effects) lives
//! in small structs owned by the engine and passed in by reference.

pub mod cleanup;
pub mod collision;
pub mod hazards;
pub mod powerups;
pub mod projectiles;
pub mod replicas;
pub mod snapshot;
pub mod spawner;
