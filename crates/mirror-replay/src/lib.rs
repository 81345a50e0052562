//! Temporal replay engine for Mirror Clone Survival.
//!
//! Owns the history ledger that records the player every tick, the cursors
//! replicas use to walk it, the per-entity read transforms, and the spawn
//! policy deciding when and what to spawn. No ECS dependency: everything
//! here operates on plain data.

pub mod cursor;
pub mod ledger;
pub mod policy;
pub mod random;
pub mod reader;

pub use mirror_core as core;

#[cfg(test)]
mod tests;
