//! Core types and definitions for Mirror Clone Survival.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, state snapshots, events, constants and the
//! injected game configuration. It has no dependency on any runtime
//! framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
pub mod weapons;

#[cfg(test)]
mod tests;
