//! Mirror Clone Survival headless driver.
//!
//! Runs the simulation on its own thread, feeds it input from the autopilot
//! or the command channel, and persists results when a run ends.

pub mod autopilot;
pub mod game_loop;
pub mod playback;
pub mod state;

pub use mirror_core as core;
