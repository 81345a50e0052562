//! Player commands sent from the driver to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Where a shot should go.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Aim {
    /// Along the player's current facing.
    Facing,
    /// Toward an arena point (mouse aim).
    Toward { x: f64, y: f64 },
}

/// Held input for one tick. Replaced wholesale by each `SetInput`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    /// Raw movement axes; normalised by the player system.
    pub movement: DVec2,
    /// `Some` while the fire button is held.
    pub fire: Option<Aim>,
    /// `true` while the dash button is held; a dash starts whenever one is ready.
    pub dash: bool,
}

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Run control ---
    /// Leave the menu and begin a run.
    StartRun,
    Pause,
    Resume,
    /// Discard the current run entirely and start a fresh one.
    Restart,

    // --- Gameplay ---
    SetInput { input: InputState },
    /// Spend echo energy on an echo of the player's past.
    TriggerEcho,
    /// Pick one of the offered upgrade cards.
    ChooseUpgrade { index: usize },
}
