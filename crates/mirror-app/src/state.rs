//! Types shared between the driver and the game loop thread.

use std::path::PathBuf;

use mirror_core::commands::PlayerCommand;
use mirror_core::enums::HitCause;

/// Commands sent from the driver to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// How fast the loop runs ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Sleep to hold the configured tick rate.
    Realtime,
    /// Tick back to back; for soak runs and tests.
    Unthrottled,
}

#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub pacing: Pacing,
    /// Stop after this many loop iterations even if the run is still going.
    pub tick_limit: Option<u64>,
    /// Leaderboard and replay files are written here at game over.
    pub data_dir: PathBuf,
    /// Drive the player with the built-in autopilot.
    pub autopilot: bool,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            pacing: Pacing::Realtime,
            tick_limit: None,
            data_dir: PathBuf::from("mirror-data"),
            autopilot: true,
        }
    }
}

/// Outcome of a finished run, as reported by the loop thread.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub score: u64,
    pub survival_secs: f64,
    pub level: u32,
    pub cause: HitCause,
    /// 0-based leaderboard rank, if the run placed.
    pub rank: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = LoopSettings::default();
        assert_eq!(settings.pacing, Pacing::Realtime);
        assert!(settings.tick_limit.is_none());
        assert!(settings.autopilot);
        assert_eq!(settings.data_dir, PathBuf::from("mirror-data"));
    }
}
