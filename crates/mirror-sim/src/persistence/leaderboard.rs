//! Top-N run results.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{read_json, write_json, PersistError, LEADERBOARD_FILE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub score: u64,
    /// Rounded to one decimal.
    pub survival_seconds: f64,
    pub level: u32,
}

/// Score-descending list; ties keep insertion order.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    capacity: usize,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Insert a result. Returns its 0-based rank, or `None` if it did not
    /// make the cut.
    pub fn add(&mut self, score: u64, survival_seconds: f64, level: u32) -> Option<usize> {
        self.entries.push(LeaderboardEntry {
            score,
            survival_seconds: (survival_seconds * 10.0).round() / 10.0,
            level,
        });
        // Stable: equal scores stay in insertion order.
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        let rank = self.entries.iter().filter(|e| e.score >= score).count() - 1;
        self.entries.truncate(self.capacity);
        (rank < self.capacity).then_some(rank)
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn load(dir: &Path, capacity: usize) -> Result<Self, PersistError> {
        let mut entries: Vec<LeaderboardEntry> = read_json(dir, LEADERBOARD_FILE)?;
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(capacity);
        Ok(Self { entries, capacity })
    }

    /// Load, falling back to an empty board. Anything other than a missing
    /// file is logged.
    pub fn load_or_default(dir: &Path, capacity: usize) -> Self {
        match Self::load(dir, capacity) {
            Ok(board) => board,
            Err(e) => {
                if !e.is_not_found() {
                    warn!(error = %e, "leaderboard unreadable, starting empty");
                }
                Self::new(capacity)
            }
        }
    }

    pub fn save(&self, dir: &Path) -> Result<(), PersistError> {
        write_json(dir, LEADERBOARD_FILE, &self.entries)
    }
}
