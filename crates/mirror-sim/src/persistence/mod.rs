//! On-disk state: the leaderboard and the replay log, both JSON.
//!
//! Failures surface as [`PersistError`]; callers log them and carry on
//! with in-memory defaults.

pub mod leaderboard;
pub mod replay_log;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const LEADERBOARD_FILE: &str = "leaderboard.json";
pub const REPLAY_FILE: &str = "replay.json";

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

impl PersistError {
    /// A missing file is the normal first-run case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

fn data_path(dir: &Path, file: &str) -> PathBuf {
    dir.join(file)
}

fn write_json<T: Serialize + ?Sized>(dir: &Path, file: &str, value: &T) -> Result<(), PersistError> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(data_path(dir, file), json)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, PersistError> {
    let json = fs::read_to_string(data_path(dir, file))?;
    Ok(serde_json::from_str(&json)?)
}
