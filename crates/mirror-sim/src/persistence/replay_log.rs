//! Per-tick replay log and the playback cursor over it.
//!
//! The log is a presentation record (player and clone positions), not an
//! input script: playback shows the run, it does not re-simulate it.

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use mirror_core::enums::CloneVariant;
use mirror_core::types::Position;

use super::{read_json, write_json, PersistError, REPLAY_FILE};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayCloneFrame {
    pub x: f64,
    pub y: f64,
    pub variant: CloneVariant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub player_x: f64,
    pub player_y: f64,
    pub dash: bool,
    pub shoot: bool,
    pub shoot_dir: (f64, f64),
    pub clones: Vec<ReplayCloneFrame>,
}

fn round_to(v: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (v * scale).round() / scale
}

impl ReplayFrame {
    /// Build a frame, rounding positions to 0.1 and the aim to 0.001.
    pub fn new(
        player: Position,
        dash: bool,
        shot: Option<DVec2>,
        clones: Vec<ReplayCloneFrame>,
    ) -> Self {
        let dir = shot.unwrap_or(DVec2::ZERO);
        Self {
            player_x: round_to(player.x, 1),
            player_y: round_to(player.y, 1),
            dash,
            shoot: shot.is_some(),
            shoot_dir: (round_to(dir.x, 3), round_to(dir.y, 3)),
            clones,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplayLog {
    frames: Vec<ReplayFrame>,
}

impl ReplayLog {
    pub fn record(&mut self, frame: ReplayFrame) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[ReplayFrame] {
        &self.frames
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn save(&self, dir: &Path) -> Result<(), PersistError> {
        write_json(dir, REPLAY_FILE, self)
    }

    pub fn load(dir: &Path) -> Result<Self, PersistError> {
        read_json(dir, REPLAY_FILE)
    }
}

const MIN_SPEED: f64 = 0.5;
const MAX_SPEED: f64 = 4.0;
const SPEED_STEP: f64 = 0.5;

/// Forward-only playback over a loaded log.
#[derive(Debug, Clone)]
pub struct ReplayPlayer {
    log: ReplayLog,
    frame: usize,
    speed: f64,
    accumulator: f64,
    paused: bool,
    finished: bool,
}

impl ReplayPlayer {
    pub fn new(log: ReplayLog) -> Self {
        let finished = log.is_empty();
        Self {
            log,
            frame: 0,
            speed: 1.0,
            accumulator: 0.0,
            paused: false,
            finished,
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn speed_up(&mut self) {
        self.speed = (self.speed + SPEED_STEP).min(MAX_SPEED);
    }

    pub fn speed_down(&mut self) {
        self.speed = (self.speed - SPEED_STEP).max(MIN_SPEED);
    }

    /// Clamp to 0.5..=4 and snap to the nearest half step.
    pub fn set_speed(&mut self, speed: f64) {
        let snapped = (speed / SPEED_STEP).round() * SPEED_STEP;
        self.speed = snapped.clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    /// Step by the current speed. Returns `None` once the log is exhausted;
    /// the cursor then rests on the last frame. While paused the current
    /// frame is returned unchanged.
    pub fn advance(&mut self) -> Option<&ReplayFrame> {
        if self.finished {
            return None;
        }
        if self.paused {
            return self.current();
        }
        self.accumulator += self.speed;
        let steps = self.accumulator.floor();
        self.accumulator -= steps;
        self.frame += steps as usize;
        if self.frame >= self.log.len() {
            self.frame = self.log.len().saturating_sub(1);
            self.finished = true;
            return None;
        }
        self.current()
    }

    pub fn current(&self) -> Option<&ReplayFrame> {
        self.log.frames.get(self.frame)
    }

    pub fn playback_secs(&self, tick_rate: u32) -> f64 {
        self.frame as f64 / tick_rate as f64
    }

    pub fn total_secs(&self, tick_rate: u32) -> f64 {
        self.log.len() as f64 / tick_rate as f64
    }
}
