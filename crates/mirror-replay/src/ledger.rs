//! Append-only per-tick history of the player.
//!
//! Indexed by absolute tick. Only the most recent `retention` ticks are
//! held in memory; older slots are tombstoned behind a watermark so that
//! indices never shift under live cursors.

use std::collections::VecDeque;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mirror_core::types::Position;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("out-of-order record: expected tick {expected}, got {got}")]
    OutOfOrder { expected: u64, got: u64 },
}

/// A shot fired on the recorded tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    /// Unit aim direction.
    pub direction: DVec2,
    pub weapon_id: u8,
}

/// Everything replicas need to reproduce one tick of the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub position: Position,
    pub shot: Option<ShotRecord>,
    pub dashing: bool,
    pub weapon_id: u8,
}

/// What occupies a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Recorded,
    /// Written once, since evicted.
    Tombstoned,
    /// Not yet written (at or beyond `current_tick`).
    Unwritten,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    /// Live window; `frames[0]` is tick `evicted_below`.
    frames: VecDeque<FrameRecord>,
    evicted_below: u64,
    current_tick: u64,
    retention: u64,
}

impl Ledger {
    pub fn new(retention: u64) -> Self {
        Self {
            frames: VecDeque::with_capacity(retention.min(1 << 16) as usize),
            evicted_below: 0,
            current_tick: 0,
            retention,
        }
    }

    /// The next tick to be written.
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Ticks below this index have been tombstoned.
    pub fn evicted_below(&self) -> u64 {
        self.evicted_below
    }

    pub fn retention(&self) -> u64 {
        self.retention
    }

    /// Number of records currently held in memory.
    pub fn live_len(&self) -> usize {
        self.frames.len()
    }

    /// Write at `current_tick` and return the index written.
    pub fn append(&mut self, record: FrameRecord) -> u64 {
        let tick = self.current_tick;
        self.frames.push_back(record);
        self.current_tick += 1;
        self.evict();
        tick
    }

    /// Write at an explicit index, which must equal `current_tick`.
    pub fn record(&mut self, tick: u64, record: FrameRecord) -> Result<(), LedgerError> {
        if tick != self.current_tick {
            return Err(LedgerError::OutOfOrder {
                expected: self.current_tick,
                got: tick,
            });
        }
        self.append(record);
        Ok(())
    }

    /// The record at `tick`, or `None` if it is unwritten or tombstoned.
    pub fn query(&self, tick: u64) -> Option<&FrameRecord> {
        if tick >= self.current_tick || tick < self.evicted_below {
            return None;
        }
        self.frames.get((tick - self.evicted_below) as usize)
    }

    pub fn slot_state(&self, tick: u64) -> SlotState {
        if tick >= self.current_tick {
            SlotState::Unwritten
        } else if tick < self.evicted_below {
            SlotState::Tombstoned
        } else {
            SlotState::Recorded
        }
    }

    /// Most recently written record.
    pub fn latest(&self) -> Option<&FrameRecord> {
        self.frames.back()
    }

    /// Drop all history and restart at tick 0.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.evicted_below = 0;
        self.current_tick = 0;
    }

    fn evict(&mut self) {
        if self.current_tick <= self.retention {
            return;
        }
        let threshold = self.current_tick - self.retention;
        while self.evicted_below < threshold && self.frames.pop_front().is_some() {
            self.evicted_below += 1;
        }
    }
}

/// Builder for the next record.
///
/// `dashing` and `weapon_id` carry forward between commits; `shot` is
/// cleared by every commit.
#[derive(Debug, Clone, Default)]
pub struct PendingFrame {
    shot: Option<ShotRecord>,
    dashing: bool,
    weapon_id: u8,
}

impl PendingFrame {
    pub fn record_shot(&mut self, direction: DVec2, weapon_id: u8) {
        self.shot = Some(ShotRecord {
            direction,
            weapon_id,
        });
    }

    pub fn set_dashing(&mut self, dashing: bool) {
        self.dashing = dashing;
    }

    pub fn set_weapon(&mut self, weapon_id: u8) {
        self.weapon_id = weapon_id;
    }

    pub fn dashing(&self) -> bool {
        self.dashing
    }

    pub fn weapon_id(&self) -> u8 {
        self.weapon_id
    }

    pub fn has_shot(&self) -> bool {
        self.shot.is_some()
    }

    /// Append the pending state at `position` and clear the shot.
    pub fn commit(&mut self, position: Position, ledger: &mut Ledger) -> u64 {
        let record = FrameRecord {
            position,
            shot: self.shot.take(),
            dashing: self.dashing,
            weapon_id: self.weapon_id,
        };
        ledger.append(record)
    }
}
