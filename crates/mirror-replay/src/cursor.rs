//! Per-entity position in the ledger.

use crate::ledger::{FrameRecord, Ledger};

/// Walks the ledger at a possibly fractional rate.
///
/// The fractional part of the rate is carried in an accumulator, so a
/// rate of 1.5 consumes exactly three ticks every two calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayCursor {
    pub start_tick: u64,
    /// Next ledger index to consume.
    pub current_tick: u64,
    accumulator: f64,
}

impl ReplayCursor {
    pub fn new(start_tick: u64) -> Self {
        Self {
            start_tick,
            current_tick: start_tick,
            accumulator: 0.0,
        }
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Ticks consumed since spawn.
    pub fn consumed(&self) -> u64 {
        self.current_tick - self.start_tick
    }

    /// Advance by `rate`, calling `on_frame` for each consumed record in order.
    ///
    /// Stops at the first unavailable slot; the steps left over are dropped
    /// and the cursor stays on that slot. Returns the number consumed.
    pub fn advance<F>(&mut self, ledger: &Ledger, rate: f64, mut on_frame: F) -> u32
    where
        F: FnMut(&FrameRecord),
    {
        self.accumulator += rate.max(0.0);
        let steps = self.accumulator.floor();
        self.accumulator -= steps;

        let mut consumed = 0;
        for _ in 0..steps as u64 {
            let Some(record) = ledger.query(self.current_tick) else {
                break;
            };
            on_frame(record);
            self.current_tick += 1;
            consumed += 1;
        }
        consumed
    }
}
