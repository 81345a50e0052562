//! Randomness seam.
//!
//! Every random draw in the simulation goes through [`RandomSource`] so a
//! seeded ChaCha stream drives real runs and tests can script exact values.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform draw in `[lo, hi]` (the upper bound is reachable only for scripted sources).
    fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_unit()
    }

    /// Uniform integer in `[lo, hi]`, both inclusive.
    fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as f64 + 1.0;
        let offset = (self.next_unit() * span) as u32;
        (lo + offset).min(hi)
    }

    /// Uniform index into a collection of `len` items. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next_unit() * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// Bernoulli trial with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }
}

impl RandomSource for ChaCha8Rng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed list of unit draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    next: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }

    /// How many draws have been taken so far.
    pub fn draws(&self) -> usize {
        self.next
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }
}

/// Weighted choice over a fixed set of outcomes.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    /// Outcomes with their cumulative weight upper bounds.
    entries: Vec<(T, u32)>,
    total: u32,
}

impl<T: Copy> WeightedTable<T> {
    /// Build from `(outcome, weight)` pairs. Returns `None` if every weight is
    /// zero or the weights sum past `u32::MAX`.
    pub fn new(weights: &[(T, u32)]) -> Option<Self> {
        let mut total = 0u32;
        let mut entries = Vec::with_capacity(weights.len());
        for &(value, weight) in weights {
            if weight == 0 {
                continue;
            }
            total = total.checked_add(weight)?;
            entries.push((value, total));
        }
        if total == 0 {
            return None;
        }
        Some(Self { entries, total })
    }

    pub fn pick<R: RandomSource + ?Sized>(&self, rng: &mut R) -> T {
        let roll = rng.next_unit() * self.total as f64;
        for &(value, upper) in &self.entries {
            if roll < upper as f64 {
                return value;
            }
        }
        // Only reachable if a scripted source returns exactly 1.0.
        self.entries[self.entries.len() - 1].0
    }
}
