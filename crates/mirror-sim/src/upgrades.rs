//! Periodic upgrade offers.

use mirror_core::enums::UpgradeKind;
use mirror_replay::random::RandomSource;

#[derive(Debug, Clone, Default)]
pub struct UpgradeState {
    ticks_since_offer: u64,
    offer: Option<Vec<UpgradeKind>>,
    applied: Vec<UpgradeKind>,
}

impl UpgradeState {
    /// Count one playing tick. Returns `true` when an offer is due.
    pub fn tick(&mut self, interval: u64) -> bool {
        if self.offer.is_some() {
            return false;
        }
        self.ticks_since_offer += 1;
        if self.ticks_since_offer < interval {
            return false;
        }
        self.ticks_since_offer = 0;
        true
    }

    /// Draw `count` distinct upgrades and hold them as the pending offer.
    pub fn make_offer<R: RandomSource + ?Sized>(&mut self, rng: &mut R, count: usize) -> Vec<UpgradeKind> {
        let mut pool = UpgradeKind::ALL.to_vec();
        let mut choices = Vec::with_capacity(count);
        while choices.len() < count && !pool.is_empty() {
            let i = rng.index(pool.len());
            choices.push(pool.swap_remove(i));
        }
        self.offer = Some(choices.clone());
        choices
    }

    pub fn offer(&self) -> Option<&[UpgradeKind]> {
        self.offer.as_deref()
    }

    /// Take the chosen card, closing the offer. `None` leaves the offer open.
    pub fn choose(&mut self, index: usize) -> Option<UpgradeKind> {
        let picked = *self.offer.as_ref()?.get(index)?;
        self.offer = None;
        self.applied.push(picked);
        Some(picked)
    }

    pub fn applied(&self) -> &[UpgradeKind] {
        &self.applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_replay::random::ScriptedSource;
    use std::collections::HashSet;

    #[test]
    fn test_offer_due_every_interval() {
        let mut state = UpgradeState::default();
        let due: Vec<u64> = (1..=3600).filter(|_| state.tick(1800)).collect();
        assert_eq!(due.len(), 2);
    }

    #[test]
    fn test_offer_is_distinct_and_blocks_timer() {
        let mut state = UpgradeState::default();
        let mut rng = ScriptedSource::new(vec![0.0, 0.0, 0.0]);
        let offer = state.make_offer(&mut rng, 3);
        let unique: HashSet<_> = offer.iter().collect();
        assert_eq!(unique.len(), 3);
        assert!(!state.tick(1), "timer frozen while an offer is open");

        assert_eq!(state.choose(7), None, "bad index keeps the offer");
        assert!(state.offer().is_some());
        assert_eq!(state.choose(1), Some(offer[1]));
        assert!(state.offer().is_none());
        assert_eq!(state.applied(), &[offer[1]]);
    }
}
