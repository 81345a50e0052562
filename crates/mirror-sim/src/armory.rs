//! Weapon unlocks and the equipped weapon.

use mirror_core::weapons::{weapon_or_default, WeaponDef};

#[derive(Debug, Clone)]
pub struct Armory {
    arsenal: Vec<WeaponDef>,
    unlocked: Vec<u8>,
    /// Index into `arsenal`.
    equipped: usize,
}

impl Armory {
    /// `arsenal` must be non-empty (enforced by config validation).
    pub fn new(arsenal: Vec<WeaponDef>) -> Self {
        let mut armory = Self {
            arsenal,
            unlocked: Vec::new(),
            equipped: 0,
        };
        armory.check_unlocks(1);
        armory
    }

    pub fn current(&self) -> &WeaponDef {
        &self.arsenal[self.equipped]
    }

    pub fn current_id(&self) -> u8 {
        self.current().id
    }

    pub fn unlocked(&self) -> &[u8] {
        &self.unlocked
    }

    /// Weapon by id, falling back to the first weapon for unknown ids.
    pub fn weapon(&self, id: u8) -> &WeaponDef {
        weapon_or_default(&self.arsenal, id).unwrap_or_else(|| self.current())
    }

    /// Unlock everything available at `level` and equip the highest unlocked id.
    /// Returns the newly equipped id if the equipped weapon changed.
    pub fn check_unlocks(&mut self, level: u32) -> Option<u8> {
        for weapon in &self.arsenal {
            if weapon.unlock_level <= level && !self.unlocked.contains(&weapon.id) {
                self.unlocked.push(weapon.id);
            }
        }
        let best = self
            .arsenal
            .iter()
            .enumerate()
            .filter(|(_, w)| self.unlocked.contains(&w.id))
            .max_by_key(|(_, w)| w.id)
            .map(|(i, _)| i)?;
        if best == self.equipped {
            return None;
        }
        self.equipped = best;
        Some(self.arsenal[best].id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_core::weapons::default_arsenal;

    #[test]
    fn test_starts_with_basic() {
        let armory = Armory::new(default_arsenal());
        assert_eq!(armory.current_id(), 0);
        assert_eq!(armory.unlocked(), &[0]);
    }

    #[test]
    fn test_unlocks_equip_highest() {
        let mut armory = Armory::new(default_arsenal());
        assert_eq!(armory.check_unlocks(2), None);
        assert_eq!(armory.check_unlocks(3), Some(1));
        assert_eq!(armory.check_unlocks(9), Some(3), "skipping levels unlocks everything");
        assert_eq!(armory.unlocked().len(), 4);
        assert_eq!(armory.check_unlocks(10), None);
    }

    #[test]
    fn test_unknown_weapon_falls_back() {
        let armory = Armory::new(default_arsenal());
        assert_eq!(armory.weapon(77).id, 0);
        assert_eq!(armory.weapon(2).name, "Spread");
    }
}
