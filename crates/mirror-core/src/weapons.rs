//! Weapon definitions and firing geometry.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Immutable weapon definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDef {
    pub id: u8,
    pub name: String,
    /// Ticks between shots.
    pub fire_interval_ticks: u32,
    pub bullet_speed: f64,
    pub bullet_count: u32,
    /// Total fan angle in degrees (0 = straight).
    pub spread_degrees: f64,
    pub unlock_level: u32,
}

impl WeaponDef {
    fn new(
        id: u8,
        name: &str,
        fire_interval_ticks: u32,
        bullet_speed: f64,
        bullet_count: u32,
        spread_degrees: f64,
        unlock_level: u32,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            fire_interval_ticks,
            bullet_speed,
            bullet_count,
            spread_degrees,
            unlock_level,
        }
    }

    /// Unit directions for each bullet of one shot around `aim`.
    ///
    /// Multi-bullet weapons fan evenly from `-spread/2` to `+spread/2`.
    /// A zero `aim` yields no bullets.
    pub fn fire_directions(&self, aim: DVec2) -> Vec<DVec2> {
        let Some(base) = aim.try_normalize() else {
            return Vec::new();
        };
        if self.bullet_count <= 1 || self.spread_degrees == 0.0 {
            return vec![base];
        }

        let base_angle = base.y.atan2(base.x);
        let spread = self.spread_degrees.to_radians();
        let step = spread / (self.bullet_count - 1) as f64;
        (0..self.bullet_count)
            .map(|i| {
                let a = base_angle - spread / 2.0 + step * i as f64;
                DVec2::new(a.cos(), a.sin())
            })
            .collect()
    }
}

/// The stock arsenal: Basic, Rapid, Spread, Laser.
pub fn default_arsenal() -> Vec<WeaponDef> {
    vec![
        WeaponDef::new(0, "Basic", 10, 8.0, 1, 0.0, 1),
        WeaponDef::new(1, "Rapid", 5, 9.0, 1, 0.0, 3),
        WeaponDef::new(2, "Spread", 12, 7.0, 3, 25.0, 5),
        WeaponDef::new(3, "Laser", 3, 14.0, 1, 0.0, 8),
    ]
}

/// Look up a weapon by id, falling back to the first entry for unknown ids.
pub fn weapon_or_default(arsenal: &[WeaponDef], id: u8) -> Option<&WeaponDef> {
    arsenal
        .iter()
        .find(|w| w.id == id)
        .or_else(|| arsenal.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_bullet_normalizes_aim() {
        let basic = &default_arsenal()[0];
        let dirs = basic.fire_directions(DVec2::new(3.0, 4.0));
        assert_eq!(dirs.len(), 1);
        assert!((dirs[0] - DVec2::new(0.6, 0.8)).length() < 1e-12);
    }

    #[test]
    fn test_spread_fans_symmetrically() {
        let spread = &default_arsenal()[2];
        let dirs = spread.fire_directions(DVec2::X);
        assert_eq!(dirs.len(), 3);
        let half = 12.5_f64.to_radians();
        assert!((dirs[0].y.atan2(dirs[0].x) + half).abs() < 1e-9);
        assert!((dirs[1] - DVec2::X).length() < 1e-9, "middle bullet on aim");
        assert!((dirs[2].y.atan2(dirs[2].x) - half).abs() < 1e-9);
    }

    #[test]
    fn test_zero_aim_fires_nothing() {
        let basic = &default_arsenal()[0];
        assert!(basic.fire_directions(DVec2::ZERO).is_empty());
    }

    #[test]
    fn test_unknown_weapon_falls_back_to_first() {
        let arsenal = default_arsenal();
        assert_eq!(weapon_or_default(&arsenal, 2).map(|w| w.id), Some(2));
        assert_eq!(weapon_or_default(&arsenal, 42).map(|w| w.id), Some(0));
    }
}
