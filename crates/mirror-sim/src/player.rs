//! The player: movement, dash and weapon cooldown.
//!
//! Stored on the engine rather than in the ECS world: there is exactly one
//! and almost every system needs to read it.

use glam::DVec2;

use mirror_core::commands::{Aim, InputState};
use mirror_core::config::{ArenaConfig, DashConfig, GameConfig};
use mirror_core::types::Position;

#[derive(Debug, Clone)]
pub struct PlayerState {
    pub position: Position,
    pub radius: f64,
    /// Unit facing; follows movement, starts facing +x.
    pub facing: DVec2,
    pub dashing: bool,
    /// Remaining dash cooldown; zero means a dash is available.
    pub dash_cooldown: u32,
    /// Cooldown applied when a dash starts (reduced by upgrades).
    pub dash_cooldown_ticks: u32,
    /// Movement bonus from upgrades.
    pub speed_bonus: f64,
    /// Bullet speed bonus from upgrades.
    pub bullet_speed_bonus: f64,
    /// Set each tick from active powerups.
    pub shielded: bool,
    step: DVec2,
    dash_ticks_left: u32,
    dash_velocity: DVec2,
    shoot_cooldown: u32,
}

impl PlayerState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            position: Position::new(config.arena.width / 2.0, config.arena.height / 2.0),
            radius: config.player.radius,
            facing: DVec2::X,
            dashing: false,
            dash_cooldown: 0,
            dash_cooldown_ticks: config.dash.cooldown_ticks,
            speed_bonus: 0.0,
            bullet_speed_bonus: 0.0,
            shielded: false,
            step: DVec2::ZERO,
            dash_ticks_left: 0,
            dash_velocity: DVec2::ZERO,
            shoot_cooldown: 0,
        }
    }

    /// Shield or dash.
    pub fn invulnerable(&self) -> bool {
        self.shielded || self.dashing
    }

    /// Turn held input into this tick's step. `speed` is uncapped.
    pub fn apply_input(&mut self, input: &InputState, speed: f64, speed_cap: f64, dash: &DashConfig) {
        self.step = DVec2::ZERO;
        if let Some(dir) = input.movement.try_normalize() {
            self.step = dir * speed.min(speed_cap);
            self.facing = dir;
        }
        if input.dash {
            self.try_start_dash(dash);
        }
    }

    /// Start a dash along the facing direction if one is available.
    pub fn try_start_dash(&mut self, dash: &DashConfig) -> bool {
        if self.dashing || self.dash_cooldown > 0 {
            return false;
        }
        let Some(dir) = self.facing.try_normalize() else {
            return false;
        };
        self.dashing = true;
        self.dash_ticks_left = dash.duration_ticks;
        self.dash_cooldown = self.dash_cooldown_ticks;
        self.dash_velocity = dir * dash.speed;
        true
    }

    /// Advance dash timers, move, then clamp to the arena.
    pub fn update(&mut self, arena: &ArenaConfig) {
        if self.dashing {
            self.dash_ticks_left = self.dash_ticks_left.saturating_sub(1);
            if self.dash_ticks_left == 0 {
                self.dashing = false;
            }
        }
        self.dash_cooldown = self.dash_cooldown.saturating_sub(1);

        let step = if self.dashing { self.dash_velocity } else { self.step };
        let r = self.radius;
        self.position.x = (self.position.x + step.x).clamp(r, arena.width - r);
        self.position.y = (self.position.y + step.y).clamp(r, arena.height - r);
    }

    /// Count down the weapon cooldown and fire if the trigger is held and ready.
    ///
    /// Returns the unit shot direction. A `Toward` aim at the player's own
    /// centre fires nothing.
    pub fn try_fire(&mut self, aim: Option<Aim>, fire_interval: u32) -> Option<DVec2> {
        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        let aim = aim?;
        if self.shoot_cooldown > 0 {
            return None;
        }
        let direction = match aim {
            Aim::Facing => self.facing.try_normalize()?,
            Aim::Toward { x, y } => (DVec2::new(x, y) - self.position.as_vec()).try_normalize()?,
        };
        self.shoot_cooldown = fire_interval;
        Some(direction)
    }

    /// Shorten the dash cooldown, never below `floor`.
    pub fn reduce_dash_cooldown(&mut self, fraction: f64, floor: u32) {
        let reduced = (self.dash_cooldown_ticks as f64 * (1.0 - fraction)) as u32;
        self.dash_cooldown_ticks = reduced.max(floor);
        self.dash_cooldown = self.dash_cooldown.min(self.dash_cooldown_ticks);
    }

    /// 0.0 right after a dash, 1.0 when ready.
    pub fn dash_ready_fraction(&self) -> f64 {
        if self.dash_cooldown == 0 {
            1.0
        } else {
            1.0 - self.dash_cooldown as f64 / self.dash_cooldown_ticks.max(1) as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving(x: f64, y: f64) -> InputState {
        InputState {
            movement: DVec2::new(x, y),
            ..Default::default()
        }
    }

    #[test]
    fn test_diagonal_movement_is_normalized() {
        let config = GameConfig::default();
        let mut player = PlayerState::new(&config);
        let start = player.position;
        player.apply_input(&moving(1.0, 1.0), 4.0, 8.0, &config.dash);
        player.update(&config.arena);
        assert!((player.position.distance_to(&start) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_speed_capped() {
        let config = GameConfig::default();
        let mut player = PlayerState::new(&config);
        let start = player.position;
        player.apply_input(&moving(1.0, 0.0), 20.0, 8.0, &config.dash);
        player.update(&config.arena);
        assert!((player.position.x - start.x - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_to_arena() {
        let config = GameConfig::default();
        let mut player = PlayerState::new(&config);
        for _ in 0..200 {
            player.apply_input(&moving(-1.0, -1.0), 8.0, 8.0, &config.dash);
            player.update(&config.arena);
        }
        assert_eq!(player.position, Position::new(12.0, 12.0));
    }

    #[test]
    fn test_dash_duration_and_cooldown() {
        let config = GameConfig::default();
        let mut player = PlayerState::new(&config);
        assert!(player.try_start_dash(&config.dash));
        assert!(!player.try_start_dash(&config.dash), "no double dash");

        let mut dash_ticks = 0;
        for _ in 0..20 {
            player.update(&config.arena);
            if player.dashing {
                dash_ticks += 1;
            }
        }
        assert_eq!(dash_ticks, 11);
        assert!(player.dash_cooldown > 0);
        for _ in 0..100 {
            player.update(&config.arena);
        }
        assert_eq!(player.dash_cooldown, 0);
        assert!(player.try_start_dash(&config.dash));
    }

    #[test]
    fn test_fire_interval() {
        let config = GameConfig::default();
        let mut player = PlayerState::new(&config);
        let shots = (0..30)
            .filter(|_| player.try_fire(Some(Aim::Facing), 10).is_some())
            .count();
        assert_eq!(shots, 3, "one shot every 10 ticks");
    }

    #[test]
    fn test_cooldown_runs_while_trigger_released() {
        let config = GameConfig::default();
        let mut player = PlayerState::new(&config);
        assert!(player.try_fire(Some(Aim::Facing), 10).is_some());
        for _ in 0..9 {
            assert!(player.try_fire(None, 10).is_none());
        }
        assert!(player.try_fire(Some(Aim::Facing), 10).is_some());
    }

    #[test]
    fn test_aim_toward_point() {
        let config = GameConfig::default();
        let mut player = PlayerState::new(&config);
        let dir = player
            .try_fire(Some(Aim::Toward { x: 400.0, y: 0.0 }), 10)
            .expect("ready to fire");
        assert!((dir - DVec2::NEG_Y).length() < 1e-12);
    }

    #[test]
    fn test_dash_cooldown_reduction_floor() {
        let config = GameConfig::default();
        let mut player = PlayerState::new(&config);
        player.reduce_dash_cooldown(0.2, 30);
        assert_eq!(player.dash_cooldown_ticks, 96);
        for _ in 0..10 {
            player.reduce_dash_cooldown(0.2, 30);
        }
        assert_eq!(player.dash_cooldown_ticks, 30);
    }
}
