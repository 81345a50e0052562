//! XP, levels and run score.

use mirror_core::config::ProgressionConfig;

/// Running score state tracked by the engine.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    pub score: u64,
    pub clones_killed: u32,
    pub bosses_killed: u32,
    pub hazard_kills: u32,
}

#[derive(Debug, Clone)]
pub struct Progression {
    config: ProgressionConfig,
    tick_rate: u32,
    xp: u32,
    level: u32,
    xp_to_next: u32,
    survival_ticks: u32,
}

/// XP needed to leave `level`: `floor(base * growth^(level - 1))`.
pub fn threshold(config: &ProgressionConfig, level: u32) -> u32 {
    (config.base_threshold * config.growth_factor.powi(level as i32 - 1)).floor() as u32
}

impl Progression {
    pub fn new(config: ProgressionConfig, tick_rate: u32) -> Self {
        let xp_to_next = threshold(&config, 1);
        Self {
            config,
            tick_rate,
            xp: 0,
            level: 1,
            xp_to_next,
            survival_ticks: 0,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn xp_to_next(&self) -> u32 {
        self.xp_to_next
    }

    pub fn speed_bonus(&self) -> f64 {
        self.config.speed_bonus_per_level * (self.level - 1) as f64
    }

    pub fn bullet_speed_bonus(&self) -> f64 {
        self.config.bullet_speed_bonus_per_level * (self.level - 1) as f64
    }

    /// Grant kill XP. Returns the new level if it changed.
    pub fn grant_kill_xp(&mut self, multiplier: u32) -> Option<u32> {
        self.xp += self.config.xp_per_kill * multiplier;
        self.check_level_up()
    }

    /// Count one survived tick; pays out once per second.
    pub fn grant_survival_tick(&mut self) -> Option<u32> {
        self.survival_ticks += 1;
        if self.survival_ticks < self.tick_rate {
            return None;
        }
        self.survival_ticks = 0;
        self.xp += self.config.xp_per_second;
        self.check_level_up()
    }

    fn check_level_up(&mut self) -> Option<u32> {
        let before = self.level;
        while self.level < self.config.max_level && self.xp >= self.xp_to_next {
            self.xp -= self.xp_to_next;
            self.level += 1;
            self.xp_to_next = threshold(&self.config, self.level);
        }
        (self.level != before).then_some(self.level)
    }
}
