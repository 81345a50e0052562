//! Injected game configuration.
//!
//! Every tunable lives here so tests and the app can override any subset.
//! Defaults come from [`crate::constants`]; a JSON document may supply only
//! the fields it wants to change.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::{CloneVariant, Mutation};
use crate::weapons::{default_arsenal, WeaponDef};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tick_rate: u32,
    pub arena: ArenaConfig,
    pub player: PlayerConfig,
    pub dash: DashConfig,
    pub clones: CloneConfig,
    pub boss: BossConfig,
    pub echo: EchoConfig,
    pub history: HistoryConfig,
    pub projectiles: ProjectileConfig,
    pub weapons: Vec<WeaponDef>,
    pub powerups: PowerupConfig,
    pub hazards: HazardConfig,
    pub progression: ProgressionConfig,
    pub upgrades: UpgradeConfig,
    pub scoring: ScoringConfig,
    pub leaderboard: LeaderboardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub radius: f64,
    pub speed: f64,
    pub speed_cap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub speed: f64,
    pub duration_ticks: u32,
    pub cooldown_ticks: u32,
    pub cooldown_floor_ticks: u32,
}

/// Weight per variant for timer-driven spawns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantWeights {
    pub normal: u32,
    pub fast: u32,
    pub delayed: u32,
    pub shooter: u32,
}

/// Weight per mutation for timer-driven spawns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationWeights {
    pub normal: u32,
    pub fast: u32,
    pub mirror: u32,
    pub unstable: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloneConfig {
    pub radius: f64,
    pub delay_ticks: u64,
    pub delayed_delay_ticks: u64,
    pub spawn_interval_ticks: u32,
    pub min_spawn_interval_ticks: u32,
    pub spawn_acceleration: f64,
    pub fast_variant_steps: u32,
    pub fast_mutation_steps: u32,
    pub variant_weights: VariantWeights,
    pub mutation_weights: MutationWeights,
    pub unstable_jitter: f64,
    pub shooter_fire_chance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub first_tick: u64,
    pub interval_ticks: u64,
    pub size_multiplier: f64,
    pub replay_rate: f64,
    pub hp: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoConfig {
    pub max_energy: f64,
    /// Energy at run start. `None` starts full.
    pub initial_energy: Option<f64>,
    pub cost: f64,
    pub regen_per_second: f64,
    pub delay_ticks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub retention_ticks: u64,
    pub trail_length: usize,
    pub trail_spacing: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub radius: f64,
    pub max_active: usize,
    pub lifetime_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupConfig {
    pub radius: f64,
    pub spawn_min_ticks: u32,
    pub spawn_max_ticks: u32,
    pub max_active: usize,
    pub spawn_margin: f64,
    pub speed_boost_ticks: u32,
    pub speed_boost_bonus: f64,
    pub shield_ticks: u32,
    pub slow_motion_ticks: u32,
    pub rapid_fire_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardConfig {
    pub spawn_min_ticks: u32,
    pub spawn_max_ticks: u32,
    pub max_active: usize,
    pub lifetime_ticks: u32,
    pub wall_speed: f64,
    pub wall_thickness: f64,
    pub laser_angular_speed: f64,
    pub laser_length: f64,
    pub laser_width: f64,
    pub laser_margin: f64,
    pub zone_radius: f64,
    pub zone_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub xp_per_kill: u32,
    pub boss_xp_multiplier: u32,
    pub xp_per_second: u32,
    pub base_threshold: f64,
    pub growth_factor: f64,
    pub max_level: u32,
    pub speed_bonus_per_level: f64,
    pub bullet_speed_bonus_per_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    pub interval_ticks: u64,
    pub choices: usize,
    pub movement_speed_bonus: f64,
    pub bullet_speed_bonus: f64,
    pub dash_cooldown_reduction: f64,
    pub clone_interval_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub per_tick: u64,
    pub hazard_kill: u64,
    pub clone_kill: u64,
    pub boss_kill: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            arena: ArenaConfig::default(),
            player: PlayerConfig::default(),
            dash: DashConfig::default(),
            clones: CloneConfig::default(),
            boss: BossConfig::default(),
            echo: EchoConfig::default(),
            history: HistoryConfig::default(),
            projectiles: ProjectileConfig::default(),
            weapons: default_arsenal(),
            powerups: PowerupConfig::default(),
            hazards: HazardConfig::default(),
            progression: ProgressionConfig::default(),
            upgrades: UpgradeConfig::default(),
            scoring: ScoringConfig::default(),
            leaderboard: LeaderboardConfig::default(),
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            speed_cap: PLAYER_SPEED_CAP,
        }
    }
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            speed: DASH_SPEED,
            duration_ticks: DASH_DURATION_TICKS,
            cooldown_ticks: DASH_COOLDOWN_TICKS,
            cooldown_floor_ticks: DASH_COOLDOWN_FLOOR_TICKS,
        }
    }
}

impl Default for VariantWeights {
    fn default() -> Self {
        let [normal, fast, delayed, shooter] = VARIANT_WEIGHTS;
        Self {
            normal,
            fast,
            delayed,
            shooter,
        }
    }
}

impl VariantWeights {
    pub fn entries(&self) -> [(CloneVariant, u32); 4] {
        [
            (CloneVariant::Normal, self.normal),
            (CloneVariant::Fast, self.fast),
            (CloneVariant::Delayed, self.delayed),
            (CloneVariant::Shooter, self.shooter),
        ]
    }
}

impl Default for MutationWeights {
    fn default() -> Self {
        let [normal, fast, mirror, unstable] = MUTATION_WEIGHTS;
        Self {
            normal,
            fast,
            mirror,
            unstable,
        }
    }
}

impl MutationWeights {
    pub fn entries(&self) -> [(Mutation, u32); 4] {
        [
            (Mutation::Normal, self.normal),
            (Mutation::Fast, self.fast),
            (Mutation::Mirror, self.mirror),
            (Mutation::Unstable, self.unstable),
        ]
    }
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            radius: CLONE_RADIUS,
            delay_ticks: CLONE_DELAY_TICKS,
            delayed_delay_ticks: DELAYED_CLONE_DELAY_TICKS,
            spawn_interval_ticks: CLONE_SPAWN_INTERVAL_TICKS,
            min_spawn_interval_ticks: CLONE_MIN_SPAWN_INTERVAL_TICKS,
            spawn_acceleration: CLONE_SPAWN_ACCELERATION,
            fast_variant_steps: FAST_VARIANT_STEPS,
            fast_mutation_steps: FAST_MUTATION_STEPS,
            variant_weights: VariantWeights::default(),
            mutation_weights: MutationWeights::default(),
            unstable_jitter: UNSTABLE_JITTER,
            shooter_fire_chance: SHOOTER_FIRE_CHANCE,
        }
    }
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            first_tick: BOSS_FIRST_TICK,
            interval_ticks: BOSS_INTERVAL_TICKS,
            size_multiplier: BOSS_SIZE_MULTIPLIER,
            replay_rate: BOSS_REPLAY_RATE,
            hp: BOSS_HP,
        }
    }
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            max_energy: ECHO_MAX_ENERGY,
            initial_energy: None,
            cost: ECHO_COST,
            regen_per_second: ECHO_REGEN_PER_SECOND,
            delay_ticks: ECHO_DELAY_TICKS,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            retention_ticks: HISTORY_RETENTION_TICKS,
            trail_length: TRAIL_LENGTH,
            trail_spacing: TRAIL_SPACING,
        }
    }
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            radius: BULLET_RADIUS,
            max_active: MAX_BULLETS,
            lifetime_ticks: BULLET_LIFETIME_TICKS,
        }
    }
}

impl Default for PowerupConfig {
    fn default() -> Self {
        Self {
            radius: POWERUP_RADIUS,
            spawn_min_ticks: POWERUP_SPAWN_MIN_TICKS,
            spawn_max_ticks: POWERUP_SPAWN_MAX_TICKS,
            max_active: POWERUP_MAX_ACTIVE,
            spawn_margin: POWERUP_SPAWN_MARGIN,
            speed_boost_ticks: SPEED_BOOST_DURATION_TICKS,
            speed_boost_bonus: SPEED_BOOST_BONUS,
            shield_ticks: SHIELD_DURATION_TICKS,
            slow_motion_ticks: SLOW_MOTION_DURATION_TICKS,
            rapid_fire_ticks: RAPID_FIRE_DURATION_TICKS,
        }
    }
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            spawn_min_ticks: HAZARD_SPAWN_MIN_TICKS,
            spawn_max_ticks: HAZARD_SPAWN_MAX_TICKS,
            max_active: HAZARD_MAX_ACTIVE,
            lifetime_ticks: HAZARD_LIFETIME_TICKS,
            wall_speed: WALL_SPEED,
            wall_thickness: WALL_THICKNESS,
            laser_angular_speed: LASER_ANGULAR_SPEED,
            laser_length: LASER_LENGTH,
            laser_width: LASER_WIDTH,
            laser_margin: LASER_MARGIN,
            zone_radius: ZONE_RADIUS,
            zone_margin: ZONE_MARGIN,
        }
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_kill: XP_PER_KILL,
            boss_xp_multiplier: BOSS_XP_MULTIPLIER,
            xp_per_second: XP_PER_SECOND,
            base_threshold: XP_BASE_THRESHOLD,
            growth_factor: XP_GROWTH_FACTOR,
            max_level: MAX_LEVEL,
            speed_bonus_per_level: LEVEL_SPEED_BONUS,
            bullet_speed_bonus_per_level: LEVEL_BULLET_SPEED_BONUS,
        }
    }
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            interval_ticks: UPGRADE_INTERVAL_TICKS,
            choices: UPGRADE_CHOICES,
            movement_speed_bonus: UPGRADE_MOVEMENT_BONUS,
            bullet_speed_bonus: UPGRADE_BULLET_SPEED_BONUS,
            dash_cooldown_reduction: UPGRADE_DASH_COOLDOWN_REDUCTION,
            clone_interval_ticks: UPGRADE_CLONE_INTERVAL_TICKS,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            per_tick: SCORE_PER_TICK,
            hazard_kill: SCORE_HAZARD_KILL,
            clone_kill: SCORE_CLONE_KILL,
            boss_kill: SCORE_BOSS_KILL,
        }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            size: LEADERBOARD_SIZE,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Sum of a weight table, or `None` if it does not fit in a `u32`.
fn weight_total<T>(entries: &[(T, u32)]) -> Option<u32> {
    entries
        .iter()
        .try_fold(0u32, |acc, &(_, weight)| acc.checked_add(weight))
}

impl GameConfig {
    /// Parse a (possibly partial) JSON document over the defaults and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Echo energy regenerated per tick.
    pub fn echo_regen_per_tick(&self) -> f64 {
        self.echo.regen_per_second / self.tick_rate as f64
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(invalid("tick_rate", "must be positive"));
        }
        if self.arena.width <= 0.0 || self.arena.height <= 0.0 {
            return Err(invalid("arena", "width and height must be positive"));
        }
        if self.clones.delay_ticks == 0 || self.echo.delay_ticks == 0 {
            return Err(invalid("delay_ticks", "replay delays must be at least 1"));
        }
        if self.clones.fast_variant_steps == 0 || self.clones.fast_mutation_steps == 0 {
            return Err(invalid("clones", "step counts must be at least 1"));
        }
        if self.clones.spawn_interval_ticks == 0 || self.clones.min_spawn_interval_ticks == 0 {
            return Err(invalid("clones", "spawn intervals must be positive"));
        }
        if !(0.0..=1.0).contains(&self.clones.spawn_acceleration) {
            return Err(invalid("clones.spawn_acceleration", "must lie in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.clones.shooter_fire_chance) {
            return Err(invalid("clones.shooter_fire_chance", "must lie in [0, 1]"));
        }
        if self.clones.unstable_jitter < 0.0 {
            return Err(invalid("clones.unstable_jitter", "must be non-negative"));
        }
        let variant_total = weight_total(&self.clones.variant_weights.entries())
            .ok_or_else(|| invalid("clones.variant_weights", "weights overflow"))?;
        if variant_total == 0 {
            return Err(invalid("clones.variant_weights", "at least one weight must be positive"));
        }
        let mutation_total = weight_total(&self.clones.mutation_weights.entries())
            .ok_or_else(|| invalid("clones.mutation_weights", "weights overflow"))?;
        if mutation_total == 0 {
            return Err(invalid("clones.mutation_weights", "at least one weight must be positive"));
        }
        if self.boss.replay_rate <= 0.0 {
            return Err(invalid("boss.replay_rate", "must be positive"));
        }
        if self.boss.hp == 0 {
            return Err(invalid("boss.hp", "must be at least 1"));
        }
        if self.echo.cost < 0.0 || self.echo.max_energy < self.echo.cost {
            return Err(invalid("echo", "cost must lie in [0, max_energy]"));
        }
        if let Some(initial) = self.echo.initial_energy {
            if !(0.0..=self.echo.max_energy).contains(&initial) {
                return Err(invalid("echo.initial_energy", "must lie in [0, max_energy]"));
            }
        }
        let longest_delay = self
            .clones
            .delay_ticks
            .max(self.clones.delayed_delay_ticks)
            .max(self.echo.delay_ticks);
        if self.history.retention_ticks < longest_delay {
            return Err(invalid(
                "history.retention_ticks",
                format!("must cover the longest replay delay ({longest_delay})"),
            ));
        }
        if self.weapons.is_empty() {
            return Err(invalid("weapons", "at least one weapon is required"));
        }
        if self.weapons.iter().any(|w| w.bullet_count == 0) {
            return Err(invalid("weapons", "bullet_count must be at least 1"));
        }
        if self.powerups.spawn_min_ticks > self.powerups.spawn_max_ticks {
            return Err(invalid("powerups", "spawn_min_ticks exceeds spawn_max_ticks"));
        }
        if self.hazards.spawn_min_ticks > self.hazards.spawn_max_ticks {
            return Err(invalid("hazards", "spawn_min_ticks exceeds spawn_max_ticks"));
        }
        if self.hazards.laser_margin * 2.0 > self.arena.width.min(self.arena.height)
            || self.hazards.zone_margin * 2.0 > self.arena.width.min(self.arena.height)
            || self.powerups.spawn_margin * 2.0 > self.arena.width.min(self.arena.height)
        {
            return Err(invalid("margins", "spawn margins do not fit inside the arena"));
        }
        if self.progression.max_level == 0 || self.progression.growth_factor < 1.0 {
            return Err(invalid("progression", "max_level >= 1 and growth_factor >= 1 required"));
        }
        if self.upgrades.choices == 0 || self.upgrades.choices > 4 {
            return Err(invalid("upgrades.choices", "must lie in 1..=4"));
        }
        if self.upgrades.interval_ticks == 0 {
            return Err(invalid("upgrades.interval_ticks", "must be positive"));
        }
        Ok(())
    }
}
