//! Default tuning parameters. `GameConfig::default()` is built from these.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

// --- Arena ---

pub const ARENA_WIDTH: f64 = 800.0;
pub const ARENA_HEIGHT: f64 = 600.0;

// --- Player ---

pub const PLAYER_RADIUS: f64 = 12.0;

/// Base movement speed (units per tick).
pub const PLAYER_SPEED: f64 = 4.0;

/// Hard cap on movement speed after all bonuses, dash excluded.
pub const PLAYER_SPEED_CAP: f64 = 8.0;

pub const DASH_SPEED: f64 = 12.0;
pub const DASH_DURATION_TICKS: u32 = 12;
pub const DASH_COOLDOWN_TICKS: u32 = 120;

/// Dash cooldown never drops below this, whatever upgrades are taken.
pub const DASH_COOLDOWN_FLOOR_TICKS: u32 = 30;

// --- Clones ---

pub const CLONE_RADIUS: f64 = 12.0;

/// History lag for normal clones (5 s).
pub const CLONE_DELAY_TICKS: u64 = 300;

/// History lag for the delayed variant (10 s).
pub const DELAYED_CLONE_DELAY_TICKS: u64 = 600;

pub const CLONE_SPAWN_INTERVAL_TICKS: u32 = 300;
pub const CLONE_MIN_SPAWN_INTERVAL_TICKS: u32 = 90;

/// Spawn interval multiplier applied after each timer-driven spawn.
pub const CLONE_SPAWN_ACCELERATION: f64 = 0.97;

/// Recorded ticks consumed per tick by the fast variant.
pub const FAST_VARIANT_STEPS: u32 = 2;

/// Recorded ticks consumed per tick by the fast mutation.
pub const FAST_MUTATION_STEPS: u32 = 2;

/// Spawn weights: normal, fast, delayed, shooter.
pub const VARIANT_WEIGHTS: [u32; 4] = [40, 25, 20, 15];

/// Mutation weights: normal, fast, mirror, unstable.
pub const MUTATION_WEIGHTS: [u32; 4] = [40, 25, 20, 15];

/// Per-axis jitter bound for unstable clones.
pub const UNSTABLE_JITTER: f64 = 3.0;

/// Per-tick chance that a shooter clone fires on its own.
pub const SHOOTER_FIRE_CHANCE: f64 = 0.03;

// --- Boss ---

pub const BOSS_FIRST_TICK: u64 = 3600;
pub const BOSS_INTERVAL_TICKS: u64 = 1800;
pub const BOSS_SIZE_MULTIPLIER: f64 = 2.0;
pub const BOSS_REPLAY_RATE: f64 = 1.5;
pub const BOSS_HP: u32 = 5;

// --- Echo ---

pub const ECHO_MAX_ENERGY: f64 = 100.0;
pub const ECHO_COST: f64 = 25.0;
pub const ECHO_REGEN_PER_SECOND: f64 = 10.0;
pub const ECHO_DELAY_TICKS: u64 = 300;

// --- History ---

/// Recorded ticks retained behind the write head.
pub const HISTORY_RETENTION_TICKS: u64 = 10_000;

pub const TRAIL_LENGTH: usize = 12;
pub const TRAIL_SPACING: u64 = 4;

// --- Projectiles ---

pub const BULLET_RADIUS: f64 = 4.0;
pub const MAX_BULLETS: usize = 500;
pub const BULLET_LIFETIME_TICKS: u32 = 600;

// --- Powerups ---

pub const POWERUP_RADIUS: f64 = 10.0;
pub const POWERUP_SPAWN_MIN_TICKS: u32 = 600;
pub const POWERUP_SPAWN_MAX_TICKS: u32 = 1200;
pub const POWERUP_MAX_ACTIVE: usize = 3;
pub const POWERUP_SPAWN_MARGIN: f64 = 40.0;
pub const SPEED_BOOST_DURATION_TICKS: u32 = 360;
pub const SPEED_BOOST_BONUS: f64 = 2.0;
pub const SHIELD_DURATION_TICKS: u32 = 300;
pub const SLOW_MOTION_DURATION_TICKS: u32 = 240;
pub const RAPID_FIRE_DURATION_TICKS: u32 = 300;

// --- Hazards ---

pub const HAZARD_SPAWN_MIN_TICKS: u32 = 1200;
pub const HAZARD_SPAWN_MAX_TICKS: u32 = 2400;
pub const HAZARD_MAX_ACTIVE: usize = 3;
pub const HAZARD_LIFETIME_TICKS: u32 = 600;
pub const WALL_SPEED: f64 = 2.0;
pub const WALL_THICKNESS: f64 = 8.0;

/// Laser rotation in radians per tick.
pub const LASER_ANGULAR_SPEED: f64 = 0.02;
pub const LASER_LENGTH: f64 = 200.0;
pub const LASER_WIDTH: f64 = 3.0;

/// Laser pivots stay at least this far from every arena edge.
pub const LASER_MARGIN: f64 = 150.0;
pub const ZONE_RADIUS: f64 = 50.0;
pub const ZONE_MARGIN: f64 = 70.0;

// --- Progression ---

pub const XP_PER_KILL: u32 = 10;
pub const BOSS_XP_MULTIPLIER: u32 = 5;
pub const XP_PER_SECOND: u32 = 1;
pub const XP_BASE_THRESHOLD: f64 = 50.0;
pub const XP_GROWTH_FACTOR: f64 = 1.4;
pub const MAX_LEVEL: u32 = 15;

/// Movement speed gained per level above 1.
pub const LEVEL_SPEED_BONUS: f64 = 0.15;

/// Bullet speed gained per level above 1.
pub const LEVEL_BULLET_SPEED_BONUS: f64 = 0.3;

// --- Upgrades ---

pub const UPGRADE_INTERVAL_TICKS: u64 = 1800;
pub const UPGRADE_CHOICES: usize = 3;
pub const UPGRADE_MOVEMENT_BONUS: f64 = 0.6;
pub const UPGRADE_BULLET_SPEED_BONUS: f64 = 1.0;

/// Fraction shaved off the dash cooldown per upgrade.
pub const UPGRADE_DASH_COOLDOWN_REDUCTION: f64 = 0.2;

/// Added to the clone spawn interval per upgrade.
pub const UPGRADE_CLONE_INTERVAL_TICKS: u32 = 60;

// --- Scoring ---

pub const SCORE_PER_TICK: u64 = 1;
pub const SCORE_HAZARD_KILL: u64 = 50;
pub const SCORE_CLONE_KILL: u64 = 100;
pub const SCORE_BOSS_KILL: u64 = 500;

// --- Persistence ---

pub const LEADERBOARD_SIZE: usize = 10;

/// Replay log positions are rounded to this many decimal places.
pub const REPLAY_LOG_PRECISION: i32 = 1;
