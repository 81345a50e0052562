//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which family a replay-driven entity belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicaKind {
    /// Timer-spawned clone with a random variant and mutation.
    #[default]
    Clone,
    /// Large multi-hit clone on its own timer, replaying at a fractional rate.
    Boss,
    /// Player-triggered clone paid for with echo energy.
    Echo,
}

/// Behavioral category of a clone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneVariant {
    #[default]
    Normal,
    /// Consumes several recorded ticks per simulation tick.
    Fast,
    /// Starts further back in history.
    Delayed,
    /// Occasionally fires on its own in addition to replayed shots.
    Shooter,
}

impl CloneVariant {
    pub const ALL: [CloneVariant; 4] = [
        CloneVariant::Normal,
        CloneVariant::Fast,
        CloneVariant::Delayed,
        CloneVariant::Shooter,
    ];

    /// Single-letter tag used by renderers.
    pub fn letter(self) -> char {
        match self {
            CloneVariant::Normal => 'N',
            CloneVariant::Fast => 'F',
            CloneVariant::Delayed => 'D',
            CloneVariant::Shooter => 'S',
        }
    }
}

/// Positional transform layered on top of a replayed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    #[default]
    Normal,
    /// Doubles playback steps unless the variant is already fast.
    Fast,
    /// Reflects x across the arena's vertical centre line.
    Mirror,
    /// Jitters x and y by a fresh random offset every consumed tick.
    Unstable,
}

impl Mutation {
    pub const ALL: [Mutation; 4] = [
        Mutation::Normal,
        Mutation::Fast,
        Mutation::Mirror,
        Mutation::Unstable,
    ];
}

/// Who fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileOwner {
    Player,
    /// Any replay-driven entity (clone, boss or echo).
    Replica,
}

/// Collectible powerup type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerupKind {
    SpeedBoost,
    Shield,
    SlowMotion,
    RapidFire,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::SpeedBoost,
        PowerupKind::Shield,
        PowerupKind::SlowMotion,
        PowerupKind::RapidFire,
    ];
}

/// Arena hazard archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    MovingWall,
    RotatingLaser,
    DangerZone,
}

/// Upgrade card offered at the periodic upgrade pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    MovementSpeedBoost,
    BulletSpeedBoost,
    DashCooldownReduction,
    CloneSpawnDelay,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::MovementSpeedBoost,
        UpgradeKind::BulletSpeedBoost,
        UpgradeKind::DashCooldownReduction,
        UpgradeKind::CloneSpawnDelay,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UpgradeKind::MovementSpeedBoost => "Speed +15%",
            UpgradeKind::BulletSpeedBoost => "Bullet Speed +1",
            UpgradeKind::DashCooldownReduction => "Dash CD -20%",
            UpgradeKind::CloneSpawnDelay => "Clone Delay +1s",
        }
    }
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Menu,
    Active,
    Paused,
    /// Simulation frozen until the player picks an upgrade.
    ChoosingUpgrade,
    GameOver,
}

/// What ended a run or killed a replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitCause {
    Hazard,
    Contact,
    Projectile,
}

/// Why a spawn request produced no entity. Not an error: callers carry on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SpawnRefusal {
    /// `current_tick` has not yet passed the required delay.
    InsufficientHistory { current_tick: u64, delay: u64 },
    /// Echo energy below the spawn cost.
    InsufficientEnergy { energy: f64, cost: f64 },
}
