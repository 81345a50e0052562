//! Game state snapshot: the complete visible state produced after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Position, SimTime};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub player: PlayerView,
    pub replicas: Vec<ReplicaView>,
    pub projectiles: Vec<ProjectileView>,
    pub hazards: Vec<HazardView>,
    pub pickups: Vec<PickupView>,
    pub hud: HudView,
    /// Present only while the phase is `ChoosingUpgrade`.
    pub upgrade_offer: Option<Vec<UpgradeKind>>,
    /// Events raised during this tick.
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub radius: f64,
    pub facing: Position,
    pub dashing: bool,
    pub shielded: bool,
    pub weapon_id: u8,
}

/// A replica with its fading trail (newest first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaView {
    pub serial: u32,
    pub kind: ReplicaKind,
    pub variant: CloneVariant,
    pub mutation: Mutation,
    pub position: Position,
    pub radius: f64,
    /// Recorded tick the replica is currently showing.
    pub replay_tick: u64,
    /// Remaining health fraction; 1.0 for single-hit replicas.
    pub hp_fraction: f64,
    pub trail: Vec<Position>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Position,
    pub owner: ProjectileOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardView {
    pub kind: HazardKind,
    /// Wall: bar centre. Laser: pivot. Zone: centre.
    pub anchor: Position,
    /// Wall: thickness. Laser: current angle. Zone: radius.
    pub extent: f64,
    pub horizontal: bool,
    pub remaining_ticks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupView {
    pub kind: PowerupKind,
    pub position: Position,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HudView {
    pub score: u64,
    pub survival_secs: f64,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub echo_energy: f64,
    pub echo_max_energy: f64,
    pub dash_cooldown_ticks: u32,
    pub active_powerups: Vec<(PowerupKind, u32)>,
    pub clone_count: usize,
    pub boss_count: usize,
}
