//! Events emitted by the simulation for UI feedback and persistence hooks.

use serde::{Deserialize, Serialize};

use crate::enums::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    ReplicaSpawned {
        serial: u32,
        kind: ReplicaKind,
        variant: CloneVariant,
        mutation: Mutation,
        start_tick: u64,
    },
    SpawnRefused {
        kind: ReplicaKind,
        refusal: SpawnRefusal,
    },
    ReplicaKilled {
        serial: u32,
        kind: ReplicaKind,
        cause: HitCause,
    },
    BossDamaged {
        serial: u32,
        remaining_hp: u32,
    },
    ShieldAbsorbed,
    PowerupCollected {
        kind: PowerupKind,
    },
    HazardSpawned {
        kind: HazardKind,
    },
    LevelUp {
        level: u32,
    },
    WeaponEquipped {
        weapon_id: u8,
    },
    UpgradeOffered {
        choices: Vec<UpgradeKind>,
    },
    UpgradeApplied {
        upgrade: UpgradeKind,
    },
    GameOver {
        cause: HitCause,
        score: u64,
        survival_ticks: u64,
        level: u32,
    },
}
