//! ECS components for hecs entities.
//!
//! Components are plain data. Game logic lives in systems; the only
//! helpers here are the small arithmetic ones every system would
//! otherwise repeat.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Collision circle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Body {
    pub radius: f64,
}

/// A replay-driven entity: clone, boss or echo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Replica {
    pub kind: ReplicaKind,
    pub variant: CloneVariant,
    pub mutation: Mutation,
    /// Monotonic spawn serial, stable across the run.
    pub serial: u32,
    /// Cleared on death; the cleanup system despawns dead replicas.
    pub alive: bool,
}

/// Hit points for multi-hit entities (bosses).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub hp: u32,
    pub max_hp: u32,
}

/// Outcome of applying one hit to a [`Health`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult {
    Damaged { remaining: u32 },
    Killed,
}

impl Health {
    pub fn new(hp: u32) -> Self {
        Self { hp, max_hp: hp }
    }

    /// Apply one point of damage.
    pub fn take_hit(&mut self) -> HitResult {
        self.hp = self.hp.saturating_sub(1);
        if self.hp == 0 {
            HitResult::Killed
        } else {
            HitResult::Damaged { remaining: self.hp }
        }
    }

    pub fn fraction(&self) -> f64 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f64 / self.max_hp as f64
        }
    }
}

/// In-flight bullet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: ProjectileOwner,
    pub age_ticks: u32,
    pub lifetime_ticks: u32,
    pub alive: bool,
}

/// Geometry of an active hazard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum HazardShape {
    /// Full-length bar sweeping across the arena, bouncing at the edges.
    /// `offset` is the bar's y (horizontal) or x (vertical).
    Wall {
        horizontal: bool,
        offset: f64,
        velocity: f64,
        thickness: f64,
    },
    /// Segment from `pivot` out to `length`, rotating about the pivot.
    Laser {
        pivot: Position,
        angle: f64,
        angular_speed: f64,
        length: f64,
        width: f64,
    },
    /// Static disc.
    Zone { center: Position, radius: f64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hazard {
    pub shape: HazardShape,
    pub remaining_ticks: u32,
}

impl HazardShape {
    pub fn kind(&self) -> HazardKind {
        match self {
            HazardShape::Wall { .. } => HazardKind::MovingWall,
            HazardShape::Laser { .. } => HazardKind::RotatingLaser,
            HazardShape::Zone { .. } => HazardKind::DangerZone,
        }
    }
}

/// Collectible powerup lying in the arena.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PowerupKind,
    pub collected: bool,
}
