//! Shared read function for every replay-driven entity.
//!
//! Behavior is selected by data (kind, variant, mutation), not by type:
//! clones, bosses and echoes all go through [`read_tick`].

use glam::DVec2;

use mirror_core::config::GameConfig;
use mirror_core::enums::{CloneVariant, Mutation, ReplicaKind};
use mirror_core::types::Position;

use crate::cursor::ReplayCursor;
use crate::ledger::Ledger;
use crate::random::RandomSource;

/// Tuning the reader needs, lifted out of [`GameConfig`].
#[derive(Debug, Clone, Copy)]
pub struct ReaderParams {
    pub arena_width: f64,
    pub unstable_jitter: f64,
    pub fast_variant_steps: u32,
    pub fast_mutation_steps: u32,
    pub shooter_fire_chance: f64,
    pub boss_rate: f64,
}

impl ReaderParams {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            arena_width: config.arena.width,
            unstable_jitter: config.clones.unstable_jitter,
            fast_variant_steps: config.clones.fast_variant_steps,
            fast_mutation_steps: config.clones.fast_mutation_steps,
            shooter_fire_chance: config.clones.shooter_fire_chance,
            boss_rate: config.boss.replay_rate,
        }
    }
}

impl Default for ReaderParams {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

/// A shot a replica wants to fire this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotIntent {
    pub direction: DVec2,
    pub weapon_id: u8,
    /// Synthesised by the shooter variant rather than replayed.
    pub autonomous: bool,
}

/// Result of one tick of reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReadOutcome {
    /// Transformed position of the last consumed frame, if any were consumed.
    pub position: Option<Position>,
    pub shot: Option<ShotIntent>,
    pub consumed: u32,
}

/// Whole ticks per simulation tick for a clone. The fast variant takes
/// precedence over the fast mutation; the two never stack.
pub fn steps_per_tick(params: &ReaderParams, variant: CloneVariant, mutation: Mutation) -> u32 {
    if variant == CloneVariant::Fast {
        params.fast_variant_steps
    } else if mutation == Mutation::Fast {
        params.fast_mutation_steps
    } else {
        1
    }
}

/// Playback rate fed to the cursor.
pub fn playback_rate(
    params: &ReaderParams,
    kind: ReplicaKind,
    variant: CloneVariant,
    mutation: Mutation,
) -> f64 {
    match kind {
        ReplicaKind::Clone => steps_per_tick(params, variant, mutation) as f64,
        ReplicaKind::Boss => params.boss_rate,
        ReplicaKind::Echo => 1.0,
    }
}

/// Apply a mutation to a recorded position. Unstable draws two values.
pub fn transform_position<R: RandomSource + ?Sized>(
    params: &ReaderParams,
    mutation: Mutation,
    raw: Position,
    rng: &mut R,
) -> Position {
    match mutation {
        Mutation::Mirror => Position::new(params.arena_width - raw.x, raw.y),
        Mutation::Unstable => {
            let j = params.unstable_jitter;
            let dx = rng.range_f64(-j, j);
            let dy = rng.range_f64(-j, j);
            Position::new(raw.x + dx, raw.y + dy)
        }
        Mutation::Normal | Mutation::Fast => raw,
    }
}

pub fn transform_direction(mutation: Mutation, direction: DVec2) -> DVec2 {
    match mutation {
        Mutation::Mirror => DVec2::new(-direction.x, direction.y),
        _ => direction,
    }
}

/// Advance `cursor` for one simulation tick and produce the entity's output.
///
/// Only clones honour their variant and mutation; bosses and echoes replay
/// the raw record.
pub fn read_tick<R: RandomSource + ?Sized>(
    ledger: &Ledger,
    cursor: &mut ReplayCursor,
    kind: ReplicaKind,
    variant: CloneVariant,
    mutation: Mutation,
    params: &ReaderParams,
    rng: &mut R,
) -> ReadOutcome {
    let (variant, mutation) = match kind {
        ReplicaKind::Clone => (variant, mutation),
        ReplicaKind::Boss | ReplicaKind::Echo => (CloneVariant::Normal, Mutation::Normal),
    };
    let rate = playback_rate(params, kind, variant, mutation);

    let mut outcome = ReadOutcome::default();
    let consumed = cursor.advance(ledger, rate, |record| {
        outcome.position = Some(transform_position(params, mutation, record.position, rng));
        if let Some(shot) = record.shot {
            // Last shot wins.
            outcome.shot = Some(ShotIntent {
                direction: transform_direction(mutation, shot.direction),
                weapon_id: shot.weapon_id,
                autonomous: false,
            });
        }
    });
    outcome.consumed = consumed;

    if variant == CloneVariant::Shooter
        && outcome.shot.is_none()
        && rng.chance(params.shooter_fire_chance)
    {
        outcome.shot = Some(ShotIntent {
            direction: DVec2::X,
            weapon_id: 0,
            autonomous: true,
        });
    }
    outcome
}
