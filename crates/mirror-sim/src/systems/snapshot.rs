//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only. It never modifies the world and never draws
//! from the random source, so unstable trails are shown unjittered.

use hecs::World;

use mirror_core::components::*;
use mirror_core::config::GameConfig;
use mirror_core::enums::*;
use mirror_core::events::GameEvent;
use mirror_core::state::*;
use mirror_core::types::{Position, SimTime};
use mirror_replay::cursor::ReplayCursor;
use mirror_replay::ledger::Ledger;
use mirror_replay::policy::EchoReservoir;

use crate::player::PlayerState;
use crate::progression::{Progression, ScoreState};
use crate::systems::powerups::PowerupEffects;

/// Engine-owned state the snapshot reads besides the world.
pub struct RunView<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub player: &'a PlayerState,
    pub weapon_id: u8,
    pub ledger: &'a Ledger,
    pub config: &'a GameConfig,
    pub progression: &'a Progression,
    pub score: &'a ScoreState,
    pub echo: &'a EchoReservoir,
    pub effects: &'a PowerupEffects,
    pub upgrade_offer: Option<&'a [UpgradeKind]>,
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(world: &World, run: &RunView<'_>, events: Vec<GameEvent>) -> GameStateSnapshot {
    let replicas = build_replicas(world, run);
    let boss_count = replicas
        .iter()
        .filter(|r| r.kind == ReplicaKind::Boss)
        .count();

    GameStateSnapshot {
        time: run.time,
        phase: run.phase,
        player: PlayerView {
            position: run.player.position,
            radius: run.player.radius,
            facing: Position::from_vec(run.player.facing),
            dashing: run.player.dashing,
            shielded: run.player.shielded,
            weapon_id: run.weapon_id,
        },
        hud: HudView {
            score: run.score.score,
            survival_secs: run.time.elapsed_secs,
            level: run.progression.level(),
            xp: run.progression.xp(),
            xp_to_next: run.progression.xp_to_next(),
            echo_energy: run.echo.energy(),
            echo_max_energy: run.echo.max_energy(),
            dash_cooldown_ticks: run.player.dash_cooldown,
            active_powerups: run.effects.list(),
            clone_count: replicas.len() - boss_count,
            boss_count,
        },
        replicas,
        projectiles: build_projectiles(world),
        hazards: build_hazards(world, &run.config.arena),
        pickups: build_pickups(world),
        upgrade_offer: run.upgrade_offer.map(|o| o.to_vec()),
        events,
    }
}

fn build_replicas(world: &World, run: &RunView<'_>) -> Vec<ReplicaView> {
    let mut replicas: Vec<ReplicaView> = world
        .query::<(&Replica, &ReplayCursor, &Position, &Body, &Health)>()
        .iter()
        .filter(|(_, (r, ..))| r.alive)
        .map(|(_, (replica, cursor, pos, body, health))| ReplicaView {
            serial: replica.serial,
            kind: replica.kind,
            variant: replica.variant,
            mutation: replica.mutation,
            position: *pos,
            radius: body.radius,
            replay_tick: cursor.current_tick.saturating_sub(1).max(cursor.start_tick),
            hp_fraction: health.fraction(),
            trail: build_trail(replica, cursor, run),
        })
        .collect();
    replicas.sort_by_key(|r| r.serial);
    replicas
}

/// Recent recorded positions behind the cursor, newest first.
fn build_trail(replica: &Replica, cursor: &ReplayCursor, run: &RunView<'_>) -> Vec<Position> {
    let history = &run.config.history;
    let mirrored = replica.kind == ReplicaKind::Clone && replica.mutation == Mutation::Mirror;
    let Some(newest) = cursor.current_tick.checked_sub(1) else {
        return Vec::new();
    };
    (1..=history.trail_length as u64)
        .filter_map(|i| newest.checked_sub(i * history.trail_spacing))
        .filter(|&tick| tick >= cursor.start_tick)
        .filter_map(|tick| run.ledger.query(tick))
        .map(|record| {
            let mut p = record.position;
            if mirrored {
                p.x = run.config.arena.width - p.x;
            }
            p
        })
        .collect()
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<(u32, ProjectileView)> = world
        .query::<(&Projectile, &Position)>()
        .iter()
        .filter(|(_, (p, _))| p.alive)
        .map(|(entity, (p, pos))| {
            (
                entity.id(),
                ProjectileView {
                    position: *pos,
                    owner: p.owner,
                },
            )
        })
        .collect();
    projectiles.sort_by_key(|(id, _)| *id);
    projectiles.into_iter().map(|(_, view)| view).collect()
}

fn build_hazards(world: &World, arena: &mirror_core::config::ArenaConfig) -> Vec<HazardView> {
    let mut hazards: Vec<(u32, HazardView)> = world
        .query::<&Hazard>()
        .iter()
        .filter(|(_, h)| h.remaining_ticks > 0)
        .map(|(entity, h)| {
            let (anchor, extent, horizontal) = match h.shape {
                HazardShape::Wall {
                    horizontal,
                    offset,
                    thickness,
                    ..
                } => {
                    let anchor = if horizontal {
                        Position::new(arena.width / 2.0, offset)
                    } else {
                        Position::new(offset, arena.height / 2.0)
                    };
                    (anchor, thickness, horizontal)
                }
                HazardShape::Laser { pivot, angle, .. } => (pivot, angle, false),
                HazardShape::Zone { center, radius } => (center, radius, false),
            };
            (
                entity.id(),
                HazardView {
                    kind: h.shape.kind(),
                    anchor,
                    extent,
                    horizontal,
                    remaining_ticks: h.remaining_ticks,
                },
            )
        })
        .collect();
    hazards.sort_by_key(|(id, _)| *id);
    hazards.into_iter().map(|(_, view)| view).collect()
}

fn build_pickups(world: &World) -> Vec<PickupView> {
    let mut pickups: Vec<(u32, PickupView)> = world
        .query::<(&Pickup, &Position)>()
        .iter()
        .filter(|(_, (p, _))| !p.collected)
        .map(|(entity, (p, pos))| {
            (
                entity.id(),
                PickupView {
                    kind: p.kind,
                    position: *pos,
                },
            )
        })
        .collect();
    pickups.sort_by_key(|(id, _)| *id);
    pickups.into_iter().map(|(_, view)| view).collect()
}
