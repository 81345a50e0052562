//! Collision resolution.
//!
//! Checks run in a fixed order: player vs hazard, replicas vs hazard, body
//! contact, then projectiles. A fatal hit on a vulnerable player stops the
//! pass for the tick (except during projectile resolution, which always
//! finishes). All tests are strict circle overlaps with no broad phase.

use hecs::{Entity, World};

use mirror_core::components::{Body, Health, HitResult, Projectile, Replica};
use mirror_core::enums::{HitCause, ProjectileOwner, ReplicaKind};
use mirror_core::events::GameEvent;
use mirror_core::types::Position;

use crate::player::PlayerState;
use crate::systems::hazards;

/// A replica destroyed this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kill {
    pub serial: u32,
    pub kind: ReplicaKind,
    pub cause: HitCause,
}

#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    /// Set when the player died this tick.
    pub game_over: Option<HitCause>,
    pub kills: Vec<Kill>,
}

struct Target {
    entity: Entity,
    serial: u32,
    kind: ReplicaKind,
    pos: Position,
    radius: f64,
    alive: bool,
}

struct Shot {
    entity: Entity,
    owner: ProjectileOwner,
    pos: Position,
    radius: f64,
    alive: bool,
}

pub fn run(world: &mut World, player: &PlayerState, events: &mut Vec<GameEvent>) -> CollisionReport {
    let mut report = CollisionReport::default();

    // 1. Player vs hazards.
    if !player.invulnerable() && hazards::any_hits(world, player.position, player.radius) {
        report.game_over = Some(HitCause::Hazard);
        return report;
    }

    // Regular replicas first, bosses after, each by serial.
    let mut targets: Vec<Target> = world
        .query::<(&Replica, &Position, &Body)>()
        .iter()
        .filter(|(_, (r, _, _))| r.alive)
        .map(|(entity, (r, pos, body))| Target {
            entity,
            serial: r.serial,
            kind: r.kind,
            pos: *pos,
            radius: body.radius,
            alive: true,
        })
        .collect();
    targets.sort_unstable_by_key(|t| (t.kind == ReplicaKind::Boss, t.serial));

    // 2. Replicas vs hazards. Bosses are immune.
    for t in targets.iter_mut().filter(|t| t.kind != ReplicaKind::Boss) {
        if hazards::any_hits(world, t.pos, t.radius) {
            t.alive = false;
            kill(&mut report, events, t, HitCause::Hazard);
        }
    }

    // 3. Body contact.
    let mut crushed = false;
    for t in targets.iter_mut().filter(|t| t.alive) {
        if !player.position.overlaps(player.radius, &t.pos, t.radius) {
            continue;
        }
        if !player.invulnerable() {
            crushed = true;
            break;
        }
        strike(world, &mut report, events, t, HitCause::Contact);
    }
    if crushed {
        report.game_over = Some(HitCause::Contact);
        write_back(world, &targets, &[]);
        return report;
    }

    // 4. Projectiles.
    let mut shots: Vec<Shot> = world
        .query::<(&Projectile, &Position, &Body)>()
        .iter()
        .filter(|(_, (p, _, _))| p.alive)
        .map(|(entity, (p, pos, body))| Shot {
            entity,
            owner: p.owner,
            pos: *pos,
            radius: body.radius,
            alive: true,
        })
        .collect();
    shots.sort_unstable_by_key(|s| s.entity.id());

    for shot in shots.iter_mut() {
        match shot.owner {
            ProjectileOwner::Replica => {
                if !shot.pos.overlaps(shot.radius, &player.position, player.radius) {
                    continue;
                }
                shot.alive = false;
                if player.shielded {
                    events.push(GameEvent::ShieldAbsorbed);
                } else if report.game_over.is_none() {
                    report.game_over = Some(HitCause::Projectile);
                }
            }
            ProjectileOwner::Player => {
                let Some(t) = targets
                    .iter_mut()
                    .find(|t| t.alive && shot.pos.overlaps(shot.radius, &t.pos, t.radius))
                else {
                    continue;
                };
                shot.alive = false;
                strike(world, &mut report, events, t, HitCause::Projectile);
            }
        }
    }

    write_back(world, &targets, &shots);
    report
}

/// One point of damage. Single-hit replicas die; bosses report remaining HP.
fn strike(
    world: &mut World,
    report: &mut CollisionReport,
    events: &mut Vec<GameEvent>,
    target: &mut Target,
    cause: HitCause,
) {
    let result = match world.get::<&mut Health>(target.entity) {
        Ok(mut health) => health.take_hit(),
        Err(_) => HitResult::Killed,
    };
    match result {
        HitResult::Killed => {
            target.alive = false;
            kill(report, events, target, cause);
        }
        HitResult::Damaged { remaining } => {
            events.push(GameEvent::BossDamaged {
                serial: target.serial,
                remaining_hp: remaining,
            });
        }
    }
}

fn kill(report: &mut CollisionReport, events: &mut Vec<GameEvent>, target: &Target, cause: HitCause) {
    report.kills.push(Kill {
        serial: target.serial,
        kind: target.kind,
        cause,
    });
    events.push(GameEvent::ReplicaKilled {
        serial: target.serial,
        kind: target.kind,
        cause,
    });
}

fn write_back(world: &mut World, targets: &[Target], shots: &[Shot]) {
    for t in targets.iter().filter(|t| !t.alive) {
        if let Ok(mut replica) = world.get::<&mut Replica>(t.entity) {
            replica.alive = false;
        }
    }
    for s in shots.iter().filter(|s| !s.alive) {
        if let Ok(mut projectile) = world.get::<&mut Projectile>(s.entity) {
            projectile.alive = false;
        }
    }
}
