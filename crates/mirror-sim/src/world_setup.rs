//! Entity spawn factories.
//!
//! Creates replicas, projectiles, hazards and pickups with their
//! component bundles.

use glam::DVec2;
use hecs::World;

use mirror_core::components::*;
use mirror_core::config::GameConfig;
use mirror_core::enums::*;
use mirror_core::types::{Position, Velocity};
use mirror_replay::cursor::ReplayCursor;
use mirror_replay::ledger::Ledger;
use mirror_replay::policy::SpawnPlan;
use mirror_replay::random::RandomSource;

/// Spawn a replica from an accepted plan. It starts at the raw recorded
/// position of `plan.start_tick` (arena centre if that tick is gone); read
/// transforms such as mirroring apply from its first update on.
pub fn spawn_replica(
    world: &mut World,
    plan: &SpawnPlan,
    serial: u32,
    ledger: &Ledger,
    config: &GameConfig,
) -> hecs::Entity {
    let position = ledger
        .query(plan.start_tick)
        .map(|r| r.position)
        .unwrap_or_else(|| Position::new(config.arena.width / 2.0, config.arena.height / 2.0));

    let (radius, hp) = match plan.kind {
        ReplicaKind::Boss => (config.clones.radius * config.boss.size_multiplier, config.boss.hp),
        ReplicaKind::Clone | ReplicaKind::Echo => (config.clones.radius, 1),
    };

    world.spawn((
        Replica {
            kind: plan.kind,
            variant: plan.variant,
            mutation: plan.mutation,
            serial,
            alive: true,
        },
        ReplayCursor::new(plan.start_tick),
        position,
        Body { radius },
        Health::new(hp),
    ))
}

/// Spawn one bullet per direction, dropping any past the global cap.
/// Returns how many were spawned.
pub fn spawn_projectiles(
    world: &mut World,
    origin: Position,
    directions: &[DVec2],
    speed: f64,
    owner: ProjectileOwner,
    config: &GameConfig,
) -> usize {
    let active = world.query::<&Projectile>().iter().count();
    let room = config.projectiles.max_active.saturating_sub(active);
    let mut spawned = 0;
    for dir in directions.iter().take(room) {
        let Some(dir) = dir.try_normalize() else {
            continue;
        };
        world.spawn((
            Projectile {
                owner,
                age_ticks: 0,
                lifetime_ticks: config.projectiles.lifetime_ticks,
                alive: true,
            },
            origin,
            Velocity::from_vec(dir * speed),
            Body {
                radius: config.projectiles.radius,
            },
        ));
        spawned += 1;
    }
    spawned
}

/// Roll a random hazard of a random kind.
pub fn random_hazard<R: RandomSource + ?Sized>(rng: &mut R, config: &GameConfig) -> Hazard {
    let hz = &config.hazards;
    let (w, h) = (config.arena.width, config.arena.height);
    let shape = match rng.index(3) {
        0 => {
            let horizontal = rng.chance(0.5);
            let sign = if rng.chance(0.5) { 1.0 } else { -1.0 };
            HazardShape::Wall {
                horizontal,
                offset: 0.0,
                velocity: hz.wall_speed * sign,
                thickness: hz.wall_thickness,
            }
        }
        1 => HazardShape::Laser {
            pivot: Position::new(
                rng.range_f64(hz.laser_margin, w - hz.laser_margin),
                rng.range_f64(hz.laser_margin, h - hz.laser_margin),
            ),
            angle: rng.range_f64(0.0, std::f64::consts::TAU),
            angular_speed: hz.laser_angular_speed,
            length: hz.laser_length,
            width: hz.laser_width,
        },
        _ => HazardShape::Zone {
            center: Position::new(
                rng.range_f64(hz.zone_margin, w - hz.zone_margin),
                rng.range_f64(hz.zone_margin, h - hz.zone_margin),
            ),
            radius: hz.zone_radius,
        },
    };
    Hazard {
        shape,
        remaining_ticks: hz.lifetime_ticks,
    }
}

pub fn spawn_hazard(world: &mut World, hazard: Hazard) -> hecs::Entity {
    world.spawn((hazard,))
}

/// Spawn a pickup of a random kind at a random spot inside the margin.
pub fn spawn_pickup<R: RandomSource + ?Sized>(
    world: &mut World,
    rng: &mut R,
    config: &GameConfig,
) -> PowerupKind {
    let kind = PowerupKind::ALL[rng.index(PowerupKind::ALL.len())];
    let m = config.powerups.spawn_margin;
    let position = Position::new(
        rng.range_f64(m, config.arena.width - m),
        rng.range_f64(m, config.arena.height - m),
    );
    world.spawn((
        Pickup {
            kind,
            collected: false,
        },
        position,
        Body {
            radius: config.powerups.radius,
        },
    ));
    kind
}
