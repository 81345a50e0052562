//! Replica update: every clone, boss and echo reads its next slice of the
//! ledger through the shared reader and fires whatever it replayed.

use hecs::{Entity, World};

use mirror_core::components::Replica;
use mirror_core::config::GameConfig;
use mirror_core::enums::ProjectileOwner;
use mirror_core::types::Position;
use mirror_replay::cursor::ReplayCursor;
use mirror_replay::ledger::Ledger;
use mirror_replay::reader::{self, ReaderParams, ShotIntent};
use mirror_replay::random::RandomSource;

use crate::armory::Armory;
use crate::world_setup;

/// Advance all living replicas by one tick.
///
/// Replicas are visited in serial order so random draws (jitter, shooter
/// rolls) happen in a fixed sequence. When `frozen` is set (slow motion
/// skip tick) nothing moves or fires.
pub fn run<R: RandomSource + ?Sized>(
    world: &mut World,
    ledger: &Ledger,
    params: &ReaderParams,
    armory: &Armory,
    rng: &mut R,
    config: &GameConfig,
    frozen: bool,
) {
    if frozen {
        return;
    }

    let mut order: Vec<(u32, Entity)> = world
        .query::<&Replica>()
        .iter()
        .filter(|(_, r)| r.alive)
        .map(|(e, r)| (r.serial, e))
        .collect();
    order.sort_unstable_by_key(|(serial, _)| *serial);

    let mut shots: Vec<(Position, ShotIntent)> = Vec::new();
    for (_, entity) in order {
        let Ok((replica, cursor, pos)) =
            world.query_one_mut::<(&Replica, &mut ReplayCursor, &mut Position)>(entity)
        else {
            continue;
        };
        let outcome = reader::read_tick(
            ledger,
            cursor,
            replica.kind,
            replica.variant,
            replica.mutation,
            params,
            rng,
        );
        if let Some(next) = outcome.position {
            *pos = next;
        }
        if let Some(shot) = outcome.shot {
            shots.push((*pos, shot));
        }
    }

    for (origin, shot) in shots {
        let weapon = armory.weapon(shot.weapon_id);
        let directions = weapon.fire_directions(shot.direction);
        world_setup::spawn_projectiles(
            world,
            origin,
            &directions,
            weapon.bullet_speed,
            ProjectileOwner::Replica,
            config,
        );
    }
}
