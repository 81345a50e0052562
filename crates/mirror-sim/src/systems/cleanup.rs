//! Cleanup system: removes dead replicas, spent projectiles, collected
//! pickups and expired hazards.

use hecs::{Entity, World};

use mirror_core::components::{Hazard, Pickup, Projectile, Replica};

/// Despawn everything flagged dead this tick.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, replica) in world.query_mut::<&Replica>() {
        if !replica.alive {
            despawn_buffer.push(entity);
        }
    }

    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if !projectile.alive {
            despawn_buffer.push(entity);
        }
    }

    for (entity, pickup) in world.query_mut::<&Pickup>() {
        if pickup.collected {
            despawn_buffer.push(entity);
        }
    }

    for (entity, hazard) in world.query_mut::<&Hazard>() {
        if hazard.remaining_ticks == 0 {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
