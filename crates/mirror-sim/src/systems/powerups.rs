//! Powerup pickups and their timed effects.

use std::collections::BTreeMap;

use hecs::World;
use tracing::debug;

use mirror_core::components::{Body, Pickup};
use mirror_core::config::{GameConfig, PowerupConfig};
use mirror_core::enums::PowerupKind;
use mirror_core::events::GameEvent;
use mirror_core::types::Position;
use mirror_replay::random::RandomSource;

use crate::player::PlayerState;
use crate::systems::spawner::RandomInterval;
use crate::world_setup;

/// Remaining ticks per active effect. Ordered so snapshots list effects
/// in a stable order.
#[derive(Debug, Clone, Default)]
pub struct PowerupEffects {
    remaining: BTreeMap<PowerupKind, u32>,
}

impl PowerupEffects {
    /// Start (or refresh) an effect at its full duration.
    pub fn activate(&mut self, kind: PowerupKind, config: &PowerupConfig) {
        let ticks = match kind {
            PowerupKind::SpeedBoost => config.speed_boost_ticks,
            PowerupKind::Shield => config.shield_ticks,
            PowerupKind::SlowMotion => config.slow_motion_ticks,
            PowerupKind::RapidFire => config.rapid_fire_ticks,
        };
        self.remaining.insert(kind, ticks);
    }

    pub fn is_active(&self, kind: PowerupKind) -> bool {
        self.remaining.contains_key(&kind)
    }

    /// Count every effect down by one tick, dropping expired ones.
    pub fn tick(&mut self) {
        self.remaining.retain(|_, ticks| {
            *ticks = ticks.saturating_sub(1);
            *ticks > 0
        });
    }

    pub fn list(&self) -> Vec<(PowerupKind, u32)> {
        self.remaining.iter().map(|(k, t)| (*k, *t)).collect()
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }
}

/// Spawn timer, collection, then effect countdown.
pub fn run<R: RandomSource + ?Sized>(
    world: &mut World,
    spawn_timer: &mut RandomInterval,
    effects: &mut PowerupEffects,
    player: &PlayerState,
    rng: &mut R,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) {
    let on_field = world
        .query::<&Pickup>()
        .iter()
        .filter(|(_, p)| !p.collected)
        .count();
    if spawn_timer.tick(on_field < config.powerups.max_active, rng) {
        let kind = world_setup::spawn_pickup(world, rng, config);
        debug!(?kind, "powerup spawned");
    }

    for (_entity, (pickup, pos, body)) in world.query_mut::<(&mut Pickup, &Position, &Body)>() {
        if pickup.collected {
            continue;
        }
        if player.position.overlaps(player.radius, pos, body.radius) {
            pickup.collected = true;
            effects.activate(pickup.kind, &config.powerups);
            events.push(GameEvent::PowerupCollected { kind: pickup.kind });
        }
    }

    effects.tick();
}
