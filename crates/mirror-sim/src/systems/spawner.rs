//! Replica spawning: the accelerating clone timer, the boss timer and
//! player-triggered echoes.

use hecs::World;
use tracing::{debug, info};

use mirror_core::config::GameConfig;
use mirror_core::enums::ReplicaKind;
use mirror_core::events::GameEvent;
use mirror_replay::ledger::Ledger;
use mirror_replay::policy::{
    self, BossTimer, DelayTable, EchoReservoir, SpawnPlan, SpawnRequest, SpawnTimer, VariantPolicy,
};
use mirror_replay::random::RandomSource;

use crate::world_setup;

/// Spawn schedule state for one run.
#[derive(Debug, Clone)]
pub struct SpawnDirector {
    pub timer: SpawnTimer,
    pub boss_timer: BossTimer,
    policy: VariantPolicy,
    delays: DelayTable,
    next_serial: u32,
}

impl SpawnDirector {
    /// `None` if a weight table sums to zero.
    pub fn from_config(config: &GameConfig) -> Option<Self> {
        Some(Self {
            timer: SpawnTimer::from_config(config),
            boss_timer: BossTimer::from_config(config),
            policy: VariantPolicy::from_config(config)?,
            delays: DelayTable::from_config(config),
            next_serial: 0,
        })
    }

    pub fn delays(&self) -> &DelayTable {
        &self.delays
    }

    fn take_serial(&mut self) -> u32 {
        let serial = self.next_serial;
        self.next_serial += 1;
        serial
    }

    /// Build the entity for an accepted plan and report it.
    pub fn spawn(
        &mut self,
        world: &mut World,
        plan: &SpawnPlan,
        ledger: &Ledger,
        config: &GameConfig,
        events: &mut Vec<GameEvent>,
    ) -> u32 {
        let serial = self.take_serial();
        world_setup::spawn_replica(world, plan, serial, ledger, config);
        events.push(GameEvent::ReplicaSpawned {
            serial,
            kind: plan.kind,
            variant: plan.variant,
            mutation: plan.mutation,
            start_tick: plan.start_tick,
        });
        serial
    }
}

/// Tick both timers and spawn whatever is due. `run_tick` is the tick
/// just recorded.
pub fn run<R: RandomSource + ?Sized>(
    world: &mut World,
    director: &mut SpawnDirector,
    ledger: &Ledger,
    rng: &mut R,
    config: &GameConfig,
    run_tick: u64,
    events: &mut Vec<GameEvent>,
) {
    if director.timer.tick() {
        let request = director.policy.draw(rng);
        match policy::try_spawn(ledger, &director.delays, request) {
            Ok(plan) => {
                let serial = director.spawn(world, &plan, ledger, config, events);
                debug!(
                    serial,
                    variant = ?plan.variant,
                    mutation = ?plan.mutation,
                    start_tick = plan.start_tick,
                    "clone spawned"
                );
            }
            Err(refusal) => {
                debug!(?refusal, "clone spawn refused");
                events.push(GameEvent::SpawnRefused {
                    kind: ReplicaKind::Clone,
                    refusal,
                });
            }
        }
    }

    if director.boss_timer.tick(run_tick) {
        match policy::try_spawn(ledger, &director.delays, SpawnRequest::Boss) {
            Ok(plan) => {
                let serial = director.spawn(world, &plan, ledger, config, events);
                info!(serial, tick = run_tick, "boss spawned");
            }
            Err(refusal) => {
                debug!(?refusal, "boss spawn refused");
                events.push(GameEvent::SpawnRefused {
                    kind: ReplicaKind::Boss,
                    refusal,
                });
            }
        }
    }
}

/// Handle a player echo request against the reservoir.
pub fn spawn_echo(
    world: &mut World,
    director: &mut SpawnDirector,
    reservoir: &mut EchoReservoir,
    ledger: &Ledger,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) {
    match reservoir.try_spawn(ledger, &director.delays) {
        Ok(plan) => {
            let serial = director.spawn(world, &plan, ledger, config, events);
            debug!(serial, start_tick = plan.start_tick, energy = reservoir.energy(), "echo spawned");
        }
        Err(refusal) => {
            debug!(?refusal, "echo refused");
            events.push(GameEvent::SpawnRefused {
                kind: ReplicaKind::Echo,
                refusal,
            });
        }
    }
}

/// Timer that fires after a random number of ticks in `[min, max]`, then
/// rolls a new target. It holds at the target while `room` is false.
#[derive(Debug, Clone)]
pub struct RandomInterval {
    min_ticks: u32,
    max_ticks: u32,
    elapsed: u32,
    next: u32,
}

impl RandomInterval {
    pub fn new<R: RandomSource + ?Sized>(min_ticks: u32, max_ticks: u32, rng: &mut R) -> Self {
        Self {
            min_ticks,
            max_ticks,
            elapsed: 0,
            next: rng.range_u32(min_ticks, max_ticks),
        }
    }

    /// Count one tick. Returns `true` when a spawn should happen now.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, room: bool, rng: &mut R) -> bool {
        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed < self.next || !room {
            return false;
        }
        self.elapsed = 0;
        self.next = rng.range_u32(self.min_ticks, self.max_ticks);
        true
    }

    pub fn target(&self) -> u32 {
        self.next
    }
}
