//! Spawn policy: history preconditions, variant selection, timers and
//! the echo energy reservoir.

use mirror_core::config::GameConfig;
use mirror_core::enums::{CloneVariant, Mutation, ReplicaKind, SpawnRefusal};

use crate::ledger::Ledger;
use crate::random::{RandomSource, WeightedTable};

/// What the caller wants spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnRequest {
    Clone {
        variant: CloneVariant,
        mutation: Mutation,
    },
    Boss,
    Echo,
}

/// An accepted spawn. The caller builds the entity from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnPlan {
    pub kind: ReplicaKind,
    pub variant: CloneVariant,
    pub mutation: Mutation,
    pub start_tick: u64,
}

/// History lag per request kind.
#[derive(Debug, Clone, Copy)]
pub struct DelayTable {
    pub clone: u64,
    pub delayed: u64,
    pub echo: u64,
}

impl DelayTable {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            clone: config.clones.delay_ticks,
            delayed: config.clones.delayed_delay_ticks,
            echo: config.echo.delay_ticks,
        }
    }

    pub fn delay_for(&self, request: SpawnRequest) -> u64 {
        match request {
            SpawnRequest::Clone {
                variant: CloneVariant::Delayed,
                ..
            } => self.delayed,
            SpawnRequest::Clone { .. } | SpawnRequest::Boss => self.clone,
            SpawnRequest::Echo => self.echo,
        }
    }
}

/// Check the history precondition (`current_tick > delay`) and plan the spawn.
pub fn try_spawn(
    ledger: &Ledger,
    delays: &DelayTable,
    request: SpawnRequest,
) -> Result<SpawnPlan, SpawnRefusal> {
    let delay = delays.delay_for(request);
    let current_tick = ledger.current_tick();
    if current_tick <= delay {
        return Err(SpawnRefusal::InsufficientHistory {
            current_tick,
            delay,
        });
    }

    let (kind, variant, mutation) = match request {
        SpawnRequest::Clone { variant, mutation } => (ReplicaKind::Clone, variant, mutation),
        SpawnRequest::Boss => (ReplicaKind::Boss, CloneVariant::Normal, Mutation::Normal),
        SpawnRequest::Echo => (ReplicaKind::Echo, CloneVariant::Normal, Mutation::Normal),
    };
    Ok(SpawnPlan {
        kind,
        variant,
        mutation,
        start_tick: current_tick - delay,
    })
}

/// Independent weighted draws for variant and mutation.
#[derive(Debug, Clone)]
pub struct VariantPolicy {
    variants: WeightedTable<CloneVariant>,
    mutations: WeightedTable<Mutation>,
}

impl VariantPolicy {
    /// `None` if either weight table sums to zero.
    pub fn from_config(config: &GameConfig) -> Option<Self> {
        Some(Self {
            variants: WeightedTable::new(&config.clones.variant_weights.entries())?,
            mutations: WeightedTable::new(&config.clones.mutation_weights.entries())?,
        })
    }

    pub fn draw<R: RandomSource + ?Sized>(&self, rng: &mut R) -> SpawnRequest {
        let variant = self.variants.pick(rng);
        let mutation = self.mutations.pick(rng);
        SpawnRequest::Clone { variant, mutation }
    }
}

/// Accelerating timer for regular clone spawns.
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    interval: f64,
    min_interval: f64,
    acceleration: f64,
    ticks_since_spawn: u32,
}

impl SpawnTimer {
    pub fn new(interval: u32, min_interval: u32, acceleration: f64) -> Self {
        Self {
            interval: interval as f64,
            min_interval: min_interval as f64,
            acceleration,
            ticks_since_spawn: 0,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.clones.spawn_interval_ticks,
            config.clones.min_spawn_interval_ticks,
            config.clones.spawn_acceleration,
        )
    }

    /// Count one tick. Returns `true` when a spawn attempt is due; the timer
    /// resets and accelerates whether or not that attempt succeeds.
    pub fn tick(&mut self) -> bool {
        self.ticks_since_spawn += 1;
        if (self.ticks_since_spawn as f64) < self.interval.floor() {
            return false;
        }
        self.ticks_since_spawn = 0;
        self.interval = (self.interval * self.acceleration).max(self.min_interval);
        true
    }

    /// Current interval in whole ticks.
    pub fn interval(&self) -> u32 {
        self.interval.floor() as u32
    }

    /// Lengthen the interval (upgrade).
    pub fn extend(&mut self, ticks: u32) {
        self.interval += ticks as f64;
    }
}

/// Periodic boss timer with a first-spawn floor.
#[derive(Debug, Clone)]
pub struct BossTimer {
    first_tick: u64,
    interval: u64,
    ticks_since_spawn: u64,
}

impl BossTimer {
    pub fn new(first_tick: u64, interval: u64) -> Self {
        Self {
            first_tick,
            interval,
            ticks_since_spawn: 0,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.boss.first_tick, config.boss.interval_ticks)
    }

    /// Count one tick of the run (`run_tick` is the tick being simulated).
    /// Returns `true` when a boss spawn attempt is due.
    pub fn tick(&mut self, run_tick: u64) -> bool {
        self.ticks_since_spawn += 1;
        if run_tick < self.first_tick || self.ticks_since_spawn < self.interval {
            return false;
        }
        self.ticks_since_spawn = 0;
        true
    }
}

/// Echo energy pool. Regenerates every tick; debited only on a successful spawn.
#[derive(Debug, Clone)]
pub struct EchoReservoir {
    energy: f64,
    max_energy: f64,
    cost: f64,
    regen_per_tick: f64,
}

/// Tolerance for accumulated regeneration rounding.
const ENERGY_EPSILON: f64 = 1e-9;

impl EchoReservoir {
    pub fn new(initial: f64, max_energy: f64, cost: f64, regen_per_tick: f64) -> Self {
        Self {
            energy: initial.clamp(0.0, max_energy),
            max_energy,
            cost,
            regen_per_tick,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let echo = &config.echo;
        Self::new(
            echo.initial_energy.unwrap_or(echo.max_energy),
            echo.max_energy,
            echo.cost,
            config.echo_regen_per_tick(),
        )
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn max_energy(&self) -> f64 {
        self.max_energy
    }

    pub fn regenerate(&mut self) {
        self.energy = (self.energy + self.regen_per_tick).min(self.max_energy);
    }

    pub fn can_afford(&self) -> bool {
        self.energy + ENERGY_EPSILON >= self.cost
    }

    /// Plan an echo spawn. Energy is checked first, then history; the
    /// reservoir is only debited when both pass.
    pub fn try_spawn(
        &mut self,
        ledger: &Ledger,
        delays: &DelayTable,
    ) -> Result<SpawnPlan, SpawnRefusal> {
        if !self.can_afford() {
            return Err(SpawnRefusal::InsufficientEnergy {
                energy: self.energy,
                cost: self.cost,
            });
        }
        let plan = try_spawn(ledger, delays, SpawnRequest::Echo)?;
        self.energy = (self.energy - self.cost).max(0.0);
        Ok(plan)
    }
}
