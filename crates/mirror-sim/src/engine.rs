//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the history ledger and every
//! per-run manager. It processes player commands, runs all systems in a
//! fixed order, and produces `GameStateSnapshot`s. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use mirror_core::commands::{InputState, PlayerCommand};
use mirror_core::components::Replica;
use mirror_core::config::{ConfigError, GameConfig};
use mirror_core::enums::*;
use mirror_core::events::GameEvent;
use mirror_core::state::GameStateSnapshot;
use mirror_core::types::{Position, SimTime};
use mirror_replay::ledger::{Ledger, PendingFrame};
use mirror_replay::policy::EchoReservoir;
use mirror_replay::reader::ReaderParams;

use crate::armory::Armory;
use crate::persistence::replay_log::{ReplayCloneFrame, ReplayFrame, ReplayLog};
use crate::player::PlayerState;
use crate::progression::{Progression, ScoreState};
use crate::systems;
use crate::systems::collision::Kill;
use crate::systems::powerups::PowerupEffects;
use crate::systems::snapshot::RunView;
use crate::systems::spawner::{RandomInterval, SpawnDirector};
use crate::upgrades::UpgradeState;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed + same commands = same run.
    pub seed: u64,
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            game: GameConfig::default(),
        }
    }
}

/// Everything that belongs to a single run. Replaced wholesale on restart.
struct RunState {
    ledger: Ledger,
    pending: PendingFrame,
    player: PlayerState,
    input: InputState,
    armory: Armory,
    progression: Progression,
    score: ScoreState,
    effects: PowerupEffects,
    pickup_timer: RandomInterval,
    hazard_timer: RandomInterval,
    director: SpawnDirector,
    echo: EchoReservoir,
    upgrades: UpgradeState,
    replay_log: ReplayLog,
    slow_tick: bool,
}

impl RunState {
    fn new(config: &GameConfig, director: SpawnDirector, rng: &mut ChaCha8Rng) -> Self {
        Self {
            ledger: Ledger::new(config.history.retention_ticks),
            pending: PendingFrame::default(),
            player: PlayerState::new(config),
            input: InputState::default(),
            armory: Armory::new(config.weapons.clone()),
            progression: Progression::new(config.progression.clone(), config.tick_rate),
            score: ScoreState::default(),
            effects: PowerupEffects::default(),
            pickup_timer: RandomInterval::new(
                config.powerups.spawn_min_ticks,
                config.powerups.spawn_max_ticks,
                rng,
            ),
            hazard_timer: RandomInterval::new(
                config.hazards.spawn_min_ticks,
                config.hazards.spawn_max_ticks,
                rng,
            ),
            director,
            echo: EchoReservoir::from_config(config),
            upgrades: UpgradeState::default(),
            replay_log: ReplayLog::default(),
            slow_tick: false,
        }
    }

    /// Report a level change and any weapon it unlocks.
    fn on_level(&mut self, level: Option<u32>, events: &mut Vec<GameEvent>) {
        let Some(level) = level else {
            return;
        };
        info!(level, "level up");
        events.push(GameEvent::LevelUp { level });
        if let Some(weapon_id) = self.armory.check_unlocks(level) {
            events.push(GameEvent::WeaponEquipped { weapon_id });
        }
    }

    fn award_kills(&mut self, kills: &[Kill], config: &GameConfig, events: &mut Vec<GameEvent>) {
        for kill in kills {
            let level = match (kill.cause, kill.kind) {
                (HitCause::Hazard, _) => {
                    self.score.score += config.scoring.hazard_kill;
                    self.score.hazard_kills += 1;
                    None
                }
                (_, ReplicaKind::Boss) => {
                    self.score.score += config.scoring.boss_kill;
                    self.score.bosses_killed += 1;
                    self.progression
                        .grant_kill_xp(config.progression.boss_xp_multiplier)
                }
                _ => {
                    self.score.score += config.scoring.clone_kill;
                    self.score.clones_killed += 1;
                    self.progression.grant_kill_xp(1)
                }
            };
            self.on_level(level, events);
        }
    }

    fn apply_upgrade(&mut self, upgrade: UpgradeKind, config: &GameConfig) {
        let up = &config.upgrades;
        match upgrade {
            UpgradeKind::MovementSpeedBoost => self.player.speed_bonus += up.movement_speed_bonus,
            UpgradeKind::BulletSpeedBoost => self.player.bullet_speed_bonus += up.bullet_speed_bonus,
            UpgradeKind::DashCooldownReduction => self
                .player
                .reduce_dash_cooldown(up.dash_cooldown_reduction, config.dash.cooldown_floor_ticks),
            UpgradeKind::CloneSpawnDelay => self.director.timer.extend(up.clone_interval_ticks),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<GameEvent>,
    config: GameConfig,
    reader: ReaderParams,
    /// Pristine spawn schedule, cloned into each new run.
    director_template: SpawnDirector,
    run: RunState,
}

impl SimulationEngine {
    /// Create a new engine. The configuration is validated first.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let SimConfig { seed, game } = config;
        game.validate()?;
        let director_template =
            SpawnDirector::from_config(&game).ok_or_else(|| ConfigError::Invalid {
                field: "clones",
                reason: "variant and mutation weights must not sum to zero".to_string(),
            })?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let run = RunState::new(&game, director_template.clone(), &mut rng);
        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            reader: ReaderParams::from_config(&game),
            config: game,
            director_template,
            run,
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    ///
    /// Outside `Active` only commands are processed. The tick on which an
    /// upgrade offer opens does not simulate.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            if self.run.upgrades.tick(self.config.upgrades.interval_ticks) {
                self.open_upgrade_offer();
            } else {
                self.run_systems();
                self.time.advance(self.config.tick_rate);
            }
        }

        self.build_snapshot()
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn ledger(&self) -> &Ledger {
        &self.run.ledger
    }

    pub fn score(&self) -> &ScoreState {
        &self.run.score
    }

    pub fn level(&self) -> u32 {
        self.run.progression.level()
    }

    /// Presentation log of the current run, one frame per simulated tick.
    pub fn replay_log(&self) -> &ReplayLog {
        &self.run.replay_log
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn echo_energy(&self) -> f64 {
        self.run.echo.energy()
    }

    /// Spawn a replica directly from a plan, bypassing the timers.
    #[cfg(test)]
    pub fn spawn_test_replica(&mut self, plan: mirror_replay::policy::SpawnPlan) -> u32 {
        self.run
            .director
            .spawn(&mut self.world, &plan, &self.run.ledger, &self.config, &mut self.events)
    }

    #[cfg(test)]
    pub fn spawn_test_hazard(&mut self, hazard: mirror_core::components::Hazard) {
        world_setup::spawn_hazard(&mut self.world, hazard);
    }

    #[cfg(test)]
    pub fn force_effect(&mut self, kind: PowerupKind) {
        self.run.effects.activate(kind, &self.config.powerups);
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartRun => {
                if self.phase == GamePhase::Menu {
                    self.reset_run();
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::Restart => {
                if self.phase != GamePhase::Menu {
                    self.reset_run();
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SetInput { input } => {
                self.run.input = input;
            }
            PlayerCommand::TriggerEcho => {
                if self.phase == GamePhase::Active {
                    systems::spawner::spawn_echo(
                        &mut self.world,
                        &mut self.run.director,
                        &mut self.run.echo,
                        &self.run.ledger,
                        &self.config,
                        &mut self.events,
                    );
                }
            }
            PlayerCommand::ChooseUpgrade { index } => {
                if self.phase != GamePhase::ChoosingUpgrade {
                    return;
                }
                if let Some(upgrade) = self.run.upgrades.choose(index) {
                    self.run.apply_upgrade(upgrade, &self.config);
                    info!(?upgrade, "upgrade applied");
                    self.events.push(GameEvent::UpgradeApplied { upgrade });
                    self.phase = GamePhase::Active;
                }
            }
        }
    }

    /// Drop the world and every per-run manager. The RNG stream continues.
    fn reset_run(&mut self) {
        self.world.clear();
        self.time = SimTime::default();
        self.run = RunState::new(&self.config, self.director_template.clone(), &mut self.rng);
    }

    fn open_upgrade_offer(&mut self) {
        let choices = self
            .run
            .upgrades
            .make_offer(&mut self.rng, self.config.upgrades.choices);
        info!(?choices, tick = self.time.tick, "upgrade offered");
        self.events.push(GameEvent::UpgradeOffered { choices });
        self.phase = GamePhase::ChoosingUpgrade;
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let config = &self.config;
        let run = &mut self.run;

        // 1. Player movement and dash
        let boost = if run.effects.is_active(PowerupKind::SpeedBoost) {
            config.powerups.speed_boost_bonus
        } else {
            0.0
        };
        let speed = config.player.speed + run.progression.speed_bonus() + run.player.speed_bonus + boost;
        run.player.shielded = run.effects.is_active(PowerupKind::Shield);
        run.player.apply_input(&run.input, speed, config.player.speed_cap, &config.dash);
        run.player.update(&config.arena);

        // 2. Trigger
        let weapon = run.armory.current().clone();
        let fire_interval = if run.effects.is_active(PowerupKind::RapidFire) {
            (weapon.fire_interval_ticks / 2).max(1)
        } else {
            weapon.fire_interval_ticks
        };
        let shot = run.player.try_fire(run.input.fire, fire_interval);
        if let Some(direction) = shot {
            run.pending.record_shot(direction, weapon.id);
        }

        // 3. Echo energy
        run.echo.regenerate();

        // 4. Ledger append (single writer)
        run.pending.set_dashing(run.player.dashing);
        run.pending.set_weapon(weapon.id);
        let run_tick = run.pending.commit(run.player.position, &mut run.ledger);
        debug_assert_eq!(run_tick, self.time.tick, "ledger and clock out of step");

        // 5. Player bullets
        if let Some(direction) = shot {
            let bullet_speed = weapon.bullet_speed
                + run.progression.bullet_speed_bonus()
                + run.player.bullet_speed_bonus;
            world_setup::spawn_projectiles(
                &mut self.world,
                run.player.position,
                &weapon.fire_directions(direction),
                bullet_speed,
                ProjectileOwner::Player,
                config,
            );
        }

        // 6. Clone and boss spawning
        systems::spawner::run(
            &mut self.world,
            &mut run.director,
            &run.ledger,
            &mut self.rng,
            config,
            run_tick,
            &mut self.events,
        );

        // 7. Replica replay (every other tick under slow motion)
        let frozen = if run.effects.is_active(PowerupKind::SlowMotion) {
            run.slow_tick = !run.slow_tick;
            run.slow_tick
        } else {
            false
        };
        systems::replicas::run(
            &mut self.world,
            &run.ledger,
            &self.reader,
            &run.armory,
            &mut self.rng,
            config,
            frozen,
        );

        // 8. Projectile movement
        systems::projectiles::run(&mut self.world, &config.arena);

        // 9. Powerups
        systems::powerups::run(
            &mut self.world,
            &mut run.pickup_timer,
            &mut run.effects,
            &run.player,
            &mut self.rng,
            config,
            &mut self.events,
        );

        // 10. Hazards
        systems::hazards::run(
            &mut self.world,
            &mut run.hazard_timer,
            &mut self.rng,
            config,
            &mut self.events,
        );

        // 11. Collisions
        let report = systems::collision::run(&mut self.world, &run.player, &mut self.events);
        run.award_kills(&report.kills, config, &mut self.events);
        if let Some(cause) = report.game_over {
            self.phase = GamePhase::GameOver;
            // The fatal tick is not counted as survived.
            let survival_ticks = run_tick;
            info!(
                ?cause,
                score = run.score.score,
                survival_ticks,
                level = run.progression.level(),
                "game over"
            );
            self.events.push(GameEvent::GameOver {
                cause,
                score: run.score.score,
                survival_ticks,
                level: run.progression.level(),
            });
        }

        // 12. Bookkeeping
        if self.phase == GamePhase::Active {
            let level = run.progression.grant_survival_tick();
            run.on_level(level, &mut self.events);
            run.score.score += config.scoring.per_tick;
        }
        run.replay_log
            .record(replay_frame(&self.world, &run.player, shot));

        // 13. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    fn build_snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        let run = &self.run;
        let view = RunView {
            time: self.time,
            phase: self.phase,
            player: &run.player,
            weapon_id: run.armory.current_id(),
            ledger: &run.ledger,
            config: &self.config,
            progression: &run.progression,
            score: &run.score,
            echo: &run.echo,
            effects: &run.effects,
            upgrade_offer: run.upgrades.offer(),
        };
        systems::snapshot::build_snapshot(&self.world, &view, events)
    }
}

/// One replay-log frame: the player plus every living clone and echo by
/// serial. Bosses are not logged.
fn replay_frame(world: &World, player: &PlayerState, shot: Option<glam::DVec2>) -> ReplayFrame {
    let mut clones: Vec<(u32, ReplayCloneFrame)> = world
        .query::<(&Replica, &Position)>()
        .iter()
        .filter(|(_, (r, _))| r.alive && r.kind != ReplicaKind::Boss)
        .map(|(_, (r, pos))| {
            (
                r.serial,
                ReplayCloneFrame {
                    x: (pos.x * 10.0).round() / 10.0,
                    y: (pos.y * 10.0).round() / 10.0,
                    variant: r.variant,
                },
            )
        })
        .collect();
    clones.sort_by_key(|(serial, _)| *serial);
    ReplayFrame::new(
        player.position,
        player.dashing,
        shot,
        clones.into_iter().map(|(_, c)| c).collect(),
    )
}
