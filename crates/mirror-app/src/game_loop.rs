//! Game loop thread: runs the simulation engine at its tick rate.
//!
//! The engine is built and validated by the caller, then moved into the
//! thread. Commands arrive via `mpsc` channel; the newest snapshot is kept in
//! shared state for polling. When a run ends the leaderboard and replay log
//! are written to the data directory and the thread returns a summary.

use std::path::Path;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use mirror_core::enums::{GamePhase, HitCause};
use mirror_core::events::GameEvent;
use mirror_core::state::GameStateSnapshot;
use mirror_sim::persistence::leaderboard::Leaderboard;
use mirror_sim::SimulationEngine;

use crate::autopilot::Autopilot;
use crate::state::{GameLoopCommand, LoopSettings, Pacing, RunSummary};

/// Wall-clock duration of one tick.
pub fn tick_duration(tick_rate: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(tick_rate.max(1)))
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and a handle that yields the run summary, or
/// `None` if the loop stopped before the run ended.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    settings: LoopSettings,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> (mpsc::Sender<GameLoopCommand>, JoinHandle<Option<RunSummary>>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("mirror-game-loop".into())
        .spawn(move || run_game_loop(engine, &settings, cmd_rx, &latest_snapshot))
        .expect("Failed to spawn game loop thread");

    (cmd_tx, handle)
}

/// Runs until game over, the tick limit, a Shutdown command or channel
/// disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    settings: &LoopSettings,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> Option<RunSummary> {
    let tick_rate = engine.config().tick_rate;
    let duration = tick_duration(tick_rate);
    let pilot = settings.autopilot.then(|| Autopilot::new(engine.config()));
    let mut previous: Option<GameStateSnapshot> = None;
    let mut iterations = 0u64;
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) => return None,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return None,
            }
        }

        // 2. Autopilot reacts to what it saw last tick
        if let (Some(pilot), Some(prev)) = (&pilot, &previous) {
            engine.queue_commands(pilot.commands(prev));
        }

        // 3. Advance one tick
        let snapshot = engine.tick();
        iterations += 1;

        if snapshot.phase == GamePhase::Active
            && snapshot.time.tick > 0
            && snapshot.time.tick % u64::from(tick_rate) == 0
        {
            info!(
                tick = snapshot.time.tick,
                score = snapshot.hud.score,
                level = snapshot.hud.level,
                clones = snapshot.hud.clone_count,
                bosses = snapshot.hud.boss_count,
                echo = snapshot.hud.echo_energy,
                "run status"
            );
        }

        let over = snapshot.events.iter().find_map(|e| match e {
            GameEvent::GameOver {
                cause,
                score,
                survival_ticks,
                level,
            } => Some((*cause, *score, *survival_ticks, *level)),
            _ => None,
        });

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }
        previous = Some(snapshot);

        if let Some((cause, score, survival_ticks, level)) = over {
            return Some(record_run(
                &engine,
                &settings.data_dir,
                cause,
                score,
                survival_ticks,
                level,
            ));
        }
        if settings.tick_limit.is_some_and(|limit| iterations >= limit) {
            info!(iterations, "tick limit reached");
            return None;
        }

        // 5. Sleep until next tick
        if settings.pacing == Pacing::Realtime {
            next_tick_time += duration;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > duration * 2 {
                // Too far behind, reset rather than spiral
                next_tick_time = now;
            }
        }
    }
}

/// Add the finished run to the leaderboard and save the replay log.
/// Write failures are logged; the summary is returned either way.
pub fn record_run(
    engine: &SimulationEngine,
    data_dir: &Path,
    cause: HitCause,
    score: u64,
    survival_ticks: u64,
    level: u32,
) -> RunSummary {
    let survival_secs = survival_ticks as f64 / f64::from(engine.config().tick_rate);

    let mut board = Leaderboard::load_or_default(data_dir, engine.config().leaderboard.size);
    let rank = board.add(score, survival_secs, level);
    if let Err(e) = board.save(data_dir) {
        warn!(error = %e, dir = %data_dir.display(), "failed to save leaderboard");
    }
    if let Err(e) = engine.replay_log().save(data_dir) {
        warn!(error = %e, dir = %data_dir.display(), "failed to save replay");
    }

    info!(score, survival_secs, level, ?cause, ?rank, "run over");
    RunSummary {
        score,
        survival_secs,
        level,
        cause,
        rank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_core::commands::PlayerCommand;
    use mirror_sim::persistence::replay_log::ReplayLog;
    use mirror_sim::SimConfig;
    use std::fs;

    fn engine() -> SimulationEngine {
        SimulationEngine::new(SimConfig::default()).unwrap()
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartRun))
            .unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Pause))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<_> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::PlayerCommand(PlayerCommand::StartRun)
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::PlayerCommand(PlayerCommand::Pause)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_tick_duration() {
        assert_eq!(tick_duration(60).as_nanos(), 1_000_000_000u128 / 60);
        assert_eq!(tick_duration(30).as_nanos(), 1_000_000_000u128 / 30);
    }

    #[test]
    fn test_snapshot_serialization_is_fast() {
        let mut engine = engine();
        engine.queue_command(PlayerCommand::StartRun);
        for _ in 0..50 {
            engine.tick();
        }

        let snapshot = engine.tick();
        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(10),
            "Snapshot serialization took {:?}",
            elapsed
        );
        assert!(!json.is_empty());
    }

    #[test]
    fn test_pause_resume_via_commands() {
        let mut engine = engine();

        engine.queue_command(PlayerCommand::StartRun);
        let snap = engine.tick();
        assert_eq!(snap.phase, GamePhase::Active);

        engine.queue_command(PlayerCommand::Pause);
        let snap = engine.tick();
        assert_eq!(snap.phase, GamePhase::Paused);
        let paused_tick = snap.time.tick;

        let snap = engine.tick();
        assert_eq!(snap.time.tick, paused_tick);

        engine.queue_command(PlayerCommand::Resume);
        let snap = engine.tick();
        assert_eq!(snap.phase, GamePhase::Active);
        assert!(snap.time.tick > paused_tick);
    }

    #[test]
    fn test_loop_stops_at_tick_limit() {
        let mut engine = engine();
        engine.queue_command(PlayerCommand::StartRun);
        let settings = LoopSettings {
            pacing: Pacing::Unthrottled,
            tick_limit: Some(10),
            data_dir: std::env::temp_dir().join("mirror_loop_limit_test"),
            autopilot: false,
        };
        let latest = Arc::new(Mutex::new(None));

        let (_tx, handle) = spawn_game_loop(engine, settings, Arc::clone(&latest));
        assert!(handle.join().unwrap().is_none());

        let snap = latest.lock().unwrap().clone().unwrap();
        assert_eq!(snap.phase, GamePhase::Active);
        assert_eq!(snap.time.tick, 10);
    }

    #[test]
    fn test_shutdown_stops_loop() {
        let settings = LoopSettings {
            pacing: Pacing::Realtime,
            autopilot: false,
            ..Default::default()
        };
        let (tx, handle) = spawn_game_loop(engine(), settings, Arc::new(Mutex::new(None)));
        tx.send(GameLoopCommand::Shutdown).unwrap();
        assert!(handle.join().unwrap().is_none());
    }

    #[test]
    fn test_record_run_writes_files() {
        let dir = std::env::temp_dir().join("mirror_record_run_test");
        let _ = fs::remove_dir_all(&dir);

        let mut engine = engine();
        engine.queue_command(PlayerCommand::StartRun);
        for _ in 0..30 {
            engine.tick();
        }

        let summary = record_run(&engine, &dir, HitCause::Contact, 1234, 90, 2);
        assert_eq!(summary.rank, Some(0));
        assert!((summary.survival_secs - 1.5).abs() < 1e-9);

        let board = Leaderboard::load(&dir, 10).unwrap();
        assert_eq!(board.entries()[0].score, 1234);
        assert_eq!(board.entries()[0].survival_seconds, 1.5);
        let replay = ReplayLog::load(&dir).unwrap();
        assert_eq!(replay.len(), engine.replay_log().len());

        let _ = fs::remove_dir_all(&dir);
    }
}
