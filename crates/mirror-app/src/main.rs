use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use tracing::info;

use mirror_app::game_loop::spawn_game_loop;
use mirror_app::playback::run_playback;
use mirror_app::state::{GameLoopCommand, LoopSettings, Pacing};
use mirror_core::commands::PlayerCommand;
use mirror_core::config::GameConfig;
use mirror_sim::persistence::leaderboard::Leaderboard;
use mirror_sim::persistence::replay_log::ReplayLog;
use mirror_sim::{SimConfig, SimulationEngine};

#[derive(Parser)]
#[command(name = "mirror")]
#[command(about = "Headless driver for Mirror Clone Survival")]
struct Cli {
    /// Directory holding the leaderboard and the last replay
    #[arg(long, default_value = "mirror-data")]
    data_dir: PathBuf,

    /// JSON game config (defaults apply to missing fields)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one run and record it
    Run {
        /// RNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,

        /// Tick as fast as possible instead of in real time
        #[arg(long)]
        unthrottled: bool,

        /// Leave the player standing still instead of using the autopilot
        #[arg(long)]
        idle: bool,
    },
    /// Play back the last recorded run
    Playback {
        /// Playback speed, 0.5 to 4 in half steps
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
    },
    /// Show the leaderboard
    Scores {
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let game = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    match cli.command {
        Commands::Run {
            seed,
            ticks,
            unthrottled,
            idle,
        } => {
            let engine = SimulationEngine::new(SimConfig { seed, game })?;
            let settings = LoopSettings {
                pacing: if unthrottled {
                    Pacing::Unthrottled
                } else {
                    Pacing::Realtime
                },
                tick_limit: ticks,
                data_dir: cli.data_dir,
                autopilot: !idle,
            };

            info!(seed, "starting run");
            let latest = Arc::new(Mutex::new(None));
            let (tx, handle) = spawn_game_loop(engine, settings, latest);
            tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartRun))?;

            let summary = handle.join().map_err(|_| "game loop thread panicked")?;
            match summary {
                Some(s) => info!(
                    score = s.score,
                    seconds = s.survival_secs,
                    level = s.level,
                    cause = ?s.cause,
                    rank = ?s.rank,
                    "final result"
                ),
                None => info!("run stopped before game over"),
            }
        }
        Commands::Playback { speed } => {
            let log = ReplayLog::load(&cli.data_dir)?;
            run_playback(log, speed, game.tick_rate, Pacing::Realtime);
        }
        Commands::Scores { top } => {
            let board = Leaderboard::load_or_default(&cli.data_dir, game.leaderboard.size.max(top));
            if board.entries().is_empty() {
                println!("no runs recorded");
            }
            for (i, entry) in board.top(top).iter().enumerate() {
                println!(
                    "{:>2}. {:>8}  {:>7.1}s  level {}",
                    i + 1,
                    entry.score,
                    entry.survival_seconds,
                    entry.level
                );
            }
        }
    }

    Ok(())
}
