//! Playback of a saved replay log.

use std::time::Duration;

use tracing::info;

use mirror_sim::persistence::replay_log::{ReplayLog, ReplayPlayer};

use crate::game_loop::tick_duration;
use crate::state::Pacing;

/// Step through `log` at `speed`, one step per tick of `tick_rate`.
/// Logs the player position once per second of playback and returns the
/// number of frames shown.
pub fn run_playback(log: ReplayLog, speed: f64, tick_rate: u32, pacing: Pacing) -> usize {
    let mut player = ReplayPlayer::new(log);
    player.set_speed(speed);
    let total = player.total_secs(tick_rate);
    info!(speed = player.speed(), total_secs = total, "playing back");

    let step = match pacing {
        Pacing::Realtime => tick_duration(tick_rate),
        Pacing::Unthrottled => Duration::ZERO,
    };
    let mut shown = 0;
    let mut last_second = 0u64;
    while let Some(frame) = player.advance() {
        let (x, y, clones) = (frame.player_x, frame.player_y, frame.clones.len());
        shown += 1;
        let second = player.playback_secs(tick_rate) as u64;
        if second > last_second {
            last_second = second;
            info!(second, x, y, clones, "playback");
        }
        if !step.is_zero() {
            std::thread::sleep(step);
        }
    }
    info!(total_secs = total, shown, "playback finished");
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use mirror_core::types::Position;
    use mirror_sim::persistence::replay_log::ReplayFrame;

    fn log_of(len: usize) -> ReplayLog {
        let mut log = ReplayLog::default();
        for i in 0..len {
            log.record(ReplayFrame::new(
                Position::new(i as f64, 0.0),
                false,
                None,
                Vec::new(),
            ));
        }
        log
    }

    #[test]
    fn test_speed_skips_frames() {
        assert_eq!(run_playback(log_of(21), 2.0, 60, Pacing::Unthrottled), 10);
        assert_eq!(run_playback(log_of(21), 1.0, 60, Pacing::Unthrottled), 20);
        assert_eq!(run_playback(ReplayLog::default(), 1.0, 60, Pacing::Unthrottled), 0);
    }

    #[test]
    fn test_realtime_follows_configured_tick_rate() {
        let start = Instant::now();
        let shown = run_playback(log_of(10), 1.0, 100, Pacing::Realtime);
        assert_eq!(shown, 9);
        assert!(
            start.elapsed() >= tick_duration(100) * 9,
            "one 10ms step per frame at 100 Hz"
        );
    }
}
