//! Scripted input source for headless runs.
//!
//! Reads the previous snapshot and produces this tick's commands: steer
//! away from replicas, hostile bullets and hazards while orbiting the arena
//! centre, shoot at the nearest replica, and dash through it when close.

use glam::DVec2;

use mirror_core::commands::{Aim, InputState, PlayerCommand};
use mirror_core::config::GameConfig;
use mirror_core::enums::{GamePhase, HazardKind, ProjectileOwner};
use mirror_core::state::GameStateSnapshot;

const REPLICA_AVOID_RADIUS: f64 = 200.0;
const BULLET_AVOID_RADIUS: f64 = 80.0;
const HAZARD_MARGIN: f64 = 60.0;
const DASH_TRIGGER_DISTANCE: f64 = 50.0;
const ORBIT_WEIGHT: f64 = 0.5;
const CENTERING_WEIGHT: f64 = 0.002;

#[derive(Debug, Clone)]
pub struct Autopilot {
    center: DVec2,
    laser_reach: f64,
}

impl Autopilot {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            center: DVec2::new(config.arena.width / 2.0, config.arena.height / 2.0),
            laser_reach: config.hazards.laser_length,
        }
    }

    /// Commands to queue before the next tick.
    pub fn commands(&self, snap: &GameStateSnapshot) -> Vec<PlayerCommand> {
        match snap.phase {
            GamePhase::Menu => vec![PlayerCommand::StartRun],
            GamePhase::ChoosingUpgrade => vec![PlayerCommand::ChooseUpgrade { index: 0 }],
            GamePhase::Active => {
                let mut commands = vec![PlayerCommand::SetInput {
                    input: self.input(snap),
                }];
                if snap.hud.echo_energy >= snap.hud.echo_max_energy {
                    commands.push(PlayerCommand::TriggerEcho);
                }
                commands
            }
            GamePhase::Paused | GamePhase::GameOver => Vec::new(),
        }
    }

    fn input(&self, snap: &GameStateSnapshot) -> InputState {
        let me = snap.player.position.as_vec();
        let nearest = snap
            .replicas
            .iter()
            .map(|r| (r.position.as_vec(), me.distance(r.position.as_vec())))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let fire = nearest.map(|(target, _)| Aim::Toward {
            x: target.x,
            y: target.y,
        });

        if let Some((target, dist)) = nearest {
            if dist < DASH_TRIGGER_DISTANCE && snap.hud.dash_cooldown_ticks == 0 {
                return InputState {
                    movement: target - me,
                    fire,
                    dash: true,
                };
            }
        }

        InputState {
            movement: self.steer(snap, me),
            fire,
            dash: false,
        }
    }

    fn steer(&self, snap: &GameStateSnapshot, me: DVec2) -> DVec2 {
        let rel = me - self.center;
        let mut steer = -rel * CENTERING_WEIGHT + rel.perp().normalize_or_zero() * ORBIT_WEIGHT;

        for replica in &snap.replicas {
            steer += repel(me, replica.position.as_vec(), REPLICA_AVOID_RADIUS) * 3.0;
        }
        for bullet in snap
            .projectiles
            .iter()
            .filter(|p| p.owner == ProjectileOwner::Replica)
        {
            steer += repel(me, bullet.position.as_vec(), BULLET_AVOID_RADIUS) * 2.0;
        }
        for hazard in &snap.hazards {
            let anchor = hazard.anchor.as_vec();
            steer += match hazard.kind {
                HazardKind::DangerZone => repel(me, anchor, hazard.extent + HAZARD_MARGIN) * 4.0,
                HazardKind::RotatingLaser => repel(me, anchor, self.laser_reach + HAZARD_MARGIN) * 4.0,
                HazardKind::MovingWall => {
                    let across = if hazard.horizontal {
                        DVec2::new(me.x, anchor.y)
                    } else {
                        DVec2::new(anchor.x, me.y)
                    };
                    repel(me, across, HAZARD_MARGIN) * 4.0
                }
            };
        }
        steer
    }
}

/// Push away from `from`, strongest at contact and zero at `radius`.
fn repel(me: DVec2, from: DVec2, radius: f64) -> DVec2 {
    let away = me - from;
    let dist = away.length();
    if dist >= radius || dist < f64::EPSILON {
        return DVec2::ZERO;
    }
    away / dist * (radius - dist) / radius
}
