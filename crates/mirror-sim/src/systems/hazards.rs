//! Arena hazards: spawning, motion and hit tests.

use hecs::World;
use tracing::debug;

use mirror_core::components::{Hazard, HazardShape};
use mirror_core::config::{ArenaConfig, GameConfig};
use mirror_core::events::GameEvent;
use mirror_core::types::Position;
use mirror_replay::random::RandomSource;

use crate::systems::spawner::RandomInterval;
use crate::world_setup;

/// Spawn on schedule, then advance every hazard and count down its life.
pub fn run<R: RandomSource + ?Sized>(
    world: &mut World,
    spawn_timer: &mut RandomInterval,
    rng: &mut R,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) {
    let active = world
        .query::<&Hazard>()
        .iter()
        .filter(|(_, h)| h.remaining_ticks > 0)
        .count();
    if spawn_timer.tick(active < config.hazards.max_active, rng) {
        let hazard = world_setup::random_hazard(rng, config);
        let kind = hazard.shape.kind();
        world_setup::spawn_hazard(world, hazard);
        debug!(?kind, "hazard spawned");
        events.push(GameEvent::HazardSpawned { kind });
    }

    for (_entity, hazard) in world.query_mut::<&mut Hazard>() {
        if hazard.remaining_ticks == 0 {
            continue;
        }
        hazard.remaining_ticks -= 1;
        advance_shape(&mut hazard.shape, &config.arena);
    }
}

fn advance_shape(shape: &mut HazardShape, arena: &ArenaConfig) {
    match shape {
        HazardShape::Wall {
            horizontal,
            offset,
            velocity,
            ..
        } => {
            *offset += *velocity;
            let limit = if *horizontal { arena.height } else { arena.width };
            if *offset < 0.0 || *offset > limit {
                *velocity = -*velocity;
            }
        }
        HazardShape::Laser {
            angle,
            angular_speed,
            ..
        } => {
            *angle += *angular_speed;
        }
        HazardShape::Zone { .. } => {}
    }
}

/// Does the circle at `pos` with radius `r` touch the hazard?
pub fn hits(shape: &HazardShape, pos: Position, r: f64) -> bool {
    match *shape {
        HazardShape::Wall {
            horizontal,
            offset,
            thickness,
            ..
        } => {
            let along = if horizontal { pos.y } else { pos.x };
            (along - offset).abs() < thickness / 2.0 + r
        }
        HazardShape::Laser {
            pivot,
            angle,
            length,
            width,
            ..
        } => {
            let a = pivot.as_vec();
            let d = glam::DVec2::new(angle.cos(), angle.sin()) * length;
            let len_sq = d.length_squared();
            if len_sq == 0.0 {
                return false;
            }
            let t = ((pos.as_vec() - a).dot(d) / len_sq).clamp(0.0, 1.0);
            let closest = a + d * t;
            pos.as_vec().distance(closest) < width + r
        }
        HazardShape::Zone { center, radius } => pos.distance_to(&center) < radius + r,
    }
}

/// Any live hazard touching the circle.
pub fn any_hits(world: &World, pos: Position, r: f64) -> bool {
    world
        .query::<&Hazard>()
        .iter()
        .any(|(_, h)| h.remaining_ticks > 0 && hits(&h.shape, pos, r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_hit_band() {
        let wall = HazardShape::Wall {
            horizontal: true,
            offset: 100.0,
            velocity: 2.0,
            thickness: 8.0,
        };
        assert!(hits(&wall, Position::new(400.0, 115.9), 12.0));
        assert!(!hits(&wall, Position::new(400.0, 116.0), 12.0));
    }

    #[test]
    fn test_wall_bounces_past_edge() {
        let arena = ArenaConfig::default();
        let mut wall = HazardShape::Wall {
            horizontal: true,
            offset: 0.0,
            velocity: -2.0,
            thickness: 8.0,
        };
        advance_shape(&mut wall, &arena);
        let HazardShape::Wall { offset, velocity, .. } = wall else {
            panic!("still a wall");
        };
        assert_eq!(offset, -2.0);
        assert_eq!(velocity, 2.0);
    }

    #[test]
    fn test_laser_segment_distance() {
        let laser = HazardShape::Laser {
            pivot: Position::new(200.0, 200.0),
            angle: 0.0,
            angular_speed: 0.02,
            length: 200.0,
            width: 3.0,
        };
        assert!(hits(&laser, Position::new(300.0, 210.0), 12.0));
        assert!(!hits(&laser, Position::new(300.0, 216.0), 12.0));
        // Beyond the far end: measured to the endpoint.
        assert!(!hits(&laser, Position::new(420.0, 200.0), 12.0));
        // Behind the pivot.
        assert!(hits(&laser, Position::new(190.0, 200.0), 12.0));
    }

    #[test]
    fn test_zone_strict_overlap() {
        let zone = HazardShape::Zone {
            center: Position::new(100.0, 100.0),
            radius: 50.0,
        };
        assert!(hits(&zone, Position::new(161.9, 100.0), 12.0));
        assert!(!hits(&zone, Position::new(162.0, 100.0), 12.0));
    }
}
