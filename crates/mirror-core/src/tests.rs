#[cfg(test)]
mod tests {
    use crate::commands::{Aim, InputState, PlayerCommand};
    use crate::components::{Health, HitResult};
    use crate::config::{ConfigError, GameConfig};
    use crate::enums::*;
    use crate::events::GameEvent;
    use crate::state::GameStateSnapshot;
    use crate::types::{Position, SimTime};
    use glam::DVec2;

    #[test]
    fn test_default_config_validates() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok(), "stock tuning must be valid");
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.clones.delay_ticks, 300);
        assert_eq!(config.boss.first_tick, 3600);
        assert_eq!(config.weapons.len(), 4);
    }

    #[test]
    fn test_partial_json_overrides_only_named_fields() {
        let config = GameConfig::from_json_str(
            r#"{ "echo": { "cost": 40.0 }, "clones": { "unstable_jitter": 1.5 } }"#,
        )
        .unwrap();
        assert_eq!(config.echo.cost, 40.0);
        assert_eq!(config.echo.max_energy, 100.0, "sibling fields keep defaults");
        assert_eq!(config.clones.unstable_jitter, 1.5);
        assert_eq!(config.clones.delay_ticks, 300);
        assert_eq!(config.arena.width, 800.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = GameConfig::from_json_str(r#"{ "boss": { "replay_rate": 0.0 } }"#)
            .expect_err("zero replay rate must be rejected");
        assert!(matches!(err, ConfigError::Invalid { field: "boss.replay_rate", .. }));

        let err = GameConfig::from_json_str(r#"{ "history": { "retention_ticks": 100 } }"#)
            .expect_err("retention shorter than a delay must be rejected");
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = GameConfig::from_json_str("{ not json").expect_err("garbage must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overflowing_weights_rejected() {
        let mut config = GameConfig::default();
        config.clones.variant_weights.normal = u32::MAX;
        config.clones.variant_weights.fast = 1;
        let err = config.validate().expect_err("overflowing variant weights must be rejected");
        assert!(matches!(err, ConfigError::Invalid { field: "clones.variant_weights", .. }));

        let mut config = GameConfig::default();
        config.clones.mutation_weights.mirror = u32::MAX;
        let err = config.validate().expect_err("overflowing mutation weights must be rejected");
        assert!(matches!(err, ConfigError::Invalid { field: "clones.mutation_weights", .. }));
    }

    #[test]
    fn test_echo_regen_per_tick() {
        let config = GameConfig::default();
        assert!((config.echo_regen_per_tick() - 10.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_health_take_hit() {
        let mut hp = Health::new(2);
        assert_eq!(hp.take_hit(), HitResult::Damaged { remaining: 1 });
        assert!((hp.fraction() - 0.5).abs() < 1e-12);
        assert_eq!(hp.take_hit(), HitResult::Killed);
        assert_eq!(hp.take_hit(), HitResult::Killed, "dead stays dead");
    }

    #[test]
    fn test_position_overlap_is_strict() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(24.0, 0.0);
        assert!(!a.overlaps(12.0, &b, 12.0), "touching circles do not overlap");
        let c = Position::new(23.9, 0.0);
        assert!(a.overlaps(12.0, &c, 12.0));
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        for _ in 0..60 {
            t.advance(60);
        }
        assert_eq!(t.tick, 60);
        assert!((t.elapsed_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_command_serde_tags() {
        let cmd = PlayerCommand::SetInput {
            input: InputState {
                movement: DVec2::new(1.0, 0.0),
                fire: Some(Aim::Toward { x: 10.0, y: 20.0 }),
                dash: true,
            },
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains(r#""type":"SetInput""#));
        let back: PlayerCommand = serde_json::from_str(&json).unwrap();
        match back {
            PlayerCommand::SetInput { input } => {
                assert!(input.dash);
                assert_eq!(input.fire, Some(Aim::Toward { x: 10.0, y: 20.0 }));
            }
            other => panic!("unexpected command {other:?}"),
        }

        let choose: PlayerCommand =
            serde_json::from_str(r#"{"type":"ChooseUpgrade","index":2}"#).unwrap();
        assert!(matches!(choose, PlayerCommand::ChooseUpgrade { index: 2 }));
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&Mutation::Unstable).unwrap(), r#""unstable""#);
        assert_eq!(serde_json::to_string(&CloneVariant::Shooter).unwrap(), r#""shooter""#);
        assert_eq!(serde_json::to_string(&PowerupKind::SlowMotion).unwrap(), r#""slow_motion""#);
    }

    #[test]
    fn test_refusal_event_serializes() {
        let event = GameEvent::SpawnRefused {
            kind: ReplicaKind::Echo,
            refusal: SpawnRefusal::InsufficientEnergy {
                energy: 10.0,
                cost: 25.0,
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn test_snapshot_default_serializes() {
        let snap = GameStateSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, GamePhase::Menu);
        assert!(back.replicas.is_empty());
        assert!(back.upgrade_offer.is_none());
    }
}
