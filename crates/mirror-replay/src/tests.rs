#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use glam::DVec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use mirror_core::config::GameConfig;
    use mirror_core::enums::{CloneVariant, Mutation, ReplicaKind, SpawnRefusal};
    use mirror_core::types::Position;

    use crate::cursor::ReplayCursor;
    use crate::ledger::{FrameRecord, Ledger, LedgerError, PendingFrame, ShotRecord, SlotState};
    use crate::policy::{
        try_spawn, BossTimer, DelayTable, EchoReservoir, SpawnRequest, SpawnTimer, VariantPolicy,
    };
    use crate::random::{RandomSource, ScriptedSource, WeightedTable};
    use crate::reader::{read_tick, steps_per_tick, transform_position, ReaderParams};

    fn frame(x: f64, y: f64) -> FrameRecord {
        FrameRecord {
            position: Position::new(x, y),
            shot: None,
            dashing: false,
            weapon_id: 0,
        }
    }

    /// Ledger with `n` ticks where tick t sits at (t, 2t).
    fn filled_ledger(n: u64) -> Ledger {
        let mut ledger = Ledger::new(10_000);
        for t in 0..n {
            ledger.append(frame(t as f64, 2.0 * t as f64));
        }
        ledger
    }

    fn delays() -> DelayTable {
        DelayTable::from_config(&GameConfig::default())
    }

    // --- Ledger ---

    #[test]
    fn test_query_returns_recorded_state() {
        let mut ledger = Ledger::new(10_000);
        for t in 0..200u64 {
            let record = FrameRecord {
                position: Position::new(t as f64 * 0.5, 600.0 - t as f64),
                shot: (t % 7 == 0).then_some(ShotRecord {
                    direction: DVec2::Y,
                    weapon_id: (t % 4) as u8,
                }),
                dashing: t % 3 == 0,
                weapon_id: (t % 4) as u8,
            };
            let written = ledger.append(record);
            assert_eq!(written, t, "append writes at current_tick");
            assert_eq!(ledger.query(t), Some(&record), "tick {t} reads back what was written");
        }
        assert_eq!(ledger.current_tick(), 200);
    }

    #[test]
    fn test_future_ticks_unavailable() {
        let ledger = filled_ledger(10);
        assert!(ledger.query(10).is_none());
        assert!(ledger.query(1_000).is_none());
        assert_eq!(ledger.slot_state(10), SlotState::Unwritten);
        assert_eq!(ledger.slot_state(9), SlotState::Recorded);
    }

    #[test]
    fn test_evicted_ticks_tombstoned() {
        let mut ledger = Ledger::new(10);
        for t in 0..25 {
            ledger.append(frame(t as f64, 0.0));
        }
        assert_eq!(ledger.evicted_below(), 15);
        assert_eq!(ledger.live_len(), 10, "memory bounded by retention");
        assert!(ledger.query(14).is_none(), "evicted tick is unavailable");
        assert_eq!(ledger.slot_state(14), SlotState::Tombstoned);
        assert_eq!(ledger.query(15).map(|r| r.position.x), Some(15.0), "indices never shift");
        assert_eq!(ledger.query(24).map(|r| r.position.x), Some(24.0));
    }

    #[test]
    fn test_record_rejects_wrong_index() {
        let mut ledger = filled_ledger(5);
        assert_eq!(
            ledger.record(7, frame(0.0, 0.0)),
            Err(LedgerError::OutOfOrder {
                expected: 5,
                got: 7
            })
        );
        assert_eq!(
            ledger.record(4, frame(0.0, 0.0)),
            Err(LedgerError::OutOfOrder {
                expected: 5,
                got: 4
            })
        );
        assert_eq!(ledger.current_tick(), 5, "failed record leaves ledger untouched");
        assert!(ledger.record(5, frame(1.0, 1.0)).is_ok());
        assert_eq!(ledger.current_tick(), 6);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut ledger = filled_ledger(50);
        ledger.reset();
        assert_eq!(ledger.current_tick(), 0);
        assert!(ledger.query(0).is_none());
        assert_eq!(ledger.append(frame(1.0, 1.0)), 0);
    }

    #[test]
    fn test_pending_frame_sticky_fields_and_shot_reset() {
        let mut ledger = Ledger::new(100);
        let mut pending = PendingFrame::default();
        pending.set_dashing(true);
        pending.set_weapon(2);
        pending.record_shot(DVec2::X, 2);
        pending.commit(Position::new(1.0, 1.0), &mut ledger);
        assert!(!pending.has_shot(), "commit consumes the shot");

        pending.commit(Position::new(2.0, 2.0), &mut ledger);

        let first = ledger.query(0).unwrap();
        let second = ledger.query(1).unwrap();
        assert_eq!(first.shot.map(|s| s.weapon_id), Some(2));
        assert!(second.shot.is_none(), "shot must not leak into the next record");
        assert!(second.dashing, "dashing carries forward");
        assert_eq!(second.weapon_id, 2, "weapon carries forward");

        pending.set_dashing(false);
        pending.commit(Position::new(3.0, 3.0), &mut ledger);
        assert!(!ledger.query(2).unwrap().dashing);
    }

    // --- Cursor ---

    #[test]
    fn test_cursor_unit_rate_tracks_ticks() {
        let ledger = filled_ledger(200);
        let mut cursor = ReplayCursor::new(5);
        for _ in 0..40 {
            assert_eq!(cursor.advance(&ledger, 1.0, |_| {}), 1);
        }
        assert_eq!(cursor.current_tick, 45);
        assert_eq!(cursor.consumed(), 40);
    }

    #[test]
    fn test_cursor_fractional_rate() {
        let ledger = filled_ledger(200);
        let mut cursor = ReplayCursor::new(0);
        let first = cursor.advance(&ledger, 1.5, |_| {});
        let second = cursor.advance(&ledger, 1.5, |_| {});
        assert_eq!((first, second), (1, 2));
        assert_eq!(first + second, 3, "two ticks at 1.5x consume exactly three");
        assert!(cursor.accumulator().abs() < 1e-12, "no drift left over");

        let mut total = 0;
        for _ in 0..100 {
            total += cursor.advance(&ledger, 1.5, |_| {});
        }
        assert_eq!(total, 150);
    }

    #[test]
    fn test_cursor_stalls_at_write_head() {
        let mut ledger = filled_ledger(10);
        let mut cursor = ReplayCursor::new(8);
        let mut seen = Vec::new();
        let consumed = cursor.advance(&ledger, 4.0, |r| seen.push(r.position.x));
        assert_eq!(consumed, 2, "stops at the first unavailable slot");
        assert_eq!(seen, vec![8.0, 9.0]);
        assert_eq!(cursor.current_tick, 10, "cursor holds at the unavailable slot");

        assert_eq!(cursor.advance(&ledger, 1.0, |_| {}), 0);

        ledger.append(frame(10.0, 0.0));
        ledger.append(frame(11.0, 0.0));
        assert_eq!(
            cursor.advance(&ledger, 1.0, |_| {}),
            1,
            "dropped steps are not replayed later"
        );
    }

    #[test]
    fn test_cursor_stalls_on_tombstone() {
        let mut ledger = Ledger::new(10);
        for t in 0..30 {
            ledger.append(frame(t as f64, 0.0));
        }
        let mut cursor = ReplayCursor::new(3);
        assert_eq!(cursor.advance(&ledger, 1.0, |_| {}), 0);
        assert_eq!(cursor.current_tick, 3);
    }

    // --- Reader ---

    #[test]
    fn test_mirror_reflects_x() {
        let params = ReaderParams::default();
        let mut rng = ScriptedSource::new(vec![]);
        let out = transform_position(&params, Mutation::Mirror, Position::new(100.0, 50.0), &mut rng);
        assert_eq!(out, Position::new(700.0, 50.0));
        assert_eq!(rng.draws(), 0, "mirror draws nothing");
    }

    #[test]
    fn test_mirror_negates_shot_x() {
        let mut ledger = Ledger::new(100);
        ledger.append(FrameRecord {
            position: Position::new(100.0, 10.0),
            shot: Some(ShotRecord {
                direction: DVec2::new(0.6, 0.8),
                weapon_id: 1,
            }),
            dashing: false,
            weapon_id: 1,
        });
        let mut cursor = ReplayCursor::new(0);
        let mut rng = ScriptedSource::new(vec![0.99]);
        let out = read_tick(
            &ledger,
            &mut cursor,
            ReplicaKind::Clone,
            CloneVariant::Normal,
            Mutation::Mirror,
            &ReaderParams::default(),
            &mut rng,
        );
        assert_eq!(out.position, Some(Position::new(700.0, 10.0)));
        let shot = out.shot.expect("recorded shot replays");
        assert_eq!(shot.direction, DVec2::new(-0.6, 0.8));
        assert_eq!(shot.weapon_id, 1);
        assert!(!shot.autonomous);
    }

    #[test]
    fn test_unstable_jitter_within_bounds() {
        let params = ReaderParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let raw = Position::new(400.0, 300.0);
        let mut distinct = HashSet::new();
        for _ in 0..2_000 {
            let out = transform_position(&params, Mutation::Unstable, raw, &mut rng);
            let (dx, dy) = (out.x - raw.x, out.y - raw.y);
            assert!(dx.abs() <= params.unstable_jitter, "dx {dx} out of bounds");
            assert!(dy.abs() <= params.unstable_jitter, "dy {dy} out of bounds");
            distinct.insert((out.x.to_bits(), out.y.to_bits()));
        }
        assert!(distinct.len() > 1_900, "offsets are re-rolled every time");
    }

    #[test]
    fn test_unstable_draws_per_consumed_step() {
        let ledger = filled_ledger(20);
        let mut cursor = ReplayCursor::new(0);
        let mut rng = ScriptedSource::new(vec![0.5]);
        read_tick(
            &ledger,
            &mut cursor,
            ReplicaKind::Clone,
            CloneVariant::Fast,
            Mutation::Unstable,
            &ReaderParams::default(),
            &mut rng,
        );
        assert_eq!(rng.draws(), 4, "two axes for each of two consumed steps");
    }

    #[test]
    fn test_fast_variant_beats_fast_mutation() {
        let params = ReaderParams {
            fast_variant_steps: 3,
            fast_mutation_steps: 2,
            ..ReaderParams::default()
        };
        assert_eq!(steps_per_tick(&params, CloneVariant::Fast, Mutation::Fast), 3, "no stacking");
        assert_eq!(steps_per_tick(&params, CloneVariant::Fast, Mutation::Normal), 3);
        assert_eq!(steps_per_tick(&params, CloneVariant::Normal, Mutation::Fast), 2);
        assert_eq!(steps_per_tick(&params, CloneVariant::Delayed, Mutation::Mirror), 1);
    }

    #[test]
    fn test_last_shot_wins() {
        let mut ledger = Ledger::new(100);
        for dir in [DVec2::X, DVec2::Y] {
            ledger.append(FrameRecord {
                position: Position::new(0.0, 0.0),
                shot: Some(ShotRecord {
                    direction: dir,
                    weapon_id: 0,
                }),
                dashing: false,
                weapon_id: 0,
            });
        }
        let mut cursor = ReplayCursor::new(0);
        let mut rng = ScriptedSource::new(vec![0.5]);
        let out = read_tick(
            &ledger,
            &mut cursor,
            ReplicaKind::Clone,
            CloneVariant::Fast,
            Mutation::Normal,
            &ReaderParams::default(),
            &mut rng,
        );
        assert_eq!(out.consumed, 2);
        assert_eq!(out.shot.map(|s| s.direction), Some(DVec2::Y));
    }

    #[test]
    fn test_shooter_fires_only_without_recorded_shot() {
        let params = ReaderParams::default();

        // No recorded shot: a roll under the chance fires along +x with weapon 0.
        let ledger = filled_ledger(5);
        let mut cursor = ReplayCursor::new(0);
        let mut rng = ScriptedSource::new(vec![0.01]);
        let out = read_tick(&ledger, &mut cursor, ReplicaKind::Clone, CloneVariant::Shooter, Mutation::Normal, &params, &mut rng);
        let shot = out.shot.expect("low roll fires");
        assert!(shot.autonomous);
        assert_eq!(shot.direction, DVec2::X);
        assert_eq!(shot.weapon_id, 0);

        // High roll: no shot.
        let mut rng = ScriptedSource::new(vec![0.5]);
        let out = read_tick(&ledger, &mut cursor, ReplicaKind::Clone, CloneVariant::Shooter, Mutation::Normal, &params, &mut rng);
        assert!(out.shot.is_none());

        // Recorded shot consumed: no roll at all.
        let mut ledger = Ledger::new(100);
        ledger.append(FrameRecord {
            position: Position::new(0.0, 0.0),
            shot: Some(ShotRecord {
                direction: DVec2::NEG_Y,
                weapon_id: 3,
            }),
            dashing: false,
            weapon_id: 3,
        });
        let mut cursor = ReplayCursor::new(0);
        let mut rng = ScriptedSource::new(vec![0.01]);
        let out = read_tick(&ledger, &mut cursor, ReplicaKind::Clone, CloneVariant::Shooter, Mutation::Normal, &params, &mut rng);
        assert_eq!(rng.draws(), 0, "no autonomous roll after a replayed shot");
        let shot = out.shot.expect("replayed shot");
        assert!(!shot.autonomous);
        assert_eq!(shot.weapon_id, 3);
    }

    #[test]
    fn test_shooter_rolls_while_stalled() {
        let ledger = filled_ledger(3);
        let mut cursor = ReplayCursor::new(3);
        let mut rng = ScriptedSource::new(vec![0.0]);
        let out = read_tick(
            &ledger,
            &mut cursor,
            ReplicaKind::Clone,
            CloneVariant::Shooter,
            Mutation::Normal,
            &ReaderParams::default(),
            &mut rng,
        );
        assert_eq!(out.consumed, 0);
        assert!(out.position.is_none(), "stalled entity holds its last state");
        assert!(out.shot.map(|s| s.autonomous).unwrap_or(false));
    }

    #[test]
    fn test_boss_and_echo_ignore_clone_traits() {
        let ledger = filled_ledger(100);
        let params = ReaderParams::default();
        let mut rng = ScriptedSource::new(vec![0.0]);

        let mut boss = ReplayCursor::new(0);
        let per_tick: Vec<u32> = (0..4)
            .map(|_| {
                read_tick(&ledger, &mut boss, ReplicaKind::Boss, CloneVariant::Shooter, Mutation::Mirror, &params, &mut rng)
                    .consumed
            })
            .collect();
        assert_eq!(per_tick, vec![1, 2, 1, 2], "boss replays at 1.5x");
        assert_eq!(rng.draws(), 0, "boss never rolls for autonomous fire");

        let mut echo = ReplayCursor::new(10);
        let out = read_tick(&ledger, &mut echo, ReplicaKind::Echo, CloneVariant::Fast, Mutation::Mirror, &params, &mut rng);
        assert_eq!(out.consumed, 1);
        assert_eq!(out.position, Some(Position::new(10.0, 20.0)), "echo replays untransformed");
    }

    // --- Spawn policy ---

    #[test]
    fn test_spawn_requires_strictly_more_history_than_delay() {
        let request = SpawnRequest::Clone {
            variant: CloneVariant::Normal,
            mutation: Mutation::Normal,
        };
        let ledger = filled_ledger(300);
        assert_eq!(
            try_spawn(&ledger, &delays(), request),
            Err(SpawnRefusal::InsufficientHistory {
                current_tick: 300,
                delay: 300
            })
        );

        let ledger = filled_ledger(301);
        let plan = try_spawn(&ledger, &delays(), request).expect("301 > 300");
        assert_eq!(plan.start_tick, 1);
        assert_eq!(plan.kind, ReplicaKind::Clone);
    }

    #[test]
    fn test_delay_per_request_kind() {
        let table = delays();
        let delayed = SpawnRequest::Clone {
            variant: CloneVariant::Delayed,
            mutation: Mutation::Fast,
        };
        assert_eq!(table.delay_for(delayed), 600);
        assert_eq!(table.delay_for(SpawnRequest::Boss), 300);
        assert_eq!(table.delay_for(SpawnRequest::Echo), 300);

        let ledger = filled_ledger(500);
        assert!(try_spawn(&ledger, &table, delayed).is_err());
        let boss = try_spawn(&ledger, &table, SpawnRequest::Boss).unwrap();
        assert_eq!((boss.variant, boss.mutation), (CloneVariant::Normal, Mutation::Normal));
        assert_eq!(boss.start_tick, 200);
    }

    #[test]
    fn test_weighted_table_boundaries() {
        let table = WeightedTable::new(&[("a", 40), ("b", 25), ("c", 0), ("d", 35)]).unwrap();
        let pick = |u: f64| table.pick(&mut ScriptedSource::new(vec![u]));
        assert_eq!(pick(0.0), "a");
        assert_eq!(pick(0.399), "a");
        assert_eq!(pick(0.40), "b");
        assert_eq!(pick(0.649), "b");
        assert_eq!(pick(0.65), "d", "zero-weight entries are never picked");
        assert_eq!(pick(0.999), "d");
        assert!(WeightedTable::<u8>::new(&[(1, 0), (2, 0)]).is_none());
        assert!(
            WeightedTable::<u8>::new(&[(1, u32::MAX), (2, 1)]).is_none(),
            "a total past u32::MAX is refused"
        );
    }

    #[test]
    fn test_all_variant_mutation_combinations_reachable() {
        let policy = VariantPolicy::from_config(&GameConfig::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..5_000 {
            if let SpawnRequest::Clone { variant, mutation } = policy.draw(&mut rng) {
                seen.insert((variant, mutation));
            }
        }
        assert_eq!(seen.len(), 16, "every variant x mutation pair must occur");
    }

    #[test]
    fn test_spawn_timer_resets_and_accelerates() {
        let mut timer = SpawnTimer::new(300, 90, 0.97);
        let due: Vec<u32> = (1..=300).filter(|_| timer.tick()).collect();
        assert_eq!(due.len(), 1, "exactly one attempt in the first 300 ticks");
        assert_eq!(timer.interval(), 291);

        let mut ticks = 0;
        while !timer.tick() {
            ticks += 1;
        }
        assert_eq!(ticks + 1, 291);
    }

    #[test]
    fn test_spawn_timer_floor_and_extend() {
        let mut timer = SpawnTimer::new(100, 90, 0.5);
        while !timer.tick() {}
        assert_eq!(timer.interval(), 90, "never below min interval");
        timer.extend(60);
        assert_eq!(timer.interval(), 150);
    }

    #[test]
    fn test_boss_timer_floor_and_period() {
        let mut timer = BossTimer::new(3600, 1800);
        let due: Vec<u64> = (0..=7200).filter(|&t| timer.tick(t)).collect();
        assert_eq!(due, vec![3600, 5400, 7200]);
    }

    #[test]
    fn test_echo_energy_regenerates_to_cost() {
        let config = GameConfig::default();
        let ledger = filled_ledger(1_000);
        let table = delays();
        let mut reservoir = EchoReservoir::new(0.0, 100.0, 25.0, config.echo_regen_per_tick());

        assert!(matches!(
            reservoir.try_spawn(&ledger, &table),
            Err(SpawnRefusal::InsufficientEnergy { .. })
        ));
        for _ in 0..149 {
            reservoir.regenerate();
        }
        assert!(reservoir.try_spawn(&ledger, &table).is_err(), "149 ticks is not enough");
        reservoir.regenerate();
        let plan = reservoir.try_spawn(&ledger, &table).expect("150 ticks pays for an echo");
        assert_eq!(plan.kind, ReplicaKind::Echo);
        assert_eq!(plan.start_tick, 700);
        assert!(reservoir.energy() < 1e-6);
    }

    #[test]
    fn test_echo_refusal_keeps_energy() {
        let mut reservoir = EchoReservoir::from_config(&GameConfig::default());
        let ledger = filled_ledger(100);
        let before = reservoir.energy();
        assert_eq!(before, 100.0, "starts full by default");
        assert!(matches!(
            reservoir.try_spawn(&ledger, &delays()),
            Err(SpawnRefusal::InsufficientHistory { .. })
        ));
        assert_eq!(reservoir.energy(), before, "no debit on refusal");
    }

    #[test]
    fn test_echo_energy_capped() {
        let mut reservoir = EchoReservoir::new(99.95, 100.0, 25.0, 1.0);
        reservoir.regenerate();
        assert_eq!(reservoir.energy(), 100.0);
    }

    #[test]
    fn test_random_source_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1_000 {
            let v = rng.range_u32(600, 1200);
            assert!((600..=1200).contains(&v));
            assert!(rng.index(3) < 3);
        }
        let mut scripted = ScriptedSource::new(vec![0.999_999]);
        assert_eq!(scripted.range_u32(1, 3), 3);
    }
}
