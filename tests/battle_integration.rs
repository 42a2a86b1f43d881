//! Battle loop integration tests

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use warband::battle::{
    duel, BattleOutcome, BattleState, Roster, ScriptedController, TurnAction,
};
use warband::combat::{create_fighter, Archetype, ArchetypeSelector, ChanceStat, Fighter};
use warband::core::{BattleConfig, LogConfig, Side, Verbosity};

fn log() -> LogConfig {
    LogConfig::new(Verbosity::Verbose, false)
}

/// Lands every blow, never crits, carries nothing
fn sure(name: &str, hp: i32, attack: i32) -> Fighter {
    Fighter::new(name, hp, attack)
        .with_chance(ChanceStat::Miss, 0.0)
        .with_chance(ChanceStat::Block, 0.0)
        .with_chance(ChanceStat::Dodge, 0.0)
        .with_chance(ChanceStat::Crit, 0.0)
        .with_potions(0)
}

fn harmless(name: &str, hp: i32) -> Fighter {
    sure(name, hp, 1).with_chance(ChanceStat::Miss, 1.0)
}

fn random_company(size: usize, rng: &mut ChaCha8Rng) -> Vec<Fighter> {
    let taken = ahash::AHashSet::new();
    (0..size)
        .map(|_| create_fighter(ArchetypeSelector::Any, &taken, rng))
        .collect()
}

#[test]
fn test_random_battles_always_conclude() {
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let a = Roster::from_fighters(random_company(3, &mut rng));
        let b = Roster::from_fighters(random_company(4, &mut rng));
        let mut state = BattleState::new(a, b, BattleConfig::default(), log());

        let outcome = state.run_to_end(&mut rng);
        let summary = state.summary();
        assert!(outcome.is_decided());
        assert_eq!(summary.outcome, outcome);
        match outcome {
            BattleOutcome::Victory(Side::A) => assert_eq!(summary.side_b.standing, 0),
            BattleOutcome::Victory(Side::B) => assert_eq!(summary.side_a.standing, 0),
            _ => assert!(summary.rounds >= 1),
        }
        for (_, fighter) in state.side_a.iter().chain(state.side_b.iter()) {
            assert!(fighter.hp() >= 0 && fighter.hp() <= fighter.max_hp());
        }
    }
}

#[test]
fn test_round_stops_when_a_side_falls() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let a = Roster::from_fighters(vec![sure("a1", 30, 9), sure("a2", 30, 9), sure("a3", 30, 9)]);
    let b = Roster::from_fighters(vec![harmless("b", 1)]);
    let mut state = BattleState::new(a, b, BattleConfig::default(), log());

    assert_eq!(state.run_round(&mut rng), BattleOutcome::Victory(Side::A));
    let landed: i32 = state.side_a.iter().map(|(_, f)| f.fatigue()).sum();
    assert_eq!(landed, 1, "only the killing blow should land");
}

#[test]
fn test_aggressive_stance_adds_damage_on_next_attack() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let a = Roster::from_fighters(vec![sure("a", 30, 5)]);
    let b = Roster::from_fighters(vec![harmless("b", 100)]);
    let mut state = BattleState::new(a, b, BattleConfig::default(), log());
    state.set_controller(
        Side::A,
        Box::new(ScriptedController::new([
            TurnAction::AggressiveStance,
            TurnAction::Attack { target: Some(0) },
            TurnAction::Attack { target: Some(0) },
        ])),
    );

    state.run_round(&mut rng);
    assert_eq!(state.side_b.get(0).map(Fighter::hp), Some(100));

    state.run_round(&mut rng);
    // 5 attack + 2 stance, doubled if the stance's crit bonus fired
    let after_stance = state.side_b.get(0).map_or(0, Fighter::hp);
    assert!(after_stance == 93 || after_stance == 86, "hp {}", after_stance);

    state.run_round(&mut rng);
    // stance spent and crit back to zero: 5 attack - 1 fatigue
    assert_eq!(state.side_b.get(0).map(Fighter::hp), Some(after_stance - 4));
}

#[test]
fn test_defensive_stance_expires_on_own_turn() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let a = Roster::from_fighters(vec![harmless("a", 50)]);
    let b = Roster::from_fighters(vec![harmless("b", 50)]);
    let mut state = BattleState::new(a, b, BattleConfig::default(), log());
    state.set_controller(
        Side::A,
        Box::new(ScriptedController::new([TurnAction::DefensiveStance])),
    );

    state.run_round(&mut rng);
    assert!(state.side_a.get(0).map_or(false, Fighter::has_defensive_stance));
    state.run_round(&mut rng);
    assert!(!state.side_a.get(0).map_or(true, Fighter::has_defensive_stance));
}

#[test]
fn test_endless_battle_is_called_a_draw() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let config = BattleConfig {
        max_rounds: 5,
        ..BattleConfig::default()
    };
    let a = Roster::from_fighters(vec![harmless("a", 10)]);
    let b = Roster::from_fighters(vec![harmless("b", 10)]);
    let mut state = BattleState::new(a, b, config, log());

    assert_eq!(state.run_to_end(&mut rng), BattleOutcome::Draw);
    assert_eq!(state.round, 5);
}

#[test]
fn test_commander_rallies_the_side() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let a = Roster::from_fighters(vec![
        Archetype::Captain.roll(&mut rng),
        Archetype::Swiss.roll(&mut rng),
    ]);
    let b = Roster::from_fighters(vec![Archetype::Reiter.roll(&mut rng)]);
    let mut state = BattleState::new(a, b, BattleConfig::default(), log());
    state.start();

    assert!(state.log.contains("sounds the battle cry"));
    assert!(state.side_a.iter().all(|(_, f)| f.has_battle_cry()));
    assert!(!state.side_b.iter().any(|(_, f)| f.has_battle_cry()));

    state.run_to_end(&mut rng);
    assert!(state.side_a.iter().all(|(_, f)| !f.has_battle_cry()));
}

#[test]
fn test_duel_produces_a_winner() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let first = Archetype::Landsknecht.roll(&mut rng);
    let second = Archetype::Gallowglass.roll(&mut rng);
    let mut state = duel(first, second, BattleConfig::default(), log());

    match state.run_to_end(&mut rng) {
        BattleOutcome::Victory(side) => {
            assert!(state.roster(side).any_alive());
            assert!(!state.roster(side.opponent()).any_alive());
        }
        other => panic!("duel ended without a winner: {:?}", other),
    }
}

#[test]
fn test_battle_survives_a_save_midway() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let a = Roster::from_fighters(random_company(3, &mut rng));
    let b = Roster::from_fighters(random_company(3, &mut rng));
    let mut state = BattleState::new(a, b, BattleConfig::default(), log());
    state.run_round(&mut rng);

    let json = serde_json::to_string(&state).expect("battle serializes");
    let mut restored: BattleState = serde_json::from_str(&json).expect("battle deserializes");
    assert_eq!(restored.round, state.round);
    assert_eq!(restored.side_a, state.side_a);
    assert_eq!(restored.side_b, state.side_b);
    assert_eq!(restored.log.config(), log());

    let outcome = restored.run_to_end(&mut rng);
    assert!(outcome.is_decided());
}
