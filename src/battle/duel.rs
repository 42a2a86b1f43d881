//! One-on-one duels
//!
//! A duel is a battle between two single-fighter rosters. Each round a fair
//! coin decides who moves first, and both sides heal every time they are
//! low and still carry a potion.

use rand::Rng;

use crate::battle::controller::AutoController;
use crate::battle::execution::{BattleMode, BattleState};
use crate::battle::roster::Roster;
use crate::battle::scheduler::RoundEntry;
use crate::combat::Fighter;
use crate::core::config::BattleConfig;
use crate::core::log::LogConfig;
use crate::core::types::Side;

/// Set up a duel between two fighters
pub fn duel(first: Fighter, second: Fighter, config: BattleConfig, log: LogConfig) -> BattleState {
    let mut state = BattleState::new(
        Roster::from_fighters(vec![first]),
        Roster::from_fighters(vec![second]),
        config,
        log,
    );
    state.mode = BattleMode::Duel;
    state.set_controller(Side::A, Box::new(AutoController::always_heal()));
    state.set_controller(Side::B, Box::new(AutoController::always_heal()));
    state
}

/// Round order for a duel: living slot 0 of each side, coin-flipped
pub(crate) fn coin_flip_order<R: Rng + ?Sized>(
    side_a: &Roster,
    side_b: &Roster,
    rng: &mut R,
) -> Vec<RoundEntry> {
    let a = RoundEntry { side: Side::A, slot: 0 };
    let b = RoundEntry { side: Side::B, slot: 0 };
    let a_first = rng.gen_bool(0.5);

    let ordered = if a_first { [a, b] } else { [b, a] };
    ordered
        .into_iter()
        .filter(|entry| match entry.side {
            Side::A => side_a.is_alive_at(entry.slot),
            Side::B => side_b.is_alive_at(entry.slot),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::execution::BattleOutcome;
    use crate::combat::{Archetype, ChanceStat};
    use crate::core::log::Verbosity;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_coin_flip_is_fair_enough() {
        let mut rng = ChaCha8Rng::seed_from_u64(41);
        let a = Roster::from_fighters(vec![Fighter::new("a", 10, 3)]);
        let b = Roster::from_fighters(vec![Fighter::new("b", 10, 3)]);
        let a_first = (0..1000)
            .filter(|_| coin_flip_order(&a, &b, &mut rng)[0].side == Side::A)
            .count();
        assert!((400..600).contains(&a_first), "a moved first {} times", a_first);
    }

    #[test]
    fn test_dead_duelist_not_scheduled() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let a = Roster::from_fighters(vec![Fighter::new("a", 10, 3)]);
        let mut b = Roster::from_fighters(vec![Fighter::new("b", 10, 3)]);
        b.get_mut(0).unwrap().take_damage(10);
        let order = coin_flip_order(&a, &b, &mut rng);
        assert_eq!(order, vec![RoundEntry { side: Side::A, slot: 0 }]);
    }

    #[test]
    fn test_duel_produces_a_winner() {
        let mut rng = ChaCha8Rng::seed_from_u64(43);
        let first = Archetype::Landsknecht.roll(&mut rng);
        let second = Archetype::Swiss.roll(&mut rng);
        let mut state = duel(first, second, BattleConfig::default(), LogConfig::default());
        let outcome = state.run_to_end(&mut rng);
        assert!(matches!(outcome, BattleOutcome::Victory(_)));
    }

    #[test]
    fn test_duelist_drinks_when_low() {
        let mut rng = ChaCha8Rng::seed_from_u64(44);
        let mut low = Fighter::new("low", 30, 1)
            .with_potions(1)
            .with_chance(ChanceStat::Miss, 1.0);
        low.take_damage(25);
        let idle = Fighter::new("idle", 30, 1).with_chance(ChanceStat::Miss, 1.0);
        let mut state = duel(
            low,
            idle,
            BattleConfig::default(),
            LogConfig::new(Verbosity::Brief, false),
        );
        state.run_round(&mut rng);
        let low = state.side_a.get(0).unwrap();
        assert_eq!(low.potions(), 0);
        assert_eq!(low.hp(), 13);
    }
}
