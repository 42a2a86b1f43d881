//! Day transitions: camp rest and expeditions

use rand::Rng;

use crate::campaign::state::Currencies;
use crate::campaign::CampaignState;
use crate::core::log::Verbosity;
use crate::core::types::Day;

impl CampaignState {
    /// Close the day: everyone rests and the recruitment pool goes stale
    pub fn advance_day(&mut self) -> Day {
        self.day += 1;
        self.pool = None;

        let recovery = self.config.economy.camp_recovery_hp;
        for (_, fighter) in self.roster.iter_mut().chain(self.reserve.iter_mut()) {
            if fighter.is_alive() {
                fighter.heal_by(recovery);
            }
        }

        self.log.log(Verbosity::Normal, format!("Day {} dawns", self.day));
        tracing::debug!(day = self.day, "campaign day advanced");
        self.day
    }

    /// Forage for a day instead of fighting. Returns the gold found.
    pub fn expedition<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u32 {
        let economy = &self.config.economy;
        let low = economy.expedition_gold_min.min(economy.expedition_gold_max);
        let gold = rng.gen_range(low..=economy.expedition_gold_max);

        self.currencies.add(&Currencies::gold(gold));
        self.log.log(
            Verbosity::Brief,
            format!("The expedition returns with {} gold", gold),
        );
        self.advance_day();
        gold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BalanceConfig;
    use crate::core::log::LogConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn campaign(rng: &mut ChaCha8Rng) -> CampaignState {
        CampaignState::new(BalanceConfig::default(), LogConfig::default(), rng)
    }

    #[test]
    fn test_advance_day_heals_and_expires_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(101);
        let mut state = campaign(&mut rng);
        state.recruitment_pool(&mut rng);
        let fighter = state.roster.get_mut(0).unwrap();
        fighter.take_damage(10);
        let wounded = fighter.hp();

        assert_eq!(state.advance_day(), 2);
        assert!(state.pool.is_none());
        assert_eq!(state.roster.get(0).unwrap().hp(), wounded + 3);
    }

    #[test]
    fn test_rest_never_exceeds_max_hp() {
        let mut rng = ChaCha8Rng::seed_from_u64(102);
        let mut state = campaign(&mut rng);
        state.advance_day();
        for (_, fighter) in state.roster.iter() {
            assert_eq!(fighter.hp(), fighter.max_hp());
        }
    }

    #[test]
    fn test_expedition_gold_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(103);
        let mut state = campaign(&mut rng);
        for day in 2..20 {
            let before = state.currencies.gold;
            let gold = state.expedition(&mut rng);
            assert!((5..=15).contains(&gold));
            assert_eq!(state.currencies.gold, before + gold);
            assert_eq!(state.day, day);
        }
    }
}
