//! Campaign progression integration tests

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use warband::campaign::{
    CampaignState, Currencies, LevelUpChoice, MarketItem, RosterKind, StashItem, POOL_SIZE,
};
use warband::core::{BalanceConfig, LogConfig, Verbosity, WarbandError};

fn campaign(seed: u64) -> (CampaignState, ChaCha8Rng) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let state = CampaignState::new(
        BalanceConfig::default(),
        LogConfig::new(Verbosity::Brief, false),
        &mut rng,
    );
    (state, rng)
}

#[test]
fn test_serialized_campaign_restores_identically() {
    let (mut state, mut rng) = campaign(1);
    state.buy(MarketItem::Potion).unwrap();
    state.expedition(&mut rng);
    state.move_to_reserve(2).unwrap();
    state.recruitment_pool(&mut rng);

    let json = serde_json::to_string(&state).unwrap();
    let mut restored: CampaignState = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.day, state.day);
    assert_eq!(restored.currencies, state.currencies);
    assert_eq!(restored.stash, state.stash);
    assert_eq!(restored.roster, state.roster);
    assert_eq!(restored.reserve, state.reserve);
    assert_eq!(restored.focus_next_battle, state.focus_next_battle);

    // The day's pool survives the trip too
    let before = state.recruitment_pool(&mut rng).clone();
    let after = restored.recruitment_pool(&mut rng).clone();
    assert_eq!(before, after);
}

#[test]
fn test_pool_is_fixed_for_the_day_and_renewed_after() {
    let (mut state, mut rng) = campaign(2);
    let morning = state.recruitment_pool(&mut rng).clone();
    let evening = state.recruitment_pool(&mut rng).clone();
    assert_eq!(morning, evening);
    assert_eq!(morning.candidates.len(), POOL_SIZE);

    state.advance_day();
    let tomorrow = state.recruitment_pool(&mut rng).clone();
    assert_eq!(tomorrow.day, morning.day + 1);
}

#[test]
fn test_refused_purchase_changes_nothing() {
    let (mut state, _) = campaign(3);
    let purse = state.currencies;
    let stash = state.stash;

    // 15 gold + 3 iron, and the company starts with 4 iron: buy one, fail the next
    state.buy(MarketItem::LightArmor).unwrap();
    let purse_after_one = state.currencies;
    let err = state.buy(MarketItem::LightArmor).unwrap_err();
    assert!(matches!(err, WarbandError::InsufficientResource { .. }));
    assert_eq!(state.currencies, purse_after_one);
    assert_eq!(state.stash.count(StashItem::LightArmor), stash.light_armor + 1);
    assert_eq!(purse.gold - purse_after_one.gold, 15);
}

#[test]
fn test_equipment_moves_items_onto_fighters() {
    let (mut state, _) = campaign(4);
    state.currencies = Currencies::new(200, 20, 20);
    state.buy(MarketItem::LightArmor).unwrap();
    state.buy(MarketItem::ArmorPatch).unwrap();

    let armor = state.fighter(RosterKind::Active, 0).unwrap().armor();
    state.fit_light_armor(RosterKind::Active, 0).unwrap();
    state.apply_armor_patch(RosterKind::Active, 0).unwrap();

    let captain = state.fighter(RosterKind::Active, 0).unwrap();
    assert_eq!(captain.armor(), armor + 1);
    assert_eq!(captain.temp_armor_bonus(), 1);
    assert_eq!(state.stash.light_armor, 0);
    assert_eq!(state.stash.armor_patches, 0);
}

#[test]
fn test_hiring_is_capped_by_commander_level() {
    let (mut state, mut rng) = campaign(5);
    state.currencies = Currencies::new(5_000, 500, 500);
    assert_eq!(state.hire_quota(), 2);

    state.hire(0, &mut rng).unwrap();
    state.hire(0, &mut rng).unwrap();
    assert!(matches!(
        state.hire(0, &mut rng),
        Err(WarbandError::QuotaReached { quota: 2 })
    ));
    assert_eq!(state.recruited_count(), 2);
    assert_eq!(state.roster.len(), 5);
}

#[test]
fn test_battles_drive_the_calendar_and_the_purse() {
    let (mut state, mut rng) = campaign(6);
    let mut days = 1;

    while !state.is_over() && days < 12 {
        if !state.roster.any_alive() {
            let benched = state.reserve.iter().map(|(slot, _)| slot).next();
            match benched {
                Some(slot) => {
                    state.move_to_roster(slot).unwrap();
                }
                None => break,
            }
        }

        let gold = state.currencies.gold;
        let report = state.next_battle(&mut rng).unwrap();
        days += 1;
        assert_eq!(state.day, days);
        assert!(!report.enemies.is_empty());

        match &report.spoils {
            Some(spoils) => {
                assert!(report.is_victory());
                assert_eq!(state.currencies.gold, gold + spoils.reward.gold);
            }
            None => assert_eq!(state.currencies.gold, gold),
        }
        for (_, fighter) in state.roster.iter() {
            assert!(fighter.is_alive());
            assert_eq!(fighter.temp_armor_bonus(), 0);
            assert!(!fighter.has_battle_cry());
        }
        for name in &report.fallen {
            assert!(state.company().all(|f| f.name() != name.as_str()));
        }

        for (kind, slot) in state.pending_level_ups() {
            while state
                .redeem_level_up(kind, slot, LevelUpChoice::Strength)
                .is_ok()
            {}
        }
        assert!(state.pending_level_ups().is_empty());
    }
}

#[test]
fn test_scout_report_is_consumed_by_the_next_battle() {
    let (mut state, mut rng) = campaign(7);
    state.buy(MarketItem::ScoutReport).unwrap();
    assert!(state.focus_next_battle);

    state.next_battle(&mut rng).unwrap();
    assert!(!state.focus_next_battle);
}
