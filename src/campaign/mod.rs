//! Campaign layer: the company's life between battles

pub mod battle;
pub mod day;
pub mod loot;
pub mod market;
pub mod progression;
pub mod recruitment;
pub mod state;

pub use battle::{enemy_level, strongest_slot, BattleReport, LevelGain, VictorySpoils};
pub use loot::{roll_loot, victory_reward, LootRoll};
pub use market::MarketItem;
pub use progression::{grant_experience, level_threshold, redeem_level_up, LevelUpChoice};
pub use recruitment::{price_for, Candidate, RecruitmentPool, POOL_SIZE};
pub use state::{CampaignState, Currencies, Price, RosterKind, Stash, StashItem};
