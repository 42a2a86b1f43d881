//! Victory rewards and loot
//!
//! A won battle pays a currency reward scaled by the enemy count plus one
//! categorical loot roll on a d100 with cumulative thresholds.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::campaign::state::{Currencies, StashItem};
use crate::core::config::EconomyConfig;

/// Cumulative d100 upper bounds: potion, patch, light armor, weapon kit
pub const LOOT_THRESHOLDS: [u32; 4] = [40, 60, 75, 85];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LootRoll {
    Found(StashItem),
    Nothing,
}

impl LootRoll {
    /// Map a d100 result (1..=100) to its bucket
    pub fn from_d100(roll: u32) -> Self {
        let items = [
            StashItem::Potion,
            StashItem::ArmorPatch,
            StashItem::LightArmor,
            StashItem::WeaponKit,
        ];
        LOOT_THRESHOLDS
            .iter()
            .zip(items)
            .find(|(&threshold, _)| roll <= threshold)
            .map_or(LootRoll::Nothing, |(_, item)| LootRoll::Found(item))
    }

    pub fn item(self) -> Option<StashItem> {
        match self {
            LootRoll::Found(item) => Some(item),
            LootRoll::Nothing => None,
        }
    }
}

impl fmt::Display for LootRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LootRoll::Found(item) => write!(f, "a {}", item),
            LootRoll::Nothing => f.write_str("nothing"),
        }
    }
}

/// Roll the single post-victory loot draw
pub fn roll_loot<R: Rng + ?Sized>(rng: &mut R) -> LootRoll {
    LootRoll::from_d100(rng.gen_range(1..=100))
}

/// Currency reward for beating `enemies` fighters
pub fn victory_reward(enemies: usize, config: &EconomyConfig) -> Currencies {
    let n = enemies as u32;
    Currencies::new(
        config.reward_gold_per_enemy * n,
        config.reward_iron_per_enemy * n,
        config.reward_steel_per_enemy * n,
    )
}
