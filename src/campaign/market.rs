//! Market purchases and equipment handling
//!
//! Purchases move currency into the stash (or set the scouting flag).
//! Equipment operations move one stash item onto a fighter.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::campaign::state::{CampaignState, Price, RosterKind, StashItem};
use crate::combat::Weapon;
use crate::core::error::{Result, WarbandError};
use crate::core::log::Verbosity;

/// Temporary armor granted by one patch, until the end of the next battle
pub const ARMOR_PATCH_BONUS: i32 = 1;

/// Permanent armor granted by one set of light armor
pub const LIGHT_ARMOR_BONUS: i32 = 1;

/// Things the market sells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketItem {
    Potion,
    ArmorPatch,
    LightArmor,
    WeaponKit,
    /// Pins the next battle's attacks on the strongest enemy
    ScoutReport,
}

impl MarketItem {
    pub fn price(self) -> Price {
        match self {
            MarketItem::Potion => Price::new(10, 0, 0),
            MarketItem::ArmorPatch => Price::new(6, 1, 0),
            MarketItem::LightArmor => Price::new(15, 3, 0),
            MarketItem::WeaponKit => Price::new(12, 0, 2),
            MarketItem::ScoutReport => Price::new(8, 0, 0),
        }
    }

    /// Stash slot this purchase fills, if any
    pub fn stash_item(self) -> Option<StashItem> {
        match self {
            MarketItem::Potion => Some(StashItem::Potion),
            MarketItem::ArmorPatch => Some(StashItem::ArmorPatch),
            MarketItem::LightArmor => Some(StashItem::LightArmor),
            MarketItem::WeaponKit => Some(StashItem::WeaponKit),
            MarketItem::ScoutReport => None,
        }
    }
}

impl fmt::Display for MarketItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stash_item() {
            Some(item) => write!(f, "{}", item),
            None => f.write_str("scout report"),
        }
    }
}

impl CampaignState {
    /// Buy one item at the market
    pub fn buy(&mut self, item: MarketItem) -> Result<()> {
        if item == MarketItem::ScoutReport && self.focus_next_battle {
            return Err(WarbandError::InvalidAction(
                "the scouts have already reported".to_string(),
            ));
        }

        let price = item.price();
        self.currencies.spend(&price)?;
        match item.stash_item() {
            Some(stash_item) => self.stash.add(stash_item, 1),
            None => self.focus_next_battle = true,
        }
        self.log.log(
            Verbosity::Normal,
            format!("Bought a {} for {} ({} left)", item, price, self.currencies),
        );
        Ok(())
    }

    /// Hand a stash potion to a fighter
    pub fn give_potion(&mut self, kind: RosterKind, slot: usize) -> Result<()> {
        self.fighter(kind, slot)?;
        self.stash.take(StashItem::Potion)?;
        let fighter = self.fighter_mut(kind, slot)?;
        fighter.add_potions(1);
        let message = format!("{} now carries {} potions", fighter.name(), fighter.potions());
        self.log.log(Verbosity::Normal, message);
        Ok(())
    }

    /// Patch a fighter's armor for the next battle
    pub fn apply_armor_patch(&mut self, kind: RosterKind, slot: usize) -> Result<()> {
        self.fighter(kind, slot)?;
        self.stash.take(StashItem::ArmorPatch)?;
        let fighter = self.fighter_mut(kind, slot)?;
        fighter.add_temp_armor(ARMOR_PATCH_BONUS);
        let message = format!(
            "{} patches their armor (+{} until the next battle ends)",
            fighter.name(),
            fighter.temp_armor_bonus()
        );
        self.log.log(Verbosity::Normal, message);
        Ok(())
    }

    /// Fit a fighter with light armor for good
    pub fn fit_light_armor(&mut self, kind: RosterKind, slot: usize) -> Result<()> {
        self.fighter(kind, slot)?;
        self.stash.take(StashItem::LightArmor)?;
        let fighter = self.fighter_mut(kind, slot)?;
        fighter.add_armor(LIGHT_ARMOR_BONUS);
        let message = format!("{} dons light armor (armor {})", fighter.name(), fighter.armor());
        self.log.log(Verbosity::Normal, message);
        Ok(())
    }

    /// Re-arm a fighter from a weapon kit
    ///
    /// The old weapon's deltas are stripped before the new ones apply.
    pub fn rearm(&mut self, kind: RosterKind, slot: usize, weapon: Weapon) -> Result<()> {
        let current = self.fighter(kind, slot)?.weapon();
        if current == weapon {
            return Err(WarbandError::InvalidAction(format!(
                "already armed with {}",
                weapon
            )));
        }
        self.stash.take(StashItem::WeaponKit)?;

        let fighter = self.fighter_mut(kind, slot)?;
        current.strip_from(fighter);
        weapon.apply_to(fighter);
        fighter.set_weapon(weapon);
        let message = format!("{} trades {} for {}", fighter.name(), current, weapon);
        self.log.log(Verbosity::Normal, message);
        Ok(())
    }
}
