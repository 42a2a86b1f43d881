//! Campaign state: day, purse, stash, roster and reserve
//!
//! Every refusable operation checks first and mutates after, so an `Err`
//! always leaves the state untouched.

use ahash::AHashSet;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::battle::roster::{Roster, ROSTER_CAPACITY};
use crate::campaign::recruitment::RecruitmentPool;
use crate::combat::{Archetype, Fighter};
use crate::core::config::BalanceConfig;
use crate::core::error::{Result, WarbandError};
use crate::core::log::{EventLog, LogConfig, Verbosity};
use crate::core::types::Day;

/// Gold, iron and steel balances (also used for prices and rewards)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Currencies {
    pub gold: u32,
    pub iron: u32,
    pub steel: u32,
}

/// A cost in all three currencies
pub type Price = Currencies;

impl Currencies {
    pub fn new(gold: u32, iron: u32, steel: u32) -> Self {
        Self { gold, iron, steel }
    }

    pub fn gold(gold: u32) -> Self {
        Self::new(gold, 0, 0)
    }

    pub fn can_afford(&self, price: &Price) -> bool {
        self.check(price).is_ok()
    }

    /// Err naming the first currency that falls short
    pub fn check(&self, price: &Price) -> Result<()> {
        if self.gold < price.gold {
            return Err(WarbandError::insufficient("gold", price.gold, self.gold));
        }
        if self.iron < price.iron {
            return Err(WarbandError::insufficient("iron", price.iron, self.iron));
        }
        if self.steel < price.steel {
            return Err(WarbandError::insufficient("steel", price.steel, self.steel));
        }
        Ok(())
    }

    pub(crate) fn spend(&mut self, price: &Price) -> Result<()> {
        self.check(price)?;
        self.gold -= price.gold;
        self.iron -= price.iron;
        self.steel -= price.steel;
        Ok(())
    }

    pub fn add(&mut self, other: &Currencies) {
        self.gold += other.gold;
        self.iron += other.iron;
        self.steel += other.steel;
    }
}

impl fmt::Display for Currencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}g {}i {}s", self.gold, self.iron, self.steel)
    }
}

/// Consumable equipment held by the company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StashItem {
    Potion,
    ArmorPatch,
    LightArmor,
    WeaponKit,
}

impl fmt::Display for StashItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StashItem::Potion => "potion",
            StashItem::ArmorPatch => "armor patch",
            StashItem::LightArmor => "light armor",
            StashItem::WeaponKit => "weapon kit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stash {
    pub potions: u32,
    pub armor_patches: u32,
    pub light_armor: u32,
    pub weapon_kits: u32,
}

impl Stash {
    pub fn count(&self, item: StashItem) -> u32 {
        match item {
            StashItem::Potion => self.potions,
            StashItem::ArmorPatch => self.armor_patches,
            StashItem::LightArmor => self.light_armor,
            StashItem::WeaponKit => self.weapon_kits,
        }
    }

    fn count_mut(&mut self, item: StashItem) -> &mut u32 {
        match item {
            StashItem::Potion => &mut self.potions,
            StashItem::ArmorPatch => &mut self.armor_patches,
            StashItem::LightArmor => &mut self.light_armor,
            StashItem::WeaponKit => &mut self.weapon_kits,
        }
    }

    pub fn add(&mut self, item: StashItem, count: u32) {
        *self.count_mut(item) += count;
    }

    pub fn check(&self, item: StashItem) -> Result<()> {
        let have = self.count(item);
        if have == 0 {
            return Err(WarbandError::insufficient(&item.to_string(), 1, have));
        }
        Ok(())
    }

    pub(crate) fn take(&mut self, item: StashItem) -> Result<()> {
        self.check(item)?;
        *self.count_mut(item) -= 1;
        Ok(())
    }
}

/// Which of the two company rosters a slot refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RosterKind {
    Active,
    Reserve,
}

impl fmt::Display for RosterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterKind::Active => f.write_str("active roster"),
            RosterKind::Reserve => f.write_str("reserve"),
        }
    }
}

/// Complete campaign state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignState {
    pub day: Day,
    pub currencies: Currencies,
    pub stash: Stash,
    pub roster: Roster,
    pub reserve: Roster,

    /// Today's recruitment pool, regenerated lazily when the day changes
    pub(crate) pool: Option<RecruitmentPool>,

    /// Pin the next battle's attacks on the strongest enemy
    pub focus_next_battle: bool,

    #[serde(default)]
    pub config: BalanceConfig,
    pub log: EventLog,
}

impl CampaignState {
    /// A fresh company: a Captain, a Landsknecht and a Swiss
    pub fn new<R: Rng + ?Sized>(config: BalanceConfig, log: LogConfig, rng: &mut R) -> Self {
        let mut roster = Roster::new(ROSTER_CAPACITY);
        let mut taken = AHashSet::new();
        for archetype in [Archetype::Captain, Archetype::Landsknecht, Archetype::Swiss] {
            let fighter = crate::combat::create_fighter(
                crate::combat::ArchetypeSelector::Exact(archetype),
                &taken,
                rng,
            );
            taken.insert(fighter.name().to_string());
            let slot = roster.len();
            roster.replace(slot, Some(fighter));
        }

        let economy = &config.economy;
        let currencies = Currencies::new(
            economy.starting_gold,
            economy.starting_iron,
            economy.starting_steel,
        );

        let mut state = Self {
            day: 1,
            currencies,
            stash: Stash::default(),
            roster,
            reserve: Roster::new(ROSTER_CAPACITY),
            pool: None,
            focus_next_battle: false,
            config,
            log: EventLog::new(log),
        };
        state.log.log(
            Verbosity::Brief,
            format!(
                "Day {}: the company musters {} fighters with {}",
                state.day,
                state.roster.len(),
                state.currencies
            ),
        );
        state
    }

    pub fn roster_of(&self, kind: RosterKind) -> &Roster {
        match kind {
            RosterKind::Active => &self.roster,
            RosterKind::Reserve => &self.reserve,
        }
    }

    pub(crate) fn roster_of_mut(&mut self, kind: RosterKind) -> &mut Roster {
        match kind {
            RosterKind::Active => &mut self.roster,
            RosterKind::Reserve => &mut self.reserve,
        }
    }

    pub fn fighter(&self, kind: RosterKind, slot: usize) -> Result<&Fighter> {
        let roster = self.roster_of(kind);
        if slot >= roster.capacity() {
            return Err(WarbandError::InvalidSlot {
                slot,
                capacity: roster.capacity(),
            });
        }
        roster.get(slot).ok_or(WarbandError::EmptySlot(slot))
    }

    pub(crate) fn fighter_mut(&mut self, kind: RosterKind, slot: usize) -> Result<&mut Fighter> {
        self.fighter(kind, slot)?;
        self.roster_of_mut(kind)
            .get_mut(slot)
            .ok_or(WarbandError::EmptySlot(slot))
    }

    /// Every fighter in roster and reserve
    pub fn company(&self) -> impl Iterator<Item = &Fighter> {
        self.roster
            .iter()
            .chain(self.reserve.iter())
            .map(|(_, f)| f)
    }

    /// Names the naming oracle must avoid
    pub fn taken_names(&self) -> AHashSet<String> {
        self.company().map(|f| f.name().to_string()).collect()
    }

    pub fn commander(&self) -> Option<&Fighter> {
        self.company().find(|f| f.is_commander() && f.is_alive())
    }

    /// How many hired fighters the commander can lead
    pub fn hire_quota(&self) -> u32 {
        self.commander().map_or(0, |c| c.level() + 1)
    }

    /// Previously recruited fighters still alive in roster or reserve
    pub fn recruited_count(&self) -> u32 {
        self.company()
            .filter(|f| f.is_recruited() && f.is_alive())
            .count() as u32
    }

    /// Roster and reserve are both empty
    pub fn is_over(&self) -> bool {
        self.roster.is_empty() && self.reserve.is_empty()
    }

    /// Move an active fighter into the first free reserve slot
    pub fn move_to_reserve(&mut self, slot: usize) -> Result<usize> {
        self.fighter(RosterKind::Active, slot)?;
        if self.roster.len() <= 1 {
            return Err(WarbandError::InvalidAction(
                "the active roster cannot be left empty".to_string(),
            ));
        }
        if self.reserve.is_full() {
            return Err(WarbandError::RosterFull);
        }

        let fighter = self.roster.take(slot)?;
        let name = fighter.name().to_string();
        let reserve_slot = self.reserve.push(fighter)?;
        self.log.log(
            Verbosity::Normal,
            format!("{} moves to the reserve", name),
        );
        Ok(reserve_slot)
    }

    /// Move a reserve fighter into the first free active slot
    pub fn move_to_roster(&mut self, reserve_slot: usize) -> Result<usize> {
        self.fighter(RosterKind::Reserve, reserve_slot)?;
        if self.roster.is_full() {
            return Err(WarbandError::RosterFull);
        }

        let fighter = self.reserve.take(reserve_slot)?;
        let name = fighter.name().to_string();
        let slot = self.roster.push(fighter)?;
        self.log.log(
            Verbosity::Normal,
            format!("{} joins the active roster", name),
        );
        Ok(slot)
    }

    /// Swap an active fighter with a reserve fighter in place
    pub fn swap_with_reserve(&mut self, slot: usize, reserve_slot: usize) -> Result<()> {
        self.fighter(RosterKind::Active, slot)?;
        self.fighter(RosterKind::Reserve, reserve_slot)?;

        let active = self.roster.take(slot)?;
        let benched = self.reserve.take(reserve_slot)?;
        self.log.log(
            Verbosity::Normal,
            format!("{} takes the place of {}", benched.name(), active.name()),
        );
        self.roster.replace(slot, Some(benched));
        self.reserve.replace(reserve_slot, Some(active));
        Ok(())
    }
}
