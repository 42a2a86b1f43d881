//! Experience, leveling and deferred stat choices
//!
//! Thresholds are cumulative: a fighter leaves level L once its lifetime XP
//! reaches `xp_per_level * L`. The stored experience is progress inside the
//! current level, so each level-up spends `xp_per_level` of it, raises the
//! level, applies the fixed HP/attack bump and banks one pending level-up
//! token. A single large grant can cross several levels.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::campaign::state::{CampaignState, RosterKind};
use crate::combat::constants::{PRECISION_CRIT_BONUS, PRECISION_MISS_REDUCTION, VITALITY_HP_BONUS};
use crate::combat::{ChanceStat, Fighter};
use crate::core::config::ProgressionConfig;
use crate::core::error::{Result, WarbandError};
use crate::core::log::Verbosity;

/// Lifetime XP at which a fighter leaves `level`
pub fn level_threshold(level: u32, config: &ProgressionConfig) -> u32 {
    config.xp_per_level * level
}

/// Add XP and level up as many times as it allows. Returns levels gained.
pub fn grant_experience(fighter: &mut Fighter, xp: u32, config: &ProgressionConfig) -> u32 {
    fighter.add_experience(xp);

    let step = config.xp_per_level;
    let mut gained = 0;
    while step > 0 && fighter.experience() >= step {
        fighter.advance_level(step, config.level_hp_bonus, config.level_attack_bonus);
        gained += 1;
    }
    gained
}

/// Raise a freshly generated fighter to `level` without XP or tokens
pub(crate) fn train_to_level(fighter: &mut Fighter, level: u32, config: &ProgressionConfig) {
    while fighter.level() < level {
        fighter.train_level(config.level_hp_bonus, config.level_attack_bonus);
    }
}

/// Stat allocation bought with one pending level-up token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelUpChoice {
    /// +5 max HP (and heal 5)
    Vitality,
    /// +1 attack
    Strength,
    /// +1 armor
    Toughness,
    /// More crits, fewer misses
    Precision,
}

impl LevelUpChoice {
    fn apply_to(self, fighter: &mut Fighter) {
        match self {
            LevelUpChoice::Vitality => fighter.add_max_hp(VITALITY_HP_BONUS),
            LevelUpChoice::Strength => fighter.add_attack(1),
            LevelUpChoice::Toughness => fighter.add_armor(1),
            LevelUpChoice::Precision => {
                fighter.adjust_chance(ChanceStat::Crit, PRECISION_CRIT_BONUS);
                fighter.adjust_chance(ChanceStat::Miss, -PRECISION_MISS_REDUCTION);
            }
        }
    }
}

impl fmt::Display for LevelUpChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LevelUpChoice::Vitality => "Vitality",
            LevelUpChoice::Strength => "Strength",
            LevelUpChoice::Toughness => "Toughness",
            LevelUpChoice::Precision => "Precision",
        };
        f.write_str(name)
    }
}

/// Spend one pending token on `choice`
pub fn redeem_level_up(fighter: &mut Fighter, choice: LevelUpChoice) -> Result<()> {
    if !fighter.take_pending_level_up() {
        return Err(WarbandError::InvalidAction(format!(
            "{} has no pending level-up",
            fighter.name()
        )));
    }
    choice.apply_to(fighter);
    Ok(())
}

impl CampaignState {
    /// Redeem a level-up token for a fighter in roster or reserve
    pub fn redeem_level_up(
        &mut self,
        kind: RosterKind,
        slot: usize,
        choice: LevelUpChoice,
    ) -> Result<()> {
        let fighter = self.fighter_mut(kind, slot)?;
        redeem_level_up(fighter, choice)?;
        let message = format!(
            "{} trains {} (level {}, {} tokens left)",
            fighter.name(),
            choice,
            fighter.level(),
            fighter.pending_level_ups()
        );
        self.log.log(Verbosity::Normal, message);
        Ok(())
    }

    /// Fighters holding unspent level-up tokens
    pub fn pending_level_ups(&self) -> Vec<(RosterKind, usize)> {
        let active = self
            .roster
            .iter()
            .filter(|(_, f)| f.pending_level_ups() > 0)
            .map(|(i, _)| (RosterKind::Active, i));
        let reserve = self
            .reserve
            .iter()
            .filter(|(_, f)| f.pending_level_ups() > 0)
            .map(|(i, _)| (RosterKind::Reserve, i));
        active.chain(reserve).collect()
    }
}
