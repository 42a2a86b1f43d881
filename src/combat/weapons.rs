//! Weapons
//!
//! Each weapon is a tag carrying fixed deltas: flat damage, armor pierce,
//! weight, miss and crit nudges. A weapon may also carry an extra effect
//! hook; only sword-and-shield uses one (a block bonus).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combat::fighter::{ChanceStat, Fighter};

/// Whether deltas are being added or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Apply,
    Strip,
}

impl Direction {
    pub fn sign(self) -> i32 {
        match self {
            Direction::Apply => 1,
            Direction::Strip => -1,
        }
    }

    pub fn scale(self, delta: f32) -> f32 {
        delta * self.sign() as f32
    }
}

/// Additional effect beyond the standard deltas
pub type ExtraEffect = fn(&mut Fighter, Direction);

/// Fixed numbers behind a weapon tag
#[derive(Clone, Copy)]
pub struct WeaponProfile {
    pub damage_bonus: i32,
    pub armor_pierce: i32,
    /// Carried for display; combat does not read it yet
    pub weight: i32,
    pub miss_delta: f32,
    pub crit_delta: f32,
    pub extra: Option<ExtraEffect>,
}

impl fmt::Debug for WeaponProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeaponProfile")
            .field("damage_bonus", &self.damage_bonus)
            .field("armor_pierce", &self.armor_pierce)
            .field("weight", &self.weight)
            .field("miss_delta", &self.miss_delta)
            .field("crit_delta", &self.crit_delta)
            .field("extra", &self.extra.is_some())
            .finish()
    }
}

fn shield_block(fighter: &mut Fighter, direction: Direction) {
    fighter.adjust_chance(ChanceStat::Block, direction.scale(0.05));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Weapon {
    #[default]
    None,
    /// Pike or halberd: more damage, more accurate
    Spear,
    /// Zweihander: more damage, more crits
    Greatsword,
    /// Sword and buckler: accurate, blocks more
    SwordAndShield,
    /// Pierces one point of armor
    Axe,
    /// Wheellock pistol: crits and pierces, but misses more
    Pistol,
}

impl Weapon {
    pub fn all() -> [Weapon; 6] {
        [
            Weapon::None,
            Weapon::Spear,
            Weapon::Greatsword,
            Weapon::SwordAndShield,
            Weapon::Axe,
            Weapon::Pistol,
        ]
    }

    pub fn profile(self) -> WeaponProfile {
        let (damage_bonus, armor_pierce, weight, miss_delta, crit_delta) = match self {
            Weapon::None => (0, 0, 0, 0.0, 0.0),
            Weapon::Spear => (1, 0, 1, -0.02, 0.0),
            Weapon::Greatsword => (2, 0, 2, 0.0, 0.05),
            Weapon::SwordAndShield => (0, 0, 1, -0.01, 0.0),
            Weapon::Axe => (1, 1, 1, 0.0, 0.0),
            Weapon::Pistol => (0, 1, 1, 0.05, 0.07),
        };
        let extra: Option<ExtraEffect> = match self {
            Weapon::SwordAndShield => Some(shield_block),
            _ => None,
        };
        WeaponProfile {
            damage_bonus,
            armor_pierce,
            weight,
            miss_delta,
            crit_delta,
            extra,
        }
    }

    /// Add this weapon's deltas to a fighter
    pub fn apply_to(self, fighter: &mut Fighter) {
        self.shift(fighter, Direction::Apply);
    }

    /// Remove this weapon's deltas again (stat reset before re-arming)
    ///
    /// Exact unless clamping cut a delta short when it was applied.
    pub fn strip_from(self, fighter: &mut Fighter) {
        self.shift(fighter, Direction::Strip);
    }

    fn shift(self, fighter: &mut Fighter, direction: Direction) {
        let profile = self.profile();
        let sign = direction.sign();
        fighter.add_attack(sign * profile.damage_bonus);
        fighter.adjust_chance(ChanceStat::Miss, direction.scale(profile.miss_delta));
        fighter.adjust_chance(ChanceStat::Crit, direction.scale(profile.crit_delta));
        fighter.add_pierce(sign * profile.armor_pierce);
        if let Some(extra) = profile.extra {
            extra(fighter, direction);
        }
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weapon::None => "None",
            Weapon::Spear => "Spear",
            Weapon::Greatsword => "Greatsword",
            Weapon::SwordAndShield => "Sword and Shield",
            Weapon::Axe => "Axe",
            Weapon::Pistol => "Pistol",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Fighter {
        Fighter::new("Test", 30, 5)
    }

    #[test]
    fn test_only_sword_and_shield_has_extra() {
        for weapon in Weapon::all() {
            let has_extra = weapon.profile().extra.is_some();
            assert_eq!(has_extra, weapon == Weapon::SwordAndShield, "{:?}", weapon);
        }
    }

    #[test]
    fn test_greatsword_deltas() {
        let mut f = base();
        Weapon::Greatsword.apply_to(&mut f);
        assert_eq!(f.attack(), 7);
        assert!((f.chance(ChanceStat::Crit) - 0.15).abs() < 1e-6);
        assert_eq!(f.pierce(), 0);
    }

    #[test]
    fn test_sword_and_shield_block_bonus() {
        let mut f = base();
        Weapon::SwordAndShield.apply_to(&mut f);
        assert!((f.chance(ChanceStat::Block) - 0.20).abs() < 1e-6);
        assert!((f.chance(ChanceStat::Miss) - 0.19).abs() < 1e-6);
    }

    #[test]
    fn test_pistol_pierces_and_misses_more() {
        let mut f = base();
        Weapon::Pistol.apply_to(&mut f);
        assert_eq!(f.pierce(), 1);
        assert!((f.chance(ChanceStat::Miss) - 0.25).abs() < 1e-6);
        assert!((f.chance(ChanceStat::Crit) - 0.17).abs() < 1e-6);
    }

    #[test]
    fn test_strip_reverses_apply() {
        for weapon in Weapon::all() {
            let mut f = base();
            weapon.apply_to(&mut f);
            weapon.strip_from(&mut f);
            assert_eq!(f.attack(), 5, "{:?}", weapon);
            assert_eq!(f.pierce(), 0, "{:?}", weapon);
            for stat in ChanceStat::all() {
                assert!((f.chance(stat) - base().chance(stat)).abs() < 1e-6);
            }
        }
    }
}
