//! Fighter roles
//!
//! A role is a one-shot passive modifier applied when the fighter is created.
//! Deltas are additive: applying the same role twice doubles them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combat::fighter::{ChanceStat, Fighter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    None,
    /// Armored, blocks more
    Tank,
    /// Damage and crits
    Duelist,
    /// Mobile, dodges more
    Skirmisher,
    /// Extra potion, stuns on crit
    Support,
    /// Leads the company, sounds the battle cry
    Commander,
}

impl Role {
    pub fn all() -> [Role; 6] {
        [
            Role::None,
            Role::Tank,
            Role::Duelist,
            Role::Skirmisher,
            Role::Support,
            Role::Commander,
        ]
    }

    /// Apply this role's passive deltas
    pub fn apply_to(self, fighter: &mut Fighter) {
        match self {
            Role::None => {}
            Role::Tank => {
                fighter.add_armor(1);
                fighter.adjust_chance(ChanceStat::Block, 0.05);
                fighter.adjust_chance(ChanceStat::Miss, -0.02);
            }
            Role::Duelist => {
                fighter.add_attack(1);
                fighter.adjust_chance(ChanceStat::Crit, 0.05);
                fighter.adjust_chance(ChanceStat::Dodge, -0.02);
            }
            Role::Skirmisher => {
                fighter.adjust_chance(ChanceStat::Dodge, 0.05);
                fighter.adjust_chance(ChanceStat::Miss, -0.01);
                fighter.add_armor(-1);
            }
            Role::Support => {
                fighter.adjust_chance(ChanceStat::Block, 0.03);
                fighter.adjust_chance(ChanceStat::StunOnCrit, 0.05);
                fighter.add_potions(1);
            }
            Role::Commander => {
                fighter.adjust_chance(ChanceStat::Block, 0.05);
                fighter.add_attack(2);
                fighter.add_potions(2);
                fighter.mark_commander();
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::None => "None",
            Role::Tank => "Tank",
            Role::Duelist => "Duelist",
            Role::Skirmisher => "Skirmisher",
            Role::Support => "Support",
            Role::Commander => "Commander",
        };
        f.write_str(name)
    }
}
