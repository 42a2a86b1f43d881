//! Combat stance system
//!
//! Stances are temporary modifiers chosen by the controller instead of an
//! attack. Aggressive is one-shot: it waits for the bearer's next attack and
//! is consumed by it. Defensive lasts until the start of the bearer's own
//! next turn, whether or not anyone attacks them meanwhile.

use serde::{Deserialize, Serialize};

use crate::combat::role::Role;

/// Pending offensive stance, consumed by the next attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NextTurnStance {
    #[default]
    None,
    Aggressive,
}

/// Active defensive stance, expires at the bearer's next turn start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DefenseStance {
    #[default]
    None,
    Defensive,
}

/// What an aggressive stance adds to the bearer's next attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggressiveBonus {
    pub damage: i32,
    pub crit: f32,
    pub stun: f32,
}

impl AggressiveBonus {
    pub fn for_role(role: Role) -> Self {
        let damage = match role {
            Role::Duelist => 3,
            Role::Tank => 1,
            Role::Commander => 2,
            _ => 2,
        };
        let crit = match role {
            Role::Duelist => 0.15,
            _ => 0.10,
        };
        let stun = match role {
            Role::Tank => 0.15,
            _ => 0.10,
        };
        Self { damage, crit, stun }
    }
}

/// What a defensive stance adds when the bearer is attacked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefensiveBonus {
    pub block: f32,
    pub dodge: f32,
    pub armor: i32,
}

impl DefensiveBonus {
    pub fn for_role(role: Role) -> Self {
        let block = match role {
            Role::Tank => 0.15,
            Role::Support => 0.12,
            _ => 0.10,
        };
        let dodge = match role {
            Role::Skirmisher => 0.15,
            _ => 0.05,
        };
        let armor = match role {
            Role::Tank => 2,
            _ => 1,
        };
        Self {
            block,
            dodge,
            armor,
        }
    }

    /// Bonus when no defensive stance is active
    pub fn none() -> Self {
        Self {
            block: 0.0,
            dodge: 0.0,
            armor: 0,
        }
    }
}
