//! Fighter model and per-attack combat resolution

pub mod archetype;
pub mod constants;
pub mod fighter;
pub mod resolution;
pub mod role;
pub mod stance;
pub mod weapons;

pub use archetype::{create_fighter, Archetype, ArchetypeSelector};
pub use fighter::{ChanceStat, Fighter, TurnStart};
pub use resolution::{resolve_attack, AttackOutcome, HitReport};
pub use role::Role;
pub use stance::{AggressiveBonus, DefenseStance, DefensiveBonus, NextTurnStance};
pub use weapons::{Direction, Weapon, WeaponProfile};
