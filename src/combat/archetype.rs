//! Fighter archetypes and name generation
//!
//! Two fixed presets (Landsknecht, Swiss), the campaign Captain, and five
//! randomized mercenary archetypes. Every fighter leaves here with its role
//! and weapon already applied.

use ahash::AHashSet;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combat::fighter::{ChanceStat, Fighter};
use crate::combat::role::Role;
use crate::combat::weapons::Weapon;

/// Draws per phase before the oracle widens its search
const ATTEMPTS_PER_PHASE: usize = 8;

/// Fighter archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    // Fixed presets
    Landsknecht,
    Swiss,
    /// Campaign commander only
    Captain,

    // Randomized mercenaries
    Spaniard,
    Gallowglass,
    Conquistador,
    Condottiere,
    Reiter,
}

impl Archetype {
    pub fn presets() -> [Archetype; 2] {
        [Archetype::Landsknecht, Archetype::Swiss]
    }

    pub fn mercenaries() -> [Archetype; 5] {
        [
            Archetype::Spaniard,
            Archetype::Gallowglass,
            Archetype::Conquistador,
            Archetype::Condottiere,
            Archetype::Reiter,
        ]
    }

    /// Everything that may appear in a recruitment pool or enemy band
    pub fn hireable() -> [Archetype; 7] {
        [
            Archetype::Landsknecht,
            Archetype::Swiss,
            Archetype::Spaniard,
            Archetype::Gallowglass,
            Archetype::Conquistador,
            Archetype::Condottiere,
            Archetype::Reiter,
        ]
    }

    pub fn is_mercenary(self) -> bool {
        Self::mercenaries().contains(&self)
    }

    /// Default role for this archetype
    pub fn role(self) -> Role {
        match self {
            Archetype::Landsknecht | Archetype::Swiss | Archetype::Gallowglass => Role::Tank,
            Archetype::Captain => Role::Commander,
            Archetype::Spaniard | Archetype::Conquistador => Role::Duelist,
            Archetype::Condottiere => Role::Support,
            Archetype::Reiter => Role::Skirmisher,
        }
    }

    fn given_names(self) -> &'static [&'static str] {
        match self {
            Archetype::Landsknecht => &[
                "Hans", "Jorg", "Kaspar", "Ulrich", "Wendel", "Lienhart", "Matthes", "Sebolt",
            ],
            Archetype::Swiss => &[
                "Ueli", "Heini", "Ruedi", "Werni", "Jost", "Peterman", "Arnold", "Melchior",
            ],
            Archetype::Captain => &["Georg", "Florian", "Konrad", "Wolf", "Eitel", "Goetz"],
            Archetype::Spaniard => &[
                "Diego", "Rodrigo", "Alonso", "Inigo", "Gonzalo", "Pedro", "Sancho", "Martin",
            ],
            Archetype::Gallowglass => &[
                "Domhnall", "Ruairi", "Toirdhealbhach", "Eoin", "Colla", "Somhairle", "Niall",
            ],
            Archetype::Conquistador => &[
                "Hernan", "Francisco", "Vasco", "Pedrarias", "Nuno", "Gaspar", "Lope",
            ],
            Archetype::Condottiere => &[
                "Bartolomeo", "Niccolo", "Braccio", "Muzio", "Giovanni", "Erasmo", "Federico",
            ],
            Archetype::Reiter => &[
                "Lazarus", "Veit", "Bastian", "Claus", "Dietrich", "Ambrosius", "Hieronymus",
            ],
        }
    }

    fn random_name<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        let names = self.given_names();
        let given = names[rng.gen_range(0..names.len())];
        format!("{} the {}", given, self)
    }

    /// Build a fighter of this archetype with a fresh random name
    pub fn roll<R: Rng + ?Sized>(self, rng: &mut R) -> Fighter {
        let name = self.random_name(rng);
        self.build(name, rng)
    }

    /// Build a fighter of this archetype under the given name
    pub fn build<R: Rng + ?Sized>(self, name: String, rng: &mut R) -> Fighter {
        match self {
            Archetype::Landsknecht => Fighter::new(name, 30, 5)
                .with_armor(2)
                .with_loadout(Role::Tank, Weapon::Greatsword),
            Archetype::Swiss => {
                let weapon = if rng.gen_bool(0.7) {
                    Weapon::Spear
                } else {
                    Weapon::SwordAndShield
                };
                Fighter::new(name, 25, 6)
                    .with_armor(1)
                    .with_loadout(Role::Tank, weapon)
            }
            Archetype::Captain => Fighter::new(name, 32, 6)
                .with_armor(1)
                .with_loadout(Role::Commander, Weapon::SwordAndShield),
            mercenary => {
                let (armor, weapon) = match mercenary {
                    Archetype::Reiter => (1, Weapon::Pistol),
                    Archetype::Gallowglass => (0, Weapon::Axe),
                    _ => (0, Weapon::SwordAndShield),
                };
                Fighter::new(name, rng.gen_range(22..=35), rng.gen_range(4..=7))
                    .with_armor(armor)
                    .with_potions(rng.gen_range(0..=2))
                    .with_chance(ChanceStat::Block, rng.gen_range(0.10..0.20))
                    .with_chance(ChanceStat::Dodge, rng.gen_range(0.05..0.15))
                    .with_chance(ChanceStat::Crit, rng.gen_range(0.08..0.18))
                    .with_chance(ChanceStat::Miss, rng.gen_range(0.15..0.25))
                    .with_chance(ChanceStat::StunOnCrit, rng.gen_range(0.20..0.35))
                    .with_loadout(mercenary.role(), weapon)
            }
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Archetype::Landsknecht => "Landsknecht",
            Archetype::Swiss => "Swiss",
            Archetype::Captain => "Captain",
            Archetype::Spaniard => "Spaniard",
            Archetype::Gallowglass => "Gallowglass",
            Archetype::Conquistador => "Conquistador",
            Archetype::Condottiere => "Condottiere",
            Archetype::Reiter => "Reiter",
        };
        f.write_str(name)
    }
}

/// Which archetypes a creation request may draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchetypeSelector {
    Exact(Archetype),
    AnyPreset,
    AnyMercenary,
    /// Any hireable archetype (never the Captain)
    Any,
}

impl ArchetypeSelector {
    pub fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> Archetype {
        match self {
            ArchetypeSelector::Exact(archetype) => archetype,
            ArchetypeSelector::AnyPreset => pick_from(&Archetype::presets(), rng),
            ArchetypeSelector::AnyMercenary => pick_from(&Archetype::mercenaries(), rng),
            ArchetypeSelector::Any => pick_from(&Archetype::hireable(), rng),
        }
    }

    /// Whether this selector can produce `archetype`
    pub fn includes(self, archetype: Archetype) -> bool {
        match self {
            ArchetypeSelector::Exact(exact) => exact == archetype,
            ArchetypeSelector::AnyPreset => Archetype::presets().contains(&archetype),
            ArchetypeSelector::AnyMercenary => archetype.is_mercenary(),
            ArchetypeSelector::Any => Archetype::hireable().contains(&archetype),
        }
    }

    /// Hireable archetypes outside this selector, or all of them when it
    /// already covers every hireable category
    fn other_categories(self) -> Vec<Archetype> {
        let others: Vec<Archetype> = Archetype::hireable()
            .into_iter()
            .filter(|archetype| !self.includes(*archetype))
            .collect();
        if others.is_empty() {
            Archetype::hireable().to_vec()
        } else {
            others
        }
    }
}

fn pick_from<R: Rng + ?Sized>(choices: &[Archetype], rng: &mut R) -> Archetype {
    choices[rng.gen_range(0..choices.len())]
}

/// Create a fighter whose name is not in `taken`
///
/// Tries the requested selector first, then the other categories, and finally
/// accepts one unconstrained draw if every name it rolled was taken.
pub fn create_fighter<R: Rng + ?Sized>(
    selector: ArchetypeSelector,
    taken: &AHashSet<String>,
    rng: &mut R,
) -> Fighter {
    for _ in 0..ATTEMPTS_PER_PHASE {
        let fighter = selector.pick(rng).roll(rng);
        if !taken.contains(fighter.name()) {
            return fighter;
        }
    }

    let others = selector.other_categories();
    for _ in 0..ATTEMPTS_PER_PHASE {
        let fighter = pick_from(&others, rng).roll(rng);
        if !taken.contains(fighter.name()) {
            return fighter;
        }
    }

    let fighter = selector.pick(rng).roll(rng);
    tracing::warn!(
        name = fighter.name(),
        "name oracle exhausted its attempts, accepting a duplicate"
    );
    fighter
}
