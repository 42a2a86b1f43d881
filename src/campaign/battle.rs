//! Battle resolution for the campaign layer
//!
//! The company fights on copies of its active roster. Once the battle is
//! over the copies are written back slot by slot, victory rewards are paid,
//! the fallen are struck from the roster and the day advances.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::battle::{BattleOutcome, BattleState, Roster};
use crate::campaign::loot::{roll_loot, victory_reward, LootRoll};
use crate::campaign::progression::{grant_experience, train_to_level};
use crate::campaign::state::{CampaignState, Currencies};
use crate::combat::{create_fighter, ArchetypeSelector, Fighter};
use crate::core::error::{Result, WarbandError};
use crate::core::log::{LogEntry, Verbosity};
use crate::core::types::{Day, Round, Side};

/// Days per extra enemy level
pub const DAYS_PER_ENEMY_LEVEL: u32 = 6;

/// Levels gained by one fighter from a victory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelGain {
    pub name: String,
    pub levels: u32,
    pub new_level: u32,
}

/// What the company gets out of a won battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VictorySpoils {
    pub xp_each: u32,
    pub level_gains: Vec<LevelGain>,
    pub reward: Currencies,
    pub loot: LootRoll,
}

/// Results of one campaign battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    /// Day the battle was fought on
    pub day: Day,
    pub outcome: BattleOutcome,
    pub rounds: Round,
    pub enemies: Vec<String>,
    /// Present only for a victory
    pub spoils: Option<VictorySpoils>,
    /// Names of company fighters who fell
    pub fallen: Vec<String>,
    /// The battle's own narrative
    pub log: Vec<LogEntry>,
}

impl BattleReport {
    pub fn is_victory(&self) -> bool {
        self.outcome == BattleOutcome::Victory(Side::A)
    }
}

/// Level of the enemies met on `day`
pub fn enemy_level(day: Day) -> u32 {
    1 + day / DAYS_PER_ENEMY_LEVEL
}

/// Slot of the enemy with the highest power score
pub fn strongest_slot(roster: &Roster) -> Option<usize> {
    roster
        .iter()
        .filter(|(_, f)| f.is_alive())
        .max_by_key(|(_, f)| f.power_score())
        .map(|(slot, _)| slot)
}

impl CampaignState {
    /// Spawn an enemy band sized to the active roster
    fn muster_enemies<R: RngCore>(&self, rng: &mut R) -> Vec<Fighter> {
        let mut taken = self.taken_names();
        let level = enemy_level(self.day);

        (0..self.roster.len())
            .map(|_| {
                let mut enemy = create_fighter(ArchetypeSelector::Any, &taken, rng);
                taken.insert(enemy.name().to_string());
                train_to_level(&mut enemy, level, &self.config.progression);
                enemy
            })
            .collect()
    }

    /// Fight the day's battle to its conclusion and apply the outcome
    pub fn next_battle<R: RngCore>(&mut self, rng: &mut R) -> Result<BattleReport> {
        if !self.roster.any_alive() {
            return Err(WarbandError::InvalidAction(
                "no living fighters on the active roster".to_string(),
            ));
        }

        let day = self.day;
        let enemies = Roster::from_fighters(self.muster_enemies(rng));
        let enemy_names: Vec<String> = enemies.names().map(str::to_string).collect();

        let mut battle = BattleState::new(
            self.roster.clone(),
            enemies,
            self.config.battle.clone(),
            self.log.config(),
        );
        if self.focus_next_battle {
            let target = strongest_slot(&battle.side_b);
            battle.set_focus(Side::A, target);
            self.focus_next_battle = false;
        }

        let outcome = battle.run_to_end(rng);
        let rounds = battle.round;
        let log = battle.log.drain();
        self.reconcile(&mut battle.side_a);
        tracing::info!(day, rounds, %outcome, "campaign battle resolved");

        let spoils = match outcome {
            BattleOutcome::Victory(Side::A) => Some(self.collect_spoils(enemy_names.len(), rng)),
            _ => None,
        };

        let fallen: Vec<String> = self
            .roster
            .remove_fallen()
            .into_iter()
            .map(|f| f.name().to_string())
            .collect();
        for name in &fallen {
            self.log.log(Verbosity::Brief, format!("{} is buried on the field", name));
        }

        let verdict = match outcome {
            BattleOutcome::Victory(Side::A) => "Victory",
            BattleOutcome::Victory(Side::B) => "Defeat",
            _ => "Stalemate",
        };
        self.log.log(
            Verbosity::Brief,
            format!("{} after {} rounds against {} foes", verdict, rounds, enemy_names.len()),
        );
        self.advance_day();

        Ok(BattleReport {
            day,
            outcome,
            rounds,
            enemies: enemy_names,
            spoils,
            fallen,
            log,
        })
    }

    /// Write battle copies back into their roster slots
    fn reconcile(&mut self, returned: &mut Roster) {
        for slot in 0..self.roster.capacity() {
            if self.roster.get(slot).is_none() {
                continue;
            }
            let mut fighter = returned.replace(slot, None);
            if let Some(fighter) = fighter.as_mut() {
                fighter.set_team_tag("");
                fighter.clear_temporary_effects();
            }
            if fighter.is_some() {
                self.roster.replace(slot, fighter);
            }
        }
    }

    fn collect_spoils<R: RngCore>(&mut self, enemy_count: usize, rng: &mut R) -> VictorySpoils {
        let xp_each = self.config.progression.victory_xp;
        let mut level_gains = Vec::new();
        for (_, fighter) in self.roster.iter_mut() {
            if !fighter.is_alive() {
                continue;
            }
            let levels = grant_experience(fighter, xp_each, &self.config.progression);
            if levels > 0 {
                level_gains.push(LevelGain {
                    name: fighter.name().to_string(),
                    levels,
                    new_level: fighter.level(),
                });
            }
        }
        for gain in &level_gains {
            self.log.log(
                Verbosity::Brief,
                format!("{} reaches level {}", gain.name, gain.new_level),
            );
        }

        let reward = victory_reward(enemy_count, &self.config.economy);
        self.currencies.add(&reward);

        let loot = roll_loot(rng);
        if let Some(item) = loot.item() {
            self.stash.add(item, 1);
        }
        self.log.log(
            Verbosity::Brief,
            format!("The company takes {} and finds {}", reward, loot),
        );

        VictorySpoils {
            xp_each,
            level_gains,
            reward,
            loot,
        }
    }
}
