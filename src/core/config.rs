//! Balance configuration with documented defaults
//!
//! Tunables that shape battle pacing and the campaign economy. Fixed
//! per-role and per-weapon deltas live in `combat::constants` instead.
//!
//! The config is passed explicitly to the engine entry points that need it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Result, WarbandError};

/// Battle pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// HP at or below which the AI considers drinking a potion
    pub low_hp_threshold: i32,

    /// Chance the team-battle AI actually heals when low
    ///
    /// Duels ignore this and always heal when low.
    pub ai_heal_chance: f32,

    /// HP restored by one potion
    pub potion_heal: i32,

    /// Rounds after which a battle is called a draw
    ///
    /// Fatigue drives every fight toward an end, but a pair of fighters
    /// with miss chance 1.0 would never finish.
    pub max_rounds: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            low_hp_threshold: 10,
            ai_heal_chance: 0.5,
            potion_heal: 8,
            max_rounds: 200,
        }
    }
}

/// Experience and leveling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// XP granted to every surviving active fighter on victory
    pub victory_xp: u32,

    /// Threshold for level L is `xp_per_level * L`
    pub xp_per_level: u32,

    /// Immediate max-HP bump per level (also heals by the same amount)
    pub level_hp_bonus: i32,

    /// Immediate attack bump per level
    pub level_attack_bonus: i32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            victory_xp: 60,
            xp_per_level: 100,
            level_hp_bonus: 4,
            level_attack_bonus: 1,
        }
    }
}

/// Campaign economy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_gold: u32,
    pub starting_iron: u32,
    pub starting_steel: u32,

    /// Inclusive gold range found on an expedition
    pub expedition_gold_min: u32,
    pub expedition_gold_max: u32,

    /// HP every living fighter recovers when the day advances
    pub camp_recovery_hp: i32,

    /// Victory reward per defeated enemy
    pub reward_gold_per_enemy: u32,
    pub reward_iron_per_enemy: u32,
    pub reward_steel_per_enemy: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_gold: 60,
            starting_iron: 4,
            starting_steel: 2,
            expedition_gold_min: 5,
            expedition_gold_max: 15,
            camp_recovery_hp: 3,
            reward_gold_per_enemy: 12,
            reward_iron_per_enemy: 2,
            reward_steel_per_enemy: 1,
        }
    }
}

/// Complete balance configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceConfig {
    #[serde(default)]
    pub battle: BattleConfig,
    #[serde(default)]
    pub progression: ProgressionConfig,
    #[serde(default)]
    pub economy: EconomyConfig,
}

impl BalanceConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text (missing keys keep their defaults)
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: BalanceConfig =
            toml::from_str(text).map_err(|e| WarbandError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded balance config from {:?}", path);
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.battle.ai_heal_chance) {
            return Err(WarbandError::Config(format!(
                "ai_heal_chance ({}) must be within [0, 1]",
                self.battle.ai_heal_chance
            )));
        }

        if self.battle.potion_heal <= 0 {
            return Err(WarbandError::Config("potion_heal must be positive".into()));
        }

        if self.battle.max_rounds == 0 {
            return Err(WarbandError::Config("max_rounds must be positive".into()));
        }

        if self.progression.xp_per_level == 0 {
            return Err(WarbandError::Config("xp_per_level must be positive".into()));
        }

        if self.economy.expedition_gold_min > self.economy.expedition_gold_max {
            return Err(WarbandError::Config(format!(
                "expedition_gold_min ({}) should be <= expedition_gold_max ({})",
                self.economy.expedition_gold_min, self.economy.expedition_gold_max
            )));
        }

        Ok(())
    }
}
