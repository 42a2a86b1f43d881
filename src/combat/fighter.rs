//! Fighter model
//!
//! A fighter's stats are private. They change only through role/weapon
//! appliers, the attack pipeline, the turn scheduler and campaign
//! operations, all inside this crate. Every probability is re-clamped to
//! [0, 1] on each mutation.

use serde::{Deserialize, Serialize};

use crate::combat::constants::{
    DEFAULT_BLOCK_CHANCE, DEFAULT_CRIT_CHANCE, DEFAULT_DODGE_CHANCE, DEFAULT_MIN_DAMAGE,
    DEFAULT_MISS_CHANCE, DEFAULT_POTIONS, DEFAULT_STUN_ON_CRIT_CHANCE, FATIGUE_PER_HIT,
};
use crate::combat::role::Role;
use crate::combat::stance::{DefenseStance, NextTurnStance};
use crate::combat::weapons::Weapon;
use crate::core::types::clamp01;

/// The probability-typed stats of a fighter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChanceStat {
    Miss,
    Block,
    Dodge,
    Crit,
    StunOnCrit,
}

impl ChanceStat {
    pub fn all() -> [ChanceStat; 5] {
        [
            ChanceStat::Miss,
            ChanceStat::Block,
            ChanceStat::Dodge,
            ChanceStat::Crit,
            ChanceStat::StunOnCrit,
        ]
    }
}

/// Result of the start-of-turn check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStart {
    /// Fighter may act this turn
    Ready,
    /// Stun consumed, turn skipped
    Stunned,
    /// Fighter is down and never acts
    Dead,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    name: String,
    team_tag: String,

    hp: i32,
    max_hp: i32,
    attack: i32,
    armor: i32,
    pierce: i32,
    fatigue: i32,
    min_damage: i32,
    potions: u32,

    miss_chance: f32,
    block_chance: f32,
    dodge_chance: f32,
    crit_chance: f32,
    stun_on_crit_chance: f32,

    stunned: bool,
    battle_cry_bonus: bool,
    temp_armor_bonus: i32,
    next_turn_stance: NextTurnStance,
    defense_stance: DefenseStance,

    level: u32,
    experience: u32,
    pending_level_ups: u32,
    is_commander: bool,
    recruited: bool,

    role: Role,
    weapon: Weapon,
}

impl Fighter {
    /// A bare fighter with default chances and no role or weapon
    pub fn new(name: impl Into<String>, hp: i32, attack: i32) -> Self {
        let hp = hp.max(1);
        Self {
            name: name.into(),
            team_tag: String::new(),
            hp,
            max_hp: hp,
            attack,
            armor: 0,
            pierce: 0,
            fatigue: 0,
            min_damage: DEFAULT_MIN_DAMAGE,
            potions: DEFAULT_POTIONS,
            miss_chance: DEFAULT_MISS_CHANCE,
            block_chance: DEFAULT_BLOCK_CHANCE,
            dodge_chance: DEFAULT_DODGE_CHANCE,
            crit_chance: DEFAULT_CRIT_CHANCE,
            stun_on_crit_chance: DEFAULT_STUN_ON_CRIT_CHANCE,
            stunned: false,
            battle_cry_bonus: false,
            temp_armor_bonus: 0,
            next_turn_stance: NextTurnStance::None,
            defense_stance: DefenseStance::None,
            level: 1,
            experience: 0,
            pending_level_ups: 0,
            is_commander: false,
            recruited: false,
            role: Role::None,
            weapon: Weapon::None,
        }
    }

    // === CREATION-TIME BUILDERS ===

    pub fn with_armor(mut self, armor: i32) -> Self {
        self.armor = armor.max(0);
        self
    }

    pub fn with_potions(mut self, potions: u32) -> Self {
        self.potions = potions;
        self
    }

    pub fn with_fatigue(mut self, fatigue: i32) -> Self {
        self.fatigue = fatigue.max(0);
        self
    }

    pub fn with_chance(mut self, stat: ChanceStat, value: f32) -> Self {
        *self.chance_mut(stat) = clamp01(value);
        self
    }

    pub fn with_team_tag(mut self, tag: impl Into<String>) -> Self {
        self.team_tag = tag.into();
        self
    }

    /// Tag the fighter with a role and weapon and apply both, role first
    ///
    /// Appliers are additive: call this once per fighter.
    pub fn with_loadout(mut self, role: Role, weapon: Weapon) -> Self {
        self.role = role;
        self.weapon = weapon;
        role.apply_to(&mut self);
        weapon.apply_to(&mut self);
        self
    }

    // === READ ACCESS ===

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn team_tag(&self) -> &str {
        &self.team_tag
    }

    /// Name with team tag, as shown in the event log
    pub fn label(&self) -> String {
        if self.team_tag.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.team_tag, self.name)
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn attack(&self) -> i32 {
        self.attack
    }

    pub fn armor(&self) -> i32 {
        self.armor
    }

    pub fn pierce(&self) -> i32 {
        self.pierce
    }

    pub fn fatigue(&self) -> i32 {
        self.fatigue
    }

    pub fn min_damage(&self) -> i32 {
        self.min_damage
    }

    pub fn potions(&self) -> u32 {
        self.potions
    }

    pub fn chance(&self, stat: ChanceStat) -> f32 {
        match stat {
            ChanceStat::Miss => self.miss_chance,
            ChanceStat::Block => self.block_chance,
            ChanceStat::Dodge => self.dodge_chance,
            ChanceStat::Crit => self.crit_chance,
            ChanceStat::StunOnCrit => self.stun_on_crit_chance,
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.stunned
    }

    pub fn has_battle_cry(&self) -> bool {
        self.battle_cry_bonus
    }

    pub fn temp_armor_bonus(&self) -> i32 {
        self.temp_armor_bonus
    }

    pub fn next_turn_stance(&self) -> NextTurnStance {
        self.next_turn_stance
    }

    pub fn defense_stance(&self) -> DefenseStance {
        self.defense_stance
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn pending_level_ups(&self) -> u32 {
        self.pending_level_ups
    }

    pub fn is_commander(&self) -> bool {
        self.is_commander
    }

    /// Hired from a recruitment pool rather than part of the starting company
    pub fn is_recruited(&self) -> bool {
        self.recruited
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn weapon(&self) -> Weapon {
        self.weapon
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Rough strength estimate used for pricing and focus selection
    pub fn power_score(&self) -> i32 {
        let level_bonus = 6 * (self.level.saturating_sub(1) as i32);
        (self.max_hp + 4 * self.attack + 3 * self.armor + 3 * self.pierce + level_bonus).max(0)
    }

    // === VITALS ===

    /// Restore HP, capped at max HP. Returns the amount actually healed.
    pub fn heal_by(&mut self, amount: i32) -> i32 {
        if amount <= 0 || !self.is_alive() {
            return 0;
        }
        let before = self.hp;
        self.hp = (self.hp + amount).min(self.max_hp);
        self.hp - before
    }

    /// Subtract HP, flooring at exactly 0. Returns true if this killed.
    pub(crate) fn take_damage(&mut self, amount: i32) -> bool {
        self.hp -= amount.max(0);
        if self.hp <= 0 {
            self.hp = 0;
            return true;
        }
        false
    }

    /// Spend one potion on self. Returns HP healed, or None without potions.
    pub(crate) fn drink_potion(&mut self, heal: i32) -> Option<i32> {
        if !self.consume_potion() {
            return None;
        }
        Some(self.heal_by(heal))
    }

    pub(crate) fn consume_potion(&mut self) -> bool {
        if self.potions == 0 {
            return false;
        }
        self.potions -= 1;
        true
    }

    pub(crate) fn add_potions(&mut self, count: u32) {
        self.potions += count;
    }

    // === STAT MUTATION (appliers, progression, equipment) ===

    pub(crate) fn add_attack(&mut self, delta: i32) {
        self.attack += delta;
    }

    /// Armor never drops below 0
    pub(crate) fn add_armor(&mut self, delta: i32) {
        self.armor = (self.armor + delta).max(0);
    }

    pub(crate) fn add_pierce(&mut self, delta: i32) {
        self.pierce = (self.pierce + delta).max(0);
    }

    /// Raise max HP and current HP together
    pub(crate) fn add_max_hp(&mut self, delta: i32) {
        self.max_hp = (self.max_hp + delta).max(1);
        if self.is_alive() {
            self.hp = (self.hp + delta).clamp(1, self.max_hp);
        }
    }

    pub(crate) fn adjust_chance(&mut self, stat: ChanceStat, delta: f32) {
        let slot = self.chance_mut(stat);
        *slot = clamp01(*slot + delta);
    }

    fn chance_mut(&mut self, stat: ChanceStat) -> &mut f32 {
        match stat {
            ChanceStat::Miss => &mut self.miss_chance,
            ChanceStat::Block => &mut self.block_chance,
            ChanceStat::Dodge => &mut self.dodge_chance,
            ChanceStat::Crit => &mut self.crit_chance,
            ChanceStat::StunOnCrit => &mut self.stun_on_crit_chance,
        }
    }

    pub(crate) fn set_weapon(&mut self, weapon: Weapon) {
        self.weapon = weapon;
    }

    pub(crate) fn mark_commander(&mut self) {
        self.is_commander = true;
    }

    pub(crate) fn mark_recruited(&mut self) {
        self.recruited = true;
    }

    pub(crate) fn set_team_tag(&mut self, tag: &str) {
        self.team_tag = tag.to_string();
    }

    // === COMBAT STATE ===

    pub(crate) fn add_fatigue(&mut self) {
        self.fatigue += FATIGUE_PER_HIT;
    }

    pub(crate) fn stun(&mut self) {
        self.stunned = true;
    }

    /// Start-of-turn check
    ///
    /// A stunned fighter loses the stun and the turn. Otherwise a defensive
    /// stance raised last turn expires here.
    pub fn try_start_turn(&mut self) -> TurnStart {
        if !self.is_alive() {
            return TurnStart::Dead;
        }
        if self.stunned {
            self.stunned = false;
            return TurnStart::Stunned;
        }
        self.defense_stance = DefenseStance::None;
        TurnStart::Ready
    }

    pub(crate) fn enter_aggressive_stance(&mut self) {
        self.next_turn_stance = NextTurnStance::Aggressive;
    }

    pub(crate) fn enter_defensive_stance(&mut self) {
        self.defense_stance = DefenseStance::Defensive;
    }

    /// Consume a pending aggressive stance. Returns whether one was pending.
    pub(crate) fn take_aggressive_stance(&mut self) -> bool {
        let pending = self.next_turn_stance == NextTurnStance::Aggressive;
        self.next_turn_stance = NextTurnStance::None;
        pending
    }

    pub fn has_defensive_stance(&self) -> bool {
        self.defense_stance == DefenseStance::Defensive
    }

    pub(crate) fn grant_battle_cry(&mut self) {
        self.battle_cry_bonus = true;
    }

    pub(crate) fn clear_battle_cry(&mut self) {
        self.battle_cry_bonus = false;
    }

    pub(crate) fn add_temp_armor(&mut self, amount: i32) {
        self.temp_armor_bonus += amount;
    }

    /// Drop every battle-scoped modifier: armor patches, rally, stances, stun
    pub(crate) fn clear_temporary_effects(&mut self) {
        self.temp_armor_bonus = 0;
        self.battle_cry_bonus = false;
        self.next_turn_stance = NextTurnStance::None;
        self.defense_stance = DefenseStance::None;
        self.stunned = false;
    }

    // === PROGRESSION ===

    pub(crate) fn add_experience(&mut self, xp: u32) {
        self.experience += xp;
    }

    /// Spend `threshold` XP on one level with its immediate stat bumps
    pub(crate) fn advance_level(&mut self, threshold: u32, hp_bonus: i32, attack_bonus: i32) {
        self.experience = self.experience.saturating_sub(threshold);
        self.level += 1;
        self.pending_level_ups += 1;
        self.add_max_hp(hp_bonus);
        self.attack += attack_bonus;
    }

    /// Raise level without XP or a token (pre-leveled candidates and enemies)
    pub(crate) fn train_level(&mut self, hp_bonus: i32, attack_bonus: i32) {
        self.level += 1;
        self.add_max_hp(hp_bonus);
        self.attack += attack_bonus;
    }

    pub(crate) fn take_pending_level_up(&mut self) -> bool {
        if self.pending_level_ups == 0 {
            return false;
        }
        self.pending_level_ups -= 1;
        true
    }
}
