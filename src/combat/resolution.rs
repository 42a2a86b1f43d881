//! Attack resolution
//!
//! One attack runs an ordered chain of checks that stops at the first
//! success: miss, block, dodge. If all three fail the attack lands and
//! damage is computed deterministically from stats, stances and one crit
//! roll. Each check is an independent uniform draw against a probability
//! clamped to [0, 1] at the point of use.

use rand::Rng;

use crate::combat::constants::{
    CRIT_MULTIPLIER, MIN_FINAL_DAMAGE, RALLY_CRIT_BONUS, RALLY_DAMAGE_BONUS,
};
use crate::combat::fighter::{ChanceStat, Fighter};
use crate::combat::stance::{AggressiveBonus, DefensiveBonus};
use crate::core::types::clamp01;

/// Details of a landed hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitReport {
    /// Damage before armor (after fatigue, stance, rally and crit)
    pub damage: i32,
    /// Defender armor after temp bonus, stance and pierce
    pub effective_armor: i32,
    /// HP actually removed
    pub final_damage: i32,
    /// Damage soaked by armor
    pub absorbed: i32,
    pub crit: bool,
    /// Attacker spent an aggressive stance on this hit
    pub aggressive: bool,
    /// Attacker carried the rally bonus into this hit
    pub rallied: bool,
    pub defender_died: bool,
    pub defender_stunned: bool,
}

/// Result of one attack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    Miss,
    Blocked,
    Dodged,
    Hit(HitReport),
}

impl AttackOutcome {
    pub fn hit(&self) -> Option<&HitReport> {
        match self {
            AttackOutcome::Hit(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.hit().is_some()
    }
}

fn roll<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>()
}

/// Resolve one attack of `attacker` against `defender`
///
/// Mutates the defender's HP and stun flag and the attacker's fatigue and
/// pending aggressive stance. The rally bonus is read but not cleared.
pub fn resolve_attack<R: Rng + ?Sized>(
    attacker: &mut Fighter,
    defender: &mut Fighter,
    rng: &mut R,
) -> AttackOutcome {
    // Step 1: Miss
    if roll(rng) < attacker.chance(ChanceStat::Miss) {
        return AttackOutcome::Miss;
    }

    let guard = if defender.has_defensive_stance() {
        DefensiveBonus::for_role(defender.role())
    } else {
        DefensiveBonus::none()
    };

    // Step 2: Block
    let block = clamp01(defender.chance(ChanceStat::Block) + guard.block);
    if roll(rng) < block {
        return AttackOutcome::Blocked;
    }

    // Step 3: Dodge
    let dodge = clamp01(defender.chance(ChanceStat::Dodge) + guard.dodge);
    if roll(rng) < dodge {
        return AttackOutcome::Dodged;
    }

    // Step 4: Base damage, worn down by fatigue
    let mut damage = (attacker.attack() - attacker.fatigue()).max(attacker.min_damage());
    let mut crit_chance = attacker.chance(ChanceStat::Crit);
    let mut stun_chance = attacker.chance(ChanceStat::StunOnCrit);

    // Step 5: Stance and rally bonuses
    let aggressive = attacker.take_aggressive_stance();
    if aggressive {
        let bonus = AggressiveBonus::for_role(attacker.role());
        damage += bonus.damage;
        crit_chance = clamp01(crit_chance + bonus.crit);
        stun_chance = clamp01(stun_chance + bonus.stun);
    }

    let rallied = attacker.has_battle_cry();
    if rallied {
        damage += RALLY_DAMAGE_BONUS;
        crit_chance = clamp01(crit_chance + RALLY_CRIT_BONUS);
    }

    // Step 6: Crit
    let crit = roll(rng) < crit_chance;
    if crit {
        damage *= CRIT_MULTIPLIER;
    }

    // Step 7: Armor, reduced by pierce
    let effective_armor =
        (defender.armor() + defender.temp_armor_bonus() + guard.armor - attacker.pierce()).max(0);
    let final_damage = (damage - effective_armor).max(MIN_FINAL_DAMAGE);
    let absorbed = (damage - final_damage).max(0);

    let mut report = HitReport {
        damage,
        effective_armor,
        final_damage,
        absorbed,
        crit,
        aggressive,
        rallied,
        defender_died: false,
        defender_stunned: false,
    };

    // Step 8: Apply damage. A killing blow never stuns.
    if defender.take_damage(final_damage) {
        report.defender_died = true;
        attacker.add_fatigue();
        return AttackOutcome::Hit(report);
    }

    // Step 9: Stun on crit
    if crit && roll(rng) < stun_chance {
        defender.stun();
        report.defender_stunned = true;
    }

    // Step 10: Fatigue rises once per landed hit
    attacker.add_fatigue();

    AttackOutcome::Hit(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::role::Role;
    use crate::combat::weapons::Weapon;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    /// Attacker that always lands, never crits
    fn sure_hitter(attack: i32) -> Fighter {
        Fighter::new("Attacker", 30, attack)
            .with_chance(ChanceStat::Miss, 0.0)
            .with_chance(ChanceStat::Crit, 0.0)
    }

    /// Defender that never blocks or dodges
    fn open_target(hp: i32, armor: i32) -> Fighter {
        Fighter::new("Defender", hp, 1)
            .with_armor(armor)
            .with_chance(ChanceStat::Block, 0.0)
            .with_chance(ChanceStat::Dodge, 0.0)
    }

    #[test]
    fn test_certain_miss() {
        let mut a = sure_hitter(6).with_chance(ChanceStat::Miss, 1.0);
        let mut d = open_target(20, 0);
        let outcome = resolve_attack(&mut a, &mut d, &mut rng());
        assert_eq!(outcome, AttackOutcome::Miss);
        assert!(!outcome.is_hit());
        assert_eq!(d.hp(), 20);
        assert_eq!(a.fatigue(), 0);
    }

    #[test]
    fn test_certain_block() {
        let mut a = sure_hitter(6);
        let mut d = open_target(20, 0).with_chance(ChanceStat::Block, 1.0);
        assert_eq!(resolve_attack(&mut a, &mut d, &mut rng()), AttackOutcome::Blocked);
        assert_eq!(a.fatigue(), 0);
    }

    #[test]
    fn test_certain_dodge() {
        let mut a = sure_hitter(6);
        let mut d = open_target(20, 0).with_chance(ChanceStat::Dodge, 1.0);
        assert_eq!(resolve_attack(&mut a, &mut d, &mut rng()), AttackOutcome::Dodged);
    }

    #[test]
    fn test_fatigue_and_armor_math() {
        let mut a = sure_hitter(6).with_fatigue(2);
        let mut d = open_target(20, 3);
        let outcome = resolve_attack(&mut a, &mut d, &mut rng());
        assert!(outcome.is_hit());
        let hit = outcome.hit().expect("should hit");
        assert_eq!(hit.damage, 4);
        assert_eq!(hit.effective_armor, 3);
        assert_eq!(hit.final_damage, 1);
        assert_eq!(hit.absorbed, 3);
        assert_eq!(d.hp(), 19);
        assert_eq!(a.fatigue(), 3);
    }

    #[test]
    fn test_pierce_reduces_armor() {
        let mut a = sure_hitter(6);
        Weapon::Axe.apply_to(&mut a);
        let mut d = open_target(20, 1);
        let hit = *resolve_attack(&mut a, &mut d, &mut rng()).hit().unwrap();
        assert_eq!(hit.effective_armor, 0);
        assert_eq!(hit.final_damage, 7);
    }

    #[test]
    fn test_minimum_damage_through_heavy_armor() {
        let mut a = sure_hitter(2);
        let mut d = open_target(20, 50);
        let hit = *resolve_attack(&mut a, &mut d, &mut rng()).hit().unwrap();
        assert_eq!(hit.final_damage, 1);
        assert_eq!(d.hp(), 19);
    }

    #[test]
    fn test_killing_blow_never_stuns() {
        let mut a = sure_hitter(6)
            .with_chance(ChanceStat::Crit, 1.0)
            .with_chance(ChanceStat::StunOnCrit, 1.0);
        let mut d = open_target(4, 0);
        let hit = *resolve_attack(&mut a, &mut d, &mut rng()).hit().unwrap();
        assert!(hit.crit);
        assert!(hit.defender_died);
        assert!(!hit.defender_stunned);
        assert!(!d.is_stunned());
        assert_eq!(d.hp(), 0);
        assert_eq!(a.fatigue(), 1);
    }

    #[test]
    fn test_crit_stuns_survivor() {
        let mut a = sure_hitter(6)
            .with_chance(ChanceStat::Crit, 1.0)
            .with_chance(ChanceStat::StunOnCrit, 1.0);
        let mut d = open_target(50, 0);
        let hit = *resolve_attack(&mut a, &mut d, &mut rng()).hit().unwrap();
        assert_eq!(hit.damage, 12);
        assert!(hit.defender_stunned);
        assert!(d.is_stunned());
    }

    #[test]
    fn test_aggressive_stance_consumed_on_hit() {
        let mut a = sure_hitter(6)
            .with_loadout(Role::Duelist, Weapon::None)
            .with_chance(ChanceStat::Crit, 0.0);
        a.enter_aggressive_stance();
        let mut d = open_target(50, 0);
        let outcome = resolve_attack(&mut a, &mut d, &mut rng());
        let hit = outcome.hit().unwrap();
        // 7 attack (duelist) + 3 duelist stance bonus; crit chance 0 + 0.15 may crit
        assert!(hit.aggressive);
        assert!(hit.damage == 10 || hit.damage == 20);
        assert!(!a.take_aggressive_stance());
    }

    #[test]
    fn test_aggressive_stance_survives_a_miss() {
        let mut a = sure_hitter(6).with_chance(ChanceStat::Miss, 1.0);
        a.enter_aggressive_stance();
        let mut d = open_target(50, 0);
        assert_eq!(resolve_attack(&mut a, &mut d, &mut rng()), AttackOutcome::Miss);
        assert!(a.take_aggressive_stance());
    }

    #[test]
    fn test_rally_bonus_read_not_cleared() {
        let mut a = sure_hitter(6);
        a.grant_battle_cry();
        let mut d = open_target(50, 0);
        let hit = *resolve_attack(&mut a, &mut d, &mut rng()).hit().unwrap();
        assert!(hit.rallied);
        assert!(hit.damage == 8 || hit.damage == 16);
        assert!(a.has_battle_cry());
    }

    #[test]
    fn test_defensive_stance_adds_armor() {
        let mut a = sure_hitter(6);
        let mut d = open_target(50, 1)
            .with_loadout(Role::Tank, Weapon::None)
            .with_chance(ChanceStat::Block, 0.0);
        d.enter_defensive_stance();
        // Every draw lands just under 1.0, so the stance's block and dodge
        // bonuses cannot stop the blow
        let mut high = StepRng::new(u64::MAX, 0);
        let outcome = resolve_attack(&mut a, &mut d, &mut high);
        let hit = outcome.hit().expect("stance bonuses below 1.0 never block");
        // 1 base + 1 tank + 2 tank stance
        assert_eq!(hit.effective_armor, 4);
        assert_eq!(hit.final_damage, 2);
    }

    #[test]
    fn test_temp_armor_counts() {
        let mut a = sure_hitter(6);
        let mut d = open_target(50, 1);
        d.add_temp_armor(2);
        let hit = *resolve_attack(&mut a, &mut d, &mut rng()).hit().unwrap();
        assert_eq!(hit.effective_armor, 3);
        assert_eq!(hit.final_damage, 3);
    }
}
