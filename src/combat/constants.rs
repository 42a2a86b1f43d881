//! Combat constants - fixed values shared by fighters and the attack pipeline
//!
//! Probabilities are ADDITIVE deltas, always clamped to [0, 1] when applied.

// Fighter defaults
pub const DEFAULT_POTIONS: u32 = 1;
pub const DEFAULT_MIN_DAMAGE: i32 = 1;
pub const DEFAULT_MISS_CHANCE: f32 = 0.20;
pub const DEFAULT_BLOCK_CHANCE: f32 = 0.15;
pub const DEFAULT_DODGE_CHANCE: f32 = 0.10;
pub const DEFAULT_CRIT_CHANCE: f32 = 0.10;
pub const DEFAULT_STUN_ON_CRIT_CHANCE: f32 = 0.25;

// Damage
pub const CRIT_MULTIPLIER: i32 = 2;
/// A landed hit always deals at least this much, whatever the armor
pub const MIN_FINAL_DAMAGE: i32 = 1;
pub const FATIGUE_PER_HIT: i32 = 1;

// Rally (battle cry) - one-shot, cleared after the bearer's attack
pub const RALLY_DAMAGE_BONUS: i32 = 2;
pub const RALLY_CRIT_BONUS: f32 = 0.10;

// Level-up token redemption
pub const VITALITY_HP_BONUS: i32 = 5;
pub const PRECISION_CRIT_BONUS: f32 = 0.03;
pub const PRECISION_MISS_REDUCTION: f32 = 0.02;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chances_are_probabilities() {
        for p in [
            DEFAULT_MISS_CHANCE,
            DEFAULT_BLOCK_CHANCE,
            DEFAULT_DODGE_CHANCE,
            DEFAULT_CRIT_CHANCE,
            DEFAULT_STUN_ON_CRIT_CHANCE,
        ] {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_damage_floor_positive() {
        assert!(DEFAULT_MIN_DAMAGE >= 1);
        assert!(MIN_FINAL_DAMAGE >= 1);
        assert!(CRIT_MULTIPLIER > 1);
    }
}
