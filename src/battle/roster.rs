//! Slot-indexed fighter rosters
//!
//! Membership is by slot index. An empty slot holds no fighter, and slot
//! identity is stable: removing a fighter never shifts the others.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::Fighter;
use crate::core::error::{Result, WarbandError};

/// Slot count of the campaign roster and reserve
pub const ROSTER_CAPACITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    slots: Vec<Option<Fighter>>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(ROSTER_CAPACITY)
    }
}

impl Roster {
    /// An empty roster with `capacity` slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// An ad-hoc team sized exactly to its fighters
    pub fn from_fighters(fighters: Vec<Fighter>) -> Self {
        Self {
            slots: fighters.into_iter().map(Some).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<Fighter>] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<&Fighter> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Fighter> {
        self.slots.get_mut(slot).and_then(|s| s.as_mut())
    }

    /// Occupied slots with their indices
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Fighter)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|f| (i, f)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut Fighter)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.as_mut().map(|f| (i, f)))
    }

    fn check_slot(&self, slot: usize) -> Result<()> {
        if slot >= self.slots.len() {
            return Err(WarbandError::InvalidSlot {
                slot,
                capacity: self.slots.len(),
            });
        }
        Ok(())
    }

    /// Put a fighter into an empty slot
    pub fn insert(&mut self, slot: usize, fighter: Fighter) -> Result<()> {
        self.check_slot(slot)?;
        if self.slots[slot].is_some() {
            return Err(WarbandError::SlotOccupied(slot));
        }
        self.slots[slot] = Some(fighter);
        Ok(())
    }

    /// Remove and return the fighter in a slot
    pub fn take(&mut self, slot: usize) -> Result<Fighter> {
        self.check_slot(slot)?;
        self.slots[slot].take().ok_or(WarbandError::EmptySlot(slot))
    }

    /// Overwrite a slot, returning what was there
    pub(crate) fn replace(&mut self, slot: usize, fighter: Option<Fighter>) -> Option<Fighter> {
        match self.slots.get_mut(slot) {
            Some(entry) => std::mem::replace(entry, fighter),
            None => fighter,
        }
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_none())
    }

    /// Put a fighter into the first empty slot
    pub fn push(&mut self, fighter: Fighter) -> Result<usize> {
        let slot = self.first_empty().ok_or(WarbandError::RosterFull)?;
        self.slots[slot] = Some(fighter);
        Ok(slot)
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.first_empty().is_none()
    }

    pub fn alive_count(&self) -> usize {
        self.iter().filter(|(_, f)| f.is_alive()).count()
    }

    pub fn any_alive(&self) -> bool {
        self.iter().any(|(_, f)| f.is_alive())
    }

    pub fn is_alive_at(&self, slot: usize) -> bool {
        self.get(slot).map_or(false, |f| f.is_alive())
    }

    pub fn living_indices(&self) -> Vec<usize> {
        self.iter()
            .filter(|(_, f)| f.is_alive())
            .map(|(i, _)| i)
            .collect()
    }

    /// Uniform pick among living fighters
    pub fn random_alive_index<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let living = self.living_indices();
        if living.is_empty() {
            return None;
        }
        Some(living[rng.gen_range(0..living.len())])
    }

    pub fn total_hp(&self) -> i32 {
        self.iter().map(|(_, f)| f.hp()).sum()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(_, f)| f.name())
    }

    /// First living fighter marked as commander
    pub fn living_commander(&self) -> Option<&Fighter> {
        self.iter()
            .map(|(_, f)| f)
            .find(|f| f.is_alive() && f.is_commander())
    }

    pub fn has_living_commander(&self) -> bool {
        self.living_commander().is_some()
    }

    pub(crate) fn set_team_tag(&mut self, tag: &str) {
        for (_, fighter) in self.iter_mut() {
            fighter.set_team_tag(tag);
        }
    }

    /// Empty every slot whose fighter has fallen. Returns the fallen.
    pub(crate) fn remove_fallen(&mut self) -> Vec<Fighter> {
        let mut fallen = Vec::new();
        for slot in self.slots.iter_mut() {
            if slot.as_ref().map_or(false, |f| !f.is_alive()) {
                if let Some(fighter) = slot.take() {
                    fallen.push(fighter);
                }
            }
        }
        fallen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fighter(name: &str) -> Fighter {
        Fighter::new(name, 20, 5)
    }

    #[test]
    fn test_push_fills_first_empty_slot() {
        let mut roster = Roster::new(3);
        assert_eq!(roster.push(fighter("a")).unwrap(), 0);
        assert_eq!(roster.push(fighter("b")).unwrap(), 1);
        roster.take(0).unwrap();
        assert_eq!(roster.push(fighter("c")).unwrap(), 0);
        assert_eq!(roster.get(1).unwrap().name(), "b");
    }

    #[test]
    fn test_full_roster_refuses_push() {
        let mut roster = Roster::new(1);
        roster.push(fighter("a")).unwrap();
        assert!(matches!(roster.push(fighter("b")), Err(WarbandError::RosterFull)));
    }

    #[test]
    fn test_slot_errors() {
        let mut roster = Roster::new(2);
        assert!(matches!(
            roster.take(5),
            Err(WarbandError::InvalidSlot { slot: 5, capacity: 2 })
        ));
        assert!(matches!(roster.take(1), Err(WarbandError::EmptySlot(1))));
        roster.insert(1, fighter("a")).unwrap();
        assert!(matches!(
            roster.insert(1, fighter("b")),
            Err(WarbandError::SlotOccupied(1))
        ));
    }

    #[test]
    fn test_living_indices_skip_dead_and_empty() {
        let mut roster = Roster::new(4);
        roster.insert(0, fighter("a")).unwrap();
        roster.insert(2, fighter("b")).unwrap();
        roster.insert(3, fighter("c")).unwrap();
        roster.get_mut(2).unwrap().take_damage(100);

        assert_eq!(roster.living_indices(), vec![0, 3]);
        assert_eq!(roster.alive_count(), 2);
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn test_random_alive_index_only_living() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut roster = Roster::from_fighters(vec![fighter("a"), fighter("b"), fighter("c")]);
        roster.get_mut(1).unwrap().take_damage(100);
        for _ in 0..50 {
            let idx = roster.random_alive_index(&mut rng).unwrap();
            assert_ne!(idx, 1);
        }
        roster.get_mut(0).unwrap().take_damage(100);
        roster.get_mut(2).unwrap().take_damage(100);
        assert_eq!(roster.random_alive_index(&mut rng), None);
    }

    #[test]
    fn test_remove_fallen_keeps_slot_identity() {
        let mut roster = Roster::from_fighters(vec![fighter("a"), fighter("b"), fighter("c")]);
        roster.get_mut(1).unwrap().take_damage(100);
        let fallen = roster.remove_fallen();
        assert_eq!(fallen.len(), 1);
        assert!(roster.get(1).is_none());
        assert_eq!(roster.get(2).unwrap().name(), "c");
    }

    #[test]
    fn test_living_commander_detection() {
        use crate::combat::{Role, Weapon};
        let captain = fighter("cap").with_loadout(Role::Commander, Weapon::SwordAndShield);
        let mut roster = Roster::from_fighters(vec![fighter("a"), captain]);
        assert!(roster.has_living_commander());
        assert_eq!(roster.living_commander().map(Fighter::name), Some("cap"));
        roster.get_mut(1).unwrap().take_damage(100);
        assert!(!roster.has_living_commander());
    }
}
