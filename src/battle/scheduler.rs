//! Round order
//!
//! Every living fighter on both sides gets exactly one entry per round. The
//! combined list is shuffled as a whole, so the two sides interleave.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::roster::Roster;
use crate::core::types::Side;

/// One actor's place in the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEntry {
    /// Side the actor fights for
    pub side: Side,
    /// Actor's slot in its own roster
    pub slot: usize,
}

impl RoundEntry {
    /// The roster this actor attacks
    pub fn opposing(&self) -> Side {
        self.side.opponent()
    }
}

/// Build a fresh, fully shuffled round order
pub fn build_round_order<R: Rng + ?Sized>(
    side_a: &Roster,
    side_b: &Roster,
    rng: &mut R,
) -> Vec<RoundEntry> {
    let mut order: Vec<RoundEntry> = side_a
        .living_indices()
        .into_iter()
        .map(|slot| RoundEntry { side: Side::A, slot })
        .chain(
            side_b
                .living_indices()
                .into_iter()
                .map(|slot| RoundEntry { side: Side::B, slot }),
        )
        .collect();

    order.shuffle(rng);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Fighter;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn team(n: usize) -> Roster {
        Roster::from_fighters((0..n).map(|i| Fighter::new(format!("f{}", i), 20, 5)).collect())
    }

    #[test]
    fn test_one_entry_per_living_fighter() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let a = team(3);
        let mut b = team(4);
        b.get_mut(2).unwrap().take_damage(100);

        let order = build_round_order(&a, &b, &mut rng);
        assert_eq!(order.len(), 6);
        assert_eq!(order.iter().filter(|e| e.side == Side::A).count(), 3);
        assert!(!order.contains(&RoundEntry { side: Side::B, slot: 2 }));
    }

    #[test]
    fn test_sides_interleave() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let a = team(5);
        let b = team(5);
        let interleaved = (0..20).any(|_| {
            let order = build_round_order(&a, &b, &mut rng);
            order.windows(2).any(|w| w[0].side != w[1].side)
                && order[..5].iter().any(|e| e.side == Side::B)
        });
        assert!(interleaved);
    }

    #[test]
    fn test_opposing_side() {
        let entry = RoundEntry { side: Side::B, slot: 0 };
        assert_eq!(entry.opposing(), Side::A);
    }
}
