//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// In-game day counter (campaign time unit)
pub type Day = u32;

/// Battle round counter
pub type Round = u32;

/// Which of the two rosters in a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Tag prefixed to fighter names in the event log
    pub fn tag(self) -> &'static str {
        match self {
            Side::A => "[A]",
            Side::B => "[B]",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// Clamp a probability into [0, 1]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involution() {
        assert_eq!(Side::A.opponent(), Side::B);
        assert_eq!(Side::A.opponent().opponent(), Side::A);
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.3), 0.0);
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp01(0.25), 0.25);
    }
}
