//! Battle system - two rosters, shuffled rounds, one action per fighter
//!
//! Rosters are slot arrays. Each round every living fighter acts once in a
//! single shuffled order across both sides, and the round stops the moment
//! a side is wiped out.

pub mod controller;
pub mod duel;
pub mod execution;
pub mod roster;
pub mod scheduler;

pub use controller::{AutoController, Controller, ScriptedController, TurnAction, TurnContext};
pub use duel::duel;
pub use execution::{BattleMode, BattleOutcome, BattlePhase, BattleState, BattleSummary, SideSummary};
pub use roster::{Roster, ROSTER_CAPACITY};
pub use scheduler::{build_round_order, RoundEntry};
