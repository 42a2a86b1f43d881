//! Turn decision seam
//!
//! A `Controller` picks exactly one action for a fighter whose turn has
//! started. The AI implementation is swappable with a player-driven or
//! scripted one without touching the execution loop.

use std::collections::VecDeque;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::battle::roster::Roster;
use crate::combat::Fighter;
use crate::core::config::BattleConfig;
use crate::core::types::{Round, Side};

/// One action per turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnAction {
    /// Attack an enemy slot, or let focus/random targeting choose
    Attack { target: Option<usize> },
    SelfHeal,
    /// Spend one of the actor's potions on a living ally
    HealAlly { slot: usize },
    AggressiveStance,
    DefensiveStance,
}

/// What a controller sees when deciding
pub struct TurnContext<'a> {
    pub side: Side,
    pub slot: usize,
    pub actor: &'a Fighter,
    pub allies: &'a Roster,
    pub enemies: &'a Roster,
    /// Pinned enemy slot, already checked to be alive
    pub focus: Option<usize>,
    pub round: Round,
    pub config: &'a BattleConfig,
}

impl<'a> TurnContext<'a> {
    /// Is the actor at or below the low-HP threshold?
    pub fn actor_is_low(&self) -> bool {
        self.actor.hp() <= self.config.low_hp_threshold
    }
}

/// Trait for turn controllers
pub trait Controller {
    fn choose(&mut self, context: &TurnContext<'_>, rng: &mut dyn RngCore) -> TurnAction;

    /// Short label for diagnostics
    fn name(&self) -> &'static str;
}

/// Autonomous fighter: heal when low (with some probability), else attack
#[derive(Debug, Clone, Default)]
pub struct AutoController {
    /// Overrides `BattleConfig::ai_heal_chance` when set
    heal_chance: Option<f32>,
}

impl AutoController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heals every time it is low and has a potion (duel behavior)
    pub fn always_heal() -> Self {
        Self {
            heal_chance: Some(1.0),
        }
    }
}

impl Controller for AutoController {
    fn choose(&mut self, context: &TurnContext<'_>, rng: &mut dyn RngCore) -> TurnAction {
        if context.actor_is_low() && context.actor.potions() > 0 {
            let chance = self.heal_chance.unwrap_or(context.config.ai_heal_chance);
            if rng.gen::<f32>() < chance {
                return TurnAction::SelfHeal;
            }
        }
        TurnAction::Attack { target: None }
    }

    fn name(&self) -> &'static str {
        "auto"
    }
}

/// Plays queued actions in order, then falls back to plain attacks
///
/// Front-ends push the player's choices here; tests use it to force
/// specific actions.
#[derive(Debug, Clone, Default)]
pub struct ScriptedController {
    queue: VecDeque<TurnAction>,
}

impl ScriptedController {
    pub fn new(actions: impl IntoIterator<Item = TurnAction>) -> Self {
        Self {
            queue: actions.into_iter().collect(),
        }
    }

    pub fn push(&mut self, action: TurnAction) {
        self.queue.push_back(action);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl Controller for ScriptedController {
    fn choose(&mut self, _context: &TurnContext<'_>, _rng: &mut dyn RngCore) -> TurnAction {
        self.queue
            .pop_front()
            .unwrap_or(TurnAction::Attack { target: None })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn context<'a>(
        actor: &'a Fighter,
        allies: &'a Roster,
        enemies: &'a Roster,
        config: &'a BattleConfig,
    ) -> TurnContext<'a> {
        TurnContext {
            side: Side::A,
            slot: 0,
            actor,
            allies,
            enemies,
            focus: None,
            round: 1,
            config,
        }
    }

    #[test]
    fn test_healthy_ai_attacks() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = BattleConfig::default();
        let actor = Fighter::new("a", 30, 5);
        let allies = Roster::from_fighters(vec![actor.clone()]);
        let enemies = Roster::from_fighters(vec![Fighter::new("b", 30, 5)]);
        let mut ai = AutoController::new();
        let action = ai.choose(&context(&actor, &allies, &enemies, &config), &mut rng);
        assert_eq!(action, TurnAction::Attack { target: None });
    }

    #[test]
    fn test_always_heal_when_low() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let config = BattleConfig::default();
        let mut actor = Fighter::new("a", 30, 5);
        actor.take_damage(25);
        let allies = Roster::from_fighters(vec![actor.clone()]);
        let enemies = Roster::from_fighters(vec![Fighter::new("b", 30, 5)]);
        let mut ai = AutoController::always_heal();
        for _ in 0..10 {
            let action = ai.choose(&context(&actor, &allies, &enemies, &config), &mut rng);
            assert_eq!(action, TurnAction::SelfHeal);
        }
    }

    #[test]
    fn test_low_without_potions_attacks() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let config = BattleConfig::default();
        let mut actor = Fighter::new("a", 30, 5).with_potions(0);
        actor.take_damage(25);
        let allies = Roster::from_fighters(vec![actor.clone()]);
        let enemies = Roster::from_fighters(vec![Fighter::new("b", 30, 5)]);
        let mut ai = AutoController::always_heal();
        let action = ai.choose(&context(&actor, &allies, &enemies, &config), &mut rng);
        assert_eq!(action, TurnAction::Attack { target: None });
    }

    #[test]
    fn test_scripted_falls_back_to_attack() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let config = BattleConfig::default();
        let actor = Fighter::new("a", 30, 5);
        let allies = Roster::from_fighters(vec![actor.clone()]);
        let enemies = Roster::from_fighters(vec![Fighter::new("b", 30, 5)]);
        let mut scripted = ScriptedController::new([TurnAction::DefensiveStance]);
        let ctx = context(&actor, &allies, &enemies, &config);
        assert_eq!(scripted.remaining(), 1);
        assert_eq!(scripted.choose(&ctx, &mut rng), TurnAction::DefensiveStance);
        assert_eq!(scripted.remaining(), 0);
        assert_eq!(
            scripted.choose(&ctx, &mut rng),
            TurnAction::Attack { target: None }
        );
    }
}
