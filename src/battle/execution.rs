//! Battle execution loop
//!
//! Each round: build order -> per actor (turn-start check -> decide -> act)
//! -> summary -> outcome. A round stops the moment either side has no
//! living fighter left.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::battle::controller::{AutoController, Controller, TurnAction, TurnContext};
use crate::battle::duel::coin_flip_order;
use crate::battle::roster::Roster;
use crate::battle::scheduler::{build_round_order, RoundEntry};
use crate::combat::{resolve_attack, AttackOutcome, Fighter, TurnStart};
use crate::core::config::BattleConfig;
use crate::core::log::{EventLog, LogConfig, Verbosity};
use crate::core::types::{Round, Side};

/// Battle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Setup,
    Active,
    Finished,
}

/// Battle outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattleOutcome {
    #[default]
    Undecided,
    Victory(Side),
    /// Round limit reached, or both sides fell together
    Draw,
}

impl BattleOutcome {
    pub fn is_decided(self) -> bool {
        !matches!(self, BattleOutcome::Undecided)
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            BattleOutcome::Victory(side) => Some(side),
            _ => None,
        }
    }
}

impl fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleOutcome::Undecided => f.write_str("undecided"),
            BattleOutcome::Victory(side) => write!(f, "side {} wins", side),
            BattleOutcome::Draw => f.write_str("draw"),
        }
    }
}

/// How each round's order is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattleMode {
    /// Whole-list shuffle across both rosters
    #[default]
    Team,
    /// One fighter a side, coin flip for who moves first
    Duel,
}

/// One controller per side
pub struct SideControllers {
    a: Box<dyn Controller>,
    b: Box<dyn Controller>,
}

impl Default for SideControllers {
    fn default() -> Self {
        Self {
            a: Box::new(AutoController::new()),
            b: Box::new(AutoController::new()),
        }
    }
}

impl fmt::Debug for SideControllers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SideControllers")
            .field("a", &self.a.name())
            .field("b", &self.b.name())
            .finish()
    }
}

impl SideControllers {
    fn get_mut(&mut self, side: Side) -> &mut dyn Controller {
        match side {
            Side::A => self.a.as_mut(),
            Side::B => self.b.as_mut(),
        }
    }

    fn set(&mut self, side: Side, controller: Box<dyn Controller>) {
        match side {
            Side::A => self.a = controller,
            Side::B => self.b = controller,
        }
    }
}

/// Per-side tally for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSummary {
    pub standing: usize,
    pub total_hp: i32,
}

impl SideSummary {
    fn of(roster: &Roster) -> Self {
        Self {
            standing: roster.alive_count(),
            total_hp: roster.iter().filter(|(_, f)| f.is_alive()).map(|(_, f)| f.hp()).sum(),
        }
    }
}

/// Result of a battle for display or JSON output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSummary {
    pub outcome: BattleOutcome,
    pub rounds: Round,
    pub side_a: SideSummary,
    pub side_b: SideSummary,
}

/// Complete battle state
#[derive(Debug, Serialize, Deserialize)]
pub struct BattleState {
    pub side_a: Roster,
    pub side_b: Roster,

    pub round: Round,
    pub phase: BattlePhase,
    pub outcome: BattleOutcome,
    #[serde(default)]
    pub mode: BattleMode,
    #[serde(default)]
    pub config: BattleConfig,

    /// Pinned enemy slot for each side's attacks
    focus_a: Option<usize>,
    focus_b: Option<usize>,

    pub log: EventLog,

    #[serde(skip)]
    controllers: SideControllers,
}

impl BattleState {
    pub fn new(side_a: Roster, side_b: Roster, config: BattleConfig, log: LogConfig) -> Self {
        let mut state = Self {
            side_a,
            side_b,
            round: 0,
            phase: BattlePhase::Setup,
            outcome: BattleOutcome::Undecided,
            mode: BattleMode::Team,
            config,
            focus_a: None,
            focus_b: None,
            log: EventLog::new(log),
            controllers: SideControllers::default(),
        };
        state.side_a.set_team_tag(Side::A.tag());
        state.side_b.set_team_tag(Side::B.tag());
        state
    }

    pub fn set_controller(&mut self, side: Side, controller: Box<dyn Controller>) {
        self.controllers.set(side, controller);
    }

    pub fn roster(&self, side: Side) -> &Roster {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    /// Pin `side`'s attacks on one enemy slot (None clears it)
    pub fn set_focus(&mut self, side: Side, target: Option<usize>) {
        match side {
            Side::A => self.focus_a = target,
            Side::B => self.focus_b = target,
        }
    }

    pub fn focus(&self, side: Side) -> Option<usize> {
        match side {
            Side::A => self.focus_a,
            Side::B => self.focus_b,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, BattlePhase::Finished)
    }

    pub fn summary(&self) -> BattleSummary {
        BattleSummary {
            outcome: self.outcome,
            rounds: self.round,
            side_a: SideSummary::of(&self.side_a),
            side_b: SideSummary::of(&self.side_b),
        }
    }

    /// Move from setup to active and sound battle cries
    pub fn start(&mut self) {
        if self.phase != BattlePhase::Setup {
            return;
        }
        self.phase = BattlePhase::Active;
        self.log.set_round(0);
        self.log.log(
            Verbosity::Brief,
            format!(
                "Battle begins: {} fighters on side A against {} on side B",
                self.side_a.alive_count(),
                self.side_b.alive_count()
            ),
        );
        sound_battle_cry(&mut self.side_a, &mut self.log);
        sound_battle_cry(&mut self.side_b, &mut self.log);
    }

    /// Run one full round
    pub fn run_round<R: RngCore>(&mut self, rng: &mut R) -> BattleOutcome {
        let rng: &mut dyn RngCore = rng;

        if self.is_finished() {
            return self.outcome;
        }
        self.start();

        // ===== PHASE 1: PRE-ROUND =====
        if let Some(outcome) = self.decided_outcome() {
            self.finish(outcome);
            return outcome;
        }
        if self.round >= self.config.max_rounds {
            self.finish(BattleOutcome::Draw);
            return self.outcome;
        }

        self.round += 1;
        self.log.set_round(self.round);
        self.log.log(Verbosity::Brief, format!("=== Round {} ===", self.round));

        // ===== PHASE 2: ORDER =====
        let order = match self.mode {
            BattleMode::Team => build_round_order(&self.side_a, &self.side_b, rng),
            BattleMode::Duel => coin_flip_order(&self.side_a, &self.side_b, rng),
        };

        // ===== PHASE 3: TURNS =====
        for entry in order {
            if !self.side_a.any_alive() || !self.side_b.any_alive() {
                break;
            }
            self.take_turn(entry, rng);
        }

        // ===== PHASE 4: POST-ROUND =====
        self.log_round_summary();
        if let Some(outcome) = self.decided_outcome() {
            self.finish(outcome);
        }
        self.outcome
    }

    /// Run rounds until the battle is decided
    pub fn run_to_end<R: RngCore>(&mut self, rng: &mut R) -> BattleOutcome {
        while !self.is_finished() {
            self.run_round(rng);
        }
        self.outcome
    }

    fn decided_outcome(&self) -> Option<BattleOutcome> {
        match (self.side_a.any_alive(), self.side_b.any_alive()) {
            (true, true) => None,
            (true, false) => Some(BattleOutcome::Victory(Side::A)),
            (false, true) => Some(BattleOutcome::Victory(Side::B)),
            (false, false) => Some(BattleOutcome::Draw),
        }
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        self.phase = BattlePhase::Finished;
        self.outcome = outcome;
        for (_, fighter) in self.side_a.iter_mut().chain(self.side_b.iter_mut()) {
            fighter.clear_temporary_effects();
        }
        self.log.log(
            Verbosity::Brief,
            format!("Battle ended after {} rounds: {}", self.round, outcome),
        );
        tracing::debug!(round = self.round, %outcome, "battle finished");
    }

    fn log_round_summary(&mut self) {
        let a = SideSummary::of(&self.side_a);
        let b = SideSummary::of(&self.side_b);
        self.log.log(
            Verbosity::Brief,
            format!(
                "Round {} summary: A {} standing ({} HP) | B {} standing ({} HP)",
                self.round, a.standing, a.total_hp, b.standing, b.total_hp
            ),
        );
    }

    fn take_turn(&mut self, entry: RoundEntry, rng: &mut dyn RngCore) {
        let round = self.round;
        let BattleState {
            side_a,
            side_b,
            config,
            focus_a,
            focus_b,
            log,
            controllers,
            ..
        } = self;
        let (allies, enemies, focus) = match entry.side {
            Side::A => (side_a, side_b, focus_a),
            Side::B => (side_b, side_a, focus_b),
        };

        let actor = match allies.get_mut(entry.slot) {
            Some(fighter) => fighter,
            None => return,
        };
        match actor.try_start_turn() {
            TurnStart::Dead => return,
            TurnStart::Stunned => {
                log.log(
                    Verbosity::Normal,
                    format!("{} is stunned and loses the turn", actor.label()),
                );
                return;
            }
            TurnStart::Ready => {}
        }

        if let Some(target) = *focus {
            if !enemies.is_alive_at(target) {
                log.log(
                    Verbosity::Verbose,
                    format!("Focus target slot {} is down, attacks fall back to random", target),
                );
                *focus = None;
            }
        }

        let action = {
            let actor = match allies.get(entry.slot) {
                Some(fighter) => fighter,
                None => return,
            };
            let context = TurnContext {
                side: entry.side,
                slot: entry.slot,
                actor,
                allies: &*allies,
                enemies: &*enemies,
                focus: *focus,
                round,
                config: &*config,
            };
            controllers.get_mut(entry.side).choose(&context, rng)
        };

        match action {
            TurnAction::Attack { target } => {
                perform_attack(entry.slot, target, *focus, allies, enemies, log, rng)
            }
            TurnAction::SelfHeal => self_heal(entry.slot, allies, config, log),
            TurnAction::HealAlly { slot } if slot == entry.slot => {
                self_heal(entry.slot, allies, config, log)
            }
            TurnAction::HealAlly { slot } => heal_ally(entry.slot, slot, allies, config, log),
            TurnAction::AggressiveStance => {
                if let Some(actor) = allies.get_mut(entry.slot) {
                    actor.enter_aggressive_stance();
                    log.log(
                        Verbosity::Normal,
                        format!("{} takes an aggressive stance", actor.label()),
                    );
                }
            }
            TurnAction::DefensiveStance => {
                if let Some(actor) = allies.get_mut(entry.slot) {
                    actor.enter_defensive_stance();
                    log.log(
                        Verbosity::Normal,
                        format!("{} raises a defensive stance", actor.label()),
                    );
                }
            }
        }
    }
}

/// Grant the rally bonus to a side that fields a living commander
fn sound_battle_cry(roster: &mut Roster, log: &mut EventLog) {
    let commander = match roster.living_commander().map(Fighter::label) {
        Some(label) => label,
        None => return,
    };

    for (_, fighter) in roster.iter_mut() {
        if fighter.is_alive() {
            fighter.grant_battle_cry();
        }
    }
    log.log(
        Verbosity::Brief,
        format!("{} sounds the battle cry!", commander),
    );
}

fn perform_attack(
    slot: usize,
    requested: Option<usize>,
    focus: Option<usize>,
    allies: &mut Roster,
    enemies: &mut Roster,
    log: &mut EventLog,
    rng: &mut dyn RngCore,
) {
    let target = requested
        .filter(|&t| enemies.is_alive_at(t))
        .or(focus)
        .or_else(|| enemies.random_alive_index(rng));
    let target = match target {
        Some(t) => t,
        None => return,
    };

    let (attacker, defender) = match (allies.get_mut(slot), enemies.get_mut(target)) {
        (Some(a), Some(d)) => (a, d),
        _ => return,
    };

    let outcome = resolve_attack(attacker, defender, rng);
    log_attack(log, attacker, defender, &outcome);
    attacker.clear_battle_cry();
}

fn log_attack(log: &mut EventLog, attacker: &Fighter, defender: &Fighter, outcome: &AttackOutcome) {
    let a = attacker.label();
    let d = defender.label();
    match outcome {
        AttackOutcome::Miss => log.log(Verbosity::Verbose, format!("{} misses {}", a, d)),
        AttackOutcome::Blocked => {
            log.log(Verbosity::Verbose, format!("{} blocks the attack of {}", d, a))
        }
        AttackOutcome::Dodged => {
            log.log(Verbosity::Verbose, format!("{} dodges the attack of {}", d, a))
        }
        AttackOutcome::Hit(hit) => {
            if hit.crit {
                log.log(
                    Verbosity::Brief,
                    format!(
                        "CRITICAL! {} hits {} for {} damage ({} absorbed)",
                        a, d, hit.final_damage, hit.absorbed
                    ),
                );
            } else {
                log.log(
                    Verbosity::Normal,
                    format!(
                        "{} hits {} for {} damage ({} absorbed)",
                        a, d, hit.final_damage, hit.absorbed
                    ),
                );
            }
            if hit.defender_died {
                log.log(Verbosity::Brief, format!("{} falls!", d));
            } else if hit.defender_stunned {
                log.log(Verbosity::Normal, format!("{} is stunned!", d));
            }
        }
    }
}

fn self_heal(slot: usize, allies: &mut Roster, config: &BattleConfig, log: &mut EventLog) {
    let actor = match allies.get_mut(slot) {
        Some(fighter) => fighter,
        None => return,
    };
    match actor.drink_potion(config.potion_heal) {
        Some(healed) => log.log(
            Verbosity::Brief,
            format!(
                "{} drinks a potion and recovers {} HP ({}/{})",
                actor.label(),
                healed,
                actor.hp(),
                actor.max_hp()
            ),
        ),
        None => log.log(
            Verbosity::Normal,
            format!("{} reaches for a potion but has none left", actor.label()),
        ),
    }
}

fn heal_ally(
    slot: usize,
    ally_slot: usize,
    allies: &mut Roster,
    config: &BattleConfig,
    log: &mut EventLog,
) {
    let actor_label = match allies.get(slot) {
        Some(fighter) => fighter.label(),
        None => return,
    };
    if !allies.is_alive_at(ally_slot) {
        log.log(
            Verbosity::Normal,
            format!("{} finds no living ally in slot {} to tend", actor_label, ally_slot),
        );
        return;
    }

    let spent = allies
        .get_mut(slot)
        .map_or(false, |actor| actor.consume_potion());
    if !spent {
        log.log(
            Verbosity::Normal,
            format!("{} has no potion to share", actor_label),
        );
        return;
    }

    if let Some(ally) = allies.get_mut(ally_slot) {
        let healed = ally.heal_by(config.potion_heal);
        log.log(
            Verbosity::Brief,
            format!(
                "{} gives a potion to {}, who recovers {} HP",
                actor_label,
                ally.label(),
                healed
            ),
        );
    }
}
