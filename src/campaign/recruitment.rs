//! Day-scoped recruitment pool
//!
//! Five candidates are generated the first time the pool is viewed on a
//! given day and stay the same for the rest of that day. Hired candidates
//! leave the pool; the pool is never topped up until the day changes.

use ahash::AHashSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::campaign::progression::train_to_level;
use crate::campaign::state::{CampaignState, Price, RosterKind};
use crate::combat::{create_fighter, ArchetypeSelector, Fighter, Weapon};
use crate::core::config::ProgressionConfig;
use crate::core::error::{Result, WarbandError};
use crate::core::log::Verbosity;
use crate::core::types::Day;

/// Candidates offered per day
pub const POOL_SIZE: usize = 5;

/// Highest level a candidate can arrive at
pub const MAX_CANDIDATE_LEVEL: u32 = 4;

/// Days per extra candidate level
pub const DAYS_PER_CANDIDATE_LEVEL: u32 = 5;

/// A hireable fighter with its asking price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub fighter: Fighter,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruitmentPool {
    /// Day the pool was generated for
    pub day: Day,
    pub candidates: Vec<Candidate>,
}

/// Asking price in gold, iron and steel
///
/// Gold scales with power. Iron is only asked of well-armored fighters and
/// steel only of armed ones.
pub fn price_for(fighter: &Fighter) -> Price {
    let gold = 5 + (fighter.power_score() / 2) as u32;
    let iron = if fighter.armor() >= 2 {
        fighter.armor() as u32
    } else {
        0
    };
    let steel = if fighter.weapon() != Weapon::None {
        2 + fighter.pierce() as u32
    } else {
        0
    };
    Price::new(gold, iron, steel)
}

/// Highest candidate level available on `day`
pub fn max_candidate_level(day: Day) -> u32 {
    (1 + day / DAYS_PER_CANDIDATE_LEVEL).min(MAX_CANDIDATE_LEVEL)
}

/// Roll a pool of candidates whose names avoid `taken` and each other
pub fn generate_pool<R: Rng + ?Sized>(
    day: Day,
    taken: &AHashSet<String>,
    config: &ProgressionConfig,
    rng: &mut R,
) -> RecruitmentPool {
    let mut taken = taken.clone();
    let max_level = max_candidate_level(day);

    let candidates = (0..POOL_SIZE)
        .map(|_| {
            let mut fighter = create_fighter(ArchetypeSelector::Any, &taken, rng);
            taken.insert(fighter.name().to_string());
            train_to_level(&mut fighter, rng.gen_range(1..=max_level), config);
            let price = price_for(&fighter);
            Candidate { fighter, price }
        })
        .collect();

    RecruitmentPool { day, candidates }
}

impl CampaignState {
    /// Today's pool, generated on first view of the day
    pub fn recruitment_pool<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &RecruitmentPool {
        let day = self.day;
        if self.pool.as_ref().map_or(true, |pool| pool.day != day) {
            let pool = generate_pool(day, &self.taken_names(), &self.config.progression, rng);
            tracing::debug!(day, "recruitment pool regenerated");
            return self.pool.insert(pool);
        }
        self.pool.get_or_insert_with(|| RecruitmentPool {
            day,
            candidates: Vec::new(),
        })
    }

    /// Hire candidate `index` from today's pool
    ///
    /// Goes to the first free active slot, else the reserve. Returns where
    /// the recruit landed.
    pub fn hire<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        rng: &mut R,
    ) -> Result<(RosterKind, usize)> {
        let price = match self.recruitment_pool(rng).candidates.get(index) {
            Some(candidate) => candidate.price,
            None => {
                return Err(WarbandError::InvalidAction(format!(
                    "no candidate at position {}",
                    index
                )))
            }
        };

        let quota = self.hire_quota();
        if self.recruited_count() >= quota {
            return Err(WarbandError::QuotaReached { quota });
        }
        let destination = if !self.roster.is_full() {
            RosterKind::Active
        } else if !self.reserve.is_full() {
            RosterKind::Reserve
        } else {
            return Err(WarbandError::RosterFull);
        };
        self.currencies.check(&price)?;

        let mut candidate = match self.pool.as_mut() {
            Some(pool) => pool.candidates.remove(index),
            None => return Err(WarbandError::InvalidAction("no recruitment pool".to_string())),
        };
        self.currencies.spend(&price)?;
        candidate.fighter.mark_recruited();

        let name = candidate.fighter.name().to_string();
        let slot = self.roster_of_mut(destination).push(candidate.fighter)?;
        self.log.log(
            Verbosity::Brief,
            format!("{} signs on for {} and joins the {}", name, price, destination),
        );
        Ok((destination, slot))
    }
}
