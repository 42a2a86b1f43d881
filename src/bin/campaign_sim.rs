//! Campaign simulation
//!
//! Autoplays a company for a number of days: it levels up, shops, hires,
//! rests when battered and otherwise marches to the next battle.

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use warband::campaign::{
    BattleReport, CampaignState, Currencies, LevelUpChoice, MarketItem, RosterKind,
};
use warband::combat::Fighter;
use warband::core::{BalanceConfig, Day, LogConfig, Verbosity};
use warband::persist::{FileStore, Snapshot, SnapshotStore};

#[derive(Parser, Debug)]
#[command(name = "campaign_sim")]
#[command(about = "Autoplay a mercenary campaign and report how the company fared")]
struct Args {
    /// Days to play
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Narrative verbosity: brief, normal or verbose
    #[arg(long, default_value = "brief")]
    verbosity: Verbosity,

    /// Colorize console output
    #[arg(long)]
    color: bool,

    /// Balance config (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Save the final campaign into this snapshot directory
    #[arg(long)]
    save_dir: Option<std::path::PathBuf>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

/// Final report
#[derive(Serialize)]
struct CampaignReport {
    seed: u64,
    days_played: Day,
    battles_won: u32,
    battles_lost: u32,
    expeditions: u32,
    currencies: Currencies,
    company: Vec<FighterLine>,
    over: bool,
}

#[derive(Serialize)]
struct FighterLine {
    name: String,
    level: u32,
    hp: i32,
    max_hp: i32,
    attack: i32,
    armor: i32,
}

impl From<&Fighter> for FighterLine {
    fn from(f: &Fighter) -> Self {
        Self {
            name: f.name().to_string(),
            level: f.level(),
            hp: f.hp(),
            max_hp: f.max_hp(),
            attack: f.attack(),
            armor: f.armor(),
        }
    }
}

fn main() {
    let args = Args::parse();
    let log_config = LogConfig::new(args.verbosity, args.color);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_ansi(log_config.color)
        .init();

    let config = match &args.config {
        Some(path) => match BalanceConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => BalanceConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = CampaignState::new(config, log_config, &mut rng);

    let (mut won, mut lost, mut expeditions) = (0, 0, 0);
    let last_day = state.day + args.days;

    while state.day < last_day && !state.is_over() {
        // Entries were already emitted through tracing
        let narrated = state.log.drain().len();
        tracing::debug!(day = state.day, narrated, "camp log cleared");

        prepare(&mut state, &mut rng);

        if needs_rest(&state) {
            state.expedition(&mut rng);
            expeditions += 1;
            continue;
        }

        match state.next_battle(&mut rng) {
            Ok(report) => {
                if report.is_victory() {
                    won += 1;
                } else {
                    lost += 1;
                }
                if !args.json {
                    print_battle(&report);
                }
            }
            Err(e) => {
                tracing::warn!("No battle today: {}", e);
                state.expedition(&mut rng);
                expeditions += 1;
            }
        }
    }

    if let Some(dir) = &args.save_dir {
        save(dir, &state);
    }

    let report = CampaignReport {
        seed,
        days_played: state.day - 1,
        battles_won: won,
        battles_lost: lost,
        expeditions,
        currencies: state.currencies,
        company: state.company().map(FighterLine::from).collect(),
        over: state.is_over(),
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize report: {}", e),
        }
    } else {
        print_report(&report);
    }
}

/// Camp routine before the day's main action
fn prepare(state: &mut CampaignState, rng: &mut ChaCha8Rng) {
    // Refill the line from the reserve
    while !state.roster.is_full() {
        let benched = state.reserve.iter().map(|(slot, _)| slot).next();
        let moved = benched.map_or(false, |slot| state.move_to_roster(slot).is_ok());
        if !moved {
            break;
        }
    }

    for (kind, slot) in state.pending_level_ups() {
        let choice = match state.fighter(kind, slot) {
            Ok(f) if f.armor() < 2 => LevelUpChoice::Toughness,
            Ok(f) if f.max_hp() < 35 => LevelUpChoice::Vitality,
            _ => LevelUpChoice::Strength,
        };
        while state.redeem_level_up(kind, slot, choice).is_ok() {}
    }

    // One potion for everyone who has none, while the purse allows
    let dry: Vec<usize> = state
        .roster
        .iter()
        .filter(|(_, f)| f.potions() == 0)
        .map(|(slot, _)| slot)
        .collect();
    for slot in dry {
        if state.stash.potions == 0 && state.buy(MarketItem::Potion).is_err() {
            break;
        }
        if let Err(e) = state.give_potion(RosterKind::Active, slot) {
            tracing::debug!("Could not hand out a potion: {}", e);
        }
    }

    // Hire the cheapest affordable candidate
    let cheapest = state
        .recruitment_pool(rng)
        .candidates
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| c.price.gold)
        .map(|(index, c)| (index, c.price));
    if let Some((index, price)) = cheapest {
        let with_potion = Currencies {
            gold: price.gold + MarketItem::Potion.price().gold,
            ..price
        };
        if state.currencies.can_afford(&with_potion)
            && state.recruited_count() < state.hire_quota()
        {
            if let Err(e) = state.hire(index, rng) {
                tracing::debug!("Hiring skipped: {}", e);
            }
        }
    }

    let least_armored = state
        .roster
        .iter()
        .min_by_key(|(_, f)| f.armor())
        .map(|(slot, _)| slot);
    if let (true, Some(slot)) = (state.stash.light_armor > 0, least_armored) {
        if let Err(e) = state.fit_light_armor(RosterKind::Active, slot) {
            tracing::debug!("Could not fit light armor: {}", e);
        }
    }
}

/// Rest when the line is below half strength
fn needs_rest(state: &CampaignState) -> bool {
    let (hp, max) = state
        .roster
        .iter()
        .fold((0, 0), |(hp, max), (_, f)| (hp + f.hp(), max + f.max_hp()));
    max == 0 || hp * 2 < max
}

fn save(dir: &std::path::Path, state: &CampaignState) {
    let result = FileStore::new(dir).and_then(|mut store| {
        let name = format!("day-{}", state.day);
        store.save(&name, &Snapshot::Campaign(state.clone()))
    });
    match result {
        Ok(id) => println!("Saved campaign as snapshot {} in {}", id, dir.display()),
        Err(e) => eprintln!("Failed to save campaign: {}", e),
    }
}

fn print_battle(report: &BattleReport) {
    println!(
        "Day {:>3}: {} in {} rounds against {}",
        report.day,
        report.outcome,
        report.rounds,
        report.enemies.join(", ")
    );
    if let Some(spoils) = &report.spoils {
        println!("         spoils {} and {}", spoils.reward, spoils.loot);
        for gain in &spoils.level_gains {
            println!("         {} reaches level {}", gain.name, gain.new_level);
        }
    }
    for name in &report.fallen {
        println!("         {} fell", name);
    }
}

fn print_report(report: &CampaignReport) {
    println!();
    println!("Campaign Report");
    println!("===============");
    println!("Days played: {}", report.days_played);
    println!(
        "Battles: {} won, {} lost ({} expeditions)",
        report.battles_won, report.battles_lost, report.expeditions
    );
    println!("Purse: {}", report.currencies);
    if report.over {
        println!("The company was wiped out.");
    }
    for f in &report.company {
        println!(
            "  {:<28} L{} {:>3}/{:<3} HP  atk {}  armor {}",
            f.name, f.level, f.hp, f.max_hp, f.attack, f.armor
        );
    }
    println!("Seed: {}", report.seed);
}
