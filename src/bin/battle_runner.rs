//! Headless Battle Runner
//!
//! Runs an AI vs AI team battle (or a duel) between random companies and
//! prints the result as JSON or text.

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use warband::battle::{duel, BattleState, BattleSummary, Roster};
use warband::combat::{create_fighter, ArchetypeSelector, Fighter};
use warband::core::{BalanceConfig, LogConfig, LogEntry, Verbosity};

/// Headless Battle Runner - AI vs AI battles
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run an AI vs AI battle between two random companies")]
struct Args {
    /// Fighters per side
    #[arg(long, default_value_t = 3)]
    team_size: usize,

    /// Fight a one-on-one duel instead of a team battle
    #[arg(long)]
    duel: bool,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Narrative verbosity: brief, normal or verbose
    #[arg(long, default_value = "normal")]
    verbosity: Verbosity,

    /// Colorize console output
    #[arg(long)]
    color: bool,

    /// Balance config (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    seed: u64,
    side_a: Vec<String>,
    side_b: Vec<String>,
    summary: BattleSummary,
    log: Vec<LogEntry>,
}

fn main() {
    let args = Args::parse();
    let log_config = LogConfig::new(args.verbosity, args.color);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
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

    let team_size = if args.duel { 1 } else { args.team_size.max(1) };
    let mut taken = ahash::AHashSet::new();
    let mut muster = |rng: &mut ChaCha8Rng| -> Vec<Fighter> {
        (0..team_size)
            .map(|_| {
                let fighter = create_fighter(ArchetypeSelector::Any, &taken, rng);
                taken.insert(fighter.name().to_string());
                fighter
            })
            .collect()
    };
    let mut side_a = muster(&mut rng);
    let mut side_b = muster(&mut rng);

    let mut state = match (args.duel, side_a.pop(), side_b.pop()) {
        (true, Some(first), Some(second)) => duel(first, second, config.battle, log_config),
        (_, last_a, last_b) => {
            side_a.extend(last_a);
            side_b.extend(last_b);
            BattleState::new(
                Roster::from_fighters(side_a),
                Roster::from_fighters(side_b),
                config.battle,
                log_config,
            )
        }
    };

    let names = |roster: &Roster| roster.names().map(str::to_string).collect::<Vec<_>>();
    let (a_names, b_names) = (names(&state.side_a), names(&state.side_b));

    state.run_to_end(&mut rng);

    let result = RunResult {
        seed,
        side_a: a_names,
        side_b: b_names,
        summary: state.summary(),
        log: state.log.drain(),
    };

    match args.format.as_str() {
        "text" => print_text(&result),
        "json" => print_json(&result),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            print_json(&result);
        }
    }
}

fn print_json(result: &RunResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize result: {}", e),
    }
}

fn print_text(result: &RunResult) {
    for entry in &result.log {
        println!("[{:>3}] {}", entry.round, entry.message);
    }
    println!();
    println!("Battle Result");
    println!("=============");
    println!("Side A: {}", result.side_a.join(", "));
    println!("Side B: {}", result.side_b.join(", "));
    println!("Outcome: {}", result.summary.outcome);
    println!("Rounds: {}", result.summary.rounds);
    println!(
        "Standing: A {} ({} HP) | B {} ({} HP)",
        result.summary.side_a.standing,
        result.summary.side_a.total_hp,
        result.summary.side_b.standing,
        result.summary.side_b.total_hp
    );
    println!("Seed: {}", result.seed);
}
