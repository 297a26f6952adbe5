//! bubble-sim: play Bubble matches locally with built-in policies.

use std::path::PathBuf;

use bubble_engine::core::{GameSetup, RulesConfig};
use bubble_engine::sim::{GreedyFounder, Policy, RandomPolicy, SimConfig, Simulator};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bubble-sim")]
#[command(about = "Simulate Bubble matches between built-in policies")]
struct Args {
    /// Number of founders at the table
    #[arg(short, long, default_value = "4")]
    players: usize,

    /// Match seed; later games use seed + 1, seed + 2, ...
    #[arg(long)]
    seed: Option<u64>,

    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// House rules as TOML
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Stop a game after this many accepted actions
    #[arg(long, default_value = "20000")]
    max_actions: usize,

    /// Policy for every seat
    #[arg(long, value_enum, default_value = "greedy")]
    policy: PolicyKind,

    /// Write the last game as a bincode recording
    #[arg(long)]
    record: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyKind {
    Greedy,
    Random,
}

impl PolicyKind {
    fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Greedy => Box::new(GreedyFounder),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let rules = match &args.rules {
        Some(path) => RulesConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => RulesConfig::default(),
    };
    let base_seed = args.seed.unwrap_or_else(rand::random);
    let names: Vec<String> = (1..=args.players).map(|n| format!("Founder {n}")).collect();
    let simulator = Simulator::new(SimConfig::new().with_max_actions(args.max_actions));

    info!(
        players = args.players,
        games = args.games,
        seed = base_seed,
        policy = ?args.policy,
        "starting simulation"
    );

    let mut wins = vec![0u32; args.players];
    let mut lost = 0u32;
    let mut truncated = 0u32;
    let mut last_recording = None;

    for game in 0..args.games {
        let seed = base_seed.wrapping_add(u64::from(game));
        let initial = GameSetup::new(seed)
            .players(names.iter().cloned())
            .rules(rules)
            .build()?;
        let mut policies = vec![args.policy.build(seed)];
        let outcome = simulator.run_seats(initial, &mut policies)?;

        let hash = outcome.final_state.state_hash()?;
        match outcome.status().winner() {
            Some(winner) => {
                wins[winner.index()] += 1;
                info!(game, seed, %winner, turns = outcome.final_state.turn_number(), %hash, "game over");
            }
            None if outcome.truncated() => {
                truncated += 1;
                warn!(game, seed, actions = outcome.actions, "action cap reached");
            }
            None => {
                lost += 1;
                info!(game, seed, turns = outcome.final_state.turn_number(), %hash, "bubble burst");
            }
        }
        last_recording = Some(outcome.recording());
    }

    for (seat, count) in wins.iter().enumerate() {
        info!(seat, wins = count, "{}", names[seat]);
    }
    info!(lost, truncated, "summary");

    if let (Some(path), Some(recording)) = (&args.record, last_recording) {
        std::fs::write(path, recording.to_bytes()?)?;
        info!(path = %path.display(), actions = recording.actions.len(), "recording written");
    }

    Ok(())
}
