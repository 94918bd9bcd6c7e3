mod batch;
mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;

use roboarena_shared::*;
use roboarena_sim::opponents::ChaserPolicy;
use roboarena_sim::{run_match, DoNothingPolicy, Policy};

use crate::batch::{BatchSettings, BatchSummary};
use crate::config::load_sim_config;

#[derive(Parser)]
#[command(name = "roboarena", about = "Robot arena combat simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single match
    Run {
        /// Policy for the blue team (chaser, do_nothing)
        #[arg(long, default_value = "chaser")]
        blue: String,

        /// Policy for the red team (chaser, do_nothing)
        #[arg(long, default_value = "do_nothing")]
        red: String,

        /// Robots on the field, split evenly (blue gets the odd one)
        #[arg(long, default_value_t = MAX_ROBOTS)]
        robots: usize,

        /// Random seed for the match
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// JSON file with rule overrides
        #[arg(long)]
        config: Option<PathBuf>,

        /// Re-deal zone categories on every zone reset
        #[arg(long)]
        shuffle_zones: bool,

        /// Stop after this many decision cycles
        #[arg(long, default_value_t = MAX_STEPS)]
        max_steps: u32,

        /// Output path for the match record (with transitions) as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run many seeds in parallel and report win/draw rates
    Batch {
        #[arg(long, default_value = "chaser")]
        blue: String,

        #[arg(long, default_value = "chaser")]
        red: String,

        #[arg(long, default_value_t = MAX_ROBOTS)]
        robots: usize,

        /// Number of seeds (0..N)
        #[arg(long, default_value_t = 20)]
        seeds: u64,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        shuffle_zones: bool,

        /// Per-match results as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Print the standard arena layout and default rules as JSON
    Layout,
}

/// Resolve a policy name to a boxed Policy trait object.
pub(crate) fn resolve_policy(name: &str) -> Box<dyn Policy> {
    match name {
        "chaser" => Box::new(ChaserPolicy::new()),
        "do_nothing" => Box::new(DoNothingPolicy),
        other => {
            eprintln!("Unknown policy '{}'. Valid options: chaser, do_nothing.", other);
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            blue,
            red,
            robots,
            seed,
            config,
            shuffle_zones,
            max_steps,
            output,
        } => {
            let sim_config = load_or_exit(config.as_deref());
            let match_config = MatchConfig {
                seed,
                robot_count: robots,
                blue_policy: blue,
                red_policy: red,
                shuffle_zones,
                record_transitions: output.is_some(),
                max_steps,
                sim_config,
            };
            cmd_run(&match_config, output.as_deref());
        }

        Commands::Batch {
            blue,
            red,
            robots,
            seeds,
            config,
            shuffle_zones,
            csv,
        } => {
            let settings = BatchSettings {
                blue: &blue,
                red: &red,
                seeds,
                robot_count: robots,
                shuffle_zones,
                sim_config: load_or_exit(config.as_deref()),
            };
            cmd_batch(&settings, csv.as_deref());
        }

        Commands::Layout => cmd_layout(),
    }
}

fn load_or_exit(path: Option<&Path>) -> SimConfig {
    match load_sim_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_run(config: &MatchConfig, output: Option<&Path>) {
    let mut blue = resolve_policy(&config.blue_policy);
    let mut red = resolve_policy(&config.red_policy);

    println!(
        "Running match: {} (blue) vs {} (red), {} robots (seed={})",
        blue.name(),
        red.name(),
        config.robot_count,
        config.seed
    );

    let layout = Arc::new(ArenaLayout::standard());
    let record = match run_match(config, layout, blue.as_mut(), red.as_mut()) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("Match failed: {}", e);
            std::process::exit(1);
        }
    };
    let result = &record.result;

    println!();
    println!("=== Match Result ===");
    match result.status {
        MatchStatus::Running => println!("Outcome:     undecided (stopped after {} steps)", config.max_steps),
        MatchStatus::Ended { outcome, reason } => {
            println!("Outcome:     {:?}", outcome);
            println!("Reason:      {:?}", reason);
        }
    }
    println!(
        "Final epoch: {} ({} units left)",
        result.final_epoch, result.time_remaining
    );
    println!();
    println!("--- Robots ---");
    println!(
        "{:>3} {:<5} {:>6} {:>5} {:>5} {:>6} {:>5} {:>6} {:>5}",
        "#", "team", "hp", "ammo", "heat", "shots", "hits", "taken", "bumps"
    );
    for r in &result.robots {
        println!(
            "{:>3} {:<5} {:>6} {:>5} {:>5} {:>6} {:>5} {:>6} {:>5}",
            r.index,
            r.team.name(),
            r.hp,
            r.ammo,
            r.heat,
            r.shots_fired,
            r.hits_landed,
            r.hits_taken,
            r.robot_hits
        );
    }

    if let Some(path) = output {
        match serde_json::to_string_pretty(&record) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => println!(
                    "\nRecord with {} transitions written to {}",
                    record.transitions.len(),
                    path.display()
                ),
                Err(e) => eprintln!("\nFailed to write record: {}", e),
            },
            Err(e) => eprintln!("\nFailed to serialize record: {}", e),
        }
    }
}

fn cmd_batch(settings: &BatchSettings, csv: Option<&Path>) {
    // Fail on a bad name before spawning workers
    resolve_policy(settings.blue);
    resolve_policy(settings.red);

    let outcomes = batch::run_batch(settings);
    let summary = BatchSummary::from_outcomes(&outcomes);
    batch::print_summary(settings, &summary);

    if let Some(first_error) = outcomes.iter().find_map(|o| o.result.as_ref().err()) {
        eprintln!("\nSome matches failed, first error: {}", first_error);
    }

    if let Some(path) = csv {
        match batch::write_csv(path, &outcomes) {
            Ok(()) => println!("\nResults written to {}", path.display()),
            Err(e) => eprintln!("\nFailed to write CSV: {}", e),
        }
    }
}

#[derive(Serialize)]
struct LayoutDump<'a> {
    layout: &'a ArenaLayout,
    sim_config: &'a SimConfig,
}

fn cmd_layout() {
    let layout = ArenaLayout::standard();
    let sim_config = SimConfig::default();
    let dump = LayoutDump {
        layout: &layout,
        sim_config: &sim_config,
    };
    match serde_json::to_string_pretty(&dump) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize layout: {}", e);
            std::process::exit(1);
        }
    }
}
