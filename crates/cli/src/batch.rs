use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use rayon::prelude::*;

use roboarena_shared::*;
use roboarena_sim::{run_match, SimError};

use crate::resolve_policy;

/// A single match job to be run in parallel.
struct MatchJob {
    blue: String,
    red: String,
    seed: u64,
    robot_count: usize,
    shuffle_zones: bool,
    sim_config: SimConfig,
}

/// One finished (or failed) batch match.
pub struct JobOutcome {
    pub seed: u64,
    pub result: Result<MatchResult, SimError>,
}

pub struct BatchSettings<'a> {
    pub blue: &'a str,
    pub red: &'a str,
    pub seeds: u64,
    pub robot_count: usize,
    pub shuffle_zones: bool,
    pub sim_config: SimConfig,
}

/// Aggregated outcome counts for a batch.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchSummary {
    pub matches: u32,
    pub blue_wins: u32,
    pub red_wins: u32,
    pub draws: u32,
    pub eliminations: u32,
    pub unfinished: u32,
    pub errors: u32,
    pub mean_final_epoch: f32,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[JobOutcome]) -> Self {
        let mut summary = Self::default();
        let mut epochs = 0u64;
        for outcome in outcomes {
            summary.matches += 1;
            let result = match &outcome.result {
                Ok(result) => result,
                Err(_) => {
                    summary.errors += 1;
                    continue;
                }
            };
            epochs += u64::from(result.final_epoch);
            match result.status {
                MatchStatus::Running => summary.unfinished += 1,
                MatchStatus::Ended { outcome, reason } => {
                    match outcome {
                        MatchOutcome::BlueWin => summary.blue_wins += 1,
                        MatchOutcome::RedWin => summary.red_wins += 1,
                        MatchOutcome::Draw => summary.draws += 1,
                    }
                    if reason == MatchEndReason::Elimination {
                        summary.eliminations += 1;
                    }
                }
            }
        }
        let finished = summary.matches - summary.errors;
        if finished > 0 {
            summary.mean_final_epoch = epochs as f32 / finished as f32;
        }
        summary
    }

    fn rate(&self, count: u32) -> f32 {
        if self.matches == 0 {
            0.0
        } else {
            100.0 * count as f32 / self.matches as f32
        }
    }
}

fn run_job(job: &MatchJob, layout: &Arc<ArenaLayout>) -> JobOutcome {
    let config = MatchConfig {
        seed: job.seed,
        robot_count: job.robot_count,
        blue_policy: job.blue.clone(),
        red_policy: job.red.clone(),
        shuffle_zones: job.shuffle_zones,
        sim_config: job.sim_config,
        ..Default::default()
    };
    let mut blue = resolve_policy(&job.blue);
    let mut red = resolve_policy(&job.red);
    let result = run_match(&config, Arc::clone(layout), blue.as_mut(), red.as_mut())
        .map(|record| record.result);
    debug!("seed {} done: {:?}", job.seed, result.as_ref().map(|r| r.status));
    JobOutcome {
        seed: job.seed,
        result,
    }
}

/// Run one match per seed in parallel. Results come back in seed order.
pub fn run_batch(settings: &BatchSettings) -> Vec<JobOutcome> {
    let layout = Arc::new(ArenaLayout::standard());
    let jobs: Vec<MatchJob> = (0..settings.seeds)
        .map(|seed| MatchJob {
            blue: settings.blue.to_string(),
            red: settings.red.to_string(),
            seed,
            robot_count: settings.robot_count,
            shuffle_zones: settings.shuffle_zones,
            sim_config: settings.sim_config,
        })
        .collect();

    jobs.par_iter().map(|job| run_job(job, &layout)).collect()
}

pub fn print_summary(settings: &BatchSettings, summary: &BatchSummary) {
    println!(
        "\n=== Batch: {} (blue) vs {} (red), {} robots, {} seeds ===",
        settings.blue, settings.red, settings.robot_count, settings.seeds
    );
    println!("{:<14} {:>6} {:>8}", "result", "count", "rate%");
    println!("{:-<30}", "");
    for (label, count) in [
        ("blue wins", summary.blue_wins),
        ("red wins", summary.red_wins),
        ("draws", summary.draws),
        ("eliminations", summary.eliminations),
        ("unfinished", summary.unfinished),
        ("errors", summary.errors),
    ] {
        println!("{:<14} {:>6} {:>8.1}", label, count, summary.rate(count));
    }
    println!(
        "\nMean final epoch: {:.0} ({:.1} units)",
        summary.mean_final_epoch,
        summary.mean_final_epoch / settings.sim_config.unit_epochs as f32
    );
}

pub fn write_csv(path: &Path, outcomes: &[JobOutcome]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "seed,outcome,reason,final_epoch,time_remaining,blue_hp,red_hp")?;
    for outcome in outcomes {
        let result = match &outcome.result {
            Ok(result) => result,
            Err(e) => {
                writeln!(file, "{},error,\"{}\",,,,", outcome.seed, e)?;
                continue;
            }
        };
        let (label, reason) = match result.status {
            MatchStatus::Running => ("running".to_string(), String::new()),
            MatchStatus::Ended { outcome, reason } => {
                (format!("{outcome:?}"), format!("{reason:?}"))
            }
        };
        let team_hp = |team: Team| -> i64 {
            result
                .robots
                .iter()
                .filter(|r| r.team == team)
                .map(|r| i64::from(r.hp))
                .sum()
        };
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            outcome.seed,
            label,
            reason,
            result.final_epoch,
            result.time_remaining,
            team_hp(Team::Blue),
            team_hp(Team::Red),
        )?;
    }
    Ok(())
}
