//! Batch battle simulation CLI.
//!
//! Plays many battles against one combat configuration and outputs battle
//! records as JSONL.
//!
//! Usage:
//!   cargo run --release --bin simulate -- [OPTIONS]
//!
//! Options:
//!   --battles N      Number of battles to play (default: 100)
//!   --config FILE    JSON combat config (default: built-in defaults)
//!   --min-gems N     Smallest simulated match (default: 3)
//!   --max-gems N     Largest simulated match (default: 7)
//!   --special P      Chance a gem is white or green (default: 0.2)
//!   --goal-turns N   Player turns before level goals complete (default: 3)
//!   --max-turns N    Turn limit per battle (default: 200)
//!   --threads N      Number of parallel threads (default: 4)
//!   --seed N         Random seed, 0 for entropy (default: 0)
//!   --output FILE    Output file path (default: stdout)
//!   --quiet          Suppress progress and summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use gemclash::combat::CombatConfig;
use gemclash::simulate::{self, SimulationConfig};
use tracing::{error, info};

struct Args {
    config: SimulationConfig,
    output_path: Option<String>,
}

fn parse_value<T: FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    args.get(i)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| format!("invalid {} value", flag))
}

/// Parses the command line. `Ok(None)` means help was requested.
fn parse_args(args: &[String]) -> Result<Option<Args>, String> {
    let mut config = SimulationConfig::default();
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--battles" => {
                i += 1;
                config.num_battles = parse_value(args, i, flag)?;
            }
            "--config" => {
                i += 1;
                let path = args.get(i).ok_or("missing --config path")?;
                config.combat = CombatConfig::load(path).map_err(|e| e.to_string())?;
            }
            "--min-gems" => {
                i += 1;
                config.min_gems = parse_value(args, i, flag)?;
            }
            "--max-gems" => {
                i += 1;
                config.max_gems = parse_value(args, i, flag)?;
            }
            "--special" => {
                i += 1;
                config.special_gem_chance = parse_value(args, i, flag)?;
            }
            "--goal-turns" => {
                i += 1;
                config.goal_turns = parse_value(args, i, flag)?;
            }
            "--max-turns" => {
                i += 1;
                config.max_turns = parse_value(args, i, flag)?;
            }
            "--threads" => {
                i += 1;
                config.threads = parse_value(args, i, flag)?;
            }
            "--seed" => {
                i += 1;
                config.seed = parse_value(args, i, flag)?;
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).ok_or("missing --output path")?.clone());
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(Some(Args {
        config,
        output_path,
    }))
}

fn main() -> ExitCode {
    gemclash::logging::init("gemclash=info,simulate=info");

    let args: Vec<String> = env::args().collect();
    let Args {
        config,
        output_path,
    } = match parse_args(&args) {
        Ok(Some(a)) => a,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            error!("{}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    if !config.quiet {
        info!(
            "Simulation: {} battles, gems {}..={}, special {:.2}, {} goal turns, {} threads",
            config.num_battles,
            config.min_gems,
            config.max_gems,
            config.special_gem_chance,
            config.goal_turns,
            config.threads
        );
    }

    let start = Instant::now();
    let battles = match simulate::run_simulation(&config) {
        Ok(b) => b,
        Err(e) => {
            error!("simulation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let elapsed = start.elapsed();

    if !config.quiet {
        let summary = simulate::summarize(&battles);
        info!(
            "Completed {} battles in {:.2}s: {} victories, {} defeats, {} timeouts (win rate {:.1}%, {:.1} turns on average)",
            summary.battles,
            elapsed.as_secs_f64(),
            summary.victories,
            summary.defeats,
            summary.timeouts,
            summary.win_rate * 100.0,
            summary.mean_turns
        );
    }

    let written = match &output_path {
        Some(path) => File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            simulate::write_jsonl(&battles, &mut writer)
        }),
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            simulate::write_jsonl(&battles, &mut writer)
        }
    };

    match written {
        Ok(()) => {
            if let (Some(path), false) = (&output_path, config.quiet) {
                info!("Wrote {} battles to {}", battles.len(), path);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("failed to write output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage: simulate [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --battles N      Number of battles to play (default: 100)");
    eprintln!("  --config FILE    JSON combat config (default: built-in defaults)");
    eprintln!("  --min-gems N     Smallest simulated match (default: 3)");
    eprintln!("  --max-gems N     Largest simulated match (default: 7)");
    eprintln!("  --special P      Chance a gem is white or green (default: 0.2)");
    eprintln!("  --goal-turns N   Player turns before level goals complete (default: 3)");
    eprintln!("  --max-turns N    Turn limit per battle (default: 200)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress progress and summary output");
    eprintln!("  --help           Show this help");
}
