//! Scripted-episode harness CLI.
//!
//! Runs decision-loop episodes against a toy world and outputs decision
//! records as JSONL.
//!
//! Usage:
//!   cargo run --release --bin episode -- [OPTIONS]
//!
//! Options:
//!   --episodes N    Number of episodes to run (default: 1)
//!   --ticks N       Simulation ticks per episode (default: 1200)
//!   --agents N      Agents per episode (default: 2)
//!   --tick-skip N   Ticks a decision is held (default: 8)
//!   --encoder V     Observation layout: default | advanced (default: default)
//!   --decoder V     Action mapping: continuous | lookup (default: continuous)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --threads N     Number of parallel threads (default: 4)
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress progress output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Instant;

use slipstream::action::DecoderVariant;
use slipstream::episode::{run, EpisodeConfig};
use slipstream::obs::EncoderVariant;

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = EpisodeConfig::default();
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--episodes" => {
                i += 1;
                config.episodes = args[i].parse().expect("invalid --episodes value");
            }
            "--ticks" => {
                i += 1;
                config.ticks = args[i].parse().expect("invalid --ticks value");
            }
            "--agents" => {
                i += 1;
                config.agents = args[i].parse().expect("invalid --agents value");
            }
            "--tick-skip" => {
                i += 1;
                config.tick_skip = args[i].parse().expect("invalid --tick-skip value");
            }
            "--encoder" => {
                i += 1;
                config.encoder = match args[i].as_str() {
                    "default" => EncoderVariant::Default,
                    "advanced" => EncoderVariant::Advanced,
                    other => {
                        eprintln!("Unknown encoder variant: {}", other);
                        std::process::exit(1);
                    }
                };
            }
            "--decoder" => {
                i += 1;
                config.decoder = match args[i].as_str() {
                    "continuous" => DecoderVariant::Continuous,
                    "lookup" => DecoderVariant::Lookup,
                    other => {
                        eprintln!("Unknown decoder variant: {}", other);
                        std::process::exit(1);
                    }
                };
            }
            "--seed" => {
                i += 1;
                config.seed = args[i].parse().expect("invalid --seed value");
            }
            "--threads" => {
                i += 1;
                config.threads = args[i].parse().expect("invalid --threads value");
            }
            "--output" => {
                i += 1;
                output_path = Some(args[i].clone());
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let start = Instant::now();
    let summary = match output_path {
        Some(path) => {
            let file = File::create(&path).expect("failed to create output file");
            let mut out = BufWriter::new(file);
            run(&config, &mut out)
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            run(&config, &mut out)
        }
    }
    .expect("episode run failed");

    if !config.quiet {
        eprintln!(
            "info string {} episodes, {} decisions in {:.1}s",
            summary.episodes,
            summary.decisions,
            start.elapsed().as_secs_f64()
        );
    }
}

fn print_usage() {
    let usage = "\
Usage: episode [OPTIONS]

Options:
  --episodes N    Number of episodes to run (default: 1)
  --ticks N       Simulation ticks per episode (default: 1200)
  --agents N      Agents per episode (default: 2)
  --tick-skip N   Ticks a decision is held (default: 8)
  --encoder V     Observation layout: default | advanced
  --decoder V     Action mapping: continuous | lookup
  --seed N        Random seed, 0 for entropy (default: 0)
  --threads N     Number of parallel threads (default: 4)
  --output FILE   Output file path (default: stdout)
  --quiet         Suppress progress output";
    let _ = writeln!(io::stderr(), "{}", usage);
}
