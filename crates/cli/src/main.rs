//! Stack issue array simulator CLI.
//!
//! This binary drives the stack model from the command line. It provides:
//! 1. **Scenario run:** Simulate a JSON scenario and print one JSON line per cycle.
//! 2. **Compaction:** Run the stream compactor over lanes given on the command line.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (e.g. `RUST_LOG=ssia_core=trace`).

mod scenario;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use ssia_core::Ssia;
use ssia_core::core::stack::CycleOutputs;
use ssia_core::core::units::{Compactor, Lane};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::scenario::{Scenario, ScenarioError};

#[derive(Parser, Debug)]
#[command(
    name = "ssia-sim",
    author,
    version,
    about = "Speculative stack issue array simulator",
    long_about = "Simulate the two-tier speculative stack cycle by cycle.\n\nExamples:\n  ssia-sim run scenarios/spill.json --stats\n  ssia-sim compact --width 8 0x11 _ 0x33 _"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a JSON scenario and print the outputs of every cycle.
    Run {
        /// Scenario file.
        scenario: PathBuf,

        /// Print accumulated statistics to stderr when done.
        #[arg(long)]
        stats: bool,
    },

    /// Compact a sparse lane vector. Use `_` for a disabled lane.
    Compact {
        /// Lane value width in bits.
        #[arg(short, long, default_value_t = 32)]
        width: u32,

        /// Lane values (decimal or 0x-prefixed hex), in lane order.
        #[arg(required = true, value_parser = parse_lane)]
        lanes: Vec<Lane>,
    },
}

/// One printed line of a scenario run.
#[derive(Serialize)]
struct CycleRecord<'a> {
    cycle: u64,
    #[serde(flatten)]
    outputs: &'a CycleOutputs,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run { scenario, stats } => cmd_run(&scenario, stats),
        Commands::Compact { width, lanes } => cmd_compact(width, &lanes),
    };
    if let Err(e) = result {
        error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Parses a lane argument: `_` is a disabled lane, anything else an enabled value.
fn parse_lane(arg: &str) -> Result<Lane, String> {
    if arg == "_" {
        return Ok(Lane::disabled());
    }
    let parsed = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => arg.parse(),
    };
    parsed
        .map(Lane::enabled)
        .map_err(|e| format!("invalid lane `{arg}`: {e}"))
}

/// Runs a scenario, writing one JSON object per cycle to stdout.
fn cmd_run(path: &Path, stats: bool) -> Result<(), ScenarioError> {
    let scenario = Scenario::load(path)?;
    let mut stack = Ssia::new(&scenario.config)?;
    let cycles = scenario.expand(&stack)?;
    info!(path = %path.display(), cycles = cycles.len(), "running scenario");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for inputs in &cycles {
        let outputs = stack.advance(inputs)?;
        let record = CycleRecord {
            cycle: stack.stats().cycles - 1,
            outputs: &outputs,
        };
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out)?;
    }
    out.flush()?;

    if stats {
        eprintln!("{}", stack.stats());
    }
    Ok(())
}

/// Runs the compactor over `lanes` and prints the dense result.
fn cmd_compact(width: u32, lanes: &[Lane]) -> Result<(), ScenarioError> {
    let compactor = Compactor::new(width, lanes.len())?;
    info!(width = compactor.width(), lanes = compactor.count(), "compacting lanes");
    let compacted = compactor.compact(lanes);
    let digits = compactor.width().div_ceil(4) as usize;

    let mut out = io::stdout().lock();
    writeln!(out, "count {}", compacted.count)?;
    for (slot, value) in compacted.values.iter().enumerate() {
        writeln!(out, "out[{slot}] 0x{value:0digits$x}")?;
    }
    if let Some(packed) = compacted.packed() {
        writeln!(out, "packed 0x{packed:x}")?;
    }
    Ok(())
}
