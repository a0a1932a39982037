//! clinic_day — one simulated day at a hospital intake desk.
//!
//! Generates a seeded population (or loads one from CSV), then steps the
//! clock minute by minute from 00:00 to 23:59: arrivals are dispatched,
//! 5–10 patients are served per minute with urgent patients first, and the
//! run ends with a summary.  Results land in `output/clinic_day/`.
//!
//! Run with:
//!   cargo run -p clinic_day -- [PATIENTS] [--seed N] [--csv FILE] [--interactive]
//!
//! `--interactive` advances one minute per Enter and stops on `exit`.
//! Set `RUST_LOG=debug` to see every dispatch.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pi_core::{Minute, SimConfig};
use pi_output::{CsvWriter, SimOutputObserver};
use pi_queue::PopulationGenerator;
use pi_sim::{RunState, ServiceEvent, SimBuilder, SimObserver, StatusSnapshot};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_PATIENTS: usize = 300;
const DEFAULT_SEED:     u64   = 42;
const OUTPUT_DIR:       &str  = "output/clinic_day";
/// Batch mode prints the queue status once per simulated hour.
const BATCH_STATUS_TICKS: u64 = 60;

// ── Arguments ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[clap(author, version, about = "One simulated day at a hospital intake desk", long_about = None)]
struct Args {
    /// Number of patients to generate (ignored with --csv)
    #[clap(value_name = "PATIENTS", default_value_t = DEFAULT_PATIENTS)]
    patients: usize,
    /// Seed for population generation and service capacity
    #[clap(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Load the population from a CSV file (id,gender,arrival,urgency)
    #[clap(long, value_name = "FILE")]
    csv: Option<PathBuf>,
    /// Advance one minute per Enter; type `exit` to stop
    #[clap(long, short = 'i', action = clap::ArgAction::SetTrue)]
    interactive: bool,
}

impl Args {
    fn validate(&self) -> Result<()> {
        if self.patients == 0 && self.csv.is_none() {
            bail!("patient count must be positive");
        }
        Ok(())
    }

    /// Status snapshots every minute when interactive, hourly otherwise.
    fn status_interval(&self) -> u64 {
        if self.interactive { 1 } else { BATCH_STATUS_TICKS }
    }
}

// ── Console observer ──────────────────────────────────────────────────────────

/// Prints service events as they happen and each status snapshot.
struct Console;

impl SimObserver for Console {
    fn on_serve(&mut self, event: &ServiceEvent) {
        println!("{event}");
    }

    fn on_status(&mut self, now: Minute, status: &StatusSnapshot) {
        println!("\n[{now}]");
        println!("{status}");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    args.validate()?;

    println!("Patient Scheduling System Simulation");
    println!("-------------------------------------");

    // 1. Config: whole day, 5–10 patients served per minute.
    let config = SimConfig {
        seed:                  args.seed,
        output_interval_ticks: args.status_interval(),
        ..SimConfig::default()
    };

    // 2. Population.
    let mut builder = SimBuilder::new(config);
    match &args.csv {
        Some(path) => {
            println!("Population: {}", path.display());
            builder = builder.population_csv(path);
        }
        None => {
            println!("Population: {} generated patients (seed {})", args.patients, args.seed);
            builder = builder.generated(PopulationGenerator::new(args.patients, args.seed));
        }
    }
    let mut sim = builder.build()?;
    println!("Pending patients: {}", sim.pending.len());

    // 3. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = (Console, SimOutputObserver::new(writer));

    // 4. Run.
    let t0 = Instant::now();
    let summary = if args.interactive {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            println!("\nCurrent Time: {}", sim.now());
            print!("Press Enter to advance 1 minute or type 'exit' to stop: ");
            io::stdout().flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };
            if line.trim() == "exit" {
                sim.stop();
                break;
            }
            if sim.step(&mut obs)? == RunState::Halted {
                println!("\nSimulation completed for a full day.");
                break;
            }
        }
        let summary = sim.summary_report();
        obs.on_sim_end(sim.now(), &summary);
        summary
    } else {
        sim.run(&mut obs)?
    };
    let elapsed = t0.elapsed();

    if let Some(e) = obs.1.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!();
    println!("{summary}");
    println!("Simulated until {} in {:.3} s", sim.now(), elapsed.as_secs_f64());
    println!("Output written to ./{OUTPUT_DIR}");

    Ok(())
}
