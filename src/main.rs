//! # Beacon Exclusion Command-Line Entry Point
//!
//! Reads a sensor report from disk and runs one of the coverage queries:
//! - `count`: positions on a row that cannot hold an undetected beacon
//! - `gap`: the uncovered position in the search square and its tuning frequency
//!
//! Defaults come from beacon-config.toml (see `init-config`); flags override them.

use anyhow::{bail, Context};
use beacon_zone_lib::config::{Config, CONFIG_FILE};
use beacon_zone_lib::{excluded_count, find_gap, find_gap_parallel, Gap, Report};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "beacon-exclusion")]
#[command(about = "Find where an undetected beacon can and cannot be", long_about = None)]
struct Args {
    /// Configuration file (defaults to beacon-config.toml in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count positions on a row that cannot contain an undetected beacon
    Count {
        /// Sensor report file
        input: PathBuf,

        /// Row to inspect
        #[arg(long)]
        row: Option<i64>,
    },

    /// Locate the single uncovered position inside the search square
    Gap {
        /// Sensor report file
        input: PathBuf,

        /// Lower bound of the search square (both axes)
        #[arg(long)]
        min: Option<i64>,

        /// Upper bound of the search square (both axes)
        #[arg(long)]
        max: Option<i64>,

        /// Number of row bands searched concurrently
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Write the default configuration file
    InitConfig {
        /// Destination path
        #[arg(default_value = CONFIG_FILE)]
        path: PathBuf,
    },
}

#[derive(Serialize)]
struct CountOutput {
    row: i64,
    excluded: u64,
}

#[derive(Serialize)]
struct GapOutput {
    min_coord: i64,
    max_coord: i64,
    gap: Option<Gap>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_report(path: &Path) -> anyhow::Result<Report> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sensor report {}", path.display()))?;
    let report: Report = text
        .parse()
        .with_context(|| format!("Failed to parse sensor report {}", path.display()))?;

    if report.is_empty() {
        warn!("Sensor report {} contains no sensors", path.display());
    } else {
        info!(
            "Loaded {} sensors from {}",
            report.sensors().len(),
            path.display()
        );
    }
    Ok(report)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    match args.command {
        Command::InitConfig { path } => {
            Config::default()
                .save_to_path(&path)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
        }

        Command::Count { input, row } => {
            if let Some(row) = row {
                config.search.row = row;
            }
            let report = load_report(&input)?;
            let row = config.search.row;
            let excluded = excluded_count(&report, row);

            if args.json {
                print_json(&CountOutput { row, excluded })?;
            } else {
                println!("Row {}: {} positions cannot contain a beacon", row, excluded);
            }
        }

        Command::Gap {
            input,
            min,
            max,
            workers,
        } => {
            if let Some(min) = min {
                config.search.min_coord = min;
            }
            if let Some(max) = max {
                config.search.max_coord = max;
            }
            if let Some(workers) = workers {
                config.runtime.workers = workers;
            }
            config.validate().context("Invalid search settings")?;

            let report = load_report(&input)?;
            let (min_coord, max_coord) = (config.search.min_coord, config.search.max_coord);

            let gap = if config.runtime.workers > 1 {
                debug!("Using {} search workers", config.runtime.workers);
                let rt = tokio::runtime::Runtime::new()?;
                rt.block_on(find_gap_parallel(
                    Arc::new(report),
                    min_coord,
                    max_coord,
                    config.runtime.workers,
                ))
                .context("Parallel gap search failed")?
            } else {
                find_gap(&report, min_coord, max_coord)
            };

            if args.json {
                print_json(&GapOutput {
                    min_coord,
                    max_coord,
                    gap,
                })?;
            }

            match gap {
                Some(gap) => {
                    if !args.json {
                        println!(
                            "Uncovered position x={}, y={}: tuning frequency {}",
                            gap.position.x, gap.position.y, gap.tuning_frequency
                        );
                    }
                }
                None => bail!(
                    "No gap found: [{}, {}] is fully covered",
                    min_coord,
                    max_coord
                ),
            }
        }
    }

    Ok(())
}
