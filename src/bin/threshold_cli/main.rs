// ABOUTME: Threshold CLI - command-line front end for the threshold and pace engine
// ABOUTME: Reads JSON inputs from files, runs one engine operation, and writes JSON to stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # VDOT, training paces, and equivalent times for a race result
//! threshold-cli vdot --race race.json --as-of 2025-06-01
//!
//! # Threshold ensemble on a lab lactate test
//! threshold-cli detect --test lactate_test.json
//!
//! # Priority-based pace selection (one athlete or an array of athletes)
//! threshold-cli select --input athlete.json
//!
//! # Thresholds from a target time only
//! threshold-cli target --input target.json
//!
//! # Thresholds from a PB plus an improvement goal
//! threshold-cli improve --input goal.json
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use threshold_engine::logging::LoggingConfig;

#[derive(Parser)]
#[command(
    name = "threshold-cli",
    about = "Lactate threshold and training pace engine",
    long_about = "Runs threshold detection, VDOT, pace selection, and target-time estimation on JSON inputs."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// VDOT from a race result
    Vdot {
        /// Race performance JSON file
        #[arg(long)]
        race: PathBuf,

        /// Evaluation date for the race age (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// Threshold ensemble on a lactate test
    Detect {
        /// Lactate test record JSON file
        #[arg(long)]
        test: PathBuf,

        /// D-max threshold JSON file to merge as LT2
        #[arg(long)]
        dmax: Option<PathBuf>,
    },

    /// Priority-based pace selection
    Select {
        /// Pace selection input JSON file (object or array)
        #[arg(long)]
        input: PathBuf,
    },

    /// Thresholds from a target time
    Target {
        /// Target time input JSON file
        #[arg(long)]
        input: PathBuf,
    },

    /// Thresholds from a PB and improvement goal
    Improve {
        /// Improvement goal input JSON file
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_env();
    let logging = if cli.verbose {
        logging.with_level("debug")
    } else {
        logging
    };
    logging.init()?;

    let output = match cli.command {
        Command::Vdot { race, as_of } => commands::vdot(&race, as_of)?,
        Command::Detect { test, dmax } => commands::detect(&test, dmax.as_deref())?,
        Command::Select { input } => commands::select(&input)?,
        Command::Target { input } => commands::target(&input)?,
        Command::Improve { input } => commands::improve(&input)?,
    };

    helpers::print_json(&output, cli.pretty)
}
