#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the housing gap pipeline.
//!
//! Each subcommand runs one stage against the tables the previous stage
//! wrote; `run` (the default) chains every stage over the configured
//! years. Logging goes through [`housing_gap_cli_utils::init_logger`] so
//! progress bars and log lines share the terminal.

mod config;
mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use housing_gap_cli_utils::TerminalProgress;

use crate::config::PipelineConfig;
use crate::pipeline::{Pipeline, PipelineError};

#[derive(Parser)]
#[command(
    name = "housing_gap",
    about = "Affordable housing supply vs. income-qualified demand by zone"
)]
struct Cli {
    /// Path to the pipeline config TOML. Missing file means defaults.
    #[arg(long, default_value = "housing_gap.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize the raw housing production file
    CleanHousing,
    /// Normalize one year's income survey
    CleanIncome {
        /// Snapshot year (e.g., 2016)
        year: i32,
    },
    /// Estimate tier households and join housing for one year
    Expand {
        /// Snapshot year (e.g., 2016)
        year: i32,
    },
    /// Fit the ratio model for one year and write its report
    Predict {
        /// Snapshot year (e.g., 2016)
        year: i32,
    },
    /// Run every stage for each configured year
    Run {
        /// Comma-separated years or ranges (e.g., "2011-2015,2019").
        /// Overrides the `years` list in the config.
        #[arg(long)]
        years: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = housing_gap_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = PipelineConfig::load(&cli.config).map_err(PipelineError::from)?;
    let pipeline = Pipeline::new(config);

    match cli.command.unwrap_or(Commands::Run { years: None }) {
        Commands::CleanHousing => {
            let bar = TerminalProgress::rows_bar(&multi, "Cleaning housing records");
            pipeline.clean_housing(&bar)?;
        }
        Commands::CleanIncome { year } => {
            pipeline.clean_income(year)?;
        }
        Commands::Expand { year } => {
            let projects = pipeline.load_housing()?;
            let boroughs = pipeline.load_boroughs()?;
            pipeline.expand(year, &projects, &boroughs)?;
        }
        Commands::Predict { year } => {
            let report = pipeline.predict(year)?;
            log::info!(
                "{year}: degree {} over {} zones, R2 {:.4}",
                report.degree,
                report.zones.len(),
                report.r2
            );
        }
        Commands::Run { years } => {
            let years = match years {
                Some(spec) => parse_years(&spec)?,
                None => pipeline.config().years.clone(),
            };
            log::info!("Running pipeline for {} year(s)", years.len());
            pipeline.run_all(&years, &multi)?;
        }
    }

    Ok(())
}

/// Parses `"2011-2013,2016"` into `[2011, 2012, 2013, 2016]`.
fn parse_years(spec: &str) -> Result<Vec<i32>, String> {
    let mut years = Vec::new();
    for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let parse = |s: &str| {
            s.trim()
                .parse::<i32>()
                .map_err(|_| format!("Invalid year '{s}' in '{spec}'"))
        };
        if let Some((from, to)) = part.split_once('-') {
            let (from, to) = (parse(from)?, parse(to)?);
            if from > to {
                return Err(format!("Empty year range '{part}'"));
            }
            years.extend(from..=to);
        } else {
            years.push(parse(part)?);
        }
    }
    if years.is_empty() {
        return Err(format!("No years in '{spec}'"));
    }
    Ok(years)
}
