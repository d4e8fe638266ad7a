// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of imbalance-report.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Daily imbalance report - entry point
//!
//! Fetches one settlement day from BMRS, computes the imbalance summary and
//! writes it to a text file.

mod config;
mod pipeline;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use config::AppConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "imbalance-report")]
#[command(author, version, about = "Daily system imbalance cost report from BMRS data")]
struct Cli {
    /// Settlement date to report on (defaults to yesterday, UTC)
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for the report file (overrides report.output_dir)
    #[arg(long, value_name = "PATH")]
    output_dir: Option<PathBuf>,

    /// Append the weekly cost trend of the seven days ending on --date
    #[arg(long, default_value_t = false)]
    weekly_trend: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    if let Some(dir) = cli.output_dir {
        config.report.output_dir = dir;
    }

    let date = match cli.date {
        Some(date) => date,
        None => Utc::now()
            .date_naive()
            .pred_opt()
            .context("Cannot determine yesterday's date")?,
    };
    let include_weekly_trend = cli.weekly_trend || config.report.include_weekly_trend;

    info!(
        "Generating imbalance report for {} (api={}, timezone={}, weekly_trend={})",
        date, config.api.base_url, config.report.timezone, include_weekly_trend
    );

    let outcome = pipeline::run(&config, date, include_weekly_trend)?;

    println!("{}", outcome.text);
    println!("Report saved to {}", outcome.path.display());

    Ok(())
}
