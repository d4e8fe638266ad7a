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

//! fetch -> compute -> render -> write

use crate::config::AppConfig;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use imbalance_bmrs::BmrsClient;
use imbalance_core::{
    ImbalanceRecord, ReportCalculator, previous_week_start, render, render_weekly_trend,
    save_report, weekly_trend,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct RunOutcome {
    pub text: String,
    pub path: PathBuf,
}

/// Run the whole report for `date` and write it to the configured output directory.
///
/// The weekly trend covers the full week before the target day's week plus the
/// target week up to `date`.
pub fn run(config: &AppConfig, date: NaiveDate, include_weekly_trend: bool) -> Result<RunOutcome> {
    let client = BmrsClient::new(config.api.base_url.clone(), config.timeout())?;
    let calculator = ReportCalculator::new(config.timezone()?);

    let records = if include_weekly_trend {
        let start = previous_week_start(date);
        client
            .fetch_range(start, date)
            .with_context(|| format!("Failed to fetch imbalance data for {start}..={date}"))?
    } else {
        client
            .fetch_day(date)
            .with_context(|| format!("Failed to fetch imbalance data for {date}"))?
    };

    let text = build_report(&calculator, &records, date, include_weekly_trend)?;

    let path = save_report(&text, &config.report.output_dir, &config.report.file_name)
        .context("Failed to write report file")?;

    Ok(RunOutcome { text, path })
}

/// Render the report for `date` from fetched records, which may span the trend window
pub fn build_report(
    calculator: &ReportCalculator,
    records: &[ImbalanceRecord],
    date: NaiveDate,
    include_weekly_trend: bool,
) -> Result<String> {
    let day: Vec<ImbalanceRecord> = records
        .iter()
        .filter(|r| r.settlement_date == date)
        .cloned()
        .collect();

    let report = calculator
        .compute(&day)
        .with_context(|| format!("Failed to compute imbalance report for {date}"))?;
    info!(
        "Report for {}: {} periods, total cost {:.2}",
        report.date, report.period_count, report.total_cost
    );

    let mut text = render(&report);
    if include_weekly_trend {
        text.push('\n');
        text.push_str(&render_weekly_trend(&weekly_trend(records)));
    }

    Ok(text)
}
