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

//! Plain-text rendering and file output of daily reports

use crate::error::Result;
use crate::types::{DailyReport, WeeklyCost};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_REPORT_FILE: &str = "daily_imbalance_report.txt";

/// Render the fixed-label text report
pub fn render(report: &DailyReport) -> String {
    let mut out = String::new();

    let unit_rate = match report.unit_rate {
        Some(rate) => format!("£{rate:.2}/MWh"),
        None => "undefined (zero total volume)".to_owned(),
    };

    out.push_str(&format!("Imbalance Report for {}\n", report.date));
    out.push_str(&format!(
        "Total Daily Imbalance Cost: £{:.2}\n",
        report.total_cost
    ));
    out.push_str(&format!("Daily Imbalance Unit Rate: {unit_rate}\n"));
    out.push_str(&format!(
        "Hour with Highest Imbalance Volume: {:02}:00 ({:.2} MWh)\n",
        report.peak_hour, report.peak_volume
    ));
    out.push_str(&format!(
        "Daily Average Net Imbalance Volume: {:.2} MWh\n",
        report.average_volume
    ));
    if let Some(peak) = report.peak_hourly_cost() {
        out.push_str(&format!(
            "Peak Hourly Imbalance Cost: £{:.2} at hour {:02}\n",
            peak.cost, peak.hour
        ));
    }

    out
}

/// Render the weekly cost trend section
pub fn render_weekly_trend(trend: &[WeeklyCost]) -> String {
    let mut out = String::from("Weekly Imbalance Cost Trend:\n");
    for week in trend {
        out.push_str(&format!(
            "  week ending {}: £{:.2}",
            week.week_ending, week.cost
        ));
        if week.is_partial() {
            out.push_str(&format!(" (partial, {} of 7 days)", week.days));
        }
        out.push('\n');
    }
    out
}

/// Write `text` to `output_dir/file_name`, creating the directory when missing
pub fn save_report(text: &str, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let path = output_dir.join(file_name);
    let temp_path = path.with_extension("tmp");

    fs::write(&temp_path, text)?;
    fs::rename(&temp_path, &path)?;

    info!("Report saved to {}", path.display());
    Ok(path)
}
