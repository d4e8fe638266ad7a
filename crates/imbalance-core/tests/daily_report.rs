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

//! Integration tests for the daily report flow
//!
//! Records -> ReportCalculator -> render -> save_report

use chrono::{Duration, TimeZone, Utc};
use imbalance_core::{
    DEFAULT_REPORT_FILE, ImbalanceError, ImbalanceRecord, ReportCalculator, render,
    render_weekly_trend, save_report, weekly_trend,
};
use tempfile::TempDir;

fn settlement_day(sell: f64, buy: f64, volumes: &[f64]) -> Vec<ImbalanceRecord> {
    let start = Utc.with_ymd_and_hms(2023, 10, 24, 0, 0, 0).unwrap();
    volumes
        .iter()
        .enumerate()
        .map(|(i, volume)| {
            let offset = Duration::minutes(30 * i64::try_from(i).unwrap());
            ImbalanceRecord::from_start(start + offset, buy, sell, *volume)
        })
        .collect()
}

#[test]
fn test_full_day_report_written_to_disk() {
    let volumes: Vec<f64> = (0..48)
        .map(|i| if i % 2 == 0 { 100.0 } else { -100.0 })
        .collect();
    let records = settlement_day(60.0, 65.0, &volumes);

    let report = ReportCalculator::default().compute(&records).unwrap();
    let text = render(&report);

    let temp_dir = TempDir::new().unwrap();
    let path = save_report(&text, temp_dir.path(), DEFAULT_REPORT_FILE).unwrap();
    let written = std::fs::read_to_string(path).unwrap();

    assert_eq!(written, text);
    assert!(written.contains("Total Daily Imbalance Cost: £300000.00"));
    assert!(written.contains("Daily Imbalance Unit Rate: £62.50/MWh"));
    assert!(written.contains("Hour with Highest Imbalance Volume: 00:00"));
    assert!(written.contains("Daily Average Net Imbalance Volume: 0.00 MWh"));
}

#[test]
fn test_settlement_period_numbers_follow_start_time() {
    let records = settlement_day(60.0, 65.0, &[1.0, 2.0, 3.0]);
    let periods: Vec<u32> = records.iter().map(|r| r.settlement_period).collect();
    assert_eq!(periods, vec![1, 2, 3]);
}

#[test]
fn test_zero_volume_day_renders_undefined_rate() {
    let records = settlement_day(60.0, 65.0, &[0.0; 48]);

    let report = ReportCalculator::default().compute(&records).unwrap();
    let text = render(&report);

    assert!(text.contains("Daily Imbalance Unit Rate: undefined"));
    assert!(text.contains("Total Daily Imbalance Cost: £0.00"));
}

#[test]
fn test_empty_day_aborts() {
    let err = ReportCalculator::default().compute(&[]).unwrap_err();
    assert!(matches!(err, ImbalanceError::Validation(_)));
    assert!(err.to_string().starts_with("validation error"));
}

#[test]
fn test_weekly_trend_section() {
    let records = settlement_day(60.0, 65.0, &[10.0, -10.0]);
    let text = render_weekly_trend(&weekly_trend(&records));

    assert_eq!(
        text,
        "Weekly Imbalance Cost Trend:\n  week ending 2023-10-29: £1250.00 (partial, 1 of 7 days)\n"
    );
}
