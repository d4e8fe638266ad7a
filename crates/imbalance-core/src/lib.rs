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

//! Daily system imbalance reporting
//!
//! Turns one settlement day of half-hourly system prices and net imbalance
//! volumes into a [`DailyReport`]:
//!
//! - **Total cost**: buy price on short periods, sell price on long periods,
//!   times the absolute volume
//! - **Unit rate**: total cost per MWh of absolute imbalance volume
//! - **Peak hour**: local hour of the period with the largest absolute volume
//! - **Hourly and weekly breakdowns** of the imbalance cost

pub mod calculator;
pub mod error;
pub mod report;
pub mod types;

pub use calculator::{
    ReportCalculator, period_cost, previous_week_start, unit_rate, week_ending, weekly_trend,
};
pub use error::{ImbalanceError, Result};
pub use report::{DEFAULT_REPORT_FILE, render, render_weekly_trend, save_report};
pub use types::*;
