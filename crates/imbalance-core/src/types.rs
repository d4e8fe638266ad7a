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

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Length of one settlement period in minutes
pub const SETTLEMENT_PERIOD_MINUTES: u32 = 30;

/// System prices and net imbalance volume for one settlement period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImbalanceRecord {
    /// Market day the period belongs to (may differ from the UTC date of `period_start`)
    pub settlement_date: NaiveDate,
    /// 1-based settlement period number within the market day
    pub settlement_period: u32,
    pub period_start: DateTime<Utc>,
    /// System buy price (currency/MWh)
    pub buy_price: f64,
    /// System sell price (currency/MWh)
    pub sell_price: f64,
    /// Net imbalance volume (MWh): positive = system short, negative = system long
    pub volume: f64,
}

impl ImbalanceRecord {
    /// Build a record whose settlement day and period are derived from the UTC start time
    pub fn from_start(
        period_start: DateTime<Utc>,
        buy_price: f64,
        sell_price: f64,
        volume: f64,
    ) -> Self {
        let minutes = period_start.hour() * 60 + period_start.minute();
        Self {
            settlement_date: period_start.date_naive(),
            settlement_period: minutes / SETTLEMENT_PERIOD_MINUTES + 1,
            period_start,
            buy_price,
            sell_price,
            volume,
        }
    }

    /// Price applied to this period's imbalance: buy price when the system is short,
    /// sell price otherwise
    pub fn applicable_price(&self) -> f64 {
        if self.volume > 0.0 {
            self.buy_price
        } else {
            self.sell_price
        }
    }
}

/// Imbalance cost accumulated within one local hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyCost {
    pub hour: u32,
    pub cost: f64,
}

/// Imbalance cost accumulated over a Monday-Sunday week
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyCost {
    /// Sunday closing the week
    pub week_ending: NaiveDate,
    pub cost: f64,
    /// Settlement days of the week present in the data
    pub days: u32,
}

impl WeeklyCost {
    pub const FULL_WEEK_DAYS: u32 = 7;

    pub fn is_partial(&self) -> bool {
        self.days < Self::FULL_WEEK_DAYS
    }
}

/// Summary statistics for one settlement day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub total_cost: f64,
    /// Sum of absolute net imbalance volumes (MWh)
    pub total_volume: f64,
    /// Cost per MWh, `None` when the day had no imbalance volume at all
    pub unit_rate: Option<f64>,
    /// Local hour (0-23) of the period with the largest absolute volume
    pub peak_hour: u32,
    /// Signed volume of that period (MWh)
    pub peak_volume: f64,
    /// Mean signed net imbalance volume (MWh)
    pub average_volume: f64,
    /// Per-hour cost, ascending by hour, hours without data omitted
    pub hourly_costs: Vec<HourlyCost>,
    pub period_count: usize,
}

impl DailyReport {
    /// Hour with the largest imbalance cost; first hour wins on ties
    pub fn peak_hourly_cost(&self) -> Option<HourlyCost> {
        self.hourly_costs
            .iter()
            .copied()
            .reduce(|best, next| if next.cost > best.cost { next } else { best })
    }
}
