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

//! Daily imbalance cost aggregation

use crate::error::{ImbalanceError, Result};
use crate::types::{DailyReport, HourlyCost, ImbalanceRecord, WeeklyCost};
use chrono::{Datelike, Duration, NaiveDate, Timelike};
use chrono_tz::Tz;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Cost of a single settlement period: the applicable price times the absolute volume
pub fn period_cost(record: &ImbalanceRecord) -> f64 {
    record.applicable_price() * record.volume.abs()
}

/// Cost per MWh of imbalance
///
/// # Errors
/// Returns [`ImbalanceError::Division`] when `total_volume` is zero
pub fn unit_rate(total_cost: f64, total_volume: f64) -> Result<f64> {
    if total_volume > 0.0 {
        Ok(total_cost / total_volume)
    } else {
        Err(ImbalanceError::Division)
    }
}

/// Computes [`DailyReport`]s from one settlement day of records
#[derive(Debug, Clone, Copy)]
pub struct ReportCalculator {
    timezone: Tz,
}

impl Default for ReportCalculator {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl ReportCalculator {
    /// `timezone` decides which local hour a period start falls into
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    fn local_hour(&self, record: &ImbalanceRecord) -> u32 {
        record.period_start.with_timezone(&self.timezone).hour()
    }

    /// Summarise one settlement day.
    ///
    /// Records must be non-empty, belong to a single settlement date and be strictly
    /// ordered by period start. A day without any imbalance volume yields a report
    /// with an undefined unit rate rather than an error.
    pub fn compute(&self, records: &[ImbalanceRecord]) -> Result<DailyReport> {
        let date = validate_day(records)?;

        let mut total_cost = 0.0;
        let mut total_volume = 0.0;
        let mut signed_volume = 0.0;
        let mut peak: Option<&ImbalanceRecord> = None;

        for record in records {
            total_cost += period_cost(record);
            total_volume += record.volume.abs();
            signed_volume += record.volume;

            // Strict comparison keeps the first record on ties
            if peak.is_none_or(|p| record.volume.abs() > p.volume.abs()) {
                peak = Some(record);
            }
        }

        let peak = peak.ok_or_else(|| ImbalanceError::Validation("no records".to_owned()))?;

        let unit_rate = match unit_rate(total_cost, total_volume) {
            Ok(rate) => Some(rate),
            Err(ImbalanceError::Division) => {
                debug!("No imbalance volume on {date}, unit rate undefined");
                None
            }
            Err(e) => return Err(e),
        };

        #[expect(
            clippy::cast_precision_loss,
            reason = "a settlement day never has more than 50 periods"
        )]
        let average_volume = signed_volume / records.len() as f64;

        let report = DailyReport {
            date,
            total_cost,
            total_volume,
            unit_rate,
            peak_hour: self.local_hour(peak),
            peak_volume: peak.volume,
            average_volume,
            hourly_costs: self.hourly_costs(records),
            period_count: records.len(),
        };

        debug!(
            "Computed report for {}: cost={:.2}, volume={:.2}, peak_hour={}",
            report.date, report.total_cost, report.total_volume, report.peak_hour
        );

        Ok(report)
    }

    /// Imbalance cost per local hour, ascending by hour
    pub fn hourly_costs(&self, records: &[ImbalanceRecord]) -> Vec<HourlyCost> {
        let mut by_hour: BTreeMap<u32, f64> = BTreeMap::new();
        for record in records {
            *by_hour.entry(self.local_hour(record)).or_default() += period_cost(record);
        }

        by_hour
            .into_iter()
            .map(|(hour, cost)| HourlyCost { hour, cost })
            .collect()
    }
}

/// Sunday closing the Monday-Sunday week that contains `date`
pub fn week_ending(date: NaiveDate) -> NaiveDate {
    let days_to_sunday = 6 - i64::from(date.weekday().num_days_from_monday());
    date + Duration::days(days_to_sunday)
}

/// Monday opening the week before the one that contains `date`
pub fn previous_week_start(date: NaiveDate) -> NaiveDate {
    week_ending(date) - Duration::days(13)
}

/// Imbalance cost per week over records spanning any number of settlement days
pub fn weekly_trend(records: &[ImbalanceRecord]) -> Vec<WeeklyCost> {
    let mut by_week: BTreeMap<NaiveDate, (f64, BTreeSet<NaiveDate>)> = BTreeMap::new();
    for record in records {
        let (cost, days) = by_week
            .entry(week_ending(record.settlement_date))
            .or_default();
        *cost += period_cost(record);
        days.insert(record.settlement_date);
    }

    by_week
        .into_iter()
        .map(|(week_ending, (cost, days))| WeeklyCost {
            week_ending,
            cost,
            days: u32::try_from(days.len()).unwrap_or(u32::MAX),
        })
        .collect()
}

fn validate_day(records: &[ImbalanceRecord]) -> Result<NaiveDate> {
    let first = records
        .first()
        .ok_or_else(|| ImbalanceError::Validation("no imbalance records supplied".to_owned()))?;
    let date = first.settlement_date;

    for record in records {
        if record.settlement_date != date {
            return Err(ImbalanceError::Validation(format!(
                "records span several settlement dates ({date} and {})",
                record.settlement_date
            )));
        }
        if !(record.buy_price.is_finite()
            && record.sell_price.is_finite()
            && record.volume.is_finite())
        {
            return Err(ImbalanceError::Validation(format!(
                "non-finite value in settlement period {} of {date}",
                record.settlement_period
            )));
        }
    }

    if let Some(pair) = records
        .windows(2)
        .find(|pair| pair[1].period_start <= pair[0].period_start)
    {
        return Err(ImbalanceError::Validation(format!(
            "records not ordered by period start: {} follows {}",
            pair[1].period_start, pair[0].period_start
        )));
    }

    Ok(date)
}
