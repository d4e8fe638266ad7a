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

//! Elexon BMRS system prices client
//!
//! Fetches system buy/sell prices and net imbalance volume per settlement
//! period from `balancing/settlement/system-prices/{date}`. Calls are blocking
//! and never retried; any failure surfaces as [`ImbalanceError::Fetch`].

use chrono::{DateTime, NaiveDate, Utc};
use imbalance_core::{ImbalanceError, ImbalanceRecord, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://data.elexon.co.uk/bmrs/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("imbalance-report/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct SystemPricesResponse {
    data: Vec<SystemPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SystemPrice {
    settlement_date: NaiveDate,
    settlement_period: u32,
    start_time: DateTime<Utc>,
    system_sell_price: f64,
    system_buy_price: f64,
    net_imbalance_volume: f64,
}

impl From<SystemPrice> for ImbalanceRecord {
    fn from(price: SystemPrice) -> Self {
        Self {
            settlement_date: price.settlement_date,
            settlement_period: price.settlement_period,
            period_start: price.start_time,
            buy_price: price.system_buy_price,
            sell_price: price.system_sell_price,
            volume: price.net_imbalance_volume,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BmrsClient {
    base_url: String,
    client: Client,
}

impl BmrsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ImbalanceError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client,
        })
    }

    /// Client against the public BMRS API
    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn system_prices_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/balancing/settlement/system-prices/{}",
            self.base_url,
            date.format("%Y-%m-%d")
        )
    }

    /// Fetch all settlement periods of one settlement day, ordered by period start
    pub fn fetch_day(&self, date: NaiveDate) -> Result<Vec<ImbalanceRecord>> {
        let url = self.system_prices_url(date);
        info!("Fetching BMRS system prices from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ImbalanceError::Fetch(format!("Request to BMRS failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ImbalanceError::Fetch(format!(
                "BMRS API error {status}: {body}"
            )));
        }

        let payload: SystemPricesResponse = response
            .json()
            .map_err(|e| ImbalanceError::Fetch(format!("Failed to parse BMRS response: {e}")))?;

        let mut records: Vec<ImbalanceRecord> =
            payload.data.into_iter().map(ImbalanceRecord::from).collect();
        records.sort_by_key(|r| r.period_start);

        if records.is_empty() {
            warn!("BMRS returned no settlement periods for {}", date);
        } else {
            debug!("Parsed {} settlement periods for {}", records.len(), date);
        }

        Ok(records)
    }

    /// Fetch every settlement day in `start..=end`; the first failure aborts the range
    pub fn fetch_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ImbalanceRecord>> {
        let mut all_records = Vec::new();

        for date in start.iter_days().take_while(|d| *d <= end) {
            let mut records = self.fetch_day(date)?;
            all_records.append(&mut records);
        }

        info!(
            "Fetched {} settlement periods between {} and {}",
            all_records.len(),
            start,
            end
        );
        Ok(all_records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::json;

    fn period(date: &str, period: u32, start: &str, volume: f64) -> serde_json::Value {
        json!({
            "settlementDate": date,
            "settlementPeriod": period,
            "startTime": start,
            "createdDateTime": "2023-10-25T10:00:00Z",
            "systemSellPrice": 60.0,
            "systemBuyPrice": 65.0,
            "bsadDefaulted": false,
            "priceDerivationCode": "N",
            "reserveScarcityPrice": 0.0,
            "netImbalanceVolume": volume
        })
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fetch_day_success() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/balancing/settlement/system-prices/2023-10-24")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "data": [
                        period("2023-10-24", 2, "2023-10-23T23:30:00Z", -42.5),
                        period("2023-10-24", 1, "2023-10-23T23:00:00Z", 120.0)
                    ]
                })
                .to_string(),
            )
            .create();

        let client = BmrsClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let records = client.fetch_day(date(2023, 10, 24)).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].settlement_period, 1);
        assert_eq!(records[0].settlement_date, date(2023, 10, 24));
        assert_eq!(records[0].period_start.to_rfc3339(), "2023-10-23T23:00:00+00:00");
        assert!((records[0].buy_price - 65.0).abs() < f64::EPSILON);
        assert!((records[0].sell_price - 60.0).abs() < f64::EPSILON);
        assert!((records[1].volume + 42.5).abs() < f64::EPSILON);
        mock.assert();
    }

    #[test]
    fn test_fetch_day_server_error() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/balancing/settlement/system-prices/2023-10-24")
            .with_status(503)
            .with_body("Service Unavailable")
            .expect(1)
            .create();

        let client = BmrsClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let result = client.fetch_day(date(2023, 10, 24));

        assert!(matches!(result, Err(ImbalanceError::Fetch(_))));
        mock.assert();
    }

    #[test]
    fn test_fetch_day_malformed_body() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/balancing/settlement/system-prices/2023-10-24")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"unexpected": true}).to_string())
            .create();

        let client = BmrsClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let result = client.fetch_day(date(2023, 10, 24));

        assert!(matches!(result, Err(ImbalanceError::Fetch(_))));
        mock.assert();
    }

    #[test]
    fn test_fetch_day_empty_data() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/balancing/settlement/system-prices/2023-10-24")
            .with_status(200)
            .with_body(json!({"data": []}).to_string())
            .create();

        let client = BmrsClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let records = client.fetch_day(date(2023, 10, 24)).unwrap();

        assert!(records.is_empty());
        mock.assert();
    }

    #[test]
    fn test_fetch_range_concatenates_days() {
        let mut server = Server::new();
        let first = server
            .mock("GET", "/balancing/settlement/system-prices/2023-12-01")
            .with_status(200)
            .with_body(
                json!({"data": [period("2023-12-01", 1, "2023-12-01T00:00:00Z", 5.0)]})
                    .to_string(),
            )
            .create();
        let second = server
            .mock("GET", "/balancing/settlement/system-prices/2023-12-02")
            .with_status(200)
            .with_body(
                json!({"data": [period("2023-12-02", 1, "2023-12-02T00:00:00Z", -5.0)]})
                    .to_string(),
            )
            .create();

        let client = BmrsClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let records = client
            .fetch_range(date(2023, 12, 1), date(2023, 12, 2))
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].settlement_date, date(2023, 12, 1));
        assert_eq!(records[1].settlement_date, date(2023, 12, 2));
        first.assert();
        second.assert();
    }

    #[test]
    fn test_fetch_range_stops_on_first_failure() {
        let mut server = Server::new();
        let failing = server
            .mock("GET", "/balancing/settlement/system-prices/2023-12-01")
            .with_status(500)
            .create();
        let untouched = server
            .mock("GET", "/balancing/settlement/system-prices/2023-12-02")
            .with_status(200)
            .with_body(json!({"data": []}).to_string())
            .expect(0)
            .create();

        let client = BmrsClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let result = client.fetch_range(date(2023, 12, 1), date(2023, 12, 2));

        assert!(matches!(result, Err(ImbalanceError::Fetch(_))));
        failing.assert();
        untouched.assert();
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = BmrsClient::new("http://localhost:8080/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.system_prices_url(date(2023, 10, 24)),
            "http://localhost:8080/balancing/settlement/system-prices/2023-10-24"
        );
    }
}
