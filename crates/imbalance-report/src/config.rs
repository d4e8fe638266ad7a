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

//! Report generator configuration
//!
//! Loaded from TOML, with a few environment overrides for deployment.

use chrono_tz::Tz;
use imbalance_bmrs::DEFAULT_BASE_URL;
use imbalance_core::{DEFAULT_REPORT_FILE, ImbalanceError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "imbalance.toml";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_30() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_file_name() -> String {
    DEFAULT_REPORT_FILE.to_owned()
}

fn default_timezone() -> String {
    "UTC".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub report: ReportConfig,

    /// Default tracing filter, `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_30")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// IANA timezone used for hour bucketing, e.g. "Europe/London"
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub include_weekly_trend: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            report: ReportConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: 30,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_name: default_file_name(),
            timezone: default_timezone(),
            include_weekly_trend: false,
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `imbalance.toml` in the working
    /// directory is used when present, otherwise the defaults. Environment
    /// overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, Path::new("."), |key| std::env::var(key).ok())
    }

    /// [`AppConfig::load`] with an explicit lookup directory and variable source
    pub fn load_from(
        path: Option<&Path>,
        working_dir: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = working_dir.join(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(&fallback)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ImbalanceError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            ImbalanceError::Config(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Apply `BMRS_BASE_URL`, `IMBALANCE_OUTPUT_DIR` and `IMBALANCE_TIMEZONE`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("BMRS_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(dir) = lookup("IMBALANCE_OUTPUT_DIR") {
            self.report.output_dir = PathBuf::from(dir);
        }
        if let Some(tz) = lookup("IMBALANCE_TIMEZONE") {
            self.report.timezone = tz;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ImbalanceError::Config("api.base_url is empty".to_owned()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ImbalanceError::Config(
                "api.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if self.report.file_name.trim().is_empty() {
            return Err(ImbalanceError::Config(
                "report.file_name is empty".to_owned(),
            ));
        }
        self.timezone()?;
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.report.timezone.parse::<Tz>().map_err(|_| {
            ImbalanceError::Config(format!("unknown timezone: {}", self.report.timezone))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}
