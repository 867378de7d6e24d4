//! Runtime configuration for the forecasting service

use crate::data::Period;
use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable overriding [`AppConfig::data_path`]
pub const DATA_PATH_VAR: &str = "SALES_DATA_PATH";
/// Environment variable overriding [`AppConfig::reports_dir`]
pub const REPORTS_DIR_VAR: &str = "SALES_REPORTS_DIR";
/// Environment variable overriding the default cutoff year
pub const DEFAULT_YEAR_VAR: &str = "SALES_DEFAULT_YEAR";
/// Environment variable overriding the default cutoff month
pub const DEFAULT_MONTH_VAR: &str = "SALES_DEFAULT_MONTH";

/// Paths and defaults shared by every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Historical sales CSV, read once at startup
    pub data_path: PathBuf,
    /// Directory receiving charts and exports
    pub reports_dir: PathBuf,
    /// Cutoff used when a report request omits year or month
    pub default_cutoff: Period,
    /// Chart width in pixels
    pub chart_width: u32,
    /// Height of one chart panel in pixels
    pub chart_height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("uploads/sales.csv"),
            reports_dir: PathBuf::from("reports"),
            default_cutoff: Period::new(2024, 1),
            chart_width: 1000,
            chart_height: 600,
        }
    }
}

impl AppConfig {
    /// Create a configuration with default paths
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the defaults and apply any `SALES_*` environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = env::var(DATA_PATH_VAR) {
            config.data_path = PathBuf::from(path);
        }
        if let Ok(dir) = env::var(REPORTS_DIR_VAR) {
            config.reports_dir = PathBuf::from(dir);
        }
        if let Some(year) = parse_var::<i32>(DEFAULT_YEAR_VAR)? {
            config.default_cutoff.year = year;
        }
        if let Some(month) = parse_var::<u32>(DEFAULT_MONTH_VAR)? {
            config.default_cutoff.month = month;
        }

        Ok(config)
    }

    /// Set the data path
    pub fn with_data_path(mut self, path: impl AsRef<Path>) -> Self {
        self.data_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the reports directory
    pub fn with_reports_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.reports_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the default cutoff
    pub fn with_default_cutoff(mut self, cutoff: Period) -> Self {
        self.default_cutoff = cutoff;
        self
    }

    /// Set the chart panel size
    pub fn with_chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart_width = width;
        self.chart_height = height;
        self
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            ReportError::ConfigError(format!("{} is not a valid number: '{}'", name, raw))
        }),
        Err(_) => Ok(None),
    }
}
