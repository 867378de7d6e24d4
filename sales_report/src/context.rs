//! The process-wide sales context: configuration, history and fitted model

use crate::config::AppConfig;
use crate::data::{DataLoader, SalesData};
use crate::error::Result;
use sales_math::{FittedModel, LinearRegression};
use tracing::info;

/// Immutable state built once at startup and shared by every request.
///
/// The model is fit over the full history when the context is created and
/// is never refit afterwards; exports written later do not feed back into it.
#[derive(Debug, Clone)]
pub struct SalesContext {
    config: AppConfig,
    data: SalesData,
    model: FittedModel,
}

impl SalesContext {
    /// Load history from `config.data_path` and fit the model
    pub fn load(config: AppConfig) -> Result<Self> {
        let data = DataLoader::from_csv(&config.data_path)?;
        info!(
            path = %config.data_path.display(),
            rows = data.len(),
            "Loaded sales history"
        );
        Self::from_data(config, data)
    }

    /// Fit the model over already loaded history
    pub fn from_data(config: AppConfig, data: SalesData) -> Result<Self> {
        let points: Vec<(f64, f64)> = data
            .records()?
            .iter()
            .map(|r| (r.months_since_start() as f64, r.sales))
            .collect();
        let model = LinearRegression::fit(&points)?;

        info!(
            slope = model.slope(),
            intercept = model.intercept(),
            r_squared = model.r_squared(),
            observations = model.n_observations(),
            "Fitted sales regression"
        );

        Ok(Self {
            config,
            data,
            model,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the full sales history
    pub fn data(&self) -> &SalesData {
        &self.data
    }

    /// Get the fitted model
    pub fn model(&self) -> &FittedModel {
        &self.model
    }

    /// Predict sales for a calendar period
    pub fn predict_period(&self, year: i32, month: u32) -> f64 {
        self.model.predict_period(year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SalesRecord;
    use crate::error::ReportError;

    #[test]
    fn test_from_data_fits_once() {
        let data = SalesData::from_records(&[
            SalesRecord::new("A", 2024, 1, 10.0),
            SalesRecord::new("A", 2024, 2, 20.0),
            SalesRecord::new("A", 2024, 3, 30.0),
        ])
        .unwrap();
        let ctx = SalesContext::from_data(AppConfig::default(), data).unwrap();

        assert!((ctx.model().slope() - 10.0).abs() < 1e-8);
        assert!((ctx.predict_period(2024, 4) - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_period_history_is_degenerate() {
        let data = SalesData::from_records(&[
            SalesRecord::new("A", 2024, 1, 10.0),
            SalesRecord::new("B", 2024, 1, 20.0),
        ])
        .unwrap();

        let err = SalesContext::from_data(AppConfig::default(), data).unwrap_err();
        assert!(matches!(err, ReportError::DegenerateFit(_)));
    }

    #[test]
    fn test_missing_file_fails_load() {
        let config = AppConfig::default().with_data_path("does/not/exist.csv");
        let err = SalesContext::load(config).unwrap_err();
        assert!(matches!(err, ReportError::DataLoad(_)));
    }
}
