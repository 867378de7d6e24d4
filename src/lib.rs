//! # Sales Forecast
//!
//! Facade over the sales forecasting workspace.
//!
//! - [`math`]: the months-since-start feature and the least squares fit
//! - [`report`]: history loading, reports, charts, metrics and exports
//!
//! ## Example
//!
//! ```
//! use sales_forecast_workspace::math::{months_since_start, LinearRegression};
//!
//! let points: Vec<(f64, f64)> = (1..=6)
//!     .map(|m| (months_since_start(2024, m) as f64, 100.0 + 5.0 * m as f64))
//!     .collect();
//! let model = LinearRegression::fit(&points).unwrap();
//!
//! assert!((model.predict_period(2024, 7) - 135.0).abs() < 1e-6);
//! ```

pub use sales_math as math;
pub use sales_report as report;

pub use sales_math::{months_since_start, FittedModel, LinearRegression};
pub use sales_report::{
    AppConfig, ChartStyle, Period, PredictionExporter, ReportBuilder, SalesContext, SalesReport,
};
