//! # Sales Report
//!
//! Monthly sales history, linear predictions and the artifacts built from them.
//!
//! ## Features
//!
//! - Sales history loading from CSV (polars)
//! - A single linear model fit once over the full history
//! - Filtered prediction reports with bar, dotted line or combined PNG charts
//! - Mean / median / standard deviation summary with its own chart
//! - Timestamped xlsx export of predicted versus actual sales
//!
//! ## Quick Start
//!
//! ```no_run
//! use sales_report::{AppConfig, ChartStyle, Period, ReportBuilder, SalesContext};
//!
//! // Load history and fit the model once
//! let context = SalesContext::load(AppConfig::default())?;
//!
//! // Predict a single month
//! let forecast = context.predict_period(2024, 6);
//! println!("June 2024 forecast: {:.2}", forecast);
//!
//! // Build a report through January 2024 with a bar chart
//! let report = ReportBuilder::new(&context).build(ChartStyle::Bar, Some(Period::new(2024, 1)))?;
//! println!("{} rows, chart at {}", report.rows.len(), report.chart.path.display());
//! # Ok::<(), sales_report::ReportError>(())
//! ```

pub mod chart;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod export;
pub mod metrics;
pub mod report;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::context::SalesContext;
pub use crate::data::{DataLoader, Period, SalesData, SalesRecord};
pub use crate::error::{ReportError, Result};
pub use crate::export::{ExportMode, ExportedFile, PredictionExporter};
pub use crate::metrics::{build_metrics_report, MetricsReport, SalesSummary};
pub use crate::report::{ChartArtifact, ChartStyle, ReportBuilder, ReportRow, SalesReport};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
