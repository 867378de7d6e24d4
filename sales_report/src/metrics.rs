//! Descriptive statistics over actual sales

use crate::chart;
use crate::context::SalesContext;
use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution, Median};
use std::path::PathBuf;
use tracing::info;

/// Fixed file name of the metrics chart
pub const METRICS_CHART_FILE: &str = "metrics_graph.png";

/// Mean, median and sample standard deviation of actual sales
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub mean: f64,
    pub median: f64,
    /// Sample (n - 1) standard deviation; NaN for a single value
    pub std_dev: f64,
}

impl SalesSummary {
    /// Summarize a non-empty slice of sales figures
    pub fn from_sales(sales: &[f64]) -> Result<Self> {
        if sales.is_empty() {
            return Err(ReportError::DataError(
                "No sales figures to summarize".to_string(),
            ));
        }

        let data = Data::new(sales.to_vec());
        Ok(Self {
            mean: data.mean().unwrap_or(f64::NAN),
            median: data.median(),
            std_dev: data.std_dev().unwrap_or(f64::NAN),
        })
    }

    /// Display names paired with values, in chart order
    pub fn labelled(&self) -> [(&'static str, f64); 3] {
        [
            ("Mean Sales", self.mean),
            ("Median Sales", self.median),
            ("Standard Deviation", self.std_dev),
        ]
    }
}

/// Summary plus the chart rendered for it
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub summary: SalesSummary,
    pub chart_path: PathBuf,
}

/// Summarize the full history and render `metrics_graph.png`
pub fn build_metrics_report(context: &SalesContext) -> Result<MetricsReport> {
    let summary = SalesSummary::from_sales(&context.data().sales()?)?;

    let config = context.config();
    let chart_path = config.reports_dir.join(METRICS_CHART_FILE);
    chart::render_metrics_chart(
        &summary,
        &chart_path,
        (config.chart_width, config.chart_height),
    )?;

    info!(
        mean = summary.mean,
        median = summary.median,
        std_dev = summary.std_dev,
        path = %chart_path.display(),
        "Generated sales metrics"
    );

    Ok(MetricsReport {
        summary,
        chart_path,
    })
}
