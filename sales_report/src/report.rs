//! Prediction reports over filtered sales history

use crate::chart;
use crate::context::SalesContext;
use crate::data::{Period, SalesData};
use crate::error::Result;
use sales_math::FittedModel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// Chart layout requested for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    /// Actual and predicted bars overlaid per month
    Bar,
    /// Actual solid line and predicted dashed line
    Dotted,
    /// Bar panel stacked above the dotted panel
    #[default]
    Combined,
}

impl ChartStyle {
    /// Parse a style tag. Anything other than `bar` or `dotted` is `Combined`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "bar" => ChartStyle::Bar,
            "dotted" => ChartStyle::Dotted,
            "combined" => ChartStyle::Combined,
            other => {
                warn!(tag = other, "Unknown chart style, using combined");
                ChartStyle::Combined
            }
        }
    }

    /// Tag used in URLs and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartStyle::Bar => "bar",
            ChartStyle::Dotted => "dotted",
            ChartStyle::Combined => "combined",
        }
    }

    /// Fixed file name of this style's chart; each render overwrites it
    pub fn file_name(&self) -> &'static str {
        match self {
            ChartStyle::Bar => "bar_graph.png",
            ChartStyle::Dotted => "dotted_graph.png",
            ChartStyle::Combined => "combined_graph.png",
        }
    }
}

impl fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One historical row with its model prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub product: String,
    pub year: i32,
    pub month: u32,
    pub predicted_sales: f64,
    pub actual_sales: f64,
}

impl ReportRow {
    pub fn period(&self) -> Period {
        Period::new(self.year, self.month)
    }

    pub fn months_since_start(&self) -> i64 {
        sales_math::months_since_start(self.year, self.month)
    }
}

/// A chart written to disk
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    pub style: ChartStyle,
    pub path: PathBuf,
}

/// Rows and chart produced for one report request
#[derive(Debug, Clone)]
pub struct SalesReport {
    pub rows: Vec<ReportRow>,
    pub chart: ChartArtifact,
}

/// Attach a prediction to every row of `data`
pub fn predict_rows(model: &FittedModel, data: &SalesData) -> Result<Vec<ReportRow>> {
    Ok(data
        .records()?
        .into_iter()
        .map(|record| ReportRow {
            predicted_sales: model.predict(record.months_since_start() as f64),
            product: record.product,
            year: record.year,
            month: record.month,
            actual_sales: record.sales,
        })
        .collect())
}

/// Builds filtered prediction reports against a shared context
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder<'a> {
    context: &'a SalesContext,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(context: &'a SalesContext) -> Self {
        Self { context }
    }

    /// Predict the rows on or before `cutoff` and render the chart.
    ///
    /// With no cutoff the whole history is used. An empty selection still
    /// produces a chart, just with no bars or lines.
    pub fn build(&self, style: ChartStyle, cutoff: Option<Period>) -> Result<SalesReport> {
        let selection = match cutoff {
            Some(cutoff) => self.context.data().filter_through(cutoff)?,
            None => self.context.data().clone(),
        };
        let rows = predict_rows(self.context.model(), &selection)?;

        let config = self.context.config();
        let path = config.reports_dir.join(style.file_name());
        chart::render_report_chart(
            &rows,
            style,
            &path,
            (config.chart_width, config.chart_height),
        )?;

        info!(
            style = %style,
            rows = rows.len(),
            path = %path.display(),
            "Generated sales report"
        );

        Ok(SalesReport {
            rows,
            chart: ChartArtifact { style, path },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_tags() {
        assert_eq!(ChartStyle::from_tag("bar"), ChartStyle::Bar);
        assert_eq!(ChartStyle::from_tag("Dotted"), ChartStyle::Dotted);
        assert_eq!(ChartStyle::from_tag("combined"), ChartStyle::Combined);
        assert_eq!(ChartStyle::from_tag("pie"), ChartStyle::Combined);
        assert_eq!(ChartStyle::from_tag(""), ChartStyle::Combined);
        assert_eq!(ChartStyle::default(), ChartStyle::Combined);
    }

    #[test]
    fn test_style_file_names() {
        assert_eq!(ChartStyle::Bar.file_name(), "bar_graph.png");
        assert_eq!(ChartStyle::Dotted.file_name(), "dotted_graph.png");
        assert_eq!(ChartStyle::Combined.file_name(), "combined_graph.png");
    }
}
