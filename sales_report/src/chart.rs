//! PNG chart rendering for reports and summary metrics
//!
//! Charts are drawn with plotters onto a `BitMapBackend`. The x axis is a
//! segmented months-since-start axis labelled `YYYY-MM`. Text is rendered
//! with a bundled DejaVu Sans registered as `sans-serif`.

use crate::error::{ReportError, Result};
use crate::metrics::SalesSummary;
use crate::report::{ChartStyle, ReportRow};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::FontStyle;
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

const ACTUAL_COLOR: RGBColor = BLUE;
const PREDICTED_COLOR: RGBColor = RED;
const METRIC_COLOR: RGBColor = RGBColor(135, 206, 235);

const FONT_FAMILY: &str = "sans-serif";
static FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

type DrawResult<DB> = std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Render the chart for `style` to `path`, replacing any existing file.
///
/// `size` is the size of one panel; the combined style stacks two panels.
pub fn render_report_chart(
    rows: &[ReportRow],
    style: ChartStyle,
    path: &Path,
    size: (u32, u32),
) -> Result<()> {
    register_fonts()?;
    ensure_parent_dir(path)?;

    let (width, panel_height) = size;
    let height = match style {
        ChartStyle::Combined => panel_height * 2,
        ChartStyle::Bar | ChartStyle::Dotted => panel_height,
    };

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    draw_report(&root, rows, style, panel_height).map_err(|e| write_error(path, e))
}

/// Render the mean/median/standard deviation bar chart to `path`
pub fn render_metrics_chart(summary: &SalesSummary, path: &Path, size: (u32, u32)) -> Result<()> {
    register_fonts()?;
    ensure_parent_dir(path)?;

    let root = BitMapBackend::new(path, size).into_drawing_area();
    draw_metrics(&root, summary).map_err(|e| write_error(path, e))
}

/// Label for a months-since-start value, e.g. `24289` -> `2024-01`
pub fn period_label(months: i64) -> String {
    let year = (months - 1).div_euclid(12);
    let month = (months - 1).rem_euclid(12) + 1;
    format!("{}-{:02}", year, month)
}

/// Register the bundled font once per process
fn register_fonts() -> Result<()> {
    static REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();
    REGISTERED
        .get_or_init(|| {
            plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, FONT_DATA)
                .map_err(|_| "bundled font is not a valid TrueType file".to_string())
        })
        .clone()
        .map_err(ReportError::ArtifactWrite)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| write_error(dir, e))?;
    }
    Ok(())
}

fn write_error<E: std::fmt::Display>(path: &Path, err: E) -> ReportError {
    ReportError::ArtifactWrite(format!("{}: {}", path.display(), err))
}

fn draw_report<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    rows: &[ReportRow],
    style: ChartStyle,
    panel_height: u32,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    match style {
        ChartStyle::Bar => draw_bar_panel(root, rows)?,
        ChartStyle::Dotted => draw_line_panel(root, rows)?,
        ChartStyle::Combined => {
            let (upper, lower) = root.split_vertically(panel_height);
            draw_bar_panel(&upper, rows)?;
            draw_line_panel(&lower, rows)?;
        }
    }

    root.present()
}

/// Axis ranges covering every row; a unit box when there are no rows
fn axis_ranges(rows: &[ReportRow]) -> (Range<i64>, Range<f64>) {
    let x_min = rows.iter().map(ReportRow::months_since_start).min();
    let x_max = rows.iter().map(ReportRow::months_since_start).max();
    // Integer ranges are inclusive in plotters; keep at least two segments.
    let x_range = match (x_min, x_max) {
        (Some(lo), Some(hi)) => lo..hi.max(lo + 1),
        _ => 0..1,
    };

    let (lo, hi) = rows
        .iter()
        .flat_map(|r| [r.actual_sales, r.predicted_sales])
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let pad = (hi - lo) * 0.1;
    let y_range = if pad > f64::EPSILON {
        let start = if lo < 0.0 { lo - pad } else { lo };
        start..hi + pad
    } else {
        lo..lo + 1.0
    };

    (x_range, y_range)
}

/// X axis label; blank when there are no rows to place on the axis
fn segment_label(rows: &[ReportRow], value: &SegmentValue<i64>) -> String {
    match value {
        _ if rows.is_empty() => String::new(),
        SegmentValue::Exact(v) | SegmentValue::CenterOf(v) => period_label(*v),
        SegmentValue::Last => String::new(),
    }
}

fn draw_bar_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, rows: &[ReportRow]) -> DrawResult<DB> {
    let (x_range, y_range) = axis_ranges(rows);

    let mut chart = ChartBuilder::on(area)
        .caption("Bar Graph", (FONT_FAMILY, 24))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.into_segmented(), y_range)?;

    chart
        .configure_mesh()
        .x_labels(rows.len().max(1))
        .x_label_formatter(&|v: &SegmentValue<i64>| segment_label(rows, v))
        .x_label_style((FONT_FAMILY, 12).into_font().transform(FontTransform::Rotate90))
        .x_desc("Months Since Start")
        .y_desc("Sales")
        .draw()?;

    let bar = |x: i64, value: f64, style: ShapeStyle| {
        let mut rect = Rectangle::new(
            [(SegmentValue::Exact(x), 0.0), (SegmentValue::Exact(x + 1), value)],
            style,
        );
        rect.set_margin(0, 0, 4, 4);
        rect
    };

    chart
        .draw_series(
            rows.iter()
                .map(|r| bar(r.months_since_start(), r.actual_sales, ACTUAL_COLOR.filled())),
        )?
        .label("Actual Sales")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], ACTUAL_COLOR.filled()));

    chart
        .draw_series(rows.iter().map(|r| {
            bar(
                r.months_since_start(),
                r.predicted_sales,
                PREDICTED_COLOR.mix(0.5).filled(),
            )
        }))?
        .label("Predicted Sales")
        .legend(|(x, y)| {
            Rectangle::new([(x, y - 5), (x + 10, y + 5)], PREDICTED_COLOR.mix(0.5).filled())
        });

    // Edges
    chart.draw_series(rows.iter().flat_map(|r| {
        let x = r.months_since_start();
        [
            bar(x, r.actual_sales, BLACK.stroke_width(1)),
            bar(x, r.predicted_sales, BLACK.stroke_width(1)),
        ]
    }))?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn draw_line_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, rows: &[ReportRow]) -> DrawResult<DB> {
    let (x_range, y_range) = axis_ranges(rows);

    let mut chart = ChartBuilder::on(area)
        .caption("Dotted Line Graph", (FONT_FAMILY, 24))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.into_segmented(), y_range)?;

    chart
        .configure_mesh()
        .x_labels(rows.len().max(1))
        .x_label_formatter(&|v: &SegmentValue<i64>| segment_label(rows, v))
        .x_label_style((FONT_FAMILY, 12).into_font().transform(FontTransform::Rotate90))
        .x_desc("Months Since Start")
        .y_desc("Sales")
        .draw()?;

    let actual: Vec<(SegmentValue<i64>, f64)> = rows
        .iter()
        .map(|r| (SegmentValue::CenterOf(r.months_since_start()), r.actual_sales))
        .collect();
    let predicted: Vec<(SegmentValue<i64>, f64)> = rows
        .iter()
        .map(|r| (SegmentValue::CenterOf(r.months_since_start()), r.predicted_sales))
        .collect();

    chart
        .draw_series(LineSeries::new(actual.clone(), ACTUAL_COLOR.stroke_width(2)))?
        .label("Actual Sales")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ACTUAL_COLOR.stroke_width(2)));
    chart.draw_series(
        actual
            .iter()
            .map(|(x, y)| Circle::new((x.clone(), *y), 4, ACTUAL_COLOR.filled())),
    )?;

    chart
        .draw_series(DashedLineSeries::new(
            predicted.clone(),
            10,
            5,
            PREDICTED_COLOR.stroke_width(2),
        ))?
        .label("Predicted Sales")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], PREDICTED_COLOR.stroke_width(2))
        });
    chart.draw_series(
        predicted
            .iter()
            .map(|(x, y)| Circle::new((x.clone(), *y), 4, PREDICTED_COLOR.filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn draw_metrics<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, summary: &SalesSummary) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let metrics = summary.labelled();
    let top = metrics
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| v.is_finite())
        .fold(0.0f64, f64::max);
    let top = if top > 0.0 { top * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption("Sales Metrics", (FONT_FAMILY, 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..metrics.len() as i32 - 1).into_segmented(), 0.0..top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(metrics.len())
        .x_label_formatter(&|v: &SegmentValue<i32>| match v {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => metrics
                .get(*i as usize)
                .map(|(name, _)| name.to_string())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .x_desc("Metric")
        .y_desc("Value")
        .draw()?;

    chart.draw_series(
        metrics
            .iter()
            .enumerate()
            .filter(|(_, (_, v))| v.is_finite())
            .map(|(i, (_, v))| {
                let i = i as i32;
                let mut rect = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *v)],
                    METRIC_COLOR.filled(),
                );
                rect.set_margin(0, 0, 10, 10);
                rect
            }),
    )?;

    root.present()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_math::months_since_start;

    fn row(year: i32, month: u32, actual: f64, predicted: f64) -> ReportRow {
        ReportRow {
            product: "Widget".to_string(),
            year,
            month,
            predicted_sales: predicted,
            actual_sales: actual,
        }
    }

    #[test]
    fn test_period_label_inverts_feature() {
        assert_eq!(period_label(months_since_start(2024, 1)), "2024-01");
        assert_eq!(period_label(months_since_start(2023, 12)), "2023-12");
        assert_eq!(period_label(months_since_start(1999, 7)), "1999-07");
    }

    #[test]
    fn test_axis_ranges_cover_rows() {
        let rows = vec![row(2023, 1, 100.0, 90.0), row(2023, 6, 150.0, 160.0)];
        let (x, y) = axis_ranges(&rows);

        assert_eq!(x, months_since_start(2023, 1)..months_since_start(2023, 6));
        assert_eq!(y.start, 0.0);
        assert!(y.end >= 160.0);
    }

    #[test]
    fn test_axis_ranges_for_empty_rows() {
        let (x, y) = axis_ranges(&[]);
        assert_eq!(x, 0..1);
        assert_eq!(y, 0.0..1.0);
    }

    #[test]
    fn test_segment_labels_blank_without_rows() {
        let x = months_since_start(2024, 1);
        assert_eq!(segment_label(&[], &SegmentValue::CenterOf(0)), "");
        assert_eq!(segment_label(&[], &SegmentValue::Exact(x)), "");

        let rows = vec![row(2024, 1, 10.0, 12.0)];
        assert_eq!(segment_label(&rows, &SegmentValue::CenterOf(x)), "2024-01");
        assert_eq!(segment_label(&rows, &SegmentValue::Last), "");
    }

    #[test]
    fn test_axis_ranges_single_month_has_width() {
        let rows = vec![row(2024, 3, 10.0, 10.0)];
        let (x, _) = axis_ranges(&rows);
        assert_eq!(x.end - x.start, 1);
    }
}
