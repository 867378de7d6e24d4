use approx::assert_relative_eq;
use rstest::rstest;
use sales_report::data::{Period, SalesData, SalesRecord};
use sales_report::{AppConfig, ChartStyle, ReportBuilder, ReportError, SalesContext};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn history() -> Vec<SalesRecord> {
    vec![
        SalesRecord::new("Widget", 2022, 11, 80.0),
        SalesRecord::new("Widget", 2022, 12, 95.0),
        SalesRecord::new("Widget", 2023, 1, 100.0),
        SalesRecord::new("Gadget", 2023, 1, 60.0),
        SalesRecord::new("Widget", 2023, 2, 104.0),
        SalesRecord::new("Widget", 2023, 6, 120.0),
        SalesRecord::new("Gadget", 2023, 12, 75.0),
        SalesRecord::new("Widget", 2024, 1, 140.0),
    ]
}

fn context(dir: &TempDir) -> SalesContext {
    context_in(&dir.path().join("reports"))
}

fn context_in(reports_dir: &Path) -> SalesContext {
    let config = AppConfig::default()
        .with_reports_dir(reports_dir)
        .with_chart_size(320, 240);
    let data = SalesData::from_records(&history()).unwrap();
    SalesContext::from_data(config, data).unwrap()
}

#[rstest]
#[case(Period::new(2022, 12))]
#[case(Period::new(2023, 1))]
#[case(Period::new(2023, 5))]
#[case(Period::new(2023, 12))]
#[case(Period::new(2030, 1))]
fn test_filter_is_lexicographic_prefix(#[case] cutoff: Period) {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let report = ReportBuilder::new(&ctx)
        .build(ChartStyle::Dotted, Some(cutoff))
        .unwrap();

    let expected: Vec<Period> = history()
        .iter()
        .map(SalesRecord::period)
        .filter(|p| *p <= cutoff)
        .collect();
    let actual: Vec<Period> = report.rows.iter().map(|r| r.period()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_every_row_carries_its_prediction() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let report = ReportBuilder::new(&ctx)
        .build(ChartStyle::Bar, Some(Period::new(2023, 6)))
        .unwrap();

    assert_eq!(report.rows.len(), 6);
    for row in &report.rows {
        let x = sales_math::months_since_start(row.year, row.month) as f64;
        assert_relative_eq!(row.predicted_sales, ctx.model().predict(x), epsilon = 1e-9);
    }
    assert_eq!(report.rows[3].product, "Gadget");
    assert_relative_eq!(report.rows[3].actual_sales, 60.0);
}

#[test]
fn test_no_cutoff_uses_whole_history() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let report = ReportBuilder::new(&ctx).build(ChartStyle::Bar, None).unwrap();
    assert_eq!(report.rows.len(), history().len());
}

#[rstest]
#[case(ChartStyle::Bar, "bar_graph.png")]
#[case(ChartStyle::Dotted, "dotted_graph.png")]
#[case(ChartStyle::Combined, "combined_graph.png")]
fn test_chart_written_to_fixed_path(#[case] style: ChartStyle, #[case] file_name: &str) {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let report = ReportBuilder::new(&ctx)
        .build(style, Some(Period::new(2023, 12)))
        .unwrap();

    let expected = dir.path().join("reports").join(file_name);
    assert_eq!(report.chart.path, expected);
    assert_eq!(report.chart.style, style);
    assert!(fs::metadata(&expected).unwrap().len() > 0);
}

#[test]
fn test_second_report_overwrites_chart() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    let builder = ReportBuilder::new(&ctx);

    let first = builder.build(ChartStyle::Bar, None).unwrap();
    let second = builder
        .build(ChartStyle::Bar, Some(Period::new(2023, 1)))
        .unwrap();

    assert_eq!(first.chart.path, second.chart.path);
    let entries = fs::read_dir(dir.path().join("reports")).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_empty_selection_still_renders() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let report = ReportBuilder::new(&ctx)
        .build(ChartStyle::Combined, Some(Period::new(1990, 1)))
        .unwrap();

    assert!(report.rows.is_empty());
    assert!(fs::metadata(&report.chart.path).unwrap().len() > 0);
}

#[test]
fn test_reports_dir_that_is_a_file_fails_with_artifact_write() {
    let dir = TempDir::new().unwrap();
    let blocked = dir.path().join("reports");
    fs::write(&blocked, b"not a directory").unwrap();
    let ctx = context_in(&blocked);

    let result = ReportBuilder::new(&ctx).build(ChartStyle::Bar, None);

    assert!(matches!(result, Err(ReportError::ArtifactWrite(_))));
}

#[test]
fn test_chart_path_taken_by_directory_fails_with_artifact_write() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    fs::create_dir_all(dir.path().join("reports").join("bar_graph.png")).unwrap();

    let result = ReportBuilder::new(&ctx).build(ChartStyle::Bar, None);

    assert!(matches!(result, Err(ReportError::ArtifactWrite(_))));
}
