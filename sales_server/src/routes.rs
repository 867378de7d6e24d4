//! API route handlers

use crate::error::AppError;
use crate::html;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::{Form, Json};
use sales_math::validate_period;
use sales_report::export::EXPORT_CONTENT_TYPE;
use sales_report::metrics::METRICS_CHART_FILE;
use sales_report::{
    build_metrics_report, ChartStyle, Period, PredictionExporter, ReportBuilder, ReportError,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct PredictForm {
    pub year: Option<String>,
    pub month: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub year: Option<String>,
    pub month: Option<String>,
    #[serde(rename = "type")]
    pub style: Option<String>,
}

/// Route serving the chart of `style`
pub fn chart_endpoint(style: ChartStyle) -> &'static str {
    match style {
        ChartStyle::Bar => "/generated_bar_graph",
        ChartStyle::Dotted => "/generated_dotted_graph",
        ChartStyle::Combined => "/generated_combined_graph",
    }
}

fn parse_int<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AppError::InvalidParameter(format!("{} must be an integer, got '{}'", name, raw)))
}

fn parse_period(year: i32, month: u32) -> Result<Period, AppError> {
    let (year, month) = validate_period(year, month)
        .map_err(|e| AppError::InvalidParameter(e.to_string()))?;
    Ok(Period::new(year, month))
}

/// Treat absent and blank query values the same way
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn required<'v>(name: &str, value: &'v Option<String>) -> Result<&'v str, AppError> {
    non_blank(value).ok_or_else(|| AppError::InvalidParameter(format!("{} is required", name)))
}

/// Liveness probe - is the server running?
pub async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(html::index_page(state.context.config().default_cutoff))
}

pub async fn predict(
    State(state): State<AppState>,
    Form(form): Form<PredictForm>,
) -> Result<Html<String>, AppError> {
    let year = parse_int::<i32>("year", required("year", &form.year)?)?;
    let month = parse_int::<u32>("month", required("month", &form.month)?)?;
    let period = parse_period(year, month)?;

    let prediction = state.context.predict_period(period.year, period.month);
    tracing::debug!(period = %period, prediction, "Served prediction");

    Ok(Html(html::prediction_page(period, prediction)))
}

pub async fn generate_report(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Html<String>, AppError> {
    let defaults = state.context.config().default_cutoff;
    let year = match non_blank(&params.year) {
        Some(raw) => parse_int::<i32>("year", raw)?,
        None => defaults.year,
    };
    let month = match non_blank(&params.month) {
        Some(raw) => parse_int::<u32>("month", raw)?,
        None => defaults.month,
    };
    let cutoff = parse_period(year, month)?;
    let style = non_blank(&params.style)
        .map(ChartStyle::from_tag)
        .unwrap_or_default();

    let context = state.context.clone();
    let report = tokio::task::spawn_blocking(move || {
        ReportBuilder::new(&context).build(style, Some(cutoff))
    })
    .await??;

    Ok(Html(html::report_page(
        cutoff,
        &report,
        chart_endpoint(report.chart.style),
    )))
}

async fn serve_png(path: PathBuf) -> Result<impl IntoResponse, AppError> {
    let bytes = read_artifact(&path).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

async fn read_artifact(path: &Path) -> Result<Vec<u8>, AppError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ReportError::ArtifactNotFound(
            format!("{} has not been generated yet", path.display()),
        )
        .into()),
        Err(e) => Err(ReportError::IoError(e).into()),
    }
}

fn chart_path(state: &AppState, style: ChartStyle) -> PathBuf {
    state.context.config().reports_dir.join(style.file_name())
}

pub async fn generated_bar_graph(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    serve_png(chart_path(&state, ChartStyle::Bar)).await
}

pub async fn generated_dotted_graph(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    serve_png(chart_path(&state, ChartStyle::Dotted)).await
}

pub async fn generated_combined_graph(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    serve_png(chart_path(&state, ChartStyle::Combined)).await
}

pub async fn write_predicted_sales(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let context = state.context.clone();
    let exported =
        tokio::task::spawn_blocking(move || PredictionExporter::new(&context).export()).await??;

    let bytes = read_artifact(&exported.path).await?;
    let file_name = exported
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "predicted_sales_report.xlsx".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, EXPORT_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    ))
}

pub async fn metrics(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let context = state.context.clone();
    let report = tokio::task::spawn_blocking(move || build_metrics_report(&context)).await??;

    Ok(Html(html::metrics_page(&report.summary)))
}

pub async fn generated_metrics_graph(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    serve_png(state.context.config().reports_dir.join(METRICS_CHART_FILE)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_endpoints() {
        assert_eq!(chart_endpoint(ChartStyle::Bar), "/generated_bar_graph");
        assert_eq!(chart_endpoint(ChartStyle::Dotted), "/generated_dotted_graph");
        assert_eq!(
            chart_endpoint(ChartStyle::Combined),
            "/generated_combined_graph"
        );
    }

    #[test]
    fn test_parse_int_rejects_text() {
        assert_eq!(parse_int::<i32>("year", " 2024 ").unwrap(), 2024);
        assert!(matches!(
            parse_int::<u32>("month", "june"),
            Err(AppError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_required_rejects_missing_and_blank() {
        assert_eq!(required("year", &Some("2024".to_string())).unwrap(), "2024");
        assert!(matches!(
            required("month", &None),
            Err(AppError::InvalidParameter(msg)) if msg.contains("month")
        ));
        assert!(matches!(
            required("month", &Some("  ".to_string())),
            Err(AppError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_parse_period_rejects_month_out_of_range() {
        assert!(parse_period(2024, 12).is_ok());
        assert!(matches!(
            parse_period(2024, 13),
            Err(AppError::InvalidParameter(_))
        ));
    }
}
