//! Server-rendered HTML pages

use sales_report::{Period, SalesReport, SalesSummary};
use std::fmt::Write;

/// Escape text for use inside HTML element content or attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n{body}\n<p><a href=\"/\">Home</a></p>\n</body>\n</html>\n",
        title = escape(title),
        body = body
    )
}

pub fn index_page(default_cutoff: Period) -> String {
    let body = format!(
        r#"<h2>Predict a month</h2>
<form method="post" action="/predict">
  <label>Year <input name="year" type="number" value="{year}"></label>
  <label>Month <input name="month" type="number" min="1" max="12" value="{month}"></label>
  <button type="submit">Predict</button>
</form>
<h2>Generate a report</h2>
<form method="get" action="/generate_report">
  <label>Year <input name="year" type="number" value="{year}"></label>
  <label>Month <input name="month" type="number" min="1" max="12" value="{month}"></label>
  <select name="type">
    <option value="bar">Bar</option>
    <option value="dotted">Dotted</option>
    <option value="combined" selected>Combined</option>
  </select>
  <button type="submit">Generate</button>
</form>
<ul>
  <li><a href="/metrics">Sales metrics</a></li>
  <li><a href="/write_predicted_sales">Download predicted sales</a></li>
</ul>"#,
        year = default_cutoff.year,
        month = default_cutoff.month
    );
    layout("Sales Forecast", &body)
}

pub fn prediction_page(period: Period, prediction: f64) -> String {
    let body = format!(
        "<p>Predicted sales for {}: <strong>{:.2}</strong></p>",
        period, prediction
    );
    layout("Prediction", &body)
}

pub fn report_page(cutoff: Period, report: &SalesReport, chart_endpoint: &str) -> String {
    let mut table = String::from(
        "<table border=\"1\">\n<tr><th>Product</th><th>Year</th><th>Month</th><th>Predicted Sales</th><th>Sales</th></tr>\n",
    );
    for row in &report.rows {
        // Writing to a String cannot fail
        let _ = writeln!(
            table,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>",
            escape(&row.product),
            row.year,
            row.month,
            row.predicted_sales,
            row.actual_sales
        );
    }
    table.push_str("</table>");

    let body = format!(
        "<p>{} rows through {} ({} chart)</p>\n{}\n<p><img src=\"{}\" alt=\"{} chart\"></p>",
        report.rows.len(),
        cutoff,
        report.chart.style,
        table,
        chart_endpoint,
        report.chart.style
    );
    layout("Sales Report", &body)
}

pub fn metrics_page(summary: &SalesSummary) -> String {
    let mut rows = String::new();
    for (name, value) in summary.labelled() {
        let _ = writeln!(rows, "<tr><td>{}</td><td>{:.2}</td></tr>", name, value);
    }
    let body = format!(
        "<table border=\"1\">\n<tr><th>Metric</th><th>Value</th></tr>\n{}</table>\n<p><img src=\"/generated_metrics_graph\" alt=\"metrics chart\"></p>",
        rows
    );
    layout("Sales Metrics", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<Widget & \"Co\">"), "&lt;Widget &amp; &quot;Co&quot;&gt;");
    }

    #[test]
    fn test_prediction_page_formats_value() {
        let page = prediction_page(Period::new(2024, 6), 1234.5678);
        assert!(page.contains("2024-06"));
        assert!(page.contains("1234.57"));
    }

    #[test]
    fn test_metrics_page_lists_all_metrics() {
        let summary = SalesSummary::from_sales(&[10.0, 20.0, 30.0]).unwrap();
        let page = metrics_page(&summary);
        assert!(page.contains("<td>Mean Sales</td><td>20.00</td>"));
        assert!(page.contains("<td>Median Sales</td><td>20.00</td>"));
        assert!(page.contains("<td>Standard Deviation</td><td>10.00</td>"));
    }
}
