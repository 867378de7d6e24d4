//! Spreadsheet export of predicted versus actual sales
//!
//! Exports are xlsx workbooks named by the second they were generated in:
//! `predicted_sales_report_YYYYmmdd_HHMMSS.xlsx`. Rows go to `Sheet1`. Two
//! exports in the same second land in the same workbook; the second one
//! appends its rows below the last populated row of `Sheet1` instead of
//! creating a new file.
//!
//! The existence check and the write are not atomic. Two concurrent exports
//! in the same second can both take the create branch, and the later one
//! replaces the earlier one's rows.

use crate::context::SalesContext;
use crate::error::{ReportError, Result};
use crate::report::{predict_rows, ReportRow};
use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// Worksheet every export writes to
pub const EXPORT_SHEET: &str = "Sheet1";

/// MIME type of the exported workbook
pub const EXPORT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Header row written when an export file is created
pub const EXPORT_HEADER: [&str; 5] = ["Product", "Year", "Month", "Predicted Sales", "Sales"];

/// Which branch an export took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// New file with a header row
    Created,
    /// Rows added after the last row of an existing file
    Appended,
}

/// Result of one export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub mode: ExportMode,
    pub rows_written: usize,
}

/// File name for an export generated at `at`
pub fn export_file_name(at: NaiveDateTime) -> String {
    format!("predicted_sales_report_{}.xlsx", at.format("%Y%m%d_%H%M%S"))
}

/// Writes the full history with predictions to timestamped workbooks
#[derive(Debug, Clone, Copy)]
pub struct PredictionExporter<'a> {
    context: &'a SalesContext,
}

impl<'a> PredictionExporter<'a> {
    pub fn new(context: &'a SalesContext) -> Self {
        Self { context }
    }

    /// Export using the local wall clock
    pub fn export(&self) -> Result<ExportedFile> {
        self.export_at(Local::now().naive_local())
    }

    /// Export as if generated at `at`.
    ///
    /// Every row of the history is written, regardless of any report cutoff.
    /// Nothing written here is read back by the model.
    pub fn export_at(&self, at: NaiveDateTime) -> Result<ExportedFile> {
        let rows = predict_rows(self.context.model(), self.context.data())?;

        let dir = &self.context.config().reports_dir;
        fs::create_dir_all(dir)
            .map_err(|e| ReportError::ArtifactWrite(format!("{}: {}", dir.display(), e)))?;
        let path = dir.join(export_file_name(at));

        let mode = if path.exists() {
            append_rows(&path, &rows)?;
            ExportMode::Appended
        } else {
            create_with_rows(&path, &rows)?;
            ExportMode::Created
        };

        info!(
            path = %path.display(),
            mode = ?mode,
            rows = rows.len(),
            "Exported predicted sales"
        );

        Ok(ExportedFile {
            path,
            mode,
            rows_written: rows.len(),
        })
    }
}

fn create_with_rows(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = export_sheet(&mut book, path)?;
    for (col, title) in EXPORT_HEADER.iter().enumerate() {
        sheet.get_cell_mut((col as u32 + 1, 1u32)).set_value(*title);
    }
    write_rows(sheet, 2, rows);
    save(&book, path)
}

fn append_rows(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let mut book =
        umya_spreadsheet::reader::xlsx::read(path).map_err(|e| spreadsheet_error(path, e))?;
    let sheet = export_sheet(&mut book, path)?;
    let next_row = sheet.get_highest_row() + 1;
    write_rows(sheet, next_row, rows);
    save(&book, path)
}

fn export_sheet<'b>(book: &'b mut Spreadsheet, path: &Path) -> Result<&'b mut Worksheet> {
    book.get_sheet_by_name_mut(EXPORT_SHEET).ok_or_else(|| {
        ReportError::ArtifactWrite(format!(
            "{}: workbook has no sheet named '{}'",
            path.display(),
            EXPORT_SHEET
        ))
    })
}

/// Columns follow `EXPORT_HEADER`
fn write_rows(sheet: &mut Worksheet, first_row: u32, rows: &[ReportRow]) {
    for (offset, row) in rows.iter().enumerate() {
        let at = first_row + offset as u32;
        sheet.get_cell_mut((1u32, at)).set_value(row.product.as_str());
        sheet.get_cell_mut((2u32, at)).set_value_number(row.year);
        sheet.get_cell_mut((3u32, at)).set_value_number(row.month);
        sheet.get_cell_mut((4u32, at)).set_value_number(row.predicted_sales);
        sheet.get_cell_mut((5u32, at)).set_value_number(row.actual_sales);
    }
}

fn save(book: &Spreadsheet, path: &Path) -> Result<()> {
    umya_spreadsheet::writer::xlsx::write(book, path).map_err(|e| spreadsheet_error(path, e))
}

fn spreadsheet_error<E: std::fmt::Display>(path: &Path, err: E) -> ReportError {
    ReportError::ArtifactWrite(format!("{}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_export_file_name_has_second_granularity() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap();
        assert_eq!(
            export_file_name(at),
            "predicted_sales_report_20240309_140507.xlsx"
        );
    }
}
