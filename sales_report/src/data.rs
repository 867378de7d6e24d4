//! Historical sales data handling

use crate::error::{ReportError, Result};
use polars::prelude::*;
use sales_math::months_since_start;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Column holding the product name
pub const PRODUCT_COLUMN: &str = "Product";
/// Column holding the calendar year
pub const YEAR_COLUMN: &str = "Year";
/// Column holding the calendar month (1-12)
pub const MONTH_COLUMN: &str = "Month";
/// Column holding the actual sales figure
pub const SALES_COLUMN: &str = "Sales";

/// One row of monthly sales history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product: String,
    pub year: i32,
    pub month: u32,
    pub sales: f64,
}

impl SalesRecord {
    /// Create a new sales record
    pub fn new(product: impl Into<String>, year: i32, month: u32, sales: f64) -> Self {
        Self {
            product: product.into(),
            year,
            month,
            sales,
        }
    }

    /// The regression feature, always derived from `(year, month)`
    pub fn months_since_start(&self) -> i64 {
        months_since_start(self.year, self.month)
    }

    /// The `(year, month)` period this record belongs to
    pub fn period(&self) -> Period {
        Period::new(self.year, self.month)
    }
}

/// A calendar month, ordered lexicographically by `(year, month)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Read-only monthly sales table
///
/// Operations that narrow the table return a new `SalesData`; the original
/// frame is never modified.
#[derive(Debug, Clone)]
pub struct SalesData {
    df: DataFrame,
}

/// Data loader for sales history files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load sales history from a CSV file with a header row.
    ///
    /// The file must contain `Product`, `Year`, `Month` and `Sales` columns.
    /// Any missing column, unreadable file or unparseable value is reported
    /// as [`ReportError::DataLoad`].
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesData> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ReportError::DataLoad(format!("Cannot open '{}': {}", path.display(), e))
        })?;

        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()
            .map_err(|e| {
                ReportError::DataLoad(format!("Cannot parse '{}': {}", path.display(), e))
            })?;

        SalesData::from_dataframe(df)
    }
}

impl SalesData {
    /// Normalize an existing DataFrame to the sales schema
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        let df = df
            .lazy()
            .select([
                col(PRODUCT_COLUMN).cast(DataType::Utf8),
                col(YEAR_COLUMN).cast(DataType::Int32),
                col(MONTH_COLUMN).cast(DataType::UInt32),
                col(SALES_COLUMN).cast(DataType::Float64),
            ])
            .collect()
            .map_err(|e| ReportError::DataLoad(format!("Unexpected sales schema: {}", e)))?;

        for name in [PRODUCT_COLUMN, YEAR_COLUMN, MONTH_COLUMN, SALES_COLUMN] {
            let nulls = df.column(name)?.null_count();
            if nulls > 0 {
                return Err(ReportError::DataLoad(format!(
                    "Column '{}' has {} missing or malformed values",
                    name, nulls
                )));
            }
        }

        Ok(Self { df })
    }

    /// Build a table from in-memory records
    pub fn from_records(records: &[SalesRecord]) -> Result<Self> {
        let products: Vec<&str> = records.iter().map(|r| r.product.as_str()).collect();
        let years: Vec<i32> = records.iter().map(|r| r.year).collect();
        let months: Vec<u32> = records.iter().map(|r| r.month).collect();
        let sales: Vec<f64> = records.iter().map(|r| r.sales).collect();

        let df = DataFrame::new(vec![
            Series::new(PRODUCT_COLUMN, products),
            Series::new(YEAR_COLUMN, years),
            Series::new(MONTH_COLUMN, months),
            Series::new(SALES_COLUMN, sales),
        ])?;

        Ok(Self { df })
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Get the number of rows
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Materialize the rows in file order
    pub fn records(&self) -> Result<Vec<SalesRecord>> {
        let products = self.df.column(PRODUCT_COLUMN)?.utf8()?;
        let years = self.df.column(YEAR_COLUMN)?.i32()?;
        let months = self.df.column(MONTH_COLUMN)?.u32()?;
        let sales = self.df.column(SALES_COLUMN)?.f64()?;

        products
            .into_iter()
            .zip(years.into_iter())
            .zip(months.into_iter())
            .zip(sales.into_iter())
            .enumerate()
            .map(|(row, (((product, year), month), sales))| {
                match (product, year, month, sales) {
                    (Some(product), Some(year), Some(month), Some(sales)) => {
                        Ok(SalesRecord::new(product, year, month, sales))
                    }
                    _ => Err(ReportError::DataError(format!(
                        "Row {} has a missing value",
                        row
                    ))),
                }
            })
            .collect()
    }

    /// Get the actual sales figures as a vector
    pub fn sales(&self) -> Result<Vec<f64>> {
        Ok(self
            .df
            .column(SALES_COLUMN)?
            .f64()?
            .into_iter()
            .flatten()
            .collect())
    }

    /// Keep the rows whose period is on or before `cutoff`.
    ///
    /// A row is retained when `year < cutoff.year`, or when
    /// `year == cutoff.year` and `month <= cutoff.month`.
    pub fn filter_through(&self, cutoff: Period) -> Result<Self> {
        let before_year = col(YEAR_COLUMN).lt(lit(cutoff.year));
        let same_year_through_month = col(YEAR_COLUMN)
            .eq(lit(cutoff.year))
            .and(col(MONTH_COLUMN).lt_eq(lit(cutoff.month)));

        let df = self
            .df
            .clone()
            .lazy()
            .filter(before_year.or(same_year_through_month))
            .collect()?;

        debug!(
            cutoff = %cutoff,
            retained = df.height(),
            total = self.df.height(),
            "Filtered sales history"
        );

        Ok(Self { df })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SalesData {
        SalesData::from_records(&[
            SalesRecord::new("Widget", 2023, 11, 100.0),
            SalesRecord::new("Widget", 2023, 12, 110.0),
            SalesRecord::new("Widget", 2024, 1, 120.0),
            SalesRecord::new("Gadget", 2024, 2, 90.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_records_round_trip_order() {
        let data = sample();
        let records = data.records().unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0], SalesRecord::new("Widget", 2023, 11, 100.0));
        assert_eq!(records[3].product, "Gadget");
    }

    #[test]
    fn test_months_since_start_is_derived() {
        let mut record = SalesRecord::new("Widget", 2023, 12, 1.0);
        assert_eq!(record.months_since_start(), 2023 * 12 + 12);

        record.month = 1;
        assert_eq!(record.months_since_start(), 2023 * 12 + 1);
    }

    #[test]
    fn test_filter_through_cutoff() {
        let data = sample();
        let filtered = data.filter_through(Period::new(2024, 1)).unwrap();

        assert_eq!(filtered.len(), 3);
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_filter_to_empty() {
        let filtered = sample().filter_through(Period::new(2000, 1)).unwrap();
        assert!(filtered.is_empty());
        assert!(filtered.records().unwrap().is_empty());
    }

    #[test]
    fn test_period_ordering_and_display() {
        assert!(Period::new(2023, 12) < Period::new(2024, 1));
        assert!(Period::new(2024, 2) > Period::new(2024, 1));
        assert_eq!(Period::new(2024, 3).to_string(), "2024-03");
    }

    #[test]
    fn test_sales_column() {
        assert_eq!(sample().sales().unwrap(), vec![100.0, 110.0, 120.0, 90.0]);
    }
}
