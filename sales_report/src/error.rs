//! Error types for the sales_report crate

use polars::prelude::PolarsError;
use sales_math::MathError;
use thiserror::Error;

/// Custom error types for the sales_report crate
#[derive(Debug, Error)]
pub enum ReportError {
    /// The historical data source is missing or malformed
    #[error("Data load error: {0}")]
    DataLoad(String),

    /// Error related to data validation or processing after load
    #[error("Data error: {0}")]
    DataError(String),

    /// A caller-supplied year, month or style could not be used
    #[error("Invalid request parameter: {0}")]
    InvalidRequestParameter(String),

    /// Writing a chart or spreadsheet failed
    #[error("Artifact write error: {0}")]
    ArtifactWrite(String),

    /// A fixed-path artifact was requested before it was generated
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    /// The training data cannot support a linear fit
    #[error("Degenerate fit: {0}")]
    DegenerateFit(String),

    /// An environment override could not be parsed
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ReportError>;

impl From<PolarsError> for ReportError {
    fn from(err: PolarsError) -> Self {
        ReportError::PolarsError(err.to_string())
    }
}

impl From<MathError> for ReportError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InvalidInput(msg) => ReportError::InvalidRequestParameter(msg),
            MathError::InsufficientData(msg) | MathError::DegenerateFit(msg) => {
                ReportError::DegenerateFit(msg)
            }
        }
    }
}
