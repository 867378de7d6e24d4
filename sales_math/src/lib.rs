//! # Sales Math
//!
//! Mathematical building blocks for monthly sales forecasting.
//! This crate provides the single derived feature used by the model
//! and an ordinary least squares fit over it.

use thiserror::Error;

pub mod features;
pub mod regression;

pub use features::{months_since_start, validate_period};
pub use regression::{FittedModel, LinearRegression};

/// Errors that can occur in sales math calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Degenerate fit: {0}")]
    DegenerateFit(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;
