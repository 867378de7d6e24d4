//! Ordinary least squares regression on a single feature
//!
//! Contains:
//! - `LinearRegression`: fits `y = slope * x + intercept` over `(x, y)` points
//! - `FittedModel`: the immutable result of a fit

use crate::features::months_since_start;
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Ordinary least squares estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRegression;

/// Parameters of a fitted linear model
///
/// There is no way to change the parameters after construction; a new fit
/// produces a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    slope: f64,
    intercept: f64,
    n_observations: usize,
    r_squared: f64,
}

impl LinearRegression {
    /// Fit over every `(x, y)` point.
    ///
    /// Returns `InsufficientData` for fewer than two points and
    /// `DegenerateFit` when all x values are equal.
    pub fn fit(points: &[(f64, f64)]) -> Result<FittedModel> {
        if points.len() < 2 {
            return Err(MathError::InsufficientData(format!(
                "Need at least 2 observations for linear regression, have {}",
                points.len()
            )));
        }

        let n = points.len() as f64;
        let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for &(x, y) in points {
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::DegenerateFit(
                "Cannot calculate slope: fewer than 2 distinct x values".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;
        for &(x, y) in points {
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - (slope * x + intercept)).powi(2);
        }
        // Constant y is a perfect (flat) fit.
        let r_squared = if ss_total > 1e-10 {
            1.0 - ss_residual / ss_total
        } else {
            1.0
        };

        Ok(FittedModel {
            slope,
            intercept,
            n_observations: points.len(),
            r_squared,
        })
    }
}

impl FittedModel {
    /// Predict the value at feature `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Predict the value for a calendar period
    pub fn predict_period(&self, year: i32, month: u32) -> f64 {
        self.predict(months_since_start(year, month) as f64)
    }

    /// Get the slope (change per month)
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Get the intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Get the number of observations used in fitting
    pub fn n_observations(&self) -> usize {
        self.n_observations
    }

    /// Get the R-squared value (coefficient of determination)
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }
}
