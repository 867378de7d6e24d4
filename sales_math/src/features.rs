//! Feature derivation for the regression input
//!
//! The model has exactly one input: the number of months elapsed since
//! year zero, `year * 12 + month`.

use crate::{MathError, Result};

/// Convert a `(year, month)` pair into the months-since-start ordinal.
///
/// No range check is applied to `month`: `(2023, 13)` yields the same value
/// as `(2024, 1)`. Use [`validate_period`] first when that matters.
///
/// # Examples
///
/// ```
/// use sales_math::months_since_start;
///
/// assert_eq!(months_since_start(2023, 1), 2023 * 12 + 1);
/// ```
pub fn months_since_start(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month)
}

/// Reject months outside `1..=12`.
pub fn validate_period(year: i32, month: u32) -> Result<(i32, u32)> {
    if !(1..=12).contains(&month) {
        return Err(MathError::InvalidInput(format!(
            "month must be between 1 and 12, got {}",
            month
        )));
    }
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_months_since_start_formula() {
        for year in [1999, 2020, 2024] {
            for month in 1..=12 {
                assert_eq!(
                    months_since_start(year, month),
                    year as i64 * 12 + month as i64
                );
            }
        }
    }

    #[test]
    fn test_months_since_start_is_consecutive_across_year_boundary() {
        assert_eq!(
            months_since_start(2024, 1) - months_since_start(2023, 12),
            1
        );
    }

    #[test]
    fn test_out_of_range_month_aliases_next_year() {
        assert_eq!(months_since_start(2023, 13), months_since_start(2024, 1));
    }

    #[test]
    fn test_validate_period() {
        assert_eq!(validate_period(2024, 6), Ok((2024, 6)));
        assert!(validate_period(2024, 0).is_err());
        assert!(validate_period(2024, 13).is_err());
    }
}
