//! Simple linear regression with a significance test on the slope.
//!
//! Fits `y = intercept + slope * x` by ordinary least squares and tests the
//! null hypothesis that the slope is zero with a two-sided Student-t test
//! on `n - 2` degrees of freedom.

use crate::error::{CorrelateError, Result};
use crate::utils::stats::{mean, sum_cross_dev, sum_sq_dev};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Guards the t statistic against division by zero for perfect fits.
const TINY: f64 = 1.0e-20;

/// Minimum number of points for the slope test to have a degree of freedom.
pub const MIN_REGRESSION_POINTS: usize = 3;

/// Fitted line and its test statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient of `x` and `y`.
    pub r_value: f64,
    /// Two-sided p-value for a zero slope.
    pub p_value: f64,
    /// Standard error of the slope.
    pub std_err: f64,
    /// Number of points the line was fitted on.
    pub n: usize,
}

/// Regress `y` on `x`.
///
/// Returns `Ok(None)` when the data cannot support a fit: fewer than
/// [`MIN_REGRESSION_POINTS`] points or a constant predictor. A constant
/// response gives a flat line with `r_value == 0`.
///
/// # Example
/// ```
/// use tfr_correlate::utils::linregress;
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [3.0, 5.0, 7.0, 9.0, 11.0];
/// let fit = linregress(&x, &y).unwrap().unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-10);
/// assert!((fit.intercept - 1.0).abs() < 1e-10);
/// ```
pub fn linregress(x: &[f64], y: &[f64]) -> Result<Option<LinearRegression>> {
    if x.len() != y.len() {
        return Err(CorrelateError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }

    let n = x.len();
    if n < MIN_REGRESSION_POINTS {
        return Ok(None);
    }

    let ss_x = sum_sq_dev(x);
    if ss_x <= 0.0 {
        return Ok(None);
    }
    let ss_y = sum_sq_dev(y);
    let ss_xy = sum_cross_dev(x, y);

    let r_den = (ss_x * ss_y).sqrt();
    let r = if r_den == 0.0 {
        0.0
    } else {
        (ss_xy / r_den).clamp(-1.0, 1.0)
    };

    let slope = ss_xy / ss_x;
    let intercept = mean(y) - slope * mean(x);

    let df = (n - 2) as f64;
    let t = r * (df / ((1.0 - r) * (1.0 + r) + TINY)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| CorrelateError::InvalidParameter(format!("t distribution: {}", e)))?;
    let p_value = (2.0 * dist.sf(t.abs())).min(1.0);
    let std_err = ((1.0 - r * r).max(0.0) * ss_y / ss_x / df).sqrt();

    Ok(Some(LinearRegression {
        slope,
        intercept,
        r_value: r,
        p_value,
        std_err,
        n,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_positive_line() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        let fit = linregress(&x, &y).unwrap().unwrap();

        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-10);
        assert_relative_eq!(fit.intercept, 0.0, epsilon = 1e-10);
        assert_relative_eq!(fit.r_value, 1.0, epsilon = 1e-10);
        assert!(fit.p_value < 1e-10);
        assert_relative_eq!(fit.std_err, 0.0, epsilon = 1e-6);
        assert_eq!(fit.n, 5);
    }

    #[test]
    fn matches_reference_values() {
        // Reference: scipy.stats.linregress on the same data gives
        // slope 0.6, intercept 2.2, r 0.7745967, p 0.1240291, stderr 0.2828427
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let fit = linregress(&x, &y).unwrap().unwrap();

        assert_relative_eq!(fit.slope, 0.6, epsilon = 1e-10);
        assert_relative_eq!(fit.intercept, 2.2, epsilon = 1e-10);
        assert_relative_eq!(fit.r_value, 0.774_596_7, epsilon = 1e-6);
        assert_relative_eq!(fit.p_value, 0.124_029_1, epsilon = 1e-4);
        assert_relative_eq!(fit.std_err, 0.282_842_7, epsilon = 1e-6);
    }

    #[test]
    fn negative_relationship_has_negative_r() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [10.0, 8.5, 7.0, 5.2, 4.1, 2.0];
        let fit = linregress(&x, &y).unwrap().unwrap();
        assert!(fit.r_value < -0.95);
        assert!(fit.slope < 0.0);
    }

    #[test]
    fn constant_predictor_yields_none() {
        let x = [1.0, 1.0, 1.0, 1.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        assert!(linregress(&x, &y).unwrap().is_none());
    }

    #[test]
    fn constant_response_has_zero_r() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [5.0, 5.0, 5.0, 5.0];
        let fit = linregress(&x, &y).unwrap().unwrap();
        assert_eq!(fit.r_value, 0.0);
        assert_relative_eq!(fit.slope, 0.0, epsilon = 1e-12);
        assert_relative_eq!(fit.p_value, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn too_few_points_yield_none() {
        assert!(linregress(&[1.0, 2.0], &[1.0, 2.0]).unwrap().is_none());
        assert!(linregress(&[], &[]).unwrap().is_none());
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let result = linregress(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
        assert_eq!(
            result,
            Err(CorrelateError::DimensionMismatch {
                expected: 3,
                got: 2
            })
        );
    }
}
