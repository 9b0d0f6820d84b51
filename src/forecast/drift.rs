//! Random Walk with Drift forecaster.
//!
//! Forecasts based on the last value plus a drift term estimated from historical data.

use super::traits::SeriesForecaster;
use crate::error::{CorrelateError, Result};

/// Random walk with drift forecaster.
///
/// The forecast is: y_hat\[t+h\] = y\[t\] + h * drift
/// where drift is the average change in the series.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriftForecaster;

impl DriftForecaster {
    pub fn new() -> Self {
        Self
    }

    /// Average first difference of a history.
    pub fn drift(history: &[f64]) -> Result<f64> {
        let n = history.len();
        if n < 2 {
            return Err(CorrelateError::InsufficientData { needed: 2, got: n });
        }
        Ok((history[n - 1] - history[0]) / (n - 1) as f64)
    }
}

impl SeriesForecaster for DriftForecaster {
    fn name(&self) -> &str {
        "RandomWalkWithDrift"
    }

    fn forecast(&self, history: &[f64], horizon: usize) -> Result<Vec<f64>> {
        let drift = Self::drift(history)?;
        let last = *history.last().ok_or(CorrelateError::InsufficientData { needed: 2, got: 0 })?;

        Ok((1..=horizon).map(|h| last + (h as f64) * drift).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn drift_is_average_change() {
        let drift = DriftForecaster::drift(&[1.8, 1.7, 1.65, 1.5]).unwrap();
        assert_relative_eq!(drift, -0.1, epsilon = 1e-12);
    }

    #[test]
    fn forecast_continues_from_last_value() {
        let forecast = DriftForecaster::new().forecast(&[10.0, 12.0, 14.0], 3).unwrap();
        assert_eq!(forecast.len(), 3);
        assert_relative_eq!(forecast[0], 16.0, epsilon = 1e-12);
        assert_relative_eq!(forecast[2], 20.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_horizon_is_empty() {
        let forecast = DriftForecaster::new().forecast(&[1.0, 2.0], 0).unwrap();
        assert!(forecast.is_empty());
    }

    #[test]
    fn short_history_is_rejected() {
        let err = DriftForecaster::new().forecast(&[1.0], 5).unwrap_err();
        assert_eq!(err, CorrelateError::InsufficientData { needed: 2, got: 1 });
    }
}
