//! Forecaster trait defining the interface to statistical forecasting models.

use crate::error::Result;

/// Produces future values from a yearly history.
///
/// This trait is object-safe and can be used with `Box<dyn SeriesForecaster>`.
/// Implementations wrap whatever model is available (ARIMA, exponential
/// smoothing, ...); the pipeline only checks the shape of the output.
pub trait SeriesForecaster {
    /// Get the model name.
    fn name(&self) -> &str;

    /// Forecast `horizon` values following the last point of `history`.
    fn forecast(&self, history: &[f64], horizon: usize) -> Result<Vec<f64>>;
}
