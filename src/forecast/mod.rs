//! Forecasting of the reference series.
//!
//! The model itself is pluggable through [`SeriesForecaster`]. This module
//! turns its output into a new data source holding one forecast series per
//! region of the reference dataset.

mod drift;
mod traits;

pub use drift::DriftForecaster;
pub use traits::SeriesForecaster;

use crate::core::{DataSource, Dataset, Storage, TimeSeries, Year};
use crate::error::{CorrelateError, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Configuration of the forecasting stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Number of future years per region.
    pub horizon: usize,
    /// Id of the data source the forecasts are stored under.
    pub data_source_id: String,
    /// Id of the forecast dataset.
    pub dataset_id: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 10,
            data_source_id: "forecast".to_string(),
            dataset_id: "tfr_forecast".to_string(),
        }
    }
}

impl ForecastConfig {
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }
}

/// Forecast one region's reference series into a new series.
fn forecast_series(
    series: &TimeSeries,
    forecaster: &dyn SeriesForecaster,
    config: &ForecastConfig,
) -> Result<TimeSeries> {
    let region = series.region();
    let failed = |reason: String| CorrelateError::Forecast {
        region: region.to_string(),
        reason,
    };

    let last_year = series
        .last_year()
        .ok_or_else(|| failed("empty history".to_string()))?;
    let values = forecaster
        .forecast(&series.values(), config.horizon)
        .map_err(|e| failed(e.to_string()))?;
    if values.len() != config.horizon {
        return Err(failed(format!(
            "{} returned {} values, expected {}",
            forecaster.name(),
            values.len(),
            config.horizon
        )));
    }

    let points = (1..).map(|h: Year| last_year + h).zip(values);
    TimeSeries::new(&config.data_source_id, &config.dataset_id, region.clone(), points)
        .map_err(|e| failed(e.to_string()))
}

/// Forecast every series of the reference dataset.
///
/// Regions whose forecast fails are logged and left out. Fails only when
/// the reference dataset is unavailable.
pub fn forecast_reference(
    storage: &Storage,
    forecaster: &dyn SeriesForecaster,
    config: &ForecastConfig,
) -> Result<DataSource> {
    let reference = storage.reference_dataset()?;

    let mut dataset = Dataset::new(&config.data_source_id, &config.dataset_id, "TFR forecast")
        .with_description(&format!(
            "{}-year forecast of the total fertility rate ({})",
            config.horizon,
            forecaster.name()
        ))
        .with_unit(reference.unit());

    for series in reference.all_time_series() {
        match forecast_series(series, forecaster, config) {
            Ok(forecast) => {
                debug!("{}: forecast {} years", series.region(), forecast.len());
                dataset.add_time_series(forecast)?;
            }
            Err(e) => warn!("{}", e),
        }
    }

    let mut data_source = DataSource::new(&config.data_source_id, "Forecasts")
        .with_description("Forecasts of indicator developments");
    data_source.add_dataset(dataset)?;
    Ok(data_source)
}
