//! Per-series lagged correlation against the reference series of the same region.

use super::decision::CorrelationConfig;
use super::lag::{best_lag, LagRegression, LagSearchConfig};
use super::preprocess::PreparedSeries;
use crate::core::{SeriesKey, Storage};
use crate::error::{CorrelateError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Best-lag regression of one series against the reference series.
///
/// Every field is set together; a series without a result has no record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairCorrelation {
    pub lag: i32,
    pub slope: f64,
    pub intercept: f64,
    pub r_value: f64,
    pub p_value: f64,
    pub std_err: f64,
    pub correlation: Option<bool>,
}

impl PairCorrelation {
    pub fn from_lag_regression(best: &LagRegression, config: &CorrelationConfig) -> Self {
        let r = &best.regression;
        Self {
            lag: best.lag,
            slope: r.slope,
            intercept: r.intercept,
            r_value: r.r_value,
            p_value: r.p_value,
            std_err: r.std_err,
            correlation: config.decide(Some(r.p_value), Some(r.r_value)),
        }
    }
}

/// Correlate every prepared series with the reference series of its region.
///
/// Series absent from `prepared` are skipped. A prepared series whose region
/// has no series in the reference dataset aborts the run. The result only
/// holds series for which some lag produced a regression.
pub fn correlate_pairs(
    storage: &Storage,
    prepared: &BTreeMap<SeriesKey, PreparedSeries>,
    lag_config: &LagSearchConfig,
    correlation_config: &CorrelationConfig,
) -> Result<BTreeMap<SeriesKey, PairCorrelation>> {
    let reference = storage.reference_dataset()?;
    let mut results = BTreeMap::new();

    for dataset in storage.datasets() {
        for series in dataset.all_time_series() {
            let key = series.key();
            let Some(candidate) = prepared.get(&key) else {
                continue;
            };

            let reference_series = reference.time_series(series.region()).ok_or_else(|| {
                CorrelateError::MissingReferenceSeries {
                    dataset: dataset.id().to_string(),
                    region: series.region().to_string(),
                }
            })?;
            let Some(reference_prepared) = prepared.get(&reference_series.key()) else {
                debug!(
                    "{}: reference series too short, skipping {}",
                    series.region(),
                    dataset.id()
                );
                continue;
            };

            match best_lag(&reference_prepared.normalized, &candidate.normalized, lag_config)? {
                Some(best) => {
                    let correlation =
                        PairCorrelation::from_lag_regression(&best, correlation_config);
                    results.insert(key, correlation);
                }
                None => debug!(
                    "{}/{}/{}: no lag with enough overlap",
                    key.data_source_id, key.dataset_id, key.region
                ),
            }
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::preprocess;
    use crate::core::{DataSource, Dataset, DatasetKey, RegionRegistry, TimeSeries, Year};
    use approx::assert_relative_eq;

    const TFR: [f64; 12] = [1.8, 1.72, 1.75, 1.62, 1.6, 1.58, 1.49, 1.52, 1.44, 1.45, 1.41, 1.3];

    fn yearly(source: &str, dataset: &str, region: &str, values: &[f64]) -> TimeSeries {
        let points = values.iter().enumerate().map(|(i, &v)| (2000 + i as Year, v));
        TimeSeries::new(source, dataset, region.into(), points).unwrap()
    }

    fn storage(indicator_regions: &[&str]) -> Storage {
        let mut source = DataSource::new("wb", "World Bank");

        let mut tfr = Dataset::new("wb", "tfr", "Total fertility rate");
        tfr.add_time_series(yearly("wb", "tfr", "cze", &TFR)).unwrap();
        source.add_dataset(tfr).unwrap();

        let mut gdp = Dataset::new("wb", "gdp", "GDP per capita");
        for region in indicator_regions {
            let mirrored: Vec<f64> = TFR.iter().map(|v| 100.0 - 20.0 * v).collect();
            gdp.add_time_series(yearly("wb", "gdp", region, &mirrored)).unwrap();
        }
        source.add_dataset(gdp).unwrap();

        let regions = RegionRegistry::new()
            .with_region("cze", "Czech Republic")
            .with_region("svk", "Slovakia");
        let mut storage = Storage::new(regions);
        storage.add_data_source(source);
        storage.set_tfr_dataset(DatasetKey::new("wb", "tfr")).unwrap();
        storage
    }

    #[test]
    fn mirrored_indicator_is_perfectly_anticorrelated() {
        let storage = storage(&["cze"]);
        let prepared = preprocess::preprocess(&storage);
        let results = correlate_pairs(
            &storage,
            &prepared,
            &LagSearchConfig::default(),
            &CorrelationConfig::default(),
        )
        .unwrap();

        let gdp = results
            .get(&SeriesKey {
                data_source_id: "wb".into(),
                dataset_id: "gdp".into(),
                region: "cze".into(),
            })
            .unwrap();
        assert_eq!(gdp.lag, 0);
        assert_relative_eq!(gdp.r_value, -1.0, epsilon = 1e-10);
        assert_eq!(gdp.correlation, Some(true));

        // The reference correlates with itself too
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn missing_reference_series_is_fatal() {
        let storage = storage(&["cze", "svk"]);
        let prepared = preprocess::preprocess(&storage);
        let err = correlate_pairs(
            &storage,
            &prepared,
            &LagSearchConfig::default(),
            &CorrelationConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CorrelateError::MissingReferenceSeries {
                dataset: "gdp".into(),
                region: "svk".into()
            }
        );
    }

    #[test]
    fn unset_reference_is_fatal() {
        let storage = Storage::new(RegionRegistry::new());
        let result = correlate_pairs(
            &storage,
            &BTreeMap::new(),
            &LagSearchConfig::default(),
            &CorrelationConfig::default(),
        );
        assert_eq!(result.unwrap_err(), CorrelateError::ReferenceUnset);
    }
}
