//! Differencing and normalization of every series before comparison.

use crate::core::{SeriesKey, Storage, TimeSeries, Year};
use crate::transform::{difference_years, normalize};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Detrended form of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedSeries {
    /// First difference, indexed by the later year of each pair.
    pub differenced: BTreeMap<Year, f64>,
    /// Differenced series centred on its mean and divided by its range.
    /// All zeros when the differenced series is constant.
    pub normalized: BTreeMap<Year, f64>,
}

/// Prepare one series. `None` when it has at most one point.
pub fn prepare(series: &TimeSeries) -> Option<PreparedSeries> {
    let differenced = difference_years(series.points());
    if differenced.is_empty() {
        return None;
    }

    let values: Vec<f64> = differenced.values().copied().collect();
    let scaled = normalize(&values);
    if scaled.is_degenerate() {
        debug!(
            "{}/{}/{}: constant differences, normalized to zeros",
            series.data_source_id(),
            series.dataset_id(),
            series.region()
        );
    }
    let normalized = differenced.keys().copied().zip(scaled.data).collect();

    Some(PreparedSeries {
        differenced,
        normalized,
    })
}

/// Prepare every series of every dataset in the storage.
///
/// Series too short to difference have no entry.
pub fn preprocess(storage: &Storage) -> BTreeMap<SeriesKey, PreparedSeries> {
    let mut prepared = BTreeMap::new();
    for dataset in storage.datasets() {
        for series in dataset.all_time_series() {
            match prepare(series) {
                Some(p) => {
                    prepared.insert(series.key(), p);
                }
                None => debug!(
                    "{}/{}/{}: too short to difference",
                    series.data_source_id(),
                    series.dataset_id(),
                    series.region()
                ),
            }
        }
    }
    prepared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{best_lag, LagSearchConfig};
    use crate::core::{DataSource, Dataset, RegionRegistry};
    use approx::assert_relative_eq;

    fn series(values: &[(Year, f64)]) -> TimeSeries {
        TimeSeries::new("wb", "gdp", "cze".into(), values.iter().copied()).unwrap()
    }

    #[test]
    fn prepare_differences_then_normalizes() {
        let ts = series(&[(2000, 1.0), (2001, 2.0), (2002, 4.0), (2003, 7.0)]);
        let p = prepare(&ts).unwrap();

        // Differences [1, 2, 3], mean 2, range 2
        assert_eq!(p.differenced.keys().copied().collect::<Vec<_>>(), vec![2001, 2002, 2003]);
        assert_relative_eq!(p.normalized[&2001], -0.5, epsilon = 1e-12);
        assert_relative_eq!(p.normalized[&2002], 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.normalized[&2003], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn single_point_cannot_be_prepared() {
        assert!(prepare(&series(&[(2000, 1.0)])).is_none());
    }

    #[test]
    fn linear_series_normalizes_to_zeros() {
        // Steps of 0.1 differ from each other by rounding error only
        let points: Vec<(Year, f64)> = (0..15).map(|i| (2000 + i, 0.1 * i as f64 + 0.3)).collect();
        let p = prepare(&series(&points)).unwrap();

        assert_eq!(p.normalized.len(), 14);
        assert!(p.normalized.values().all(|&v| v == 0.0));
    }

    #[test]
    fn linear_series_never_wins_a_lag_search() {
        let points: Vec<(Year, f64)> = (0..15).map(|i| (2000 + i, 0.1 * i as f64 + 0.3)).collect();
        let linear = prepare(&series(&points)).unwrap();

        let varied: Vec<(Year, f64)> = (0..15)
            .map(|i| (2000 + i, 1.8 - 0.02 * i as f64 + if i % 3 == 0 { 0.07 } else { -0.03 }))
            .collect();
        let reference = prepare(&series(&varied)).unwrap();

        let best = best_lag(&reference.normalized, &linear.normalized, &LagSearchConfig::default());
        assert!(best.unwrap().is_none());
    }

    #[test]
    fn preparing_twice_is_bit_identical() {
        let ts = series(&[(2000, 1.83), (2001, 1.71), (2002, 1.77), (2003, 1.52), (2004, 1.49)]);
        let first = prepare(&ts).unwrap();
        let second = prepare(&ts).unwrap();
        for (a, b) in first.normalized.values().zip(second.normalized.values()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn preprocess_skips_short_series() {
        let mut dataset = Dataset::new("wb", "gdp", "GDP");
        let cze =
            TimeSeries::new("wb", "gdp", "cze".into(), vec![(2000, 1.0), (2001, 2.0)]).unwrap();
        let svk = TimeSeries::new("wb", "gdp", "svk".into(), vec![(2000, 1.0)]).unwrap();
        dataset.add_time_series(cze).unwrap();
        dataset.add_time_series(svk).unwrap();
        let mut source = DataSource::new("wb", "World Bank");
        source.add_dataset(dataset).unwrap();

        let regions = RegionRegistry::new()
            .with_region("cze", "Czech Republic")
            .with_region("svk", "Slovakia");
        let mut storage = Storage::new(regions);
        storage.add_data_source(source);

        let prepared = preprocess(&storage);
        assert_eq!(prepared.len(), 1);
        assert!(prepared.keys().all(|k| k.region.as_str() == "cze"));
    }
}
