//! First differencing of yearly series.

use crate::core::Year;
use std::collections::BTreeMap;

/// First difference of a series: `x[i] - x[i-1]` for `i >= 1`.
pub fn difference(series: &[f64]) -> Vec<f64> {
    if series.len() <= 1 {
        return Vec::new();
    }
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

/// First difference of a year-indexed series.
///
/// Each difference is indexed by the later of its two years, so the first
/// year is dropped. Differences are taken between consecutive points.
pub fn difference_years(points: &BTreeMap<Year, f64>) -> BTreeMap<Year, f64> {
    let values: Vec<f64> = points.values().copied().collect();
    points
        .keys()
        .skip(1)
        .copied()
        .zip(difference(&values))
        .collect()
}
