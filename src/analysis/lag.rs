//! Lag alignment and best-lag search between two yearly series.
//!
//! A lag `L` pairs year `y` of the lagging series with year `y + L` of the
//! anchor series, so a positive lag shifts the lagging series into the past.
//! [`lag_interval`] finds the largest pair of year windows that line up under
//! a given lag; [`best_lag`] regresses every feasible alignment and keeps the
//! one with the strongest correlation.

use crate::core::Year;
use crate::error::Result;
use crate::utils::{linregress, LinearRegression};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inclusive range of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearInterval {
    pub start: Year,
    pub end: Year,
}

impl YearInterval {
    pub fn new(start: Year, end: Year) -> Self {
        Self { start, end }
    }

    /// Interval from the first to the last year of a series.
    pub fn of(points: &BTreeMap<Year, f64>) -> Option<Self> {
        let start = *points.keys().next()?;
        let end = *points.keys().next_back()?;
        Some(Self { start, end })
    }

    /// Number of years between the bounds, `end - start`.
    pub fn span(&self) -> i32 {
        self.end.saturating_sub(self.start)
    }

    /// Number of years in the interval, `end - start + 1`.
    pub fn len(&self) -> usize {
        (i64::from(self.end) - i64::from(self.start) + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Two windows of equal length that line up under a lag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LagAlignment {
    pub lagging: YearInterval,
    pub anchor: YearInterval,
    pub length: usize,
}

/// Align `lagging` to `anchor` under `lag`.
///
/// Returns the maximal windows of both intervals for which
/// `lagging_year + lag == anchor_year` holds pointwise, or `None` when the
/// intervals do not overlap under this lag.
///
/// # Example
/// ```
/// use tfr_correlate::analysis::{lag_interval, YearInterval};
///
/// let a = YearInterval::new(2000, 2010);
/// let b = YearInterval::new(2000, 2010);
/// let aligned = lag_interval(a, b, 2).unwrap();
/// assert_eq!(aligned.lagging, YearInterval::new(2000, 2008));
/// assert_eq!(aligned.anchor, YearInterval::new(2002, 2010));
/// assert_eq!(aligned.length, 9);
/// ```
pub fn lag_interval(lagging: YearInterval, anchor: YearInterval, lag: i32) -> Option<LagAlignment> {
    // Widened so that no lag can overflow a year
    let lag = i64::from(lag);
    let mut lagging_start = i64::from(lagging.start);
    let mut anchor_start = lagging_start + lag;
    if anchor_start < i64::from(anchor.start) {
        lagging_start += i64::from(anchor.start) - anchor_start;
        anchor_start = i64::from(anchor.start);
    }

    let mut anchor_end = i64::from(anchor.end);
    let mut lagging_end = anchor_end - lag;
    if lagging_end > i64::from(lagging.end) {
        anchor_end -= lagging_end - i64::from(lagging.end);
        lagging_end = i64::from(lagging.end);
    }

    if anchor_start > anchor_end || lagging_start > lagging_end {
        return None;
    }

    // Every bound now lies inside one of the input intervals
    let year = |y: i64| Year::try_from(y).ok();
    let lagging = YearInterval::new(year(lagging_start)?, year(lagging_end)?);
    Some(LagAlignment {
        lagging,
        anchor: YearInterval::new(year(anchor_start)?, year(anchor_end)?),
        length: lagging.len(),
    })
}

/// Largest lag magnitude the search will try.
pub const MAX_LAG: i32 = 100;

/// Configuration of the best-lag search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagSearchConfig {
    /// Lags in `[-max_lag, max_lag)` are tried. Lag 0 is always tried.
    /// Values outside `0..=MAX_LAG` are clamped.
    pub max_lag: i32,
    /// Smallest overlap accepted regardless of series length.
    pub min_overlap_floor: usize,
    /// A lag is only selected when its `|r|` is strictly above this value.
    /// At 0.0 a best correlation of exactly zero is reported as no result.
    pub min_abs_r_seed: f64,
}

impl Default for LagSearchConfig {
    fn default() -> Self {
        Self {
            max_lag: 5,
            min_overlap_floor: 5,
            min_abs_r_seed: 0.0,
        }
    }
}

impl LagSearchConfig {
    pub fn with_max_lag(mut self, max_lag: i32) -> Self {
        self.max_lag = max_lag;
        self
    }

    pub fn with_min_overlap_floor(mut self, floor: usize) -> Self {
        self.min_overlap_floor = floor;
        self
    }

    pub fn with_min_abs_r_seed(mut self, seed: f64) -> Self {
        self.min_abs_r_seed = seed;
        self
    }

    /// Minimum overlap for two series with the given year spans.
    ///
    /// Half of the shorter span, but never below the floor.
    pub fn min_overlap(&self, reference_span: i32, other_span: i32) -> usize {
        let half = (reference_span.min(other_span).max(0) / 2) as usize;
        half.max(self.min_overlap_floor)
    }

    fn lags(&self) -> std::ops::Range<i32> {
        let max_lag = self.max_lag.clamp(0, MAX_LAG);
        -max_lag..max_lag.max(1)
    }
}

/// Regression of the best-aligned lag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagRegression {
    pub lag: i32,
    pub regression: LinearRegression,
}

/// Find the lag at which `other` correlates most strongly with `reference`.
///
/// `reference` is the predictor and lags against `other`: reference year `y`
/// is paired with other year `y + lag`. Among all lags with enough overlap the
/// one with the largest `|r|` wins; the first one scanned wins ties. Returns
/// `Ok(None)` if no lag had enough data.
pub fn best_lag(
    reference: &BTreeMap<Year, f64>,
    other: &BTreeMap<Year, f64>,
    config: &LagSearchConfig,
) -> Result<Option<LagRegression>> {
    let (Some(ref_interval), Some(other_interval)) =
        (YearInterval::of(reference), YearInterval::of(other))
    else {
        return Ok(None);
    };

    let min_length = config.min_overlap(ref_interval.span(), other_interval.span());

    let mut best: Option<LagRegression> = None;
    let mut best_abs_r = config.min_abs_r_seed;

    for lag in config.lags() {
        let Some(alignment) = lag_interval(ref_interval, other_interval, lag) else {
            continue;
        };
        if alignment.length < min_length {
            continue;
        }

        let (x, y): (Vec<f64>, Vec<f64>) = reference
            .range(alignment.lagging.start..=alignment.lagging.end)
            .filter_map(|(&year, &x)| other.get(&(year + lag)).map(|&y| (x, y)))
            .unzip();

        if let Some(regression) = linregress(&x, &y)? {
            if regression.r_value.abs() > best_abs_r {
                best_abs_r = regression.r_value.abs();
                best = Some(LagRegression { lag, regression });
            }
        }
    }

    Ok(best)
}
