//! Yearly series of one dataset for one region.

use super::region::{RegionCode, Year};
use crate::error::{CorrelateError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity of a series: owning data source, owning dataset and region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesKey {
    pub data_source_id: String,
    pub dataset_id: String,
    pub region: RegionCode,
}

/// A realization of one dataset for one region.
///
/// Years are unique and ordered. A series built through [`TimeSeries::from_raw`]
/// additionally has no gaps between its first and last year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    data_source_id: String,
    dataset_id: String,
    region: RegionCode,
    points: BTreeMap<Year, f64>,
}

impl TimeSeries {
    /// Create a series from already clean points.
    ///
    /// Fails on duplicate years or non-finite values.
    pub fn new<I>(
        data_source_id: &str,
        dataset_id: &str,
        region: RegionCode,
        points: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (Year, f64)>,
    {
        let mut map = BTreeMap::new();
        for (year, value) in points {
            if !value.is_finite() {
                return Err(CorrelateError::InvalidParameter(format!(
                    "non-finite value {} in year {} for region '{}'",
                    value, year, region
                )));
            }
            if map.insert(year, value).is_some() {
                return Err(CorrelateError::InvalidParameter(format!(
                    "duplicate year {} for region '{}'",
                    year, region
                )));
            }
        }

        Ok(Self {
            data_source_id: data_source_id.to_string(),
            dataset_id: dataset_id.to_string(),
            region,
            points: map,
        })
    }

    /// Create a series from raw collector output.
    ///
    /// Leading and trailing missing values are stripped. Interior gaps, either
    /// missing values or absent years, are filled by linear interpolation
    /// between the nearest known neighbours. Later duplicates of a year win.
    pub fn from_raw<I>(
        data_source_id: &str,
        dataset_id: &str,
        region: RegionCode,
        points: I,
    ) -> Self
    where
        I: IntoIterator<Item = (Year, Option<f64>)>,
    {
        let mut known: BTreeMap<Year, f64> = BTreeMap::new();
        for (year, value) in points {
            match value.filter(|v| v.is_finite()) {
                Some(v) => {
                    known.insert(year, v);
                }
                None => {
                    known.remove(&year);
                }
            }
        }

        Self {
            data_source_id: data_source_id.to_string(),
            dataset_id: dataset_id.to_string(),
            region,
            points: interpolate_gaps(&known),
        }
    }

    pub fn key(&self) -> SeriesKey {
        SeriesKey {
            data_source_id: self.data_source_id.clone(),
            dataset_id: self.dataset_id.clone(),
            region: self.region.clone(),
        }
    }

    pub fn data_source_id(&self) -> &str {
        &self.data_source_id
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    pub fn region(&self) -> &RegionCode {
        &self.region
    }

    pub fn points(&self) -> &BTreeMap<Year, f64> {
        &self.points
    }

    pub fn value(&self, year: Year) -> Option<f64> {
        self.points.get(&year).copied()
    }

    pub fn years(&self) -> impl Iterator<Item = Year> + '_ {
        self.points.keys().copied()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.values().copied().collect()
    }

    pub fn first_year(&self) -> Option<Year> {
        self.points.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<Year> {
        self.points.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether every year between the first and the last one is present.
    pub fn is_contiguous(&self) -> bool {
        match (self.first_year(), self.last_year()) {
            (Some(first), Some(last)) => (last - first + 1) as usize == self.points.len(),
            _ => true,
        }
    }
}

/// Fill every year between the first and last known year.
fn interpolate_gaps(known: &BTreeMap<Year, f64>) -> BTreeMap<Year, f64> {
    let mut filled = BTreeMap::new();
    let mut anchors = known.iter().peekable();

    while let Some((&year, &value)) = anchors.next() {
        filled.insert(year, value);
        if let Some(&(&next_year, &next_value)) = anchors.peek() {
            let span = (next_year - year) as f64;
            for gap in (year + 1)..next_year {
                let w = (gap - year) as f64 / span;
                filled.insert(gap, value + w * (next_value - value));
            }
        }
    }

    filled
}
