//! Datasets and the data sources that own them.

use super::region::{RegionCode, Year};
use super::time_series::TimeSeries;
use crate::error::{CorrelateError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity of a dataset. Dataset ids are only unique within a data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatasetKey {
    pub data_source_id: String,
    pub dataset_id: String,
}

impl DatasetKey {
    pub fn new(data_source_id: &str, dataset_id: &str) -> Self {
        Self {
            data_source_id: data_source_id.to_string(),
            dataset_id: dataset_id.to_string(),
        }
    }
}

/// An indicator with its metadata and at most one series per region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    id: String,
    data_source_id: String,
    name: String,
    description: String,
    url: String,
    unit: String,
    series: BTreeMap<RegionCode, TimeSeries>,
}

impl Dataset {
    pub fn new(data_source_id: &str, id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            data_source_id: data_source_id.to_string(),
            name: name.to_string(),
            description: String::new(),
            url: String::new(),
            unit: String::new(),
            series: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data_source_id(&self) -> &str {
        &self.data_source_id
    }

    pub fn key(&self) -> DatasetKey {
        DatasetKey::new(&self.data_source_id, &self.id)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Add a series, replacing any previous series for the same region.
    ///
    /// Returns the replaced series. Fails if the series belongs to another dataset.
    pub fn add_time_series(&mut self, series: TimeSeries) -> Result<Option<TimeSeries>> {
        if series.data_source_id() != self.data_source_id || series.dataset_id() != self.id {
            return Err(CorrelateError::InvalidParameter(format!(
                "series of {}/{} cannot be added to dataset {}/{}",
                series.data_source_id(),
                series.dataset_id(),
                self.data_source_id,
                self.id
            )));
        }
        Ok(self.series.insert(series.region().clone(), series))
    }

    /// Clean raw collector points into a series owned by this dataset.
    ///
    /// Empty results are not added. Returns whether a series was stored.
    pub fn add_raw_points<I>(&mut self, region: RegionCode, points: I) -> bool
    where
        I: IntoIterator<Item = (Year, Option<f64>)>,
    {
        let series = TimeSeries::from_raw(&self.data_source_id, &self.id, region, points);
        if series.is_empty() {
            return false;
        }
        self.series.insert(series.region().clone(), series);
        true
    }

    pub fn time_series(&self, region: &RegionCode) -> Option<&TimeSeries> {
        self.series.get(region)
    }

    pub fn all_time_series(&self) -> impl Iterator<Item = &TimeSeries> {
        self.series.values()
    }

    pub fn regions(&self) -> impl Iterator<Item = &RegionCode> {
        self.series.keys()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub(crate) fn retain_regions<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&RegionCode) -> bool,
    {
        let before = self.series.len();
        self.series.retain(|code, _| keep(code));
        before - self.series.len()
    }
}

/// An external origin of datasets, e.g. the World Bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    id: String,
    name: String,
    description: String,
    url: String,
    datasets: BTreeMap<String, Dataset>,
}

impl DataSource {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            url: String::new(),
            datasets: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Add a dataset, replacing any previous dataset with the same id.
    pub fn add_dataset(&mut self, dataset: Dataset) -> Result<Option<Dataset>> {
        if dataset.data_source_id() != self.id {
            return Err(CorrelateError::InvalidParameter(format!(
                "dataset '{}' belongs to data source '{}', not '{}'",
                dataset.id(),
                dataset.data_source_id(),
                self.id
            )));
        }
        Ok(self.datasets.insert(dataset.id().to_string(), dataset))
    }

    pub fn dataset(&self, id: &str) -> Option<&Dataset> {
        self.datasets.get(id)
    }

    pub fn datasets(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.values()
    }

    pub(crate) fn datasets_mut(&mut self) -> impl Iterator<Item = &mut Dataset> {
        self.datasets.values_mut()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}
