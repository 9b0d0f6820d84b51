//! Process-scoped container for everything the collectors deliver.

use super::dataset::{DataSource, Dataset, DatasetKey};
use super::region::RegionRegistry;
use crate::error::{CorrelateError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Owns all data sources and points at the fertility-rate reference dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    regions: RegionRegistry,
    data_sources: BTreeMap<String, DataSource>,
    tfr_dataset: Option<DatasetKey>,
}

impl Storage {
    /// Create a storage over a fixed set of regions.
    pub fn new(regions: RegionRegistry) -> Self {
        Self {
            regions,
            data_sources: BTreeMap::new(),
            tfr_dataset: None,
        }
    }

    pub fn regions(&self) -> &RegionRegistry {
        &self.regions
    }

    /// Merge a data source, replacing any previous source with the same id.
    ///
    /// Series for regions that are not registered are dropped. Returns the
    /// number of dropped series.
    pub fn add_data_source(&mut self, mut data_source: DataSource) -> usize {
        let regions = &self.regions;
        let mut dropped = 0;
        for dataset in data_source.datasets_mut() {
            let removed = dataset.retain_regions(|code| regions.contains(code));
            if removed > 0 {
                warn!(
                    "dropped {} series of {}/{} for unregistered regions",
                    removed,
                    dataset.data_source_id(),
                    dataset.id()
                );
            }
            dropped += removed;
        }

        self.data_sources
            .insert(data_source.id().to_string(), data_source);
        dropped
    }

    pub fn data_source(&self, id: &str) -> Option<&DataSource> {
        self.data_sources.get(id)
    }

    pub fn data_sources(&self) -> impl Iterator<Item = &DataSource> {
        self.data_sources.values()
    }

    /// Every dataset of every data source.
    pub fn datasets(&self) -> impl Iterator<Item = &Dataset> {
        self.data_sources.values().flat_map(|source| source.datasets())
    }

    pub fn dataset(&self, key: &DatasetKey) -> Option<&Dataset> {
        self.data_sources
            .get(&key.data_source_id)
            .and_then(|source| source.dataset(&key.dataset_id))
    }

    /// Mark a dataset as the fertility-rate reference. The dataset must exist.
    pub fn set_tfr_dataset(&mut self, key: DatasetKey) -> Result<()> {
        if self.dataset(&key).is_none() {
            return Err(CorrelateError::UnknownReferenceDataset {
                data_source: key.data_source_id,
                dataset: key.dataset_id,
            });
        }
        self.tfr_dataset = Some(key);
        Ok(())
    }

    pub fn tfr_dataset(&self) -> Option<&DatasetKey> {
        self.tfr_dataset.as_ref()
    }

    /// Resolve the reference dataset, failing if it is unset or dangling.
    pub fn reference_dataset(&self) -> Result<&Dataset> {
        let key = self.tfr_dataset.as_ref().ok_or(CorrelateError::ReferenceUnset)?;
        self.dataset(key)
            .ok_or_else(|| CorrelateError::UnknownReferenceDataset {
                data_source: key.data_source_id.clone(),
                dataset: key.dataset_id.clone(),
            })
    }
}
