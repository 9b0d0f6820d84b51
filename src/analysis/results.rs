//! Side table of analysis results, keyed by entity identity.
//!
//! Entities in [`Storage`](crate::core::Storage) never carry derived fields.
//! Each stage returns records that are collected here, mirroring the
//! data source / dataset / region ownership tree so the table serializes
//! the same way the storage does.

use super::inter_region::InterRegionCorrelation;
use super::pairwise::PairCorrelation;
use super::preprocess::PreparedSeries;
use crate::core::{DatasetKey, RegionCode, SeriesKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Results of one series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesAnalysis {
    pub prepared: Option<PreparedSeries>,
    pub correlation: Option<PairCorrelation>,
}

/// Results of one dataset and its series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetAnalysis {
    pub inter_region: Option<InterRegionCorrelation>,
    pub series: BTreeMap<RegionCode, SeriesAnalysis>,
}

/// All results of one processing run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    data_sources: BTreeMap<String, BTreeMap<String, DatasetAnalysis>>,
}

impl AnalysisResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble the outputs of the three stages.
    pub fn from_stages(
        prepared: BTreeMap<SeriesKey, PreparedSeries>,
        correlations: BTreeMap<SeriesKey, PairCorrelation>,
        inter_region: BTreeMap<DatasetKey, InterRegionCorrelation>,
    ) -> Self {
        let mut results = Self::new();
        for (key, p) in prepared {
            results.series_entry(&key).prepared = Some(p);
        }
        for (key, c) in correlations {
            results.series_entry(&key).correlation = Some(c);
        }
        for (key, r) in inter_region {
            results.dataset_entry(&key).inter_region = Some(r);
        }
        results
    }

    fn dataset_entry(&mut self, key: &DatasetKey) -> &mut DatasetAnalysis {
        self.data_sources
            .entry(key.data_source_id.clone())
            .or_default()
            .entry(key.dataset_id.clone())
            .or_default()
    }

    fn series_entry(&mut self, key: &SeriesKey) -> &mut SeriesAnalysis {
        let dataset = DatasetKey::new(&key.data_source_id, &key.dataset_id);
        self.dataset_entry(&dataset)
            .series
            .entry(key.region.clone())
            .or_default()
    }

    pub fn dataset(&self, key: &DatasetKey) -> Option<&DatasetAnalysis> {
        self.data_sources
            .get(&key.data_source_id)?
            .get(&key.dataset_id)
    }

    pub fn series(&self, key: &SeriesKey) -> Option<&SeriesAnalysis> {
        self.data_sources
            .get(&key.data_source_id)?
            .get(&key.dataset_id)?
            .series
            .get(&key.region)
    }

    pub fn prepared(&self, key: &SeriesKey) -> Option<&PreparedSeries> {
        self.series(key)?.prepared.as_ref()
    }

    pub fn pair_correlation(&self, key: &SeriesKey) -> Option<&PairCorrelation> {
        self.series(key)?.correlation.as_ref()
    }

    pub fn inter_region(&self, key: &DatasetKey) -> Option<&InterRegionCorrelation> {
        self.dataset(key)?.inter_region.as_ref()
    }

    /// Every series with a pairwise correlation.
    pub fn pair_correlations(&self) -> impl Iterator<Item = (SeriesKey, &PairCorrelation)> {
        self.data_sources.iter().flat_map(|(source, datasets)| {
            datasets.iter().flat_map(move |(dataset, analysis)| {
                analysis.series.iter().filter_map(move |(region, s)| {
                    let key = SeriesKey {
                        data_source_id: source.clone(),
                        dataset_id: dataset.clone(),
                        region: region.clone(),
                    };
                    s.correlation.as_ref().map(|c| (key, c))
                })
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        self.data_sources.is_empty()
    }
}
