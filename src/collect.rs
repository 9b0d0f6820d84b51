//! Interface to the collectors that fetch data from external sources.
//!
//! A collector returns a populated [`DataSource`] value; merging it into the
//! [`Storage`] is up to the caller (see [`Pipeline::collect`]).
//!
//! [`Pipeline::collect`]: crate::pipeline::Pipeline::collect

use crate::core::{DataSource, DatasetKey, RegionRegistry, Storage};
use crate::error::{CorrelateError, Result};
use log::warn;

/// Output of one collector.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub data_source: DataSource,
    /// Id of the dataset in `data_source` that holds the fertility rate,
    /// if this collector supplies it.
    pub tfr_dataset_id: Option<String>,
}

impl Collection {
    pub fn new(data_source: DataSource) -> Self {
        Self {
            data_source,
            tfr_dataset_id: None,
        }
    }

    pub fn with_tfr_dataset(mut self, dataset_id: &str) -> Self {
        self.tfr_dataset_id = Some(dataset_id.to_string());
        self
    }

    /// Merge into a storage. Returns the number of series dropped for
    /// unregistered regions.
    ///
    /// An unknown reference dataset id fails before the storage is touched.
    pub fn merge_into(self, storage: &mut Storage) -> Result<usize> {
        let reference = match &self.tfr_dataset_id {
            Some(dataset_id) if self.data_source.dataset(dataset_id).is_none() => {
                return Err(CorrelateError::UnknownReferenceDataset {
                    data_source: self.data_source.id().to_string(),
                    dataset: dataset_id.clone(),
                });
            }
            Some(dataset_id) => Some(DatasetKey::new(self.data_source.id(), dataset_id)),
            None => None,
        };

        let dropped = storage.add_data_source(self.data_source);
        if let Some(key) = reference {
            if let Some(previous) = storage.tfr_dataset().filter(|&previous| *previous != key) {
                warn!(
                    "reference dataset {}/{} replaced by {}/{}",
                    previous.data_source_id, previous.dataset_id, key.data_source_id, key.dataset_id
                );
            }
            storage.set_tfr_dataset(key)?;
        }
        Ok(dropped)
    }
}

/// A source of yearly series, e.g. a World Bank or Eurostat client.
pub trait Collector {
    /// Identifier used for logging and exclusion, e.g. `worldbank`.
    fn id(&self) -> &str;

    /// Fetch the data source. Series should only be produced for `regions`.
    fn collect(&self, regions: &RegionRegistry) -> Result<Collection>;
}

/// Collector serving a prebuilt collection. Useful for tests and for data
/// that was fetched by other means.
#[derive(Debug, Clone)]
pub struct StaticCollector {
    id: String,
    collection: Collection,
}

impl StaticCollector {
    pub fn new(id: &str, collection: Collection) -> Self {
        Self {
            id: id.to_string(),
            collection,
        }
    }
}

impl Collector for StaticCollector {
    fn id(&self) -> &str {
        &self.id
    }

    fn collect(&self, _regions: &RegionRegistry) -> Result<Collection> {
        Ok(self.collection.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Dataset, TimeSeries};

    fn collection() -> Collection {
        let mut tfr = Dataset::new("wb", "tfr", "Total fertility rate");
        tfr.add_time_series(TimeSeries::new("wb", "tfr", "cze".into(), vec![(2000, 1.14)]).unwrap())
            .unwrap();
        let mut source = DataSource::new("wb", "World Bank");
        source.add_dataset(tfr).unwrap();
        Collection::new(source)
    }

    #[test]
    fn merge_sets_reference() {
        let mut storage = Storage::new(RegionRegistry::new().with_region("cze", "Czech Republic"));
        collection().with_tfr_dataset("tfr").merge_into(&mut storage).unwrap();
        assert_eq!(storage.tfr_dataset(), Some(&DatasetKey::new("wb", "tfr")));
    }

    #[test]
    fn merge_without_reference_leaves_pointer_unset() {
        let mut storage = Storage::new(RegionRegistry::new().with_region("cze", "Czech Republic"));
        collection().merge_into(&mut storage).unwrap();
        assert!(storage.tfr_dataset().is_none());
        assert_eq!(storage.data_sources().count(), 1);
    }

    #[test]
    fn merge_with_unknown_reference_fails() {
        let mut storage = Storage::new(RegionRegistry::new());
        let result = collection().with_tfr_dataset("fertility").merge_into(&mut storage);
        assert!(matches!(
            result,
            Err(CorrelateError::UnknownReferenceDataset { .. })
        ));
        // Nothing was merged
        assert_eq!(storage.data_sources().count(), 0);
        assert!(storage.tfr_dataset().is_none());
    }

    #[test]
    fn later_reference_replaces_earlier_one() {
        let mut storage = Storage::new(RegionRegistry::new().with_region("cze", "Czech Republic"));
        collection().with_tfr_dataset("tfr").merge_into(&mut storage).unwrap();

        let mut tfr = Dataset::new("cz", "tfr", "Úhrnná plodnost");
        tfr.add_time_series(TimeSeries::new("cz", "tfr", "cze".into(), vec![(2000, 1.15)]).unwrap())
            .unwrap();
        let mut source = DataSource::new("cz", "Czech statistical office");
        source.add_dataset(tfr).unwrap();
        Collection::new(source)
            .with_tfr_dataset("tfr")
            .merge_into(&mut storage)
            .unwrap();

        assert_eq!(storage.tfr_dataset(), Some(&DatasetKey::new("cz", "tfr")));
        assert_eq!(storage.data_sources().count(), 2);
    }

    #[test]
    fn static_collector_serves_its_collection() {
        let collector = StaticCollector::new("fixture", collection());
        assert_eq!(collector.id(), "fixture");
        let served = collector.collect(&RegionRegistry::new()).unwrap();
        assert_eq!(served, collection());
    }
}
