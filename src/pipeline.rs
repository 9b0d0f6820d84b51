//! Orchestration of a complete run: collect, process, forecast, save.

use crate::analysis::{
    correlate_pairs, correlate_regions, preprocess, AnalysisResults, CorrelationConfig,
    InterRegionConfig, LagSearchConfig,
};
use crate::collect::Collector;
use crate::core::{DataSource, RegionRegistry, Storage};
use crate::error::{CorrelateError, Result};
use crate::forecast::{forecast_reference, ForecastConfig, SeriesForecaster};
use crate::persistence::{Repository, Snapshot};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Prefix of environment variables that switch collectors off.
pub const EXCLUDE_PREFIX: &str = "EXCLUDE_";

/// Configuration of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub correlation: CorrelationConfig,
    pub lag_search: LagSearchConfig,
    pub inter_region: InterRegionConfig,
    pub forecast: ForecastConfig,
    /// Lower-case ids of collectors to skip.
    pub excluded_collectors: BTreeSet<String>,
}

impl PipelineConfig {
    pub fn with_correlation(mut self, correlation: CorrelationConfig) -> Self {
        self.correlation = correlation;
        self
    }

    pub fn with_lag_search(mut self, lag_search: LagSearchConfig) -> Self {
        self.lag_search = lag_search;
        self
    }

    pub fn with_inter_region(mut self, inter_region: InterRegionConfig) -> Self {
        self.inter_region = inter_region;
        self
    }

    pub fn with_forecast(mut self, forecast: ForecastConfig) -> Self {
        self.forecast = forecast;
        self
    }

    pub fn with_excluded(mut self, collector_id: &str) -> Self {
        self.excluded_collectors.insert(collector_id.to_lowercase());
        self
    }

    /// Exclude every collector named by an `EXCLUDE_<ID>` variable.
    pub fn with_excluded_from_vars<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, _) in vars {
            if let Some(id) = name.strip_prefix(EXCLUDE_PREFIX) {
                if !id.is_empty() {
                    self.excluded_collectors.insert(id.to_lowercase());
                }
            }
        }
        self
    }

    /// Exclude collectors named by `EXCLUDE_<ID>` environment variables.
    pub fn with_excluded_from_env(self) -> Self {
        self.with_excluded_from_vars(std::env::vars())
    }

    pub fn is_excluded(&self, collector_id: &str) -> bool {
        self.excluded_collectors
            .contains(&collector_id.to_lowercase())
    }
}

/// Runs the stages in their required order.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every collector that is not excluded and merge its output.
    ///
    /// Returns the ids of the collectors that ran.
    pub fn collect(
        &self,
        storage: &mut Storage,
        collectors: &[&dyn Collector],
    ) -> Result<Vec<String>> {
        let mut ran = Vec::new();
        for collector in collectors {
            let id = collector.id();
            if self.config.is_excluded(id) {
                warn!("skipping excluded collector {}", id);
                continue;
            }

            info!("collecting {}", id);
            let collection = collector
                .collect(storage.regions())
                .map_err(|e| CorrelateError::Collector {
                    collector: id.to_string(),
                    reason: e.to_string(),
                })?;
            collection.merge_into(storage)?;
            ran.push(id.to_string());
        }
        Ok(ran)
    }

    /// Preprocess, then run the pairwise and inter-region stages.
    pub fn process(&self, storage: &Storage) -> Result<AnalysisResults> {
        storage.reference_dataset()?;

        info!("preprocessing");
        let prepared = preprocess(storage);

        info!("pairwise correlation of {} series", prepared.len());
        let pairs = correlate_pairs(
            storage,
            &prepared,
            &self.config.lag_search,
            &self.config.correlation,
        )?;

        info!("inter-region correlation");
        let inter_region =
            correlate_regions(storage, &self.config.inter_region, &self.config.correlation)?;

        info!(
            "{} series correlated, {} datasets with yearly results",
            pairs.len(),
            inter_region.values().filter(|r| r.yearly.is_some()).count()
        );
        Ok(AnalysisResults::from_stages(prepared, pairs, inter_region))
    }

    /// Forecast the reference series into a new data source.
    pub fn forecast(
        &self,
        storage: &Storage,
        forecaster: &dyn SeriesForecaster,
    ) -> Result<DataSource> {
        info!("forecasting with {}", forecaster.name());
        forecast_reference(storage, forecaster, &self.config.forecast)
    }

    /// Full run over a fresh storage.
    ///
    /// Forecasts are merged after processing, so they are stored but not
    /// correlated. The snapshot is saved when a repository is given.
    pub fn run(
        &self,
        regions: RegionRegistry,
        collectors: &[&dyn Collector],
        forecaster: Option<&dyn SeriesForecaster>,
        repository: Option<&mut dyn Repository>,
    ) -> Result<Snapshot> {
        let mut storage = Storage::new(regions);
        self.collect(&mut storage, collectors)?;

        let results = self.process(&storage)?;

        if let Some(forecaster) = forecaster {
            let forecasts = self.forecast(&storage, forecaster)?;
            storage.add_data_source(forecasts);
        }

        let snapshot = Snapshot::new(storage, results);
        if let Some(repository) = repository {
            repository.save(&snapshot)?;
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::{Collection, StaticCollector};
    use crate::core::{Dataset, DatasetKey};
    use crate::forecast::DriftForecaster;
    use crate::persistence::MemoryRepository;

    struct Failing;

    impl Collector for Failing {
        fn id(&self) -> &str {
            "broken"
        }

        fn collect(&self, _regions: &RegionRegistry) -> Result<Collection> {
            Err(CorrelateError::InvalidParameter("upstream returned 503".into()))
        }
    }

    fn tfr_collector() -> StaticCollector {
        let mut tfr = Dataset::new("wb", "tfr", "Total fertility rate");
        tfr.add_raw_points(
            "cze".into(),
            (2000..2012).map(|y| {
                let bump = if y % 3 == 0 { 0.05 } else { 0.0 };
                (y, Some(1.2 + 0.03 * (y - 2000) as f64 + bump))
            }),
        );
        let mut source = DataSource::new("wb", "World Bank");
        source.add_dataset(tfr).unwrap();
        StaticCollector::new("worldbank", Collection::new(source).with_tfr_dataset("tfr"))
    }

    fn regions() -> RegionRegistry {
        RegionRegistry::new().with_region("cze", "Czech Republic")
    }

    #[test]
    fn exclusions_from_vars() {
        let config = PipelineConfig::default().with_excluded_from_vars(vec![
            ("EXCLUDE_WORLDBANK".to_string(), "1".to_string()),
            ("EXCLUDE_".to_string(), "1".to_string()),
            ("PATH".to_string(), "/bin".to_string()),
        ]);
        assert!(config.is_excluded("worldbank"));
        assert!(config.is_excluded("WorldBank"));
        assert_eq!(config.excluded_collectors.len(), 1);
    }

    #[test]
    fn excluded_collectors_do_not_run() {
        let pipeline = Pipeline::new(PipelineConfig::default().with_excluded("broken"));
        let mut storage = Storage::new(regions());
        let ran = pipeline
            .collect(&mut storage, &[&tfr_collector(), &Failing])
            .unwrap();
        assert_eq!(ran, vec!["worldbank".to_string()]);
        assert_eq!(storage.tfr_dataset(), Some(&DatasetKey::new("wb", "tfr")));
    }

    #[test]
    fn collector_failure_aborts() {
        let pipeline = Pipeline::default();
        let mut storage = Storage::new(regions());
        let err = pipeline.collect(&mut storage, &[&Failing]).unwrap_err();
        assert!(matches!(
            err,
            CorrelateError::Collector { collector, .. } if collector == "broken"
        ));
    }

    #[test]
    fn process_requires_reference() {
        let storage = Storage::new(regions());
        assert_eq!(
            Pipeline::default().process(&storage).unwrap_err(),
            CorrelateError::ReferenceUnset
        );
    }

    #[test]
    fn run_saves_snapshot_with_forecast() {
        let pipeline = Pipeline::default();
        let mut repo = MemoryRepository::new();
        let snapshot = pipeline
            .run(
                regions(),
                &[&tfr_collector()],
                Some(&DriftForecaster::new()),
                Some(&mut repo),
            )
            .unwrap();

        let forecast = snapshot
            .storage
            .dataset(&DatasetKey::new("forecast", "tfr_forecast"))
            .unwrap();
        assert_eq!(forecast.time_series(&"cze".into()).unwrap().len(), 10);
        assert_eq!(repo.load().unwrap(), Some(snapshot));
    }
}
