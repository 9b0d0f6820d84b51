//! Cross-sectional correlation between an indicator and the reference, per year.
//!
//! For every year each region contributes one point (reference value,
//! indicator value). A year needs enough regions to form a sample, and a
//! dataset needs enough such years before any regression is run.

use super::decision::CorrelationConfig;
use crate::core::{Dataset, DatasetKey, RegionCode, RegionRegistry, Storage, Year};
use crate::error::Result;
use crate::utils::linregress;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration of the inter-region stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterRegionConfig {
    /// Regions a year needs to form a cross-section.
    pub min_values_per_year: usize,
    /// Cross-sections a dataset needs before regressions are run.
    pub min_years: usize,
}

impl Default for InterRegionConfig {
    fn default() -> Self {
        Self {
            min_values_per_year: 5,
            min_years: 5,
        }
    }
}

impl InterRegionConfig {
    pub fn with_min_values_per_year(mut self, n: usize) -> Self {
        self.min_values_per_year = n;
        self
    }

    pub fn with_min_years(mut self, n: usize) -> Self {
        self.min_years = n;
        self
    }
}

/// One region's contribution to a yearly cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSectionPoint {
    pub region: RegionCode,
    pub reference: f64,
    pub value: f64,
}

/// Regression outcome of every qualifying year. The three maps share keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlyCorrelation {
    pub p_values_per_year: BTreeMap<Year, f64>,
    pub r_values_per_year: BTreeMap<Year, f64>,
    pub correlation_values_per_year: BTreeMap<Year, bool>,
}

impl YearlyCorrelation {
    pub fn len(&self) -> usize {
        self.p_values_per_year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.p_values_per_year.is_empty()
    }
}

/// Inter-region result of one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterRegionCorrelation {
    /// Cross-sections large enough to use, keyed by year.
    pub values_per_year: BTreeMap<Year, Vec<CrossSectionPoint>>,
    /// Present only when the dataset has enough qualifying years.
    pub yearly: Option<YearlyCorrelation>,
}

/// Reference values indexed by year, then region.
pub type ReferenceTable = BTreeMap<Year, BTreeMap<RegionCode, f64>>;

/// Tabulate the reference dataset over the registered regions.
pub fn reference_table(reference: &Dataset, regions: &RegionRegistry) -> ReferenceTable {
    let mut table: ReferenceTable = BTreeMap::new();
    for code in regions.codes() {
        if let Some(series) = reference.time_series(code) {
            for (&year, &value) in series.points() {
                table.entry(year).or_default().insert(code.clone(), value);
            }
        }
    }
    table
}

/// Build the usable yearly cross-sections of a dataset.
///
/// Regions missing either value in a year are dropped from that year; years
/// with fewer than `min_values_per_year` remaining regions are omitted.
pub fn cross_sections(
    dataset: &Dataset,
    reference: &ReferenceTable,
    min_values_per_year: usize,
) -> BTreeMap<Year, Vec<CrossSectionPoint>> {
    let mut sections = BTreeMap::new();
    for (&year, reference_values) in reference {
        let points: Vec<CrossSectionPoint> = reference_values
            .iter()
            .filter_map(|(region, &reference)| {
                let value = dataset.time_series(region)?.value(year)?;
                Some(CrossSectionPoint {
                    region: region.clone(),
                    reference,
                    value,
                })
            })
            .collect();

        if points.len() >= min_values_per_year {
            sections.insert(year, points);
        }
    }
    sections
}

/// Correlate one dataset across regions.
pub fn correlate_dataset(
    dataset: &Dataset,
    reference: &ReferenceTable,
    config: &InterRegionConfig,
    correlation_config: &CorrelationConfig,
) -> Result<InterRegionCorrelation> {
    let values_per_year = cross_sections(dataset, reference, config.min_values_per_year);
    if values_per_year.len() < config.min_years {
        debug!(
            "{}/{}: {} qualifying years, need {}",
            dataset.data_source_id(),
            dataset.id(),
            values_per_year.len(),
            config.min_years
        );
        return Ok(InterRegionCorrelation {
            values_per_year,
            yearly: None,
        });
    }

    let mut yearly = YearlyCorrelation::default();
    for (&year, points) in &values_per_year {
        let x: Vec<f64> = points.iter().map(|p| p.reference).collect();
        let y: Vec<f64> = points.iter().map(|p| p.value).collect();
        let Some(fit) = linregress(&x, &y)? else {
            debug!(
                "{}/{}: degenerate cross-section in {}",
                dataset.data_source_id(),
                dataset.id(),
                year
            );
            continue;
        };
        if let Some(verdict) = correlation_config.decide(Some(fit.p_value), Some(fit.r_value)) {
            yearly.p_values_per_year.insert(year, fit.p_value);
            yearly.r_values_per_year.insert(year, fit.r_value);
            yearly.correlation_values_per_year.insert(year, verdict);
        }
    }

    // Degenerate years do not count towards the threshold
    if yearly.len() < config.min_years {
        debug!(
            "{}/{}: {} regressable years, need {}",
            dataset.data_source_id(),
            dataset.id(),
            yearly.len(),
            config.min_years
        );
        return Ok(InterRegionCorrelation {
            values_per_year,
            yearly: None,
        });
    }

    Ok(InterRegionCorrelation {
        values_per_year,
        yearly: Some(yearly),
    })
}

/// Correlate every dataset of the storage across regions.
pub fn correlate_regions(
    storage: &Storage,
    config: &InterRegionConfig,
    correlation_config: &CorrelationConfig,
) -> Result<BTreeMap<DatasetKey, InterRegionCorrelation>> {
    let reference = reference_table(storage.reference_dataset()?, storage.regions());

    storage
        .datasets()
        .map(|dataset| {
            correlate_dataset(dataset, &reference, config, correlation_config)
                .map(|result| (dataset.key(), result))
        })
        .collect()
}
