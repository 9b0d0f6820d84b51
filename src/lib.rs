//! # tfr-correlate
//!
//! Relationship discovery between socio-economic indicators and the total
//! fertility rate (TFR).
//!
//! Yearly series per region are collected from open-data sources into a
//! [`Storage`](core::Storage). Every series is then compared with the TFR
//! series of its region at the lag where they correlate best, and every
//! dataset is compared with TFR across regions, one cross-section per year.

pub mod analysis;
pub mod collect;
pub mod core;
pub mod error;
pub mod forecast;
pub mod persistence;
pub mod pipeline;
pub mod transform;
pub mod utils;

pub use error::{CorrelateError, Result};

pub mod prelude {
    pub use crate::analysis::{decide, AnalysisResults, PairCorrelation};
    pub use crate::collect::{Collection, Collector};
    pub use crate::core::{
        DataSource, Dataset, DatasetKey, Region, RegionRegistry, Storage, TimeSeries,
    };
    pub use crate::error::{CorrelateError, Result};
    pub use crate::forecast::{DriftForecaster, SeriesForecaster};
    pub use crate::pipeline::{Pipeline, PipelineConfig};
}
