//! Core data model: regions, data sources, datasets and yearly series.

mod dataset;
mod region;
mod storage;
mod time_series;

pub use dataset::{DataSource, Dataset, DatasetKey};
pub use region::{parse_year, Region, RegionCode, RegionRegistry, Year};
pub use storage::Storage;
pub use time_series::{SeriesKey, TimeSeries};
