//! Relationship discovery between indicators and the fertility-rate reference.
//!
//! The stages run in a fixed order:
//!
//! 1. [`preprocess`] differences and normalizes every series.
//! 2. [`correlate_pairs`] finds, per series, the lag at which it correlates
//!    best with the reference series of the same region.
//! 3. [`correlate_regions`] regresses each dataset against the reference
//!    across regions, one cross-section per year.
//!
//! Each stage returns plain records; [`AnalysisResults`] collects them.

pub mod decision;
pub mod inter_region;
pub mod lag;
pub mod pairwise;
pub mod preprocess;
pub mod results;

pub use decision::{decide, CorrelationConfig, MIN_ABS_R, P_VALUE_THRESHOLD};
pub use inter_region::{
    correlate_regions, CrossSectionPoint, InterRegionConfig, InterRegionCorrelation,
    YearlyCorrelation,
};
pub use lag::{best_lag, lag_interval, LagAlignment, LagRegression, LagSearchConfig, YearInterval};
pub use pairwise::{correlate_pairs, PairCorrelation};
pub use preprocess::{prepare, preprocess, PreparedSeries};
pub use results::{AnalysisResults, DatasetAnalysis, SeriesAnalysis};
