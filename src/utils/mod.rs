//! Statistical primitives shared by the analysis stages.

pub mod regression;
pub mod stats;

pub use regression::{linregress, LinearRegression, MIN_REGRESSION_POINTS};
pub use stats::mean;
