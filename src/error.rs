//! Error types for the tfr-correlate library.
//!
//! Only misconfigured pipelines and malformed input are errors. Statistical
//! "not enough data" outcomes are represented as `None` results instead.

use thiserror::Error;

/// Result type alias for correlation operations.
pub type Result<T> = std::result::Result<T, CorrelateError>;

/// Errors that can occur while building or processing a storage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelateError {
    /// No collector marked a dataset as the fertility-rate reference.
    #[error("reference dataset is not set")]
    ReferenceUnset,

    /// The reference pointer names a dataset that is not in the storage.
    #[error("reference dataset {data_source}/{dataset} does not exist")]
    UnknownReferenceDataset { data_source: String, dataset: String },

    /// A series exists for a region the reference dataset does not cover.
    #[error("reference series missing for region '{region}' (needed by dataset '{dataset}')")]
    MissingReferenceSeries { dataset: String, region: String },

    /// A year label could not be read as an integer.
    #[error("invalid year: {0}")]
    InvalidYear(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Forecasting a region's reference series failed.
    #[error("forecast failed for region '{region}': {reason}")]
    Forecast { region: String, reason: String },

    /// A collector could not deliver its data source.
    #[error("collector '{collector}' failed: {reason}")]
    Collector { collector: String, reason: String },

    /// Saving or loading a snapshot failed.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for CorrelateError {
    fn from(err: std::io::Error) -> Self {
        CorrelateError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for CorrelateError {
    fn from(err: serde_json::Error) -> Self {
        CorrelateError::Persistence(err.to_string())
    }
}
