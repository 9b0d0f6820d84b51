//! Data transformations applied before series are compared.
//!
//! # Example
//!
//! ```
//! use tfr_correlate::transform::{difference, normalize};
//!
//! let series = vec![1.8, 1.7, 1.65, 1.6, 1.62];
//!
//! // Remove the trend, then centre and scale the changes
//! let changes = difference(&series);
//! let scaled = normalize(&changes);
//! assert_eq!(scaled.data.len(), 4);
//! ```

pub mod diff;
pub mod scale;

pub use diff::{difference, difference_years};
pub use scale::{normalize, ScaleResult, RANGE_EPSILON};
