//! Scaling transforms for differenced series.

use crate::utils::stats::{max, mean, min};

/// Ranges below this are treated as zero.
pub const RANGE_EPSILON: f64 = 1e-10;

/// Result of a scaling transform.
#[derive(Debug, Clone)]
pub struct ScaleResult {
    /// Transformed data
    pub data: Vec<f64>,
    /// Range of the input, `max - min`
    pub range: f64,
}

impl ScaleResult {
    /// Whether the input had no usable spread and was mapped to zeros.
    pub fn is_degenerate(&self) -> bool {
        self.range < RANGE_EPSILON
    }
}

/// Mean-centred min-max normalization.
///
/// x_scaled = (x - mean) / (max - min)
///
/// An input whose range is below [`RANGE_EPSILON`] is constant up to
/// rounding and maps to all zeros.
pub fn normalize(series: &[f64]) -> ScaleResult {
    if series.is_empty() {
        return ScaleResult {
            data: Vec::new(),
            range: 0.0,
        };
    }

    let range = max(series) - min(series);
    if range < RANGE_EPSILON {
        return ScaleResult {
            data: vec![0.0; series.len()],
            range,
        };
    }

    let center = mean(series);
    let data = series.iter().map(|&x| (x - center) / range).collect();
    ScaleResult { data, range }
}
