//! Correlation decision rule.
//!
//! A relationship counts as a correlation when the slope test is significant
//! at the 5% level and the Pearson coefficient is at least 0.4 in magnitude.

use serde::{Deserialize, Serialize};

/// Default significance level for the slope test.
pub const P_VALUE_THRESHOLD: f64 = 0.05;

/// Default minimum magnitude of the Pearson coefficient.
pub const MIN_ABS_R: f64 = 0.4;

/// Thresholds of the correlation decision rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Largest p-value still considered significant (inclusive).
    pub p_threshold: f64,
    /// Smallest `|r|` still considered a correlation (inclusive).
    pub min_abs_r: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            p_threshold: P_VALUE_THRESHOLD,
            min_abs_r: MIN_ABS_R,
        }
    }
}

impl CorrelationConfig {
    pub fn with_p_threshold(mut self, p_threshold: f64) -> Self {
        self.p_threshold = p_threshold;
        self
    }

    pub fn with_min_abs_r(mut self, min_abs_r: f64) -> Self {
        self.min_abs_r = min_abs_r;
        self
    }

    /// Apply the rule. `None` when either input is missing.
    pub fn decide(&self, p_value: Option<f64>, r_value: Option<f64>) -> Option<bool> {
        let (p, r) = (p_value?, r_value?);
        Some(p <= self.p_threshold && r.abs() >= self.min_abs_r)
    }
}

/// Apply the default decision rule.
///
/// # Example
/// ```
/// use tfr_correlate::analysis::decide;
///
/// assert_eq!(decide(Some(0.01), Some(-0.7)), Some(true));
/// assert_eq!(decide(Some(0.01), Some(0.2)), Some(false));
/// assert_eq!(decide(None, Some(0.9)), None);
/// ```
pub fn decide(p_value: Option<f64>, r_value: Option<f64>) -> Option<bool> {
    CorrelationConfig::default().decide(p_value, r_value)
}
