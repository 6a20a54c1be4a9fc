//! Rejection Reasons and Configuration Errors

use crate::rules::RangeTier;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a numeric reading was rejected
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// Value matches a register-read error code emitted by the device
    #[error("error sentinel value (matches {sentinel})")]
    ErrorSentinel { sentinel: f64 },

    /// NaN or infinite
    #[error("non-finite value (NaN or Inf)")]
    NonFinite,

    /// Value outside the resolved plausible range
    #[error("outside {tier} range [{min}, {max}]")]
    OutOfRange { tier: RangeTier, min: f64, max: f64 },

    /// Cumulative counter went backwards
    #[error("monotonic sensor decreased from {previous} to {current}")]
    MonotonicRegression { previous: f64, current: f64 },

    /// Value inconsistent with recent accepted history
    #[error("outlier: {basis}, threshold {threshold:.2}")]
    Outlier { basis: OutlierBasis, threshold: f64 },
}

impl RejectReason {
    /// Short stable label, used as a metrics dimension
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ErrorSentinel { .. } => "error_sentinel",
            Self::NonFinite => "non_finite",
            Self::OutOfRange { .. } => "out_of_range",
            Self::MonotonicRegression { .. } => "monotonic_regression",
            Self::Outlier { .. } => "outlier",
        }
    }
}

/// Comparison basis used by the outlier detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierBasis {
    /// Deviation from the history mean, relative to the mean's magnitude
    MeanRelative { mean: f64 },
    /// Magnitude against the history spread, used when the mean is near zero
    RangeRelative { min: f64, max: f64 },
}

impl fmt::Display for OutlierBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MeanRelative { mean } => write!(f, "deviates from mean {mean:.2}"),
            Self::RangeRelative { min, max } => {
                write!(f, "too far from recent range [{min}, {max}]")
            }
        }
    }
}

/// Errors while loading or checking validator configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Source could not be read or deserialized
    #[error("Failed to load validator config: {0}")]
    Load(#[from] ::config::ConfigError),

    /// Outlier sensitivity must be a positive finite number
    #[error("Outlier sensitivity must be finite and > 0, got {0}")]
    InvalidSensitivity(f64),

    /// A size parameter was zero
    #[error("{field} must be at least 1")]
    InvalidCapacity { field: &'static str },

    /// A tolerance parameter was negative or non-finite
    #[error("{field} must be finite and >= 0, got {value}")]
    InvalidTolerance { field: &'static str, value: f64 },

    /// A custom range is inverted or non-finite
    #[error("Invalid custom range for {sensor_id}: [{min}, {max}]")]
    InvalidRange { sensor_id: String, min: f64, max: f64 },
}
