//! Sliding-Window Outlier Detection

use crate::error::{OutlierBasis, RejectReason};
use ring_buffer::RingBuffer;

/// Flags values that are inconsistent with a sensor's recent accepted history.
///
/// Two modes:
/// - mean-relative: reject if `|value - mean| > |mean| * sensitivity`
/// - range-relative, when `|mean| < near_zero_epsilon`: reject if
///   `|value| > (max - min) * sensitivity + max(|max|, |min|)`
///
/// The second mode covers sensors that hover around zero (reactive power,
/// idle battery current) where a relative threshold collapses.
#[derive(Debug, Clone, Copy)]
pub struct OutlierDetector {
    sensitivity: f64,
    near_zero_epsilon: f64,
    min_history: usize,
}

impl OutlierDetector {
    /// Create a new detector
    pub fn new(sensitivity: f64, near_zero_epsilon: f64, min_history: usize) -> Self {
        Self {
            sensitivity,
            near_zero_epsilon,
            min_history,
        }
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Check a value against the history, which must not yet contain it
    pub fn check(&self, history: &RingBuffer<f64>, value: f64) -> Result<(), RejectReason> {
        if history.len() < self.min_history {
            return Ok(());
        }

        let n = history.len() as f64;
        let mean = history.iter().sum::<f64>() / n;
        let max = history.iter().copied().fold(f64::MIN, f64::max);
        let min = history.iter().copied().fold(f64::MAX, f64::min);

        if mean.abs() < self.near_zero_epsilon {
            let threshold = (max - min) * self.sensitivity + max.abs().max(min.abs());
            if value.abs() > threshold {
                return Err(RejectReason::Outlier {
                    basis: OutlierBasis::RangeRelative { min, max },
                    threshold,
                });
            }
        } else {
            let threshold = mean.abs() * self.sensitivity;
            if (value - mean).abs() > threshold {
                return Err(RejectReason::Outlier {
                    basis: OutlierBasis::MeanRelative { mean },
                    threshold,
                });
            }
        }

        Ok(())
    }
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self::new(5.0, 0.1, 3)
    }
}
