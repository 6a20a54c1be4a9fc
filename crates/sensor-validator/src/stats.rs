//! Rejection Statistics

use crate::error::RejectReason;
use ring_buffer::RingBuffer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Default size of the recent-failure log
pub const DEFAULT_FAILURE_LOG_CAPACITY: usize = 50;

/// A single rejected reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionRecord {
    pub sensor_id: String,
    pub value: f64,
    /// Human-readable reason
    pub reason: String,
}

/// Rejection counters and a bounded log of recent failures.
///
/// Write-only from the pipeline's point of view: nothing here feeds back
/// into verdicts.
#[derive(Debug, Clone)]
pub struct ValidationStats {
    rejected_count: HashMap<String, u64>,
    recent_failures: RingBuffer<RejectionRecord>,
}

impl ValidationStats {
    /// Create with the given failure log capacity
    pub fn new(failure_log_capacity: usize) -> Self {
        Self {
            rejected_count: HashMap::new(),
            recent_failures: RingBuffer::new(failure_log_capacity),
        }
    }

    /// Count a rejection and append it to the recent-failure log
    pub fn record_rejection(&mut self, sensor_id: &str, value: f64, reason: &RejectReason) {
        *self.rejected_count.entry(sensor_id.to_string()).or_insert(0) += 1;

        self.recent_failures.push(RejectionRecord {
            sensor_id: sensor_id.to_string(),
            value,
            reason: reason.to_string(),
        });

        metrics::counter!(
            "sensor_validator_rejections_total",
            "sensor" => sensor_id.to_string(),
            "reason" => reason.kind()
        )
        .increment(1);
    }

    /// Rejections for one sensor
    pub fn rejected_count(&self, sensor_id: &str) -> u64 {
        self.rejected_count.get(sensor_id).copied().unwrap_or(0)
    }

    /// Rejections across all sensors
    pub fn total_rejections(&self) -> u64 {
        self.rejected_count.values().sum()
    }

    /// Recent failures, oldest first
    pub fn recent_failures(&self) -> Vec<RejectionRecord> {
        self.recent_failures.to_vec()
    }

    pub fn failure_log_capacity(&self) -> usize {
        self.recent_failures.capacity()
    }

    pub(crate) fn counts(&self) -> BTreeMap<String, u64> {
        self.rejected_count
            .iter()
            .map(|(id, count)| (id.clone(), *count))
            .collect()
    }
}

impl Default for ValidationStats {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_LOG_CAPACITY)
    }
}

/// Read-only diagnostics view of a validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSnapshot {
    pub enabled: bool,
    pub outlier_sensitivity: f64,
    pub custom_ranges_count: usize,
    /// Rejections per sensor since start-up
    pub rejected_count: BTreeMap<String, u64>,
    /// Most recent rejections, oldest first
    pub recent_failures: Vec<RejectionRecord>,
}

impl ValidationSnapshot {
    /// Render for a diagnostics surface
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
