//! Sensor Validator
//!
//! Runs each numeric reading through a fixed sequence of checks and keeps the
//! per-sensor state (rolling history, monotonic counters) those checks need.

use crate::error::{ConfigError, RejectReason};
use crate::outlier::OutlierDetector;
use crate::rules::RuleSet;
use crate::settings::ValidatorConfig;
use crate::stats::{ValidationSnapshot, ValidationStats};
use crate::units::{resolve_unit, Unit};
use crate::value::{Readings, SensorMetadataMap, SensorValue};
use ring_buffer::RingBuffer;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Outcome for a single reading
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accept,
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accept)
    }
}

/// Plausibility filter for one inverter's telemetry.
///
/// State is owned by the instance; a deployment polling several devices keeps
/// one validator per device.
pub struct Validator {
    config: ValidatorConfig,
    rules: Arc<RuleSet>,
    outlier: OutlierDetector,
    /// Recent accepted values per sensor
    history: HashMap<String, RingBuffer<f64>>,
    /// Last accepted value of each cumulative counter
    last_monotonic: HashMap<String, f64>,
    stats: ValidationStats,
}

impl Validator {
    /// Create a new validator with the built-in rule tables
    pub fn new(config: ValidatorConfig) -> Self {
        Self::with_rules(config, Arc::new(RuleSet::builtin()))
    }

    /// Create a validator sharing an existing rule set
    pub fn with_rules(config: ValidatorConfig, rules: Arc<RuleSet>) -> Self {
        if config.enable_validation {
            info!(
                sensitivity = config.outlier_sensitivity,
                custom_ranges = config.custom_ranges.len(),
                history_window = config.history_window,
                "Creating sensor validator"
            );
        } else {
            info!("Sensor validation disabled, readings pass through unchanged");
        }

        Self {
            outlier: OutlierDetector::new(
                config.outlier_sensitivity,
                config.near_zero_epsilon,
                config.min_history_for_outlier,
            ),
            stats: ValidationStats::new(config.failure_log_capacity),
            history: HashMap::new(),
            last_monotonic: HashMap::new(),
            rules,
            config,
        }
    }

    /// Create a validator after checking the config
    pub fn try_new(config: ValidatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Validate one polling cycle, returning only accepted readings.
    ///
    /// Values are returned unchanged. When validation is disabled the batch is
    /// returned as-is and no state is touched.
    pub fn validate_data(
        &mut self,
        data: &Readings,
        metadata: Option<&SensorMetadataMap>,
    ) -> Readings {
        if !self.config.enable_validation {
            return data.clone();
        }

        let mut accepted = Readings::new();
        for (sensor_id, value) in data {
            let unit = resolve_unit(sensor_id, metadata);
            match self.validate_value(sensor_id, value, unit) {
                Verdict::Accept => {
                    accepted.insert(sensor_id.clone(), value.clone());
                }
                Verdict::Reject(reason) => {
                    debug!(sensor = %sensor_id, ?value, %reason, "Rejected sensor value");
                }
            }
        }

        accepted
    }

    /// Run the pipeline for a single reading.
    ///
    /// An accepted numeric value is committed to the sensor's history and
    /// monotonic tracker; a rejected one is recorded in the statistics only.
    pub fn validate_value(
        &mut self,
        sensor_id: &str,
        value: &SensorValue,
        unit: Option<Unit>,
    ) -> Verdict {
        // Null, text, boolean and unclassified values pass through
        let SensorValue::Numeric(v) = *value else {
            return Verdict::Accept;
        };

        match self.evaluate(sensor_id, v, unit) {
            Ok(()) => {
                self.commit(sensor_id, v);
                Verdict::Accept
            }
            Err(reason) => {
                if let RejectReason::MonotonicRegression { previous, current } = reason {
                    warn!(sensor = %sensor_id, previous, current, "Cumulative counter regressed");
                }
                self.stats.record_rejection(sensor_id, v, &reason);
                Verdict::Reject(reason)
            }
        }
    }

    /// Ordered checks; the first failure decides. Reads state only.
    fn evaluate(
        &self,
        sensor_id: &str,
        value: f64,
        unit: Option<Unit>,
    ) -> Result<(), RejectReason> {
        if let Some(sentinel) = self
            .rules
            .matching_sentinel(value, self.config.sentinel_tolerance)
        {
            return Err(RejectReason::ErrorSentinel { sentinel });
        }

        if !value.is_finite() {
            return Err(RejectReason::NonFinite);
        }

        self.validate_range(sensor_id, value, unit)?;
        self.validate_monotonic(sensor_id, value)?;

        match self.history.get(sensor_id) {
            Some(history) => self.outlier.check(history, value),
            None => Ok(()),
        }
    }

    /// Validate a value against its resolved range
    fn validate_range(
        &self,
        sensor_id: &str,
        value: f64,
        unit: Option<Unit>,
    ) -> Result<(), RejectReason> {
        match self
            .rules
            .resolve_range(sensor_id, unit, &self.config.custom_ranges)
        {
            Some((tier, rule)) if !rule.contains(value) => Err(RejectReason::OutOfRange {
                tier,
                min: rule.min,
                max: rule.max,
            }),
            _ => Ok(()),
        }
    }

    /// Validate that a cumulative counter has not gone backwards
    fn validate_monotonic(&self, sensor_id: &str, value: f64) -> Result<(), RejectReason> {
        if !self.rules.is_monotonic(sensor_id) {
            return Ok(());
        }

        match self.last_monotonic.get(sensor_id) {
            Some(&previous) if value < previous => Err(RejectReason::MonotonicRegression {
                previous,
                current: value,
            }),
            _ => Ok(()),
        }
    }

    fn commit(&mut self, sensor_id: &str, value: f64) {
        if self.rules.is_monotonic(sensor_id) {
            self.last_monotonic.insert(sensor_id.to_string(), value);
        }

        let window = self.config.history_window;
        self.history
            .entry(sensor_id.to_string())
            .or_insert_with(|| RingBuffer::new(window))
            .push(value);

        trace!(sensor = %sensor_id, value, "Accepted sensor value");
    }

    /// Diagnostics snapshot
    pub fn stats(&self) -> ValidationSnapshot {
        ValidationSnapshot {
            enabled: self.config.enable_validation,
            outlier_sensitivity: self.config.outlier_sensitivity,
            custom_ranges_count: self.config.custom_ranges.len(),
            rejected_count: self.stats.counts(),
            recent_failures: self.stats.recent_failures(),
        }
    }

    /// Raw rejection statistics
    pub fn rejection_stats(&self) -> &ValidationStats {
        &self.stats
    }

    /// Recent accepted values for a sensor, oldest first
    pub fn history(&self, sensor_id: &str) -> Vec<f64> {
        self.history
            .get(sensor_id)
            .map(RingBuffer::to_vec)
            .unwrap_or_default()
    }

    /// Last accepted value of a cumulative counter
    pub fn last_monotonic(&self, sensor_id: &str) -> Option<f64> {
        self.last_monotonic.get(sensor_id).copied()
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enable_validation
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn rules(&self) -> &Arc<RuleSet> {
        &self.rules
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}
