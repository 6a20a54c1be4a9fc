//! Rule Tables
//!
//! Immutable plausibility data for GoodWe-style inverters: register error
//! codes, per-unit default ranges, per-sensor overrides and the cumulative
//! counters that must never decrease.

use crate::units::Unit;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Values a device reports when a Modbus register read fails
pub const ERROR_SENTINELS: [f64; 4] = [
    65535.0,  // 0xFFFF, unsigned 16-bit max
    32767.0,  // 0x7FFF, signed 16-bit max
    32768.0,  // 0x8000 read as unsigned
    -32768.0, // 0x8000 read as signed
];

const UNIT_RANGES: [(Unit, f64, f64); 10] = [
    (Unit::Volt, 0.0, 1000.0),
    (Unit::Ampere, -150.0, 150.0),
    (Unit::Watt, -50_000.0, 50_000.0),
    (Unit::KilowattHour, 0.0, 100_000.0),
    (Unit::VoltAmpere, -50_000.0, 50_000.0),
    (Unit::Var, -50_000.0, 50_000.0),
    (Unit::Celsius, -40.0, 100.0),
    (Unit::Hertz, 45.0, 65.0),
    (Unit::Percent, 0.0, 100.0),
    (Unit::Hour, 0.0, 1_000_000.0),
];

const SENSOR_RANGES: [(&str, f64, f64); 14] = [
    ("vgrid", 180.0, 280.0),
    ("vgrid2", 180.0, 280.0),
    ("vgrid3", 180.0, 280.0),
    ("vbattery1", 40.0, 600.0),
    ("vpv1", 0.0, 1000.0),
    ("vpv2", 0.0, 1000.0),
    ("vpv3", 0.0, 1000.0),
    ("vpv4", 0.0, 1000.0),
    ("fgrid", 49.0, 61.0),
    ("fgrid2", 49.0, 61.0),
    ("fgrid3", 49.0, 61.0),
    ("battery_soc", 0.0, 100.0),
    ("e_day", 0.0, 200.0),
    ("e_load_day", 0.0, 500.0),
];

const MONOTONIC_SENSORS: [&str; 6] = [
    "e_total",
    "e_bat_charge_total",
    "e_bat_discharge_total",
    "meter_e_total_exp",
    "meter_e_total_imp",
    "h_total",
];

/// Inclusive plausible range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeRule {
    pub min: f64,
    pub max: f64,
}

impl RangeRule {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check whether a value lies within the bounds
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Which precedence tier supplied a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeTier {
    /// Configured by the deployment for this sensor
    Custom,
    /// Built-in override for this sensor
    SensorSpecific,
    /// Default for the sensor's unit
    Unit(Unit),
}

impl fmt::Display for RangeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom => f.write_str("custom"),
            Self::SensorSpecific => f.write_str("sensor-specific"),
            Self::Unit(unit) => write!(f, "unit {unit}"),
        }
    }
}

/// Static rule tables shared by validators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Register-read error codes
    pub error_sentinels: Vec<f64>,
    /// Default range per unit
    pub unit_ranges: BTreeMap<Unit, RangeRule>,
    /// Built-in per-sensor overrides
    pub sensor_ranges: HashMap<String, RangeRule>,
    /// Cumulative counters that must never decrease
    pub monotonic_sensors: HashSet<String>,
}

impl RuleSet {
    /// Built-in tables for GoodWe inverters
    pub fn builtin() -> Self {
        Self {
            error_sentinels: ERROR_SENTINELS.to_vec(),
            unit_ranges: UNIT_RANGES
                .iter()
                .map(|&(unit, min, max)| (unit, RangeRule::new(min, max)))
                .collect(),
            sensor_ranges: SENSOR_RANGES
                .iter()
                .map(|&(id, min, max)| (id.to_string(), RangeRule::new(min, max)))
                .collect(),
            monotonic_sensors: MONOTONIC_SENSORS.iter().map(|id| id.to_string()).collect(),
        }
    }

    /// Sentinel within `tolerance` of the value, if any
    pub fn matching_sentinel(&self, value: f64, tolerance: f64) -> Option<f64> {
        self.error_sentinels
            .iter()
            .copied()
            .find(|&sentinel| value == sentinel || (value - sentinel).abs() < tolerance)
    }

    pub fn is_monotonic(&self, sensor_id: &str) -> bool {
        self.monotonic_sensors.contains(sensor_id)
    }

    /// Resolve the applicable range: custom > sensor-specific > unit default.
    ///
    /// The first tier holding an entry decides; `None` means unbounded.
    pub fn resolve_range(
        &self,
        sensor_id: &str,
        unit: Option<Unit>,
        custom: &HashMap<String, RangeRule>,
    ) -> Option<(RangeTier, RangeRule)> {
        if let Some(rule) = custom.get(sensor_id) {
            return Some((RangeTier::Custom, *rule));
        }
        if let Some(rule) = self.sensor_ranges.get(sensor_id) {
            return Some((RangeTier::SensorSpecific, *rule));
        }
        unit.and_then(|u| {
            self.unit_ranges
                .get(&u)
                .map(|rule| (RangeTier::Unit(u), *rule))
        })
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}
