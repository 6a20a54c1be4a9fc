//! Physical Units and Unit Resolution

use crate::value::SensorMetadataMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical unit of an inverter sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "V")]
    Volt,
    #[serde(rename = "A")]
    Ampere,
    #[serde(rename = "W")]
    Watt,
    #[serde(rename = "kWh")]
    KilowattHour,
    #[serde(rename = "VA")]
    VoltAmpere,
    #[serde(rename = "var")]
    Var,
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "Hz")]
    Hertz,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "h")]
    Hour,
}

impl Unit {
    /// All known units
    pub const ALL: [Unit; 10] = [
        Unit::Volt,
        Unit::Ampere,
        Unit::Watt,
        Unit::KilowattHour,
        Unit::VoltAmpere,
        Unit::Var,
        Unit::Celsius,
        Unit::Hertz,
        Unit::Percent,
        Unit::Hour,
    ];

    /// Parse a unit symbol as reported in sensor metadata
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "V" => Some(Self::Volt),
            "A" => Some(Self::Ampere),
            "W" => Some(Self::Watt),
            "kWh" => Some(Self::KilowattHour),
            "VA" => Some(Self::VoltAmpere),
            "var" => Some(Self::Var),
            "C" => Some(Self::Celsius),
            "Hz" => Some(Self::Hertz),
            "%" => Some(Self::Percent),
            "h" => Some(Self::Hour),
            _ => None,
        }
    }

    /// Canonical symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Volt => "V",
            Self::Ampere => "A",
            Self::Watt => "W",
            Self::KilowattHour => "kWh",
            Self::VoltAmpere => "VA",
            Self::Var => "var",
            Self::Celsius => "C",
            Self::Hertz => "Hz",
            Self::Percent => "%",
            Self::Hour => "h",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Guess a unit from the sensor identifier.
///
/// Best-effort: rules are tried in order and the first match wins, so unusual
/// identifiers can be misclassified (`pv_temp` reads as power). Only used when
/// the collaborator supplied no metadata for the sensor.
pub fn infer_unit(sensor_id: &str) -> Option<Unit> {
    if sensor_id.contains("voltage") || sensor_id.starts_with('v') {
        return Some(Unit::Volt);
    }
    if sensor_id.contains("current") || sensor_id.starts_with('i') {
        return Some(Unit::Ampere);
    }
    if sensor_id.contains("power") || sensor_id.starts_with('p') {
        return Some(Unit::Watt);
    }
    if sensor_id.contains("energy") || sensor_id.starts_with("e_") {
        return Some(Unit::KilowattHour);
    }
    if sensor_id.contains("temp") {
        return Some(Unit::Celsius);
    }
    if sensor_id.contains("freq") || sensor_id.starts_with('f') {
        return Some(Unit::Hertz);
    }
    if sensor_id.contains("soc") || sensor_id.contains('%') {
        return Some(Unit::Percent);
    }
    None
}

/// Resolve the unit for a sensor.
///
/// A metadata entry is authoritative even when it carries no (or an unknown)
/// unit; inference only runs for sensors without an entry.
pub fn resolve_unit(sensor_id: &str, metadata: Option<&SensorMetadataMap>) -> Option<Unit> {
    match metadata.and_then(|m| m.get(sensor_id)) {
        Some(entry) => entry.unit.as_deref().and_then(Unit::from_symbol),
        None => infer_unit(sensor_id),
    }
}
