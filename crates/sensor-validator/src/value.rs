//! Reading Values and Sensor Metadata

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One polling cycle: sensor id -> raw value
pub type Readings = BTreeMap<String, SensorValue>;

/// Per-cycle metadata supplied by the data-acquisition layer
pub type SensorMetadataMap = HashMap<String, SensorMetadata>;

/// Raw value of a single sensor reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorValue {
    /// Missing or unset reading
    Null,
    Boolean(bool),
    /// Numeric telemetry, the only variant that is validated
    Numeric(f64),
    /// Text or enumerated state
    Text(String),
    /// Anything the collaborator could not classify
    Other(serde_json::Value),
}

impl SensorValue {
    /// Numeric payload, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }
}

impl From<f64> for SensorValue {
    fn from(v: f64) -> Self {
        Self::Numeric(v)
    }
}

impl From<i64> for SensorValue {
    fn from(v: i64) -> Self {
        Self::Numeric(v as f64)
    }
}

impl From<bool> for SensorValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for SensorValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SensorValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<SensorValue>> From<Option<T>> for SensorValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Attributes of a sensor as described by the device driver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorMetadata {
    /// Unit symbol, e.g. "V" or "kWh"
    #[serde(default)]
    pub unit: Option<String>,
    /// Sensor kind (driver specific, informational)
    #[serde(default)]
    pub kind: Option<String>,
}

impl SensorMetadata {
    /// Metadata carrying only a unit symbol
    pub fn with_unit(unit: impl Into<String>) -> Self {
        Self {
            unit: Some(unit.into()),
            kind: None,
        }
    }
}
