//! Sensor Value Validation
//!
//! Filters inverter telemetry batches down to physically plausible values.
//! Each numeric reading runs through error-code detection, finiteness, range
//! checks, monotonic counter tracking and outlier detection; the first failing
//! check rejects it. Non-numeric readings pass through untouched.

mod error;
mod outlier;
mod rules;
mod settings;
mod stats;
mod units;
mod validator;
mod value;

pub use error::{ConfigError, OutlierBasis, RejectReason};
pub use outlier::OutlierDetector;
pub use rules::{RangeRule, RangeTier, RuleSet, ERROR_SENTINELS};
pub use settings::{ValidatorConfig, ENV_PREFIX};
pub use stats::{RejectionRecord, ValidationSnapshot, ValidationStats};
pub use units::{infer_unit, resolve_unit, Unit};
pub use validator::{Validator, Verdict};
pub use value::{Readings, SensorMetadata, SensorMetadataMap, SensorValue};
