//! Validator Configuration

use crate::error::ConfigError;
use crate::rules::RangeRule;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Environment variable prefix, e.g. `SENSOR_VALIDATOR__OUTLIER_SENSITIVITY=3`
pub const ENV_PREFIX: &str = "SENSOR_VALIDATOR";

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Run the verdict pipeline; false turns the validator into a pass-through
    pub enable_validation: bool,

    /// Outlier multiplier (higher = more tolerant of swings)
    pub outlier_sensitivity: f64,

    /// Explicit per-sensor ranges, taking precedence over built-in tables
    pub custom_ranges: HashMap<String, RangeRule>,

    /// Accepted values kept per sensor for outlier detection
    pub history_window: usize,

    /// History length required before outliers are flagged
    pub min_history_for_outlier: usize,

    /// Recent rejection events kept for diagnostics
    pub failure_log_capacity: usize,

    /// Distance from an error sentinel still treated as a match
    pub sentinel_tolerance: f64,

    /// History mean magnitude below which the range-relative outlier test is used
    pub near_zero_epsilon: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            enable_validation: true,
            outlier_sensitivity: 5.0,
            custom_ranges: HashMap::new(),
            history_window: 10,
            min_history_for_outlier: 3,
            failure_log_capacity: 50,
            sentinel_tolerance: 0.01,
            near_zero_epsilon: 0.1,
        }
    }
}

impl ValidatorConfig {
    /// Create strict config (flags smaller swings as outliers)
    pub fn strict() -> Self {
        Self {
            outlier_sensitivity: 3.0,
            ..Default::default()
        }
    }

    /// Create lenient config (tolerates larger swings)
    pub fn lenient() -> Self {
        Self {
            outlier_sensitivity: 10.0,
            ..Default::default()
        }
    }

    /// Pass-through config for deployments that distrust the heuristics
    pub fn disabled() -> Self {
        Self {
            enable_validation: false,
            ..Default::default()
        }
    }

    /// Add an explicit range override for one sensor
    pub fn with_custom_range(mut self, sensor_id: impl Into<String>, min: f64, max: f64) -> Self {
        self.custom_ranges
            .insert(sensor_id.into(), RangeRule::new(min, max));
        self
    }

    /// Load configuration: defaults, then an optional file, then environment.
    ///
    /// File format is picked from the extension (toml, json, yaml).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }

        let loaded: Self = builder
            .add_source(
                ::config::Environment::with_prefix(env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Check parameter sanity
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.outlier_sensitivity.is_finite() || self.outlier_sensitivity <= 0.0 {
            return Err(ConfigError::InvalidSensitivity(self.outlier_sensitivity));
        }

        for (field, size) in [
            ("history_window", self.history_window),
            ("min_history_for_outlier", self.min_history_for_outlier),
            ("failure_log_capacity", self.failure_log_capacity),
        ] {
            if size == 0 {
                return Err(ConfigError::InvalidCapacity { field });
            }
        }

        for (field, value) in [
            ("sentinel_tolerance", self.sentinel_tolerance),
            ("near_zero_epsilon", self.near_zero_epsilon),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTolerance { field, value });
            }
        }

        for (sensor_id, rule) in &self.custom_ranges {
            if !rule.min.is_finite() || !rule.max.is_finite() || rule.min > rule.max {
                return Err(ConfigError::InvalidRange {
                    sensor_id: sensor_id.clone(),
                    min: rule.min,
                    max: rule.max,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = ValidatorConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.enable_validation);
        assert_eq!(config.outlier_sensitivity, 5.0);
        assert_eq!(config.history_window, 10);
        assert_eq!(config.failure_log_capacity, 50);
        assert!(ValidatorConfig::strict().outlier_sensitivity < config.outlier_sensitivity);
        assert!(ValidatorConfig::lenient().outlier_sensitivity > config.outlier_sensitivity);
        assert!(!ValidatorConfig::disabled().enable_validation);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = ValidatorConfig {
            outlier_sensitivity: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSensitivity(_))
        ));

        let config = ValidatorConfig {
            history_window: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCapacity { field: "history_window" })
        ));

        let config = ValidatorConfig {
            sentinel_tolerance: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTolerance { .. })
        ));

        let config = ValidatorConfig::default().with_custom_range("vgrid", 280.0, 180.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("validator.toml");
        fs::write(
            &path,
            r#"
outlier_sensitivity = 8.0
failure_log_capacity = 20

[custom_ranges]
vgrid = { min = 200.0, max = 250.0 }
"#,
        )
        .unwrap();

        let config =
            ValidatorConfig::load_with_prefix(Some(&path), "SENSOR_VALIDATOR_TEST_FILE").unwrap();
        assert_eq!(config.outlier_sensitivity, 8.0);
        assert_eq!(config.failure_log_capacity, 20);
        assert_eq!(config.history_window, 10);
        assert_eq!(
            config.custom_ranges.get("vgrid"),
            Some(&RangeRule::new(200.0, 250.0))
        );
    }

    #[test]
    fn test_load_from_environment() {
        std::env::set_var("SENSOR_VALIDATOR_TEST_ENV__ENABLE_VALIDATION", "false");
        std::env::set_var("SENSOR_VALIDATOR_TEST_ENV__HISTORY_WINDOW", "4");

        let config = ValidatorConfig::load_with_prefix(None, "SENSOR_VALIDATOR_TEST_ENV").unwrap();
        assert!(!config.enable_validation);
        assert_eq!(config.history_window, 4);
        assert_eq!(config.outlier_sensitivity, 5.0);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("validator.json");
        fs::write(&path, r#"{ "outlier_sensitivity": -2.0 }"#).unwrap();

        let result = ValidatorConfig::load_with_prefix(Some(&path), "SENSOR_VALIDATOR_TEST_BAD");
        assert!(matches!(result, Err(ConfigError::InvalidSensitivity(_))));
    }
}
