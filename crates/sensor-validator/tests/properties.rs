//! Property tests for the validation pipeline

use proptest::prelude::*;
use sensor_validator::{Readings, SensorValue, Validator, ValidatorConfig, ERROR_SENTINELS};

fn one(id: &str, value: f64) -> Readings {
    let mut batch = Readings::new();
    batch.insert(id.to_string(), SensorValue::Numeric(value));
    batch
}

fn is_sentinel(value: f64) -> bool {
    ERROR_SENTINELS.iter().any(|s| (value - s).abs() < 0.01)
}

proptest! {
    /// Fresh sensors (no history) accept any in-range non-sentinel value
    #[test]
    fn in_range_values_accepted(value in 0.0f64..=1000.0) {
        prop_assume!(!is_sentinel(value));
        let mut validator = Validator::default();
        let out = validator.validate_data(&one("vpv1", value), None);
        prop_assert!(out.contains_key("vpv1"));
    }

    /// Power readings inside the unit range with steady history are accepted
    #[test]
    fn steady_power_accepted(
        base in 1000.0f64..5000.0,
        jitter in proptest::collection::vec(-50.0f64..50.0, 1..30),
    ) {
        let mut validator = Validator::default();
        for j in jitter {
            let value = base + j;
            prop_assume!(!is_sentinel(value));
            let out = validator.validate_data(&one("ppv", value), None);
            prop_assert!(out.contains_key("ppv"));
        }
    }

    /// A cumulative counter never accepts a value below one it already accepted
    #[test]
    fn monotonic_never_regresses(values in proptest::collection::vec(0.0f64..1000.0, 1..60)) {
        let mut validator = Validator::default();
        let mut high_water: Option<f64> = None;

        for value in values {
            let out = validator.validate_data(&one("meter_e_total_exp", value), None);
            if let Some(max) = high_water {
                if value < max {
                    prop_assert!(!out.contains_key("meter_e_total_exp"));
                }
            }
            if out.contains_key("meter_e_total_exp") {
                prop_assert!(high_water.map_or(true, |max| value >= max));
                high_water = Some(value);
            }
            prop_assert_eq!(validator.last_monotonic("meter_e_total_exp"), high_water);
        }
    }

    /// History and failure log stay within their caps
    #[test]
    fn containers_stay_bounded(
        window in 1usize..8,
        capacity in 1usize..8,
        values in proptest::collection::vec(-2000.0f64..2000.0, 0..100),
    ) {
        let mut validator = Validator::new(ValidatorConfig {
            history_window: window,
            failure_log_capacity: capacity,
            ..Default::default()
        });

        for value in values {
            validator.validate_data(&one("igrid", value), None);
            prop_assert!(validator.history("igrid").len() <= window);
            prop_assert!(validator.stats().recent_failures.len() <= capacity);
        }
    }

    /// Disabled validation returns its input and records nothing
    #[test]
    fn disabled_is_identity(values in proptest::collection::vec(proptest::num::f64::ANY, 1..20)) {
        let mut validator = Validator::new(ValidatorConfig::disabled());
        let input: Readings = values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("e_total_{i}"), SensorValue::Numeric(*v)))
            .collect();

        let out = validator.validate_data(&input, None);

        prop_assert_eq!(out.len(), input.len());
        for (id, value) in &input {
            let kept = out.get(id).and_then(SensorValue::as_f64);
            let same_bits = match (kept, value.as_f64()) {
                (Some(a), Some(b)) => a.to_bits() == b.to_bits(),
                _ => false,
            };
            prop_assert!(same_bits, "value for {} changed", id);
        }
        prop_assert!(validator.stats().recent_failures.is_empty());
        prop_assert!(validator.stats().rejected_count.is_empty());
    }
}
