use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use sensor_validator::{Readings, SensorValue, Validator};

/// Roughly the sensor set of an ET-family hybrid inverter
fn polling_cycle(step: u64) -> Readings {
    let t = step as f64;
    let mut batch = Readings::new();
    for i in 1..=4 {
        batch.insert(format!("vpv{i}"), SensorValue::Numeric(380.0 + (t * 0.1 + i as f64).sin()));
        batch.insert(format!("ipv{i}"), SensorValue::Numeric(8.0 + (t * 0.2).cos()));
        batch.insert(format!("ppv{i}"), SensorValue::Numeric(3000.0 + 50.0 * (t * 0.05).sin()));
    }
    batch.insert("vgrid".into(), SensorValue::Numeric(230.0));
    batch.insert("fgrid".into(), SensorValue::Numeric(50.01));
    batch.insert("battery_soc".into(), SensorValue::Numeric(64.0));
    batch.insert("e_total".into(), SensorValue::Numeric(12_000.0 + t * 0.01));
    batch.insert("h_total".into(), SensorValue::Numeric(8_000.0 + t / 360.0));
    batch.insert("temperature".into(), SensorValue::Numeric(41.5));
    batch.insert("work_mode".into(), SensorValue::Text("normal".into()));
    batch.insert("pbattery1".into(), SensorValue::Null);
    batch
}

fn bench_validate_batch(c: &mut Criterion) {
    c.bench_function("validate_data_et_cycle", |b| {
        let mut validator = Validator::default();
        // Counters keep rising across iterations so e_total/h_total stay accepted
        let mut step = 0u64;
        b.iter_batched(
            || {
                step += 1;
                polling_cycle(step)
            },
            |batch| validator.validate_data(black_box(&batch), None),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_validate_batch);
criterion_main!(benches);
