use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use users_clean::core::domain::{FieldValue, RawRecord};
use users_clean::preprocessing::{CleaningPipeline, RecordProfile, RecordValidator};
use users_clean::time::micros_to_datetime;

/// Synthetic dirty set: every third row duplicates its predecessor without
/// an email, every tenth row is all-null.
fn dirty_records(n: usize) -> Vec<RawRecord> {
    (0..n)
        .map(|i| {
            if i % 10 == 9 {
                return RawRecord::default();
            }
            let user = if i % 3 == 2 { i - 1 } else { i };
            let user_id = format!("UA{:015}", user);
            let email = format!("user{}@domain{}.com", user, user % 7);
            RawRecord::new(
                Some(user_id.as_str()),
                Some(1_593_878_899_217_692 + user as i64),
                if i % 3 == 2 { None } else { Some(email.as_str()) },
                Some(FieldValue::Int(i as i64)),
            )
        })
        .collect()
}

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean");
    let pipeline = CleaningPipeline::new();

    for size in [100usize, 1_000, 10_000] {
        let records = dirty_records(size);
        group.bench_with_input(BenchmarkId::new("pipeline", size), &records, |b, input| {
            b.iter(|| pipeline.clean(black_box(input)));
        });
    }

    group.finish();
}

fn bench_profile_and_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("inspection");
    let records = dirty_records(10_000);
    let cleaned = CleaningPipeline::new()
        .clean(&records)
        .map(|outcome| outcome.records)
        .unwrap_or_default();

    group.bench_function("profile_raw_10000", |b| {
        b.iter(|| RecordProfile::from_raw(black_box(&records)));
    });
    group.bench_function("validate_clean", |b| {
        b.iter(|| RecordValidator::validate(black_box(&cleaned)));
    });

    group.finish();
}

fn bench_micros_to_datetime(c: &mut Criterion) {
    c.bench_function("micros_to_datetime", |b| {
        b.iter(|| {
            for i in 0..1000i64 {
                black_box(micros_to_datetime(black_box(1_641_218_709_000_000 + i)));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_clean,
    bench_profile_and_validate,
    bench_micros_to_datetime
);
criterion_main!(benches);
