use criterion::{criterion_group, criterion_main, Criterion};
use nearby_connect::models::{Location, UserRecord};
use nearby_connect::services::{haversine_km, rank_nearby};
use std::hint::black_box;

const NUM_CANDIDATES: usize = 10_000;

/// Users spread on a grid around the origin, every third one available.
fn build_candidates() -> Vec<UserRecord> {
    (0..NUM_CANDIDATES)
        .map(|i| {
            let mut user = UserRecord::new(
                format!("user-{}", i),
                Some(format!("handle{}", i)),
                None,
                None,
                "2024-01-15T10:00:00.000Z".to_string(),
            );
            let row = (i / 100) as f64;
            let col = (i % 100) as f64;
            user.location = Location::new(row * 0.005 - 0.25, col * 0.005 - 0.25);
            user.wants_contact = i % 3 == 0;
            user
        })
        .collect()
}

fn benchmark_nearby(c: &mut Criterion) {
    let candidates = build_candidates();
    let requester = UserRecord::new(
        "requester".to_string(),
        None,
        None,
        None,
        "2024-01-15T10:00:00.000Z".to_string(),
    );

    let mut group = c.benchmark_group("nearby");

    group.bench_function("haversine_single", |b| {
        b.iter(|| haversine_km(black_box(51.5074), black_box(-0.1278), 48.8566, 2.3522))
    });

    group.bench_function("rank_default_radius", |b| {
        b.iter(|| rank_nearby(&requester, black_box(&candidates), 5.0))
    });

    group.bench_function("rank_everyone_in_range", |b| {
        b.iter(|| rank_nearby(&requester, black_box(&candidates), 100.0))
    });

    group.finish();
}

criterion_group!(benches, benchmark_nearby);
criterion_main!(benches);
