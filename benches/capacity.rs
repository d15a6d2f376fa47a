use chrono::{Duration, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use resman::capacity::{check_capacity, committed_allocation};
use resman::{Allocation, Assignment, AssignmentRole, Engineer, EngineerId, ProjectId, Seniority};

fn seed_assignments(engineer_id: EngineerId, count: usize) -> Vec<Assignment> {
    let now = Utc::now();
    (0..count)
        .map(|i| {
            // Mix expired, running, and future windows.
            let end_offset = (i as i64 % 90) - 30;
            Assignment::new(
                engineer_id,
                ProjectId::new(),
                Allocation::new(5).unwrap(),
                now + Duration::days(end_offset - 30),
                now + Duration::days(end_offset),
                AssignmentRole::Developer,
            )
            .unwrap()
        })
        .collect()
}

fn bench_committed_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("capacity/committed_allocation");
    for &count in &[4usize, 64, 1024] {
        let engineer_id = EngineerId::new();
        let assignments = seed_assignments(engineer_id, count);
        let now = Utc::now();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &assignments, |b, a| {
            b.iter(|| committed_allocation(a, now));
        });
    }
    group.finish();
}

fn bench_check_capacity(c: &mut Criterion) {
    let engineer = Engineer::new("bench", "bench@example.com", Seniority::Senior, 100).unwrap();
    let others = seed_assignments(engineer.id, 16);
    let proposed = Allocation::new(10).unwrap();
    let now = Utc::now();

    c.bench_function("capacity/check_capacity_16_others", |b| {
        b.iter(|| check_capacity(&engineer, &others, proposed, now));
    });
}

criterion_group!(benches, bench_committed_allocation, bench_check_capacity);
criterion_main!(benches);
