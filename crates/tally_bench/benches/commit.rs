//! Registration and commit benchmarks over recording mappers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tally_bench::parents;
use tally_core::{transition, ObjectState, Registration, UnitOfWork};
use tally_testkit::Harness;

/// Benchmark the pure state machine.
fn bench_transition(c: &mut Criterion) {
    let states = [
        None,
        Some(ObjectState::Clean),
        Some(ObjectState::New),
        Some(ObjectState::Dirty),
        Some(ObjectState::Removed),
    ];
    let registrations = [
        Registration::New,
        Registration::Dirty,
        Registration::Removed,
        Registration::Clean,
    ];

    c.bench_function("transition_table", |b| {
        b.iter(|| {
            for state in states {
                for registration in registrations {
                    let _ = black_box(transition(black_box(state), black_box(registration)));
                }
            }
        });
    });
}

/// Benchmark registering new entities without committing.
fn bench_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("register_new");

    for count in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let harness = Harness::new();
            let docs = parents(count);

            b.iter(|| {
                let mut uow = harness.basic();
                for doc in &docs {
                    uow.register_new(doc.clone()).unwrap();
                }
                black_box(uow.pending());
            });
        });
    }
    group.finish();
}

/// Benchmark register + commit through a transactional unit of work.
fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit");

    for count in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let harness = Harness::new();
            let docs = parents(count);

            b.iter(|| {
                let mut uow = harness.transactional();
                for doc in &docs {
                    uow.register_dirty(doc.clone()).unwrap();
                }
                let summary = uow.commit().unwrap();
                harness.log.reset();
                harness.backend.reset();
                black_box(summary);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_transition, bench_register, bench_commit);
criterion_main!(benches);
