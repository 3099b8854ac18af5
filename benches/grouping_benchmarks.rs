use agent_core::performance::{PerformanceSample, PerformanceTracker};
use agent_core::scheduling::{DependencyGrouper, DependencyTable, TaskAssignment};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

/// Layered table: worker `i` depends on `i - width` so each layer has `width` workers
fn layered_table(workers: usize, width: usize) -> DependencyTable {
    (0..workers).fold(DependencyTable::new(), |table, i| {
        let deps: Vec<String> = if i >= width {
            vec![format!("worker-{}", i - width)]
        } else {
            Vec::new()
        };
        table.with_dependencies(format!("worker-{i}"), deps)
    })
}

fn tasks(workers: usize) -> Vec<TaskAssignment> {
    (0..workers)
        .rev()
        .map(|i| TaskAssignment::new(format!("worker-{i}"), "bench", i as i32 % 7))
        .collect()
}

fn benchmark_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");
    for size in [10usize, 100, 500] {
        let grouper = DependencyGrouper::new(Arc::new(layered_table(size, 5)));
        let input = tasks(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| grouper.group(black_box(input.clone())))
        });
    }
    group.finish();
}

fn benchmark_report(c: &mut Criterion) {
    let tracker = PerformanceTracker::new();
    for i in 0..1_000u64 {
        tracker.record(PerformanceSample::completed(
            format!("agent-{}", i % 10),
            "bench-run",
            "full-execution",
            i * 3 % 997,
            i % 13 != 0,
        ));
    }

    c.bench_function("build_report_1000_samples", |b| {
        b.iter(|| tracker.build_report(black_box("bench-run")))
    });
}

criterion_group!(benches, benchmark_grouping, benchmark_report);
criterion_main!(benches);
