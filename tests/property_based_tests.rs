mod common;

use agent_core::performance::{percentile, PerformanceSample, PerformanceTracker};
use agent_core::scheduling::{DependencyGrouper, DependencyTable, TaskAssignment};
use common::strategies::*;
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

fn multiset(tasks: &[TaskAssignment]) -> HashMap<(String, String, i32), usize> {
    let mut counts = HashMap::new();
    for task in tasks {
        *counts
            .entry((task.worker_name.clone(), task.subtask.clone(), task.priority))
            .or_insert(0) += 1;
    }
    counts
}

proptest! {
    /// Property: grouping neither loses nor duplicates tasks
    #[test]
    fn grouping_preserves_every_task(run in acyclic_run_strategy()) {
        let outcome = DependencyGrouper::new(Arc::new(run.table)).group(run.tasks.clone());
        let flattened: Vec<TaskAssignment> = outcome.groups.iter().flatten().cloned().collect();

        prop_assert_eq!(multiset(&flattened), multiset(&run.tasks));
        prop_assert!(!outcome.fallback_triggered());
    }

    /// Property: every present dependency sits in a strictly earlier group
    #[test]
    fn dependencies_precede_dependents(run in acyclic_run_strategy()) {
        let table = run.table.clone();
        let outcome = DependencyGrouper::new(Arc::new(run.table)).group(run.tasks.clone());

        for (index, group) in outcome.groups.iter().enumerate() {
            for task in group {
                for dependency in table.dependencies_of(&task.worker_name) {
                    if let Some(dep_index) = outcome.group_index_of(dependency) {
                        prop_assert!(
                            dep_index < index,
                            "{} (group {}) depends on {} (group {})",
                            task.worker_name, index, dependency, dep_index
                        );
                    }
                }
            }
        }
    }

    /// Property: grouping terminates and is complete for any table
    #[test]
    fn grouping_terminates_on_arbitrary_tables(
        table in arbitrary_table_strategy(),
        workers in prop::collection::vec(0usize..8, 1..10),
    ) {
        let tasks: Vec<TaskAssignment> = workers
            .iter()
            .enumerate()
            .map(|(i, w)| TaskAssignment::new(worker_name(*w), format!("t{i}"), 0))
            .collect();
        let outcome = DependencyGrouper::new(Arc::new(table)).group(tasks.clone());

        prop_assert_eq!(outcome.task_count(), tasks.len());
        prop_assert!(outcome.groups.iter().all(|g| !g.is_empty()));
    }

    /// Property: concurrency checks are symmetric
    #[test]
    fn can_run_concurrently_is_symmetric(
        table in arbitrary_table_strategy(),
        a in 0usize..8,
        b in 0usize..8,
    ) {
        let (a, b) = (worker_name(a), worker_name(b));
        prop_assert_eq!(table.can_run_concurrently(&a, &b), table.can_run_concurrently(&b, &a));
    }

    /// Property: percentiles are monotone in p and bounded by min/max
    #[test]
    fn percentiles_are_monotone(durations in durations_strategy()) {
        let tracker = PerformanceTracker::new();
        for duration in &durations {
            tracker.record(PerformanceSample::completed("agent", "run", "s", *duration, true));
        }
        let summary = tracker.summary_for("agent");

        prop_assert!(summary.min_duration_ms <= summary.p50_duration_ms);
        prop_assert!(summary.p50_duration_ms <= summary.p95_duration_ms);
        prop_assert!(summary.p95_duration_ms <= summary.p99_duration_ms);
        prop_assert!(summary.p99_duration_ms <= summary.max_duration_ms);

        let mut sorted = durations.clone();
        sorted.sort_unstable();
        prop_assert_eq!(percentile(&sorted, 100.0), summary.max_duration_ms);
    }

    /// Property: retain keeps exactly the newest N in order
    #[test]
    fn retain_keeps_newest(count in 0usize..40, keep in 0usize..40) {
        let tracker = PerformanceTracker::new();
        for i in 0..count {
            tracker.record(PerformanceSample::completed("agent", format!("t{i}"), "s", 1, true));
        }
        tracker.retain(keep);

        let remaining = tracker.samples_for_agent("agent");
        let expected: Vec<String> = (count.saturating_sub(keep)..count).map(|i| format!("t{i}")).collect();
        let actual: Vec<String> = remaining.into_iter().map(|s| s.task_id).collect();
        prop_assert_eq!(actual, expected);
    }
}

#[test]
fn two_cycle_terminates_with_both_tasks() {
    let table = DependencyTable::new()
        .with_dependencies("a", ["b"])
        .with_dependencies("b", ["a"]);
    let outcome = DependencyGrouper::new(Arc::new(table)).group(vec![
        TaskAssignment::new("a", "first", 1),
        TaskAssignment::new("b", "second", 1),
    ]);

    assert_eq!(outcome.task_count(), 2);
    assert!(outcome.fallback_triggered());
}
