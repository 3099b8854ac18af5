use agent_core::scheduling::{DependencyTable, TaskAssignment};
use proptest::prelude::*;

/// A generated run: an acyclic dependency table whose entries only name
/// workers that appear in `tasks`.
#[derive(Debug, Clone)]
pub struct AcyclicRun {
    pub table: DependencyTable,
    pub tasks: Vec<TaskAssignment>,
}

pub fn worker_name(index: usize) -> String {
    format!("worker-{index}-agent")
}

/// Strategy for an acyclic run with 1..=8 distinct workers.
///
/// Worker `i` may only depend on workers `j < i`, which rules out cycles.
/// Every worker gets at least one task; a few extra duplicates are mixed in.
pub fn acyclic_run_strategy() -> impl Strategy<Value = AcyclicRun> {
    (1usize..=8)
        .prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec(prop::collection::vec(any::<bool>(), n), n),
                prop::collection::vec(-5i32..5, n),
                prop::collection::vec((0..n, -5i32..5), 0..6),
            )
        })
        .prop_map(|(n, edges, priorities, extras)| {
            let mut table = DependencyTable::new();
            for (i, row) in edges.iter().enumerate() {
                let deps: Vec<String> = (0..i).filter(|&j| row[j]).map(worker_name).collect();
                table = table.with_dependencies(worker_name(i), deps);
            }

            let mut tasks: Vec<TaskAssignment> = (0..n)
                .rev()
                .map(|i| TaskAssignment::new(worker_name(i), format!("subtask {i}"), priorities[i]))
                .collect();
            tasks.extend(extras.into_iter().map(|(i, priority)| {
                TaskAssignment::new(worker_name(i), "extra", priority)
            }));

            AcyclicRun { table, tasks }
        })
}

/// Strategy for an arbitrary (possibly cyclic, possibly dangling) table
pub fn arbitrary_table_strategy() -> impl Strategy<Value = DependencyTable> {
    prop::collection::vec(
        (0usize..6, prop::collection::vec(0usize..8, 0..4)),
        0..8,
    )
    .prop_map(|entries| {
        entries.into_iter().fold(DependencyTable::new(), |table, (worker, deps)| {
            table.with_dependencies(worker_name(worker), deps.into_iter().map(worker_name))
        })
    })
}

/// Strategy for sample durations in milliseconds
pub fn durations_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..100_000, 1..50)
}
