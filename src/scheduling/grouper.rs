//! # Dependency Grouper
//!
//! Greedy layered topological sort. Tasks are partitioned into an ordered
//! sequence of groups so that every task's dependencies (from the static
//! table) are placed in strictly earlier groups, and members of one group
//! are safe to run concurrently.
//!
//! When no remaining task is placeable (a cycle, or a dependency on a worker
//! that never appears in the run) the first remaining task is forced into a
//! group of its own. This guarantees termination; the forced placements are
//! reported in [`GroupingOutcome::forced`] and logged as warnings.
//!
//! ```rust
//! use agent_core::scheduling::{DependencyGrouper, DependencyTable, TaskAssignment};
//! use std::sync::Arc;
//!
//! let grouper = DependencyGrouper::new(Arc::new(DependencyTable::default()));
//! let outcome = grouper.group(vec![
//!     TaskAssignment::new("architecture-agent", "validate layout", 1),
//!     TaskAssignment::new("frontend-agent", "validate components", 2),
//! ]);
//!
//! assert_eq!(outcome.groups.len(), 2);
//! assert!(!outcome.fallback_triggered());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::{DependencyTable, TaskAssignment};

/// A batch of assignments with no ordering requirement among members
pub type TaskGroup = Vec<TaskAssignment>;

/// Result of grouping one run's tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingOutcome {
    pub groups: Vec<TaskGroup>,
    /// Workers placed by the forced-progress fallback, in placement order
    pub forced: Vec<String>,
}

impl GroupingOutcome {
    pub fn fallback_triggered(&self) -> bool {
        !self.forced.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn task_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Index of the group holding `worker`, if any task names it
    pub fn group_index_of(&self, worker: &str) -> Option<usize> {
        self.groups
            .iter()
            .position(|group| group.iter().any(|t| t.worker_name == worker))
    }

    pub fn into_groups(self) -> Vec<TaskGroup> {
        self.groups
    }
}

/// Groups task assignments by the dependencies recorded in a shared table
#[derive(Debug, Clone)]
pub struct DependencyGrouper {
    table: Arc<DependencyTable>,
}

impl DependencyGrouper {
    pub fn new(table: Arc<DependencyTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &DependencyTable {
        &self.table
    }

    pub fn can_run_concurrently(&self, worker_a: &str, worker_b: &str) -> bool {
        self.table.can_run_concurrently(worker_a, worker_b)
    }

    /// Partition `tasks` into dependency-ordered groups
    #[instrument(skip(self, tasks), fields(task_count = tasks.len()))]
    pub fn group(&self, tasks: Vec<TaskAssignment>) -> GroupingOutcome {
        let mut remaining = tasks;
        // Stable: ties keep insertion order
        remaining.sort_by_key(|task| task.priority);

        let mut processed: HashSet<String> = HashSet::new();
        let mut groups: Vec<TaskGroup> = Vec::new();
        let mut forced: Vec<String> = Vec::new();

        while !remaining.is_empty() {
            let (mut current, mut blocked): (TaskGroup, Vec<TaskAssignment>) =
                remaining.into_iter().partition(|task| {
                    self.table
                        .dependencies_of(&task.worker_name)
                        .iter()
                        .all(|dependency| processed.contains(dependency))
                });

            if current.is_empty() {
                let task = blocked.remove(0);
                let unmet: Vec<&String> = self
                    .table
                    .dependencies_of(&task.worker_name)
                    .iter()
                    .filter(|dependency| !processed.contains(*dependency))
                    .collect();
                warn!(
                    worker = %task.worker_name,
                    unmet_dependencies = ?unmet,
                    blocked_tasks = blocked.len() + 1,
                    "No task is placeable; forcing progress (check the dependency table)"
                );
                forced.push(task.worker_name.clone());
                current.push(task);
            }

            processed.extend(current.iter().map(|task| task.worker_name.clone()));

            debug!(
                group = groups.len(),
                workers = ?current.iter().map(|t| t.worker_name.as_str()).collect::<Vec<_>>(),
                "Formed group"
            );

            groups.push(current);
            remaining = blocked;
        }

        GroupingOutcome { groups, forced }
    }
}

/// Group `tasks` against `table` and return only the groups
pub fn group_tasks(table: &DependencyTable, tasks: Vec<TaskAssignment>) -> Vec<TaskGroup> {
    DependencyGrouper::new(Arc::new(table.clone()))
        .group(tasks)
        .into_groups()
}
