//! # Time-Reduction Estimator
//!
//! Estimates wall-clock savings from running grouped tasks concurrently.
//! Sequential cost is one unit per task; parallel cost is one unit per group,
//! since all members of a group share the same wall-clock slot.
//!
//! The unit cost is a fixed configured constant, not derived from measured
//! durations.

use serde::{Deserialize, Serialize};

use super::{DependencyGrouper, TaskAssignment};
use crate::constants::scheduling::DEFAULT_UNIT_COST_SECONDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeReductionEstimate {
    pub task_count: usize,
    pub group_count: usize,
    /// Seconds when every task runs one after another
    pub sequential_cost: u64,
    /// Seconds when each group's members run together
    pub parallel_cost: u64,
    /// Rounded percentage in `0..=100`
    pub reduction_percent: u32,
}

#[derive(Debug, Clone)]
pub struct TimeReductionEstimator {
    grouper: DependencyGrouper,
    unit_cost_seconds: u64,
}

impl TimeReductionEstimator {
    pub fn new(grouper: DependencyGrouper) -> Self {
        Self::with_unit_cost(grouper, DEFAULT_UNIT_COST_SECONDS)
    }

    pub fn with_unit_cost(grouper: DependencyGrouper, unit_cost_seconds: u64) -> Self {
        Self {
            grouper,
            unit_cost_seconds,
        }
    }

    pub fn unit_cost_seconds(&self) -> u64 {
        self.unit_cost_seconds
    }

    /// Group `tasks` and estimate the reduction
    pub fn estimate(&self, tasks: &[TaskAssignment]) -> TimeReductionEstimate {
        let group_count = self.grouper.group(tasks.to_vec()).group_count();
        self.estimate_from_counts(tasks.len(), group_count)
    }

    /// Estimate from already-known counts, avoiding a second grouping pass
    pub fn estimate_from_counts(&self, task_count: usize, group_count: usize) -> TimeReductionEstimate {
        let sequential_cost = task_count as u64 * self.unit_cost_seconds;
        let parallel_cost = group_count as u64 * self.unit_cost_seconds;

        let reduction_percent = if sequential_cost == 0 || task_count <= 1 {
            0
        } else {
            let saved = sequential_cost.saturating_sub(parallel_cost) as f64;
            ((100.0 * saved / sequential_cost as f64).round() as u32).min(100)
        };

        TimeReductionEstimate {
            task_count,
            group_count,
            sequential_cost,
            parallel_cost,
            reduction_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::workers;
    use crate::scheduling::DependencyTable;
    use std::sync::Arc;

    fn estimator() -> TimeReductionEstimator {
        TimeReductionEstimator::new(DependencyGrouper::new(Arc::new(DependencyTable::default())))
    }

    fn task(worker: &str, priority: i32) -> TaskAssignment {
        TaskAssignment::new(worker, "test", priority)
    }

    #[test]
    fn test_independent_tasks_reduce_time() {
        let estimate = estimator().estimate(&[
            task(workers::SECURITY, 1),
            task(workers::DOCUMENTATION, 2),
            task(workers::CMS, 3),
        ]);

        assert_eq!(estimate.group_count, 1);
        assert_eq!(estimate.sequential_cost, 30);
        assert_eq!(estimate.parallel_cost, 10);
        assert_eq!(estimate.reduction_percent, 67);
        assert!(estimate.sequential_cost > estimate.parallel_cost);
    }

    #[test]
    fn test_single_task_has_no_reduction() {
        let estimate = estimator().estimate(&[task(workers::SECURITY, 1)]);
        assert_eq!(estimate.sequential_cost, estimate.parallel_cost);
        assert_eq!(estimate.reduction_percent, 0);
    }

    #[test]
    fn test_empty_input() {
        let estimate = estimator().estimate(&[]);
        assert_eq!(estimate.sequential_cost, 0);
        assert_eq!(estimate.parallel_cost, 0);
        assert_eq!(estimate.reduction_percent, 0);
    }

    #[test]
    fn test_fully_sequential_chain_has_no_reduction() {
        let estimate = estimator().estimate(&[
            task(workers::ARCHITECTURE, 1),
            task(workers::FRONTEND, 2),
            task(workers::SEO, 3),
        ]);
        assert_eq!(estimate.group_count, 3);
        assert_eq!(estimate.reduction_percent, 0);
    }

    #[test]
    fn test_custom_unit_cost() {
        let grouper = DependencyGrouper::new(Arc::new(DependencyTable::default()));
        let estimate = TimeReductionEstimator::with_unit_cost(grouper, 4)
            .estimate(&[task(workers::SECURITY, 1), task(workers::CMS, 1)]);
        assert_eq!(estimate.sequential_cost, 8);
        assert_eq!(estimate.parallel_cost, 4);
        assert_eq!(estimate.reduction_percent, 50);
    }
}
