//! # Scheduling
//!
//! Dependency-aware grouping of task assignments and the time-reduction
//! estimate derived from it.
//!
//! - [`DependencyTable`] - read-only worker -> dependencies configuration
//! - [`DependencyGrouper`] - layered topological grouping with forced-progress fallback
//! - [`TimeReductionEstimator`] - sequential vs. grouped cost estimate

pub mod assignment;
pub mod dependency_table;
pub mod estimator;
pub mod grouper;

pub use assignment::TaskAssignment;
pub use dependency_table::DependencyTable;
pub use estimator::{TimeReductionEstimate, TimeReductionEstimator};
pub use grouper::{group_tasks, DependencyGrouper, GroupingOutcome, TaskGroup};
