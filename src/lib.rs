#![allow(clippy::doc_markdown)] // Allow technical terms in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Agent Core
//!
//! Scheduling and performance core for a multi-agent deployment validator.
//!
//! ## Overview
//!
//! A run is a list of task assignments, each naming the worker (agent) that
//! executes it. A static dependency table says which workers must finish
//! before others may start. The core:
//!
//! - partitions assignments into dependency-ordered groups whose members can
//!   run concurrently,
//! - estimates the wall-clock saving of grouped over sequential execution,
//! - times every execution and turns the samples into per-agent statistics,
//!   bottlenecks and recommendations,
//! - drives a run group by group and returns a GO / NO-GO verdict.
//!
//! ## Module Organization
//!
//! - [`scheduling`] - dependency table, grouper and time-reduction estimator
//! - [`performance`] - sample store, summaries and reports
//! - [`orchestration`] - worker seam and the group-by-group driver
//! - [`resilience`] - timeout and retry with exponential backoff
//! - [`config`] - layered YAML + environment configuration
//! - [`logging`] - tracing initialisation and domain log macros
//! - [`error`] - structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use agent_core::scheduling::{DependencyGrouper, DependencyTable, TaskAssignment, TimeReductionEstimator};
//! use std::sync::Arc;
//!
//! let grouper = DependencyGrouper::new(Arc::new(DependencyTable::default()));
//! let tasks = vec![
//!     TaskAssignment::new("security-agent", "audit headers", 1),
//!     TaskAssignment::new("documentation-agent", "check changelog", 2),
//!     TaskAssignment::new("cms-agent", "verify drafts", 3),
//! ];
//!
//! let estimate = TimeReductionEstimator::new(grouper).estimate(&tasks);
//! assert_eq!(estimate.reduction_percent, 67);
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod orchestration;
pub mod performance;
pub mod resilience;
pub mod scheduling;

pub use config::{AgentCoreConfig, ConfigManager};
pub use error::{AgentCoreError, Result};
pub use logging::init_tracing;
pub use orchestration::{
    AgentOutcome, AgentReport, AgentStatus, AgentWorker, ExecutionResult, Orchestrator, Verdict,
    WorkerRegistry,
};
pub use performance::{
    AgentPerformanceSummary, PerformanceReport, PerformanceSample, PerformanceTracker,
    TrackingKey,
};
pub use scheduling::{
    group_tasks, DependencyGrouper, DependencyTable, GroupingOutcome, TaskAssignment, TaskGroup,
    TimeReductionEstimate, TimeReductionEstimator,
};
