//! # Orchestration
//!
//! Runs a list of task assignments through registered [`AgentWorker`]s in
//! dependency order and produces a GO / NO-GO verdict with a performance
//! report for the run.
//!
//! ```rust
//! use agent_core::orchestration::{Orchestrator, Verdict, WorkerRegistry};
//! use agent_core::scheduling::TaskAssignment;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let orchestrator = Orchestrator::new(Arc::new(WorkerRegistry::new()));
//! let result = orchestrator
//!     .run(vec![TaskAssignment::new("security-agent", "audit headers", 1)])
//!     .await;
//! assert_eq!(result.verdict, Verdict::Go);
//! # });
//! ```

pub mod orchestrator;
pub mod types;
pub mod worker;

pub use orchestrator::Orchestrator;
pub use types::{AgentOutcome, AgentReport, AgentStatus, ExecutionResult, Verdict};
pub use worker::{AgentWorker, WorkerRegistry};
