//! # Performance Tracking
//!
//! Timing samples per (agent, task, step), per-agent statistics with
//! percentiles, and per-task reports with bottlenecks and recommendations.

pub mod report;
pub mod sample;
pub mod summary;
pub mod tracker;

pub use report::PerformanceReport;
pub use sample::{PerformanceSample, TrackingKey};
pub use summary::{percentile, AgentPerformanceSummary};
pub use tracker::{PerformanceTracker, TrackerStats};
