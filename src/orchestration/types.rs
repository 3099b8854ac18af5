//! Result types produced by workers and by the orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::performance::PerformanceReport;
use crate::scheduling::TimeReductionEstimate;

/// What a worker reports back for one assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutcome {
    /// Whether the worker considers the assignment passed
    pub success: bool,

    /// Free-form worker output
    #[serde(default)]
    pub details: serde_json::Value,

    /// Non-blocking findings
    #[serde(default)]
    pub warnings: Vec<String>,

    /// Blocking findings; become run blockers when `success` is false
    #[serde(default)]
    pub issues: Vec<String>,
}

impl AgentOutcome {
    pub fn passed() -> Self {
        Self {
            success: true,
            details: serde_json::Value::Null,
            warnings: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn failed<I, S>(issues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            success: false,
            issues: issues.into_iter().map(Into::into).collect(),
            ..Self::passed()
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Success,
    Warning,
    Error,
}

impl AgentStatus {
    pub fn is_failure(self) -> bool {
        matches!(self, AgentStatus::Error)
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentStatus::Success => write!(f, "success"),
            AgentStatus::Warning => write!(f, "warning"),
            AgentStatus::Error => write!(f, "error"),
        }
    }
}

/// Per-assignment report in the run result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReport {
    pub agent_name: String,

    /// The assignment's priority
    pub step_number: i32,

    pub status: AgentStatus,

    pub summary: String,

    pub details: serde_json::Value,

    pub warnings: Vec<String>,

    pub blockers: Vec<String>,

    /// Wall-clock time including retries
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "NO-GO")]
    NoGo,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Go => write!(f, "GO"),
            Verdict::NoGo => write!(f, "NO-GO"),
        }
    }
}

/// Outcome of one orchestrated run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Run identifier; also the task id of every performance sample recorded
    pub task_id: String,

    pub success: bool,

    pub verdict: Verdict,

    /// Reports for every executed assignment, in group then priority order
    pub reports: Vec<AgentReport>,

    /// Blockers from the halting group, empty on success
    pub blockers: Vec<String>,

    pub groups_executed: usize,

    pub total_groups: usize,

    /// True when the grouper had to force progress
    pub grouping_fallback: bool,

    pub estimate: TimeReductionEstimate,

    pub performance: PerformanceReport,
}

impl ExecutionResult {
    pub fn report_for(&self, agent_name: &str) -> Option<&AgentReport> {
        self.reports.iter().find(|r| r.agent_name == agent_name)
    }

    pub fn halted(&self) -> bool {
        self.groups_executed < self.total_groups
    }
}
