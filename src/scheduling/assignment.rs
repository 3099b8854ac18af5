//! Task assignments: one unit of work bound to one named worker.

use serde::{Deserialize, Serialize};

/// A scheduled unit of work for a specific worker in a specific run.
///
/// `declared_dependencies` is informational only; grouping resolves
/// dependencies through the [`DependencyTable`](super::DependencyTable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAssignment {
    pub worker_name: String,
    pub subtask: String,
    /// Lower values sort first among otherwise-unordered tasks
    pub priority: i32,
    #[serde(default)]
    pub declared_dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl TaskAssignment {
    pub fn new(worker_name: impl Into<String>, subtask: impl Into<String>, priority: i32) -> Self {
        Self {
            worker_name: worker_name.into(),
            subtask: subtask.into(),
            priority,
            declared_dependencies: Vec::new(),
            confidence: None,
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declared_dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}
