//! Performance samples and the keys used to track them while open.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle returned by `start_sample`, used to finish the same sample later.
/// `sequence` keeps keys unique for identical (agent, task, step) triples.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackingKey {
    pub agent_name: String,
    pub task_id: String,
    pub step_name: String,
    pub sequence: u64,
}

impl fmt::Display for TrackingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}#{}",
            self.agent_name, self.task_id, self.step_name, self.sequence
        )
    }
}

/// One finished, timed execution of (agent, task, step)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub agent_name: String,
    pub task_id: String,
    pub step_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: u64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PerformanceSample {
    /// Build a sample for an externally timed operation ending now
    pub fn completed(
        agent_name: impl Into<String>,
        task_id: impl Into<String>,
        step_name: impl Into<String>,
        duration_ms: u64,
        success: bool,
    ) -> Self {
        let end_time = Utc::now();
        let start_time = end_time - chrono::Duration::milliseconds(duration_ms as i64);
        Self {
            agent_name: agent_name.into(),
            task_id: task_id.into(),
            step_name: step_name.into(),
            start_time,
            end_time,
            duration_ms,
            success,
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_key_display_keeps_fields_separate() {
        let key = TrackingKey {
            agent_name: "cms-agent".to_string(),
            task_id: "task-1".to_string(),
            step_name: "full-execution".to_string(),
            sequence: 7,
        };
        assert_eq!(key.to_string(), "cms-agent/task-1/full-execution#7");
    }

    #[test]
    fn test_completed_sample_spans_duration() {
        let sample = PerformanceSample::completed("seo-agent", "t", "s", 1500, false)
            .with_error("sitemap missing");
        assert_eq!(sample.duration_ms, 1500);
        assert_eq!(
            (sample.end_time - sample.start_time).num_milliseconds(),
            1500
        );
        assert_eq!(sample.error.as_deref(), Some("sitemap missing"));
    }
}
