//! Per-agent aggregate statistics, derived on demand from samples.

use serde::{Deserialize, Serialize};

use super::PerformanceSample;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPerformanceSummary {
    pub agent_name: String,
    pub total_executions: usize,
    pub successful_executions: usize,
    pub failed_executions: usize,
    pub average_duration_ms: f64,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
    pub p50_duration_ms: u64,
    pub p95_duration_ms: u64,
    pub p99_duration_ms: u64,
}

impl AgentPerformanceSummary {
    /// All-zero summary for an agent with no samples
    pub fn empty(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            total_executions: 0,
            successful_executions: 0,
            failed_executions: 0,
            average_duration_ms: 0.0,
            min_duration_ms: 0,
            max_duration_ms: 0,
            p50_duration_ms: 0,
            p95_duration_ms: 0,
            p99_duration_ms: 0,
        }
    }

    /// Summarize the samples that belong to `agent_name`
    pub fn from_samples<'a, I>(agent_name: &str, samples: I) -> Self
    where
        I: IntoIterator<Item = &'a PerformanceSample>,
    {
        let mut durations = Vec::new();
        let mut successful_executions = 0;

        for sample in samples.into_iter().filter(|s| s.agent_name == agent_name) {
            durations.push(sample.duration_ms);
            if sample.success {
                successful_executions += 1;
            }
        }

        if durations.is_empty() {
            return Self::empty(agent_name);
        }

        durations.sort_unstable();
        let total_executions = durations.len();
        let total: u64 = durations.iter().sum();

        Self {
            agent_name: agent_name.to_string(),
            total_executions,
            successful_executions,
            failed_executions: total_executions - successful_executions,
            average_duration_ms: total as f64 / total_executions as f64,
            min_duration_ms: durations[0],
            max_duration_ms: durations[total_executions - 1],
            p50_duration_ms: percentile(&durations, 50.0),
            p95_duration_ms: percentile(&durations, 95.0),
            p99_duration_ms: percentile(&durations, 99.0),
        }
    }

    /// Failed share of executions; 0.0 when there are none
    pub fn failure_rate(&self) -> f64 {
        if self.total_executions == 0 {
            0.0
        } else {
            self.failed_executions as f64 / self.total_executions as f64
        }
    }
}

/// Nearest-rank percentile over ascending `sorted`: the element at
/// `max(0, ceil(p/100 * n) - 1)`. Returns 0 for an empty slice.
pub fn percentile(sorted: &[u64], p: f64) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    let index = rank.saturating_sub(1).min(sorted.len() - 1);
    sorted[index]
}
