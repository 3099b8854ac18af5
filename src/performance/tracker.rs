//! # Performance Tracker
//!
//! Thread-safe store of timed samples. Timers are opened with
//! [`PerformanceTracker::start_sample`] and closed with
//! [`PerformanceTracker::end_sample`]; concurrent agents in one group may do
//! this simultaneously. Summaries and reports are computed on demand from a
//! snapshot of the stored samples.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

use super::report::{generate_recommendations, identify_bottlenecks};
use super::{AgentPerformanceSummary, PerformanceReport, PerformanceSample, TrackingKey};
use crate::config::PerformanceConfig;
use crate::error::Result;

#[derive(Debug)]
struct OpenTimer {
    started_at: DateTime<Utc>,
    started: Instant,
}

/// Point-in-time counters for the tracker contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerStats {
    pub total_samples: usize,
    pub total_agents: usize,
    pub total_tasks: usize,
    pub average_duration_ms: f64,
}

#[derive(Debug)]
pub struct PerformanceTracker {
    samples: Mutex<Vec<PerformanceSample>>,
    open_timers: Mutex<HashMap<TrackingKey, OpenTimer>>,
    sequence: AtomicU64,
    config: PerformanceConfig,
}

impl Default for PerformanceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::with_config(PerformanceConfig::default())
    }

    pub fn with_config(config: PerformanceConfig) -> Self {
        Self {
            samples: Mutex::new(Vec::new()),
            open_timers: Mutex::new(HashMap::new()),
            sequence: AtomicU64::new(0),
            config,
        }
    }

    pub fn config(&self) -> &PerformanceConfig {
        &self.config
    }

    /// Open a timer for (agent, task, step) and return its key
    pub fn start_sample(&self, agent_name: &str, task_id: &str, step_name: &str) -> TrackingKey {
        let key = TrackingKey {
            agent_name: agent_name.to_string(),
            task_id: task_id.to_string(),
            step_name: step_name.to_string(),
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
        };

        self.open_timers.lock().insert(
            key.clone(),
            OpenTimer {
                started_at: Utc::now(),
                started: Instant::now(),
            },
        );

        debug!(key = %key, "Started performance sample");
        key
    }

    /// Close the timer for `key` and store the sample.
    ///
    /// An unknown (or already closed) key is logged and ignored.
    pub fn end_sample(&self, key: &TrackingKey, success: bool, error: Option<String>) {
        let Some(timer) = self.open_timers.lock().remove(key) else {
            warn!(key = %key, "No open performance sample for key; ignoring");
            return;
        };

        let duration_ms = timer.started.elapsed().as_millis() as u64;
        let sample = PerformanceSample {
            agent_name: key.agent_name.clone(),
            task_id: key.task_id.clone(),
            step_name: key.step_name.clone(),
            start_time: timer.started_at,
            end_time: Utc::now(),
            duration_ms,
            success,
            error,
        };

        debug!(key = %key, duration_ms, success, "Completed performance sample");
        self.samples.lock().push(sample);
    }

    /// Store an externally measured sample
    pub fn record(&self, sample: PerformanceSample) {
        self.samples.lock().push(sample);
    }

    /// Aggregate statistics for `agent_name` over every stored sample
    pub fn summary_for(&self, agent_name: &str) -> AgentPerformanceSummary {
        let samples = self.samples.lock();
        AgentPerformanceSummary::from_samples(agent_name, samples.iter())
    }

    pub fn samples_for_agent(&self, agent_name: &str) -> Vec<PerformanceSample> {
        self.samples
            .lock()
            .iter()
            .filter(|s| s.agent_name == agent_name)
            .cloned()
            .collect()
    }

    pub fn samples_for_task(&self, task_id: &str) -> Vec<PerformanceSample> {
        self.samples
            .lock()
            .iter()
            .filter(|s| s.task_id == task_id)
            .cloned()
            .collect()
    }

    /// Build the report for `task_id`.
    ///
    /// Agent summaries cover each agent's full history, not only this task.
    pub fn build_report(&self, task_id: &str) -> PerformanceReport {
        let snapshot = self.samples.lock().clone();

        let mut total_duration_ms = 0u64;
        let mut seen = HashSet::new();
        let mut agents = Vec::new();
        for sample in snapshot.iter().filter(|s| s.task_id == task_id) {
            total_duration_ms += sample.duration_ms;
            if seen.insert(sample.agent_name.as_str()) {
                agents.push(sample.agent_name.as_str());
            }
        }

        let agent_metrics: Vec<AgentPerformanceSummary> = agents
            .iter()
            .map(|agent| AgentPerformanceSummary::from_samples(agent, snapshot.iter()))
            .collect();

        let bottlenecks = identify_bottlenecks(&agent_metrics, self.config.bottleneck_fraction);
        let recommendations = generate_recommendations(&agent_metrics, &bottlenecks, &self.config);

        PerformanceReport {
            task_id: task_id.to_string(),
            total_duration_ms,
            agent_metrics,
            bottlenecks,
            recommendations,
        }
    }

    /// Keep only the most recent `keep_last` samples; open timers are untouched
    pub fn retain(&self, keep_last: usize) {
        let mut samples = self.samples.lock();
        if samples.len() > keep_last {
            let excess = samples.len() - keep_last;
            samples.drain(..excess);
            debug!(dropped = excess, kept = keep_last, "Trimmed performance samples");
        }
    }

    /// Apply the configured retention limit
    pub fn enforce_retention(&self) {
        self.retain(self.config.retention_limit);
    }

    /// Every stored sample as pretty-printed JSON, in insertion order
    pub fn export_all(&self) -> Result<String> {
        let samples = self.samples.lock();
        Ok(serde_json::to_string_pretty(&*samples)?)
    }

    pub fn stats(&self) -> TrackerStats {
        let samples = self.samples.lock();
        let agents: HashSet<&str> = samples.iter().map(|s| s.agent_name.as_str()).collect();
        let tasks: HashSet<&str> = samples.iter().map(|s| s.task_id.as_str()).collect();
        let average_duration_ms = if samples.is_empty() {
            0.0
        } else {
            samples.iter().map(|s| s.duration_ms).sum::<u64>() as f64 / samples.len() as f64
        };

        TrackerStats {
            total_samples: samples.len(),
            total_agents: agents.len(),
            total_tasks: tasks.len(),
            average_duration_ms,
        }
    }

    pub fn open_timer_count(&self) -> usize {
        self.open_timers.lock().len()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.lock().len()
    }
}
