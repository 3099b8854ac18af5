//! # Orchestrator
//!
//! Drives one run: group the assignments, then execute the groups in order.
//! Members of a group run concurrently in a [`JoinSet`] and are all
//! joined before the next group starts. Dropping a run aborts the members
//! still in flight. The first group with a failing
//! member is the last group executed.
//!
//! Every assignment is bounded by the configured timeout, retried with
//! exponential backoff on execution errors, and timed in the shared
//! [`PerformanceTracker`] under the run's task id.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::{Id, JoinSet};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    AgentOutcome, AgentReport, AgentStatus, AgentWorker, ExecutionResult, Verdict,
    WorkerRegistry,
};
use crate::config::{AgentCoreConfig, ExecutionConfig};
use crate::error::AgentCoreError;
use crate::performance::{PerformanceTracker, TrackingKey};
use crate::resilience::{execute_with_timeout_and_retry, RetryError, RetryPolicy};
use crate::scheduling::{
    DependencyGrouper, TaskAssignment, TaskGroup, TimeReductionEstimator,
};

pub struct Orchestrator {
    grouper: DependencyGrouper,
    estimator: TimeReductionEstimator,
    registry: Arc<WorkerRegistry>,
    tracker: Arc<PerformanceTracker>,
    execution: ExecutionConfig,
    retry_policy: RetryPolicy,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registry", &self.registry)
            .field("execution", &self.execution)
            .finish()
    }
}

impl Orchestrator {
    /// Orchestrator over the default configuration
    pub fn new(registry: Arc<WorkerRegistry>) -> Self {
        Self::from_config(&AgentCoreConfig::default(), registry)
    }

    pub fn from_config(config: &AgentCoreConfig, registry: Arc<WorkerRegistry>) -> Self {
        let grouper = DependencyGrouper::new(Arc::new(config.dependency_table()));
        let estimator =
            TimeReductionEstimator::with_unit_cost(grouper.clone(), config.scheduling.unit_cost_seconds);

        Self {
            grouper,
            estimator,
            registry,
            tracker: Arc::new(PerformanceTracker::with_config(config.performance.clone())),
            execution: config.execution.clone(),
            retry_policy: config.retry_policy(),
        }
    }

    /// Share an existing tracker, e.g. across several orchestrators
    pub fn with_tracker(mut self, tracker: Arc<PerformanceTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn tracker(&self) -> &Arc<PerformanceTracker> {
        &self.tracker
    }

    pub fn registry(&self) -> &Arc<WorkerRegistry> {
        &self.registry
    }

    pub fn grouper(&self) -> &DependencyGrouper {
        &self.grouper
    }

    pub fn estimator(&self) -> &TimeReductionEstimator {
        &self.estimator
    }

    /// Execute `tasks` group by group and return the verdict
    #[instrument(skip(self, tasks), fields(task_count = tasks.len()))]
    pub async fn run(&self, tasks: Vec<TaskAssignment>) -> ExecutionResult {
        let task_id = Uuid::new_v4().to_string();
        let outcome = self.grouper.group(tasks);
        let estimate = self
            .estimator
            .estimate_from_counts(outcome.task_count(), outcome.group_count());
        let grouping_fallback = outcome.fallback_triggered();
        let total_groups = outcome.group_count();

        crate::log_group!(
            info,
            "RUN_PLANNED",
            task_id: task_id,
            groups: total_groups,
            sequential_cost: estimate.sequential_cost,
            parallel_cost: estimate.parallel_cost,
            reduction_percent: estimate.reduction_percent,
        );

        let mut reports = Vec::new();
        let mut blockers = Vec::new();
        let mut groups_executed = 0;

        for (index, group) in outcome.into_groups().into_iter().enumerate() {
            crate::log_group!(info, "STARTED", group: index, size: group.len());

            let group_reports = self.execute_group(&task_id, group).await;
            groups_executed += 1;

            let group_blockers: Vec<String> = group_reports
                .iter()
                .filter(|report| report.status.is_failure())
                .flat_map(|report| report.blockers.iter().cloned())
                .collect();
            let failed = group_reports.iter().any(|r| r.status.is_failure());
            reports.extend(group_reports);

            if failed {
                crate::log_group!(warn, "HALTED", group: index, blockers: group_blockers);
                blockers = group_blockers;
                break;
            }

            crate::log_group!(info, "COMPLETED", group: index);
        }

        let success = blockers.is_empty() && reports.iter().all(|r| !r.status.is_failure());
        let verdict = if success { Verdict::Go } else { Verdict::NoGo };
        let performance = self.tracker.build_report(&task_id);
        self.tracker.enforce_retention();

        info!(
            task_id = %task_id,
            verdict = %verdict,
            groups_executed,
            total_groups,
            blockers = blockers.len(),
            "Run finished"
        );

        ExecutionResult {
            task_id,
            success,
            verdict,
            reports,
            blockers,
            groups_executed,
            total_groups,
            grouping_fallback,
            estimate,
            performance,
        }
    }

    /// Run every member of `group` concurrently and join them all.
    /// Reports come back in the group's (priority) order.
    async fn execute_group(&self, task_id: &str, group: TaskGroup) -> Vec<AgentReport> {
        let mut running = JoinSet::new();
        let mut pending: HashMap<Id, (usize, TaskAssignment, Instant)> =
            HashMap::with_capacity(group.len());

        for (index, task) in group.into_iter().enumerate() {
            let key = self.tracker.start_sample(
                &task.worker_name,
                task_id,
                &self.execution.tracking_step_name,
            );
            let started = Instant::now();
            let handle = running.spawn(execute_task(
                self.registry.get(&task.worker_name),
                task.clone(),
                Arc::clone(&self.tracker),
                key,
                self.execution.timeout(),
                self.retry_policy.clone(),
            ));
            pending.insert(handle.id(), (index, task, started));
        }

        let mut reports = Vec::with_capacity(pending.len());
        while let Some(joined) = running.join_next_with_id().await {
            match joined {
                Ok((id, report)) => {
                    if let Some((index, ..)) = pending.remove(&id) {
                        reports.push((index, report));
                    }
                }
                Err(join_error) => {
                    let Some((index, task, started)) = pending.remove(&join_error.id())
                    else {
                        continue;
                    };
                    let reason = if join_error.is_panic() {
                        "worker panicked".to_string()
                    } else {
                        join_error.to_string()
                    };
                    crate::logging::log_error(
                        "orchestrator",
                        "execute_task",
                        &reason,
                        Some(&task.worker_name),
                    );
                    let report =
                        critical_report(&task, &reason, started.elapsed().as_millis() as u64);
                    reports.push((index, report));
                }
            }
        }

        reports.sort_by_key(|(index, _)| *index);
        reports.into_iter().map(|(_, report)| report).collect()
    }
}

/// Execute one assignment and close its performance sample
async fn execute_task(
    worker: Option<Arc<dyn AgentWorker>>,
    task: TaskAssignment,
    tracker: Arc<PerformanceTracker>,
    key: TrackingKey,
    timeout: std::time::Duration,
    policy: RetryPolicy,
) -> AgentReport {
    let started = Instant::now();
    let sample = OpenSample::new(tracker, key);
    crate::log_agent!(info, "STARTED", agent: task.worker_name, subtask: task.subtask);

    let result: Result<AgentOutcome, RetryError> = match worker {
        Some(worker) => {
            execute_with_timeout_and_retry(
                || {
                    let worker = Arc::clone(&worker);
                    let task = task.clone();
                    async move {
                        worker
                            .execute(&task)
                            .await
                            .map_err(|e| AgentCoreError::worker(&task.worker_name, format!("{e:#}")))
                    }
                },
                timeout,
                &policy,
                &task.worker_name,
            )
            .await
        }
        None => {
            warn!(agent = %task.worker_name, "No worker registered; treating as passed");
            Ok(AgentOutcome::passed()
                .with_warning(format!("{} is not implemented yet", task.worker_name)))
        }
    };

    let duration_ms = started.elapsed().as_millis() as u64;
    let report = match result {
        Ok(outcome) => outcome_report(&task, outcome, duration_ms),
        Err(error) => critical_report(&task, &AgentCoreError::from(error).to_string(), duration_ms),
    };

    let error = report
        .status
        .is_failure()
        .then(|| report.blockers.join("; "));
    sample.finish(!report.status.is_failure(), error);

    crate::log_agent!(
        info,
        "FINISHED",
        agent: task.worker_name,
        status: report.status,
        duration_ms: duration_ms,
    );
    report
}

/// Performance sample that is closed exactly once. Dropped unfinished
/// (panic or abort) it is recorded as a failure.
struct OpenSample {
    tracker: Arc<PerformanceTracker>,
    key: Option<TrackingKey>,
}

impl OpenSample {
    fn new(tracker: Arc<PerformanceTracker>, key: TrackingKey) -> Self {
        Self {
            tracker,
            key: Some(key),
        }
    }

    fn finish(mut self, success: bool, error: Option<String>) {
        if let Some(key) = self.key.take() {
            self.tracker.end_sample(&key, success, error);
        }
    }
}

impl Drop for OpenSample {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            let reason = if std::thread::panicking() {
                "worker panicked"
            } else {
                "cancelled before completion"
            };
            self.tracker.end_sample(&key, false, Some(reason.to_string()));
        }
    }
}

fn outcome_report(task: &TaskAssignment, outcome: AgentOutcome, duration_ms: u64) -> AgentReport {
    let (status, summary, blockers) = if !outcome.success {
        let blockers = if outcome.issues.is_empty() {
            vec![format!("{}: reported failure without issues", task.worker_name)]
        } else {
            outcome.issues.clone()
        };
        let summary = format!("{} failed with {} issue(s)", task.subtask, blockers.len());
        (AgentStatus::Error, summary, blockers)
    } else if !outcome.warnings.is_empty() {
        let summary = format!(
            "{} passed with {} warning(s)",
            task.subtask,
            outcome.warnings.len()
        );
        (AgentStatus::Warning, summary, Vec::new())
    } else {
        (AgentStatus::Success, format!("{} passed", task.subtask), Vec::new())
    };

    AgentReport {
        agent_name: task.worker_name.clone(),
        step_number: task.priority,
        status,
        summary,
        details: outcome.details,
        warnings: outcome.warnings,
        blockers,
        duration_ms,
    }
}

fn critical_report(task: &TaskAssignment, reason: &str, duration_ms: u64) -> AgentReport {
    AgentReport {
        agent_name: task.worker_name.clone(),
        step_number: task.priority,
        status: AgentStatus::Error,
        summary: format!("{} could not be executed", task.subtask),
        details: serde_json::Value::Null,
        warnings: Vec::new(),
        blockers: vec![format!(
            "Critical execution error in {}: {}",
            task.worker_name, reason
        )],
        duration_ms,
    }
}
