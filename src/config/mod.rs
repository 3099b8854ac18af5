//! # Agent Core Configuration
//!
//! Typed configuration for scheduling, execution and performance analysis,
//! including the static dependency table that drives grouping.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults (see [`crate::constants`])
//! 2. `agent_core.yaml` in the configuration directory
//! 3. `agent_core.<environment>.yaml` overlay
//! 4. `AGENT_CORE__<SECTION>__<FIELD>` environment variables
//!
//! ## Usage
//!
//! ```rust,no_run
//! use agent_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let table = manager.config().dependency_table();
//! let unit_cost = manager.config().scheduling.unit_cost_seconds;
//! # let _ = (table, unit_cost);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::warn;

use crate::constants::{execution, performance, scheduling, workers};
use crate::resilience::RetryPolicy;
use crate::scheduling::DependencyTable;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentCoreConfig {
    pub scheduling: SchedulingConfig,
    pub execution: ExecutionConfig,
    pub performance: PerformanceConfig,
    /// Static dependency table: worker -> workers that must finish first
    pub dependencies: BTreeMap<String, Vec<String>>,
}

impl Default for AgentCoreConfig {
    fn default() -> Self {
        Self {
            scheduling: SchedulingConfig::default(),
            execution: ExecutionConfig::default(),
            performance: PerformanceConfig::default(),
            dependencies: default_dependencies(),
        }
    }
}

/// Time-reduction estimation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    pub unit_cost_seconds: u64,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            unit_cost_seconds: scheduling::DEFAULT_UNIT_COST_SECONDS,
        }
    }
}

/// Per-worker execution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub timeout_ms: u64,
    pub retry: RetryConfig,
    pub tracking_step_name: String,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: execution::DEFAULT_TIMEOUT_MS,
            retry: RetryConfig::default(),
            tracking_step_name: execution::FULL_EXECUTION_STEP.to_string(),
        }
    }
}

impl ExecutionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Retry configuration for worker execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first call
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: execution::DEFAULT_MAX_ATTEMPTS,
            initial_delay_ms: execution::DEFAULT_INITIAL_DELAY_MS,
            backoff_multiplier: execution::DEFAULT_BACKOFF_MULTIPLIER,
            max_delay_ms: execution::DEFAULT_MAX_DELAY_MS,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        RetryPolicy {
            max_attempts: config.max_attempts,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            backoff_multiplier: config.backoff_multiplier,
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

/// Thresholds used when building performance reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub slow_average_threshold_ms: u64,
    pub failure_rate_threshold: f64,
    pub variability_ratio_threshold: f64,
    pub variability_min_executions: usize,
    pub bottleneck_fraction: f64,
    pub retention_limit: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            slow_average_threshold_ms: performance::SLOW_AVERAGE_THRESHOLD_MS,
            failure_rate_threshold: performance::FAILURE_RATE_THRESHOLD,
            variability_ratio_threshold: performance::VARIABILITY_RATIO_THRESHOLD,
            variability_min_executions: performance::VARIABILITY_MIN_EXECUTIONS,
            bottleneck_fraction: performance::BOTTLENECK_FRACTION,
            retention_limit: performance::DEFAULT_RETENTION_LIMIT,
        }
    }
}

/// The dependency table shipped with the newsroom deployment
pub fn default_dependencies() -> BTreeMap<String, Vec<String>> {
    let entries: [(&str, &[&str]); 10] = [
        (workers::ARCHITECTURE, &[]),
        (workers::SECURITY, &[]),
        (workers::DOCUMENTATION, &[]),
        (workers::INVENTORY, &[]),
        (workers::CMS, &[]),
        (workers::PRODUCTION_CONTROL, &[]),
        (workers::ROUTE, &[]),
        (workers::FRONTEND, &[workers::ARCHITECTURE]),
        (workers::SEO, &[workers::FRONTEND]),
        (workers::QUALITY, &[workers::FRONTEND, workers::ARCHITECTURE]),
    ];

    entries
        .iter()
        .map(|(worker, deps)| {
            (
                (*worker).to_string(),
                deps.iter().map(|d| (*d).to_string()).collect(),
            )
        })
        .collect()
}

impl AgentCoreConfig {
    /// Validate value ranges. Dependency cycles are reported but not rejected;
    /// the grouper's forced-progress fallback handles them at run time.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scheduling.unit_cost_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "scheduling.unit_cost_seconds",
                0,
                "must be greater than zero",
            ));
        }

        if self.execution.timeout_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "execution.timeout_ms",
                0,
                "must be greater than zero",
            ));
        }

        let retry = &self.execution.retry;
        if retry.max_attempts == 0 {
            return Err(ConfigurationError::invalid_value(
                "execution.retry.max_attempts",
                0,
                "at least one attempt is required",
            ));
        }
        if !(retry.backoff_multiplier >= 1.0) {
            return Err(ConfigurationError::invalid_value(
                "execution.retry.backoff_multiplier",
                retry.backoff_multiplier,
                "must be >= 1.0",
            ));
        }

        let perf = &self.performance;
        for (field, value) in [
            ("performance.failure_rate_threshold", perf.failure_rate_threshold),
            ("performance.bottleneck_fraction", perf.bottleneck_fraction),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigurationError::invalid_value(
                    field,
                    value,
                    "must be in (0, 1]",
                ));
            }
        }
        if !(perf.variability_ratio_threshold > 1.0) {
            return Err(ConfigurationError::invalid_value(
                "performance.variability_ratio_threshold",
                perf.variability_ratio_threshold,
                "must be greater than 1.0",
            ));
        }

        for (worker, deps) in &self.dependencies {
            if deps.iter().any(|d| d == worker) {
                return Err(ConfigurationError::InvalidDependency {
                    worker: worker.clone(),
                    reason: "a worker cannot depend on itself".to_string(),
                });
            }
        }

        if let Some(cycle) = self.dependency_table().find_cycle() {
            warn!(
                cycle = ?cycle,
                "Dependency table contains a cycle; grouping will fall back to forced placement"
            );
        }

        Ok(())
    }

    /// Build the read-only dependency table for the grouper
    pub fn dependency_table(&self) -> DependencyTable {
        DependencyTable::from_map(self.dependencies.clone())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from(&self.execution.retry)
    }
}
