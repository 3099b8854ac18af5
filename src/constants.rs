//! # System Constants
//!
//! Default values and well-known names that define the operational
//! boundaries of the agent core. Every value here can be overridden through
//! [`crate::config::AgentCoreConfig`]; these are only the defaults.

/// Well-known worker names from the newsroom deployment
pub mod workers {
    pub const ARCHITECTURE: &str = "architecture-agent";
    pub const FRONTEND: &str = "frontend-agent";
    pub const SECURITY: &str = "security-agent";
    pub const QUALITY: &str = "quality-agent";
    pub const DOCUMENTATION: &str = "documentation-agent";
    pub const INVENTORY: &str = "inventory-agent";
    pub const CMS: &str = "cms-agent";
    pub const SEO: &str = "seo-agent";
    pub const PRODUCTION_CONTROL: &str = "production-control-agent";
    pub const ROUTE: &str = "route-agent";
}

/// Scheduling defaults
pub mod scheduling {
    /// Cost of one task (sequential) or one group (parallel), in seconds
    pub const DEFAULT_UNIT_COST_SECONDS: u64 = 10;
}

/// Execution defaults applied around every worker call
pub mod execution {
    pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
    pub const DEFAULT_INITIAL_DELAY_MS: u64 = 2_000;
    pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;
    pub const DEFAULT_MAX_DELAY_MS: u64 = 30_000;

    /// Step name recorded for a whole worker invocation
    pub const FULL_EXECUTION_STEP: &str = "full-execution";
}

/// Performance analysis thresholds
pub mod performance {
    /// Bottleneck workers slower than this on average get a recommendation
    pub const SLOW_AVERAGE_THRESHOLD_MS: u64 = 10_000;
    pub const FAILURE_RATE_THRESHOLD: f64 = 0.1;
    pub const VARIABILITY_RATIO_THRESHOLD: f64 = 5.0;
    pub const VARIABILITY_MIN_EXECUTIONS: usize = 5;
    /// Share of distinct workers reported as bottlenecks (rounded up)
    pub const BOTTLENECK_FRACTION: f64 = 0.3;
    pub const DEFAULT_RETENTION_LIMIT: usize = 1_000;

    pub const WITHIN_EXPECTED_PARAMETERS: &str = "Performance is within expected parameters.";
}

/// Environment variable names
pub mod env {
    pub const ENVIRONMENT: &str = "AGENT_CORE_ENV";
    pub const FALLBACK_ENVIRONMENT: &str = "APP_ENV";
    pub const CONFIG_PREFIX: &str = "AGENT_CORE";
    pub const CONFIG_DIR: &str = "AGENT_CORE_CONFIG_DIR";
}
