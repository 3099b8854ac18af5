//! # Tracing Module
//!
//! Environment-aware console logging using the tracing ecosystem.
//!
//! - Console-only output (stdout), TTY-aware ANSI colors
//! - Level from `LOG_LEVEL`, then `RUST_LOG`, then the environment default
//! - `LOG_FORMAT=json` switches to one JSON object per line
//! - Domain macros for group and agent operations
//!
//! Initialisation is idempotent and never panics when a global subscriber is
//! already installed (test harnesses, host applications).

use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::constants::env;

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console tracing for the current process
pub fn init_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let json = use_json_format();
        let use_ansi = std::io::stdout().is_terminal();

        let registry = tracing_subscriber::registry().with(EnvFilter::new(&log_level));

        let result = if json {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_level(true),
                )
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_level(true)
                        .with_ansi(use_ansi),
                )
                .try_init()
        };

        if result.is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else {
            tracing::info!(
                environment = %environment,
                log_level = %log_level,
                json_format = json,
                ansi_colors = use_ansi,
                "Console logging initialized"
            );
        }
    });
}

/// Get current environment from environment variables
pub(crate) fn get_environment() -> String {
    std::env::var(env::ENVIRONMENT)
        .or_else(|_| std::env::var(env::FALLBACK_ENVIRONMENT))
        .unwrap_or_else(|_| "development".to_string())
        .to_lowercase()
}

/// Get log level based on environment variables or environment defaults
fn get_log_level(environment: &str) -> String {
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        return level.to_lowercase();
    }

    if let Ok(level) = std::env::var("RUST_LOG") {
        return level.to_lowercase();
    }

    default_level_for(environment).to_string()
}

fn default_level_for(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

fn use_json_format() -> bool {
    std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Log group-level scheduling and execution operations
#[macro_export]
macro_rules! log_group {
    // Full form with group index
    ($level:ident, $operation:expr, group: $group:expr, $($key:ident: $value:expr),* $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            group = $group,
            $($key = ?$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "GROUP_{} (group: {})", $operation, $group
        );
    };
    // Simple form - just operation
    ($level:ident, $operation:expr $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "GROUP_{}", $operation
        );
    };
    // Generic form with additional fields
    ($level:ident, $operation:expr, $($key:ident: $value:expr),+ $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            $($key = ?$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "GROUP_{}", $operation
        );
    };
}

/// Log a single agent's lifecycle operations
#[macro_export]
macro_rules! log_agent {
    ($level:ident, $operation:expr, agent: $agent:expr, $($key:ident: $value:expr),* $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            agent = %$agent,
            $($key = ?$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "AGENT_{} ({})", $operation, $agent
        );
    };
    ($level:ident, $operation:expr, agent: $agent:expr $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            agent = %$agent,
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "AGENT_{} ({})", $operation, $agent
        );
    };
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %chrono::Utc::now().to_rfc3339(),
        "ERROR"
    );
}
