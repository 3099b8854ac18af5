//! Error types for the agent core.
//!
//! Grouping, sampling and reporting degrade gracefully and never surface
//! errors. Only configuration loading, serialisation and worker execution
//! produce `Err` values.

use crate::config::ConfigurationError;
use crate::resilience::RetryError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgentCoreError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Worker error: {worker}: {reason}")]
    WorkerError { worker: String, reason: String },
    #[error("Timeout error: {0}")]
    Timeout(String),
    #[error("Retries exhausted: {0}")]
    RetriesExhausted(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AgentCoreError {
    pub fn worker<W: Into<String>, R: std::fmt::Display>(worker: W, reason: R) -> Self {
        Self::WorkerError {
            worker: worker.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for AgentCoreError {
    fn from(error: serde_json::Error) -> Self {
        AgentCoreError::SerializationError(format!("JSON serialization error: {error}"))
    }
}

impl From<ConfigurationError> for AgentCoreError {
    fn from(error: ConfigurationError) -> Self {
        AgentCoreError::ConfigurationError(error.to_string())
    }
}

impl From<RetryError> for AgentCoreError {
    fn from(error: RetryError) -> Self {
        match error {
            RetryError::Timeout { .. } => AgentCoreError::Timeout(error.to_string()),
            RetryError::Exhausted { .. } => AgentCoreError::RetriesExhausted(error.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentCoreError>;
