//! # Agent Workers
//!
//! The seam between the orchestrator and product-specific workers. Workers
//! are registered by name; the orchestrator looks them up per assignment.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

use super::AgentOutcome;
use crate::scheduling::TaskAssignment;

/// A product-specific worker that validates one area of a deployment.
///
/// Returning `Err` signals an execution problem and is retried; returning
/// `Ok` with `success: false` is a validation verdict and is not.
#[async_trait]
pub trait AgentWorker: Send + Sync {
    fn name(&self) -> &str;

    async fn execute(&self, task: &TaskAssignment) -> anyhow::Result<AgentOutcome>;
}

/// Concurrent name -> worker map
#[derive(Default)]
pub struct WorkerRegistry {
    workers: DashMap<String, Arc<dyn AgentWorker>>,
}

impl std::fmt::Debug for WorkerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerRegistry")
            .field("workers", &self.names())
            .finish()
    }
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the worker's own name, replacing any previous entry
    pub fn register(&self, worker: Arc<dyn AgentWorker>) {
        let name = worker.name().to_string();
        self.register_as(name, worker);
    }

    pub fn register_as(&self, name: impl Into<String>, worker: Arc<dyn AgentWorker>) {
        let name = name.into();
        debug!(worker = %name, "Registered agent worker");
        self.workers.insert(name, worker);
    }

    pub fn unregister(&self, name: &str) -> Option<Arc<dyn AgentWorker>> {
        self.workers.remove(name).map(|(_, worker)| worker)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AgentWorker>> {
        self.workers.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.workers.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.workers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoWorker(&'static str);

    #[async_trait]
    impl AgentWorker for EchoWorker {
        fn name(&self) -> &str {
            self.0
        }

        async fn execute(&self, task: &TaskAssignment) -> anyhow::Result<AgentOutcome> {
            Ok(AgentOutcome::passed().with_details(serde_json::json!({ "subtask": task.subtask })))
        }
    }

    #[tokio::test]
    async fn test_register_and_execute() {
        let registry = WorkerRegistry::new();
        registry.register(Arc::new(EchoWorker("cms-agent")));

        let worker = registry.get("cms-agent").unwrap();
        let outcome = worker
            .execute(&TaskAssignment::new("cms-agent", "check drafts", 1))
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.details["subtask"], "check drafts");
    }

    #[test]
    fn test_registry_bookkeeping() {
        let registry = WorkerRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(EchoWorker("seo-agent")));
        registry.register_as("alias-agent", Arc::new(EchoWorker("seo-agent")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["alias-agent", "seo-agent"]);
        assert!(registry.unregister("alias-agent").is_some());
        assert!(!registry.contains("alias-agent"));
        assert!(registry.get("missing").is_none());
    }
}
