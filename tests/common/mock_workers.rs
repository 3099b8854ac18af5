use agent_core::orchestration::{AgentOutcome, AgentWorker};
use agent_core::scheduling::TaskAssignment;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Scripted behaviour for a mock worker
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Pass,
    PassWithWarnings(Vec<String>),
    Fail(Vec<String>),
    /// Return `Err` for the first `n` calls, then pass
    ErrorTimes(u32),
    AlwaysError(String),
    Sleep(Duration),
    Panic,
}

/// Worker that follows a [`MockBehavior`] and records call order
#[derive(Debug)]
pub struct MockWorker {
    name: String,
    behavior: MockBehavior,
    calls: AtomicU32,
    journal: Option<Arc<Mutex<Vec<String>>>>,
}

impl MockWorker {
    pub fn new(name: impl Into<String>, behavior: MockBehavior) -> Self {
        Self {
            name: name.into(),
            behavior,
            calls: AtomicU32::new(0),
            journal: None,
        }
    }

    /// Append `name` to `journal` whenever the worker finishes a call
    pub fn with_journal(mut self, journal: Arc<Mutex<Vec<String>>>) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AgentWorker for MockWorker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, task: &TaskAssignment) -> anyhow::Result<AgentOutcome> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        let result = match &self.behavior {
            MockBehavior::Pass => Ok(AgentOutcome::passed()
                .with_details(serde_json::json!({ "subtask": task.subtask }))),
            MockBehavior::PassWithWarnings(warnings) => Ok(warnings
                .iter()
                .fold(AgentOutcome::passed(), |outcome, w| outcome.with_warning(w.clone()))),
            MockBehavior::Fail(issues) => Ok(AgentOutcome::failed(issues.clone())),
            MockBehavior::ErrorTimes(n) if call < *n => {
                Err(anyhow::anyhow!("transient failure {}", call + 1))
            }
            MockBehavior::ErrorTimes(_) => Ok(AgentOutcome::passed()),
            MockBehavior::AlwaysError(message) => Err(anyhow::anyhow!(message.clone())),
            MockBehavior::Sleep(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(AgentOutcome::passed())
            }
            MockBehavior::Panic => panic!("{} exploded", self.name),
        };

        if let Some(journal) = &self.journal {
            journal.lock().push(self.name.clone());
        }
        result
    }
}
