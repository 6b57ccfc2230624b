use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex, Notify};

use super::queue::{ActivityTask, EngineError, Outcome, TaskQueue};

/// Task queue living in the worker's own process. Used by tests and by
/// local runs without an engine.
#[derive(Clone)]
pub struct InMemoryTaskQueue {
    tx: mpsc::UnboundedSender<ActivityTask>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<ActivityTask>>>,
    completions: Arc<Mutex<Vec<(String, Outcome)>>>,
    completed: Arc<Notify>,
    poll_timeout: Duration,
}

impl Default for InMemoryTaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
            completions: Arc::new(Mutex::new(Vec::new())),
            completed: Arc::new(Notify::new()),
            poll_timeout: Duration::from_millis(100),
        }
    }

    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }

    pub fn push(&self, task: ActivityTask) {
        if let Err(e) = self.tx.send(task) {
            tracing::warn!(task_token = %e.0.task_token, "in-memory task queue closed, task dropped");
        }
    }

    pub async fn completions(&self) -> Vec<(String, Outcome)> {
        self.completions.lock().await.clone()
    }

    /// Waits until at least `n` tasks were completed.
    pub async fn wait_for_completions(&self, n: usize) -> Vec<(String, Outcome)> {
        loop {
            let notified = self.completed.notified();
            {
                let done = self.completions.lock().await;
                if done.len() >= n {
                    return done.clone();
                }
            }
            notified.await;
        }
    }
}

#[tonic::async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn poll(&self) -> Result<Option<ActivityTask>, EngineError> {
        let mut rx = self.rx.lock().await;
        match tokio::time::timeout(self.poll_timeout, rx.recv()).await {
            Ok(Some(task)) => Ok(Some(task)),
            Ok(None) => Err(EngineError::Closed),
            Err(_) => Ok(None),
        }
    }

    async fn complete(&self, task_token: &str, outcome: Outcome) -> Result<(), EngineError> {
        self.completions
            .lock()
            .await
            .push((task_token.to_string(), outcome));
        self.completed.notify_waiters();
        Ok(())
    }
}
