use std::future::Future;

use courier_common::ActivityError;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Per-invocation handle passed into every blocking step of an activity.
///
/// It fires when the worker shuts down, when the engine cancels the task, or
/// when the engine-assigned deadline passes.
#[derive(Debug, Clone)]
pub struct ActivityContext {
    name: String,
    task_token: String,
    attempt: u32,
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl ActivityContext {
    pub fn new(name: impl Into<String>, task_token: impl Into<String>, attempt: u32) -> Self {
        Self {
            name: name.into(),
            task_token: task_token.into(),
            attempt,
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves once the invocation is cancelled or its deadline passes.
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.cancel.cancelled().await,
        }
    }

    /// Runs `fut` until it completes or the invocation is cancelled.
    ///
    /// Cancellation drops `fut`, so anything it owns (e.g. a broker channel)
    /// is released before this returns. The cancellation error is retryable.
    pub async fn guard<T, F>(&self, fut: F) -> Result<T, ActivityError>
    where
        F: Future<Output = Result<T, ActivityError>>,
    {
        tokio::select! {
            biased;
            _ = self.done() => {
                tracing::warn!(
                    activity = %self.name,
                    task_token = %self.task_token,
                    attempt = self.attempt,
                    "activity cancelled"
                );
                Err(ActivityError::retryable(
                    "CanceledError",
                    format!("activity {} cancelled or timed out", self.name),
                ))
            }
            r = fut => r,
        }
    }
}
