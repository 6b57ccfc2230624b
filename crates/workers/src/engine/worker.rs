use std::sync::Arc;
use std::time::Duration;

use courier_common::ActivityError;
use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::backoff::PollBackoff;
use super::queue::{ActivityTask, EngineError, Outcome, TaskQueue};
use crate::activity::{ActivityContext, ActivityRegistry};
use crate::metrics::worker_metrics::WorkerMetrics;

/// Polls a task queue and executes activities from the registry, at most
/// `max_concurrent` at a time.
pub struct Worker {
    queue: Arc<dyn TaskQueue>,
    registry: Arc<ActivityRegistry>,
    metrics: Arc<WorkerMetrics>,
    max_concurrent: usize,
    backoff: PollBackoff,
}

impl Worker {
    pub fn new(
        queue: Arc<dyn TaskQueue>,
        registry: Arc<ActivityRegistry>,
        metrics: Arc<WorkerMetrics>,
    ) -> Self {
        Self {
            queue,
            registry,
            metrics,
            max_concurrent: 16,
            backoff: PollBackoff::default(),
        }
    }

    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }

    pub fn with_backoff(mut self, backoff: PollBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Runs until `shutdown` fires or the queue closes. In-flight activities
    /// see the cancellation and are drained before this returns.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), EngineError> {
        let permits = Arc::new(Semaphore::new(self.max_concurrent));
        let mut failures: u32 = 0;

        tracing::info!(
            activities = self.registry.len(),
            max_concurrent = self.max_concurrent,
            "worker polling"
        );

        let result = loop {
            let permit = tokio::select! {
                _ = shutdown.cancelled() => break Ok(()),
                p = Arc::clone(&permits).acquire_owned() => match p {
                    Ok(p) => p,
                    Err(_) => break Err(EngineError::Closed),
                },
            };

            let polled = tokio::select! {
                _ = shutdown.cancelled() => break Ok(()),
                r = self.queue.poll() => r,
            };

            match polled {
                Ok(Some(task)) => {
                    failures = 0;
                    let cancel = shutdown.child_token();
                    let registry = Arc::clone(&self.registry);
                    let queue = Arc::clone(&self.queue);
                    let metrics = Arc::clone(&self.metrics);
                    tokio::spawn(async move {
                        let _permit = permit;
                        execute(task, cancel, &registry, queue.as_ref(), &metrics).await;
                    });
                }
                Ok(None) => failures = 0,
                Err(EngineError::Closed) => break Err(EngineError::Closed),
                Err(e) => {
                    let delay = self.backoff.delay(failures);
                    failures = failures.saturating_add(1);
                    tracing::warn!(error = %e, retry_in_ms = delay.as_millis() as u64, "poll failed");
                    tokio::select! {
                        _ = shutdown.cancelled() => break Ok(()),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        };

        shutdown.cancel();
        let inflight = self.max_concurrent - permits.available_permits();
        if inflight > 0 {
            tracing::info!(inflight, "draining in-flight activities");
        }
        let _ = permits.acquire_many(self.max_concurrent as u32).await;
        tracing::info!("worker stopped");
        result
    }
}

async fn execute(
    task: ActivityTask,
    cancel: CancellationToken,
    registry: &ActivityRegistry,
    queue: &dyn TaskQueue,
    metrics: &WorkerMetrics,
) {
    let span = tracing::info_span!(
        "activity",
        activity = %task.activity_type,
        task_token = %task.task_token,
        attempt = task.attempt,
    );

    async {
        let mut ctx = ActivityContext::new(&task.activity_type, &task.task_token, task.attempt)
            .with_cancel(cancel);
        if let Some(ms) = task.start_to_close_timeout_ms {
            ctx = ctx.with_deadline(Instant::now() + Duration::from_millis(ms));
        }

        metrics.inc_activities_started();
        let start = Instant::now();
        let result = registry.dispatch(ctx, task.input).await;
        metrics.record_activity_latency(start.into_std());
        record(&result, metrics);

        if let Err(e) = queue.complete(&task.task_token, Outcome::from(result)).await {
            tracing::error!(error = %e, "reporting activity outcome failed");
        }
    }
    .instrument(span)
    .await
}

fn record(result: &Result<Value, ActivityError>, metrics: &WorkerMetrics) {
    match result {
        Ok(_) => {
            metrics.inc_activities_succeeded();
            tracing::debug!("activity succeeded");
        }
        Err(e) => {
            metrics.inc_activities_failed(e.retry());
            tracing::warn!(kind = %e.kind, non_retryable = e.non_retryable, error = %e, "activity failed");
        }
    }
}
