use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::metrics::worker_metrics::WorkerMetrics;

#[derive(Debug, Clone)]
pub struct ApiState {
    metrics: Arc<WorkerMetrics>,
    ready: Arc<AtomicBool>,
}

impl ApiState {
    pub fn new(metrics: Arc<WorkerMetrics>) -> Self {
        Self {
            metrics,
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn metrics(&self) -> &Arc<WorkerMetrics> {
        &self.metrics
    }

    /// Set once the worker is polling its task queue.
    pub fn set_ready(&self, v: bool) {
        self.ready.store(v, Ordering::Relaxed);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }
}
