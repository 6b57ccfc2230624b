use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use courier_common::Retry;

#[derive(Debug, Default)]
pub struct WorkerMetrics {
    activities_started: AtomicU64,
    activities_succeeded: AtomicU64,
    activities_failed_retryable: AtomicU64,
    activities_failed_non_retryable: AtomicU64,
    broker_channels_opened: AtomicU64,
    broker_channels_open: AtomicI64,
    activity_latency_sum_us: AtomicU64,
    activity_latency_count: AtomicU64,
}

impl WorkerMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_activities_started(&self) {
        self.activities_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_activities_succeeded(&self) {
        self.activities_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_activities_failed(&self, retry: Retry) {
        let counter = match retry {
            Retry::Retryable => &self.activities_failed_retryable,
            Retry::NonRetryable => &self.activities_failed_non_retryable,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn channel_opened(&self) {
        self.broker_channels_opened.fetch_add(1, Ordering::Relaxed);
        self.broker_channels_open.fetch_add(1, Ordering::SeqCst);
    }

    pub fn channel_released(&self) {
        self.broker_channels_open.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn record_activity_latency(&self, start: Instant) {
        let us = start.elapsed().as_micros() as u64;
        self.activity_latency_sum_us.fetch_add(us, Ordering::Relaxed);
        self.activity_latency_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn activities_started_val(&self) -> u64 {
        self.activities_started.load(Ordering::Relaxed)
    }

    pub fn activities_succeeded_val(&self) -> u64 {
        self.activities_succeeded.load(Ordering::Relaxed)
    }

    pub fn activities_failed_retryable_val(&self) -> u64 {
        self.activities_failed_retryable.load(Ordering::Relaxed)
    }

    pub fn activities_failed_non_retryable_val(&self) -> u64 {
        self.activities_failed_non_retryable.load(Ordering::Relaxed)
    }

    pub fn broker_channels_opened_val(&self) -> u64 {
        self.broker_channels_opened.load(Ordering::Relaxed)
    }

    pub fn broker_channels_open_val(&self) -> i64 {
        self.broker_channels_open.load(Ordering::SeqCst)
    }

    pub fn activity_latency_vals(&self) -> (u64, u64) {
        (
            self.activity_latency_sum_us.load(Ordering::Relaxed),
            self.activity_latency_count.load(Ordering::Relaxed),
        )
    }
}
