use std::sync::Arc;
use super::worker_metrics::WorkerMetrics;

pub fn render_prometheus(m: &Arc<WorkerMetrics>) -> String {
    let mut out = String::with_capacity(1024);

    write_counter(&mut out, "courier_worker_activities_started_total", m.activities_started_val());
    write_counter(&mut out, "courier_worker_activities_succeeded_total", m.activities_succeeded_val());
    write_counter(
        &mut out,
        "courier_worker_activities_failed_retryable_total",
        m.activities_failed_retryable_val(),
    );
    write_counter(
        &mut out,
        "courier_worker_activities_failed_non_retryable_total",
        m.activities_failed_non_retryable_val(),
    );
    write_counter(&mut out, "courier_worker_broker_channels_opened_total", m.broker_channels_opened_val());
    write_gauge(&mut out, "courier_worker_broker_channels_open", m.broker_channels_open_val());

    let (sum, count) = m.activity_latency_vals();
    write_summary(&mut out, "courier_worker_activity_latency_us", sum, count);

    out
}

fn write_counter(out: &mut String, name: &str, val: u64) {
    use std::fmt::Write;
    let _ = writeln!(out, "# TYPE {name} counter");
    let _ = writeln!(out, "{name} {val}");
}

fn write_gauge(out: &mut String, name: &str, val: i64) {
    use std::fmt::Write;
    let _ = writeln!(out, "# TYPE {name} gauge");
    let _ = writeln!(out, "{name} {val}");
}

fn write_summary(out: &mut String, name: &str, sum: u64, count: u64) {
    use std::fmt::Write;
    let _ = writeln!(out, "# TYPE {name} summary");
    let _ = writeln!(out, "{name}_sum {sum}");
    let _ = writeln!(out, "{name}_count {count}");
}
