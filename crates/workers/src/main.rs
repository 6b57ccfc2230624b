use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use courier_workers::activity::ActivityRegistry;
use courier_workers::api::{self, ApiState};
use courier_workers::broker::{BrokerEndpoint, LinkClient};
use courier_workers::cli::Args;
use courier_workers::engine::{HttpTaskQueue, Worker};
use courier_workers::metrics::worker_metrics::WorkerMetrics;
use courier_workers::slack::{self, SlackApi};
use courier_workers::{logging, shutdown};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cfg = args.load_config().context("loading configuration")?;
    logging::init(cfg.dev);

    let metrics = WorkerMetrics::new();

    let endpoint = BrokerEndpoint::from_config(&cfg.secret_broker, cfg.dev)
        .context("configuring secret broker transport")?;

    let slack_link = LinkClient::new(cfg.links.slack.clone(), slack::PROVIDER, endpoint, metrics.clone())
        .with_timeout(Duration::from_millis(cfg.secret_broker.timeout_ms));

    let mut registry = ActivityRegistry::new();
    slack::register(&mut registry, Arc::new(SlackApi::new(slack_link)))?;
    let registry = Arc::new(registry);
    tracing::info!(activities = ?registry.names(), "activities registered");

    let state = ApiState::new(metrics.clone());
    let listener = TcpListener::bind(&cfg.api.addr)
        .await
        .with_context(|| format!("binding API listener on {}", cfg.api.addr))?;
    tracing::info!(addr = %cfg.api.addr, "worker API server starting");
    let api_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = api::serve(listener, api_state).await {
            tracing::error!(error = %e, "API server stopped");
        }
    });

    tracing::info!(
        engine = %cfg.engine.address,
        namespace = %cfg.engine.namespace,
        task_queue = %cfg.engine.task_queue,
        "connecting to engine"
    );
    let queue = Arc::new(HttpTaskQueue::new(&cfg.engine, registry.names()));
    tracing::info!(identity = %queue.identity(), "worker identity");
    let worker = Worker::new(queue, registry, metrics)
        .with_max_concurrent(cfg.engine.max_concurrent_activities);

    let stop = CancellationToken::new();
    tokio::spawn({
        let stop = stop.clone();
        async move {
            shutdown::wait_for_shutdown().await;
            tracing::info!("shutdown signal received");
            stop.cancel();
        }
    });

    state.set_ready(true);
    let result = worker.run(stop).await;
    state.set_ready(false);
    result?;

    Ok(())
}
