mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use courier_workers::activity::ActivityRegistry;
use courier_workers::config::EngineConfig;
use courier_workers::engine::{
    ActivityTask, HttpTaskQueue, InMemoryTaskQueue, Outcome, TaskQueue, Worker,
};
use courier_workers::metrics::worker_metrics::WorkerMetrics;
use courier_workers::slack::{self, SlackApi};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use common::{slack_link, FakeBroker, FakeSlack};

const LINK_ID: &str = "abc123validtoken";

fn task(token: &str, activity: &str, input: Value) -> ActivityTask {
    ActivityTask {
        task_token: token.into(),
        activity_type: activity.into(),
        input,
        attempt: 1,
        start_to_close_timeout_ms: Some(5_000),
    }
}

#[tokio::test]
async fn worker_runs_slack_activities_end_to_end() {
    let broker = FakeBroker::start(slack_link(LINK_ID, "slack-oauth", "xoxb-1")).await;
    let slack_api = FakeSlack::start(HashMap::from([
        ("chat.postMessage".to_string(), json!({"ok": true, "channel": "C1", "ts": "1.1"})),
        ("reactions.add".to_string(), json!({"ok": false, "error": "already_reacted"})),
    ]))
    .await;

    let metrics = WorkerMetrics::new();
    let api = SlackApi::new(broker.client(LINK_ID, &metrics)).with_base_url(slack_api.base_url());
    let mut registry = ActivityRegistry::new();
    slack::register(&mut registry, Arc::new(api)).unwrap();

    let queue = Arc::new(InMemoryTaskQueue::new().with_poll_timeout(Duration::from_millis(20)));
    queue.push(task("t-post", "slack.chat.postMessage", json!({"channel": "C1", "text": "hi"})));
    queue.push(task(
        "t-react",
        "slack.reactions.add",
        json!({"channel": "C1", "name": "eyes", "timestamp": "1.1"}),
    ));
    queue.push(task("t-bad", "slack.chat.postMessage", json!({"text": "no channel"})));

    let worker = Worker::new(queue.clone(), Arc::new(registry), metrics.clone()).with_max_concurrent(2);
    let shutdown = CancellationToken::new();
    let run = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { worker.run(shutdown).await }
    });

    let done: HashMap<String, Outcome> = queue.wait_for_completions(3).await.into_iter().collect();
    shutdown.cancel();
    run.await.unwrap().unwrap();

    assert_eq!(
        done["t-post"],
        Outcome::Result(json!({"ok": true, "channel": "C1", "ts": "1.1"}))
    );
    match &done["t-react"] {
        Outcome::Failure(e) => {
            assert!(e.non_retryable);
            assert_eq!(e.message, "already_reacted");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    match &done["t-bad"] {
        Outcome::Failure(e) => assert!(e.non_retryable),
        other => panic!("expected failure, got {other:?}"),
    }

    assert_eq!(slack_api.calls().len(), 2);
    assert_eq!(metrics.activities_started_val(), 3);
    assert_eq!(metrics.activities_succeeded_val(), 1);
    assert_eq!(metrics.activities_failed_non_retryable_val(), 2);
    assert_eq!(metrics.broker_channels_open_val(), 0);
}

#[derive(Clone, Default)]
struct EngineState {
    tasks: Arc<Mutex<Vec<Value>>>,
    completions: Arc<Mutex<Vec<Value>>>,
}

async fn poll(State(state): State<EngineState>, Json(req): Json<Value>) -> axum::response::Response {
    assert!(req["identity"].as_str().unwrap().starts_with("courier-worker-"));
    match state.tasks.lock().unwrap().pop() {
        Some(task) => Json(task).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn complete(State(state): State<EngineState>, Json(req): Json<Value>) -> StatusCode {
    state.completions.lock().unwrap().push(req);
    StatusCode::OK
}

#[tokio::test]
async fn http_queue_polls_and_completes() {
    let state = EngineState::default();
    state.tasks.lock().unwrap().push(json!({
        "task_token": "tok-1",
        "activity_type": "slack.chat.postMessage",
        "input": {"channel": "C1"},
        "attempt": 2
    }));

    let app = Router::new()
        .route("/api/v1/namespaces/default/task-queues/courier/poll", post(poll))
        .route("/api/v1/namespaces/default/activities/complete", post(complete))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let cfg = EngineConfig {
        address: format!("http://{addr}"),
        namespace: "default".into(),
        task_queue: "courier".into(),
        poll_timeout_ms: 1_000,
        ..Default::default()
    };
    let queue = HttpTaskQueue::new(&cfg, vec!["slack.chat.postMessage"]);

    let polled = queue.poll().await.unwrap().unwrap();
    assert_eq!(polled.task_token, "tok-1");
    assert_eq!(polled.attempt, 2);
    assert!(queue.poll().await.unwrap().is_none());

    queue
        .complete("tok-1", Outcome::Result(json!({"ok": true})))
        .await
        .unwrap();
    let completions = state.completions.lock().unwrap().clone();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0]["task_token"], "tok-1");
    assert_eq!(completions[0]["result"], json!({"ok": true}));
}

#[tokio::test]
async fn http_queue_reports_rejections() {
    let app = Router::new().route(
        "/api/v1/namespaces/default/task-queues/courier/poll",
        post(|| async { (StatusCode::FORBIDDEN, "namespace denied") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let cfg = EngineConfig {
        address: format!("http://{addr}"),
        ..Default::default()
    };
    let queue = HttpTaskQueue::new(&cfg, vec![]);
    let err = queue.poll().await.unwrap_err();
    assert!(err.to_string().contains("namespace denied"));
}
