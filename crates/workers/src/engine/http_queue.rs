use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;

use super::queue::{ActivityTask, EngineError, Outcome, TaskQueue};
use crate::config::EngineConfig;

/// Extra time on top of the long-poll window before the HTTP call gives up.
const POLL_SLACK: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct PollRequest<'a> {
    identity: &'a str,
    activity_types: &'a [&'static str],
}

#[derive(Serialize)]
struct CompleteRequest<'a> {
    identity: &'a str,
    task_token: &'a str,
    #[serde(flatten)]
    outcome: &'a Outcome,
}

/// Long-polls the engine's HTTP task-queue API.
pub struct HttpTaskQueue {
    client: Client,
    poll_url: String,
    complete_url: String,
    identity: String,
    activity_types: Vec<&'static str>,
    poll_timeout: Duration,
}

impl HttpTaskQueue {
    pub fn new(cfg: &EngineConfig, activity_types: Vec<&'static str>) -> Self {
        let base = cfg.address.trim_end_matches('/');
        Self {
            client: Client::new(),
            poll_url: format!(
                "{base}/api/v1/namespaces/{}/task-queues/{}/poll",
                cfg.namespace, cfg.task_queue
            ),
            complete_url: format!("{base}/api/v1/namespaces/{}/activities/complete", cfg.namespace),
            identity: format!("courier-worker-{}", std::process::id()),
            activity_types,
            poll_timeout: Duration::from_millis(cfg.poll_timeout_ms),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }
}

fn transport(e: reqwest::Error) -> EngineError {
    EngineError::Transport(e.to_string())
}

async fn rejected(resp: reqwest::Response) -> EngineError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    EngineError::Rejected(format!("{status}: {body}"))
}

#[tonic::async_trait]
impl TaskQueue for HttpTaskQueue {
    async fn poll(&self) -> Result<Option<ActivityTask>, EngineError> {
        let resp = self
            .client
            .post(&self.poll_url)
            .timeout(self.poll_timeout + POLL_SLACK)
            .json(&PollRequest {
                identity: &self.identity,
                activity_types: &self.activity_types,
            })
            .send()
            .await
            .map_err(transport)?;

        match resp.status() {
            StatusCode::NO_CONTENT => Ok(None),
            s if s.is_success() => resp.json().await.map(Some).map_err(transport),
            _ => Err(rejected(resp).await),
        }
    }

    async fn complete(&self, task_token: &str, outcome: Outcome) -> Result<(), EngineError> {
        let resp = self
            .client
            .post(&self.complete_url)
            .json(&CompleteRequest {
                identity: &self.identity,
                task_token,
                outcome: &outcome,
            })
            .send()
            .await
            .map_err(transport)?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(rejected(resp).await)
        }
    }
}
