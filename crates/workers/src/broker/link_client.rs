use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use courier_common::link_id::{self, LinkIdError};
use courier_common::proto::{GetCredentialsRequest, GetLinkRequest};
use courier_common::ActivityError;
use tokio::time::Instant;

use super::channel::{BrokerEndpoint, SecretChannel};
use crate::activity::ActivityContext;
use crate::metrics::worker_metrics::WorkerMetrics;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

pub type Credentials = HashMap<String, String>;
pub type Template = String;

/// Resolves the secrets of one configured link through the secret broker.
///
/// Nothing is cached: every call validates the link ID, opens its own
/// channel, reads fresh data and releases the channel before returning.
#[derive(Debug, Clone)]
pub struct LinkClient {
    link_id: String,
    provider: &'static str,
    endpoint: BrokerEndpoint,
    timeout: Duration,
    metrics: Arc<WorkerMetrics>,
}

impl LinkClient {
    pub fn new(
        link_id: impl Into<String>,
        provider: &'static str,
        endpoint: BrokerEndpoint,
        metrics: Arc<WorkerMetrics>,
    ) -> Self {
        Self {
            link_id: link_id.into(),
            provider,
            endpoint,
            timeout: DEFAULT_TIMEOUT,
            metrics,
        }
    }

    /// Bound shared by every broker read of a single call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn fetch_credentials(&self, ctx: &ActivityContext) -> Result<Credentials, ActivityError> {
        self.check_link_id()?;
        let deadline = Instant::now() + self.timeout;

        ctx.guard(async {
            let mut channel = self.open(deadline).await?;
            self.get_credentials(&mut channel, deadline).await
        })
        .await
    }

    pub async fn fetch_link_data(
        &self,
        ctx: &ActivityContext,
    ) -> Result<(Template, Credentials), ActivityError> {
        self.check_link_id()?;
        let deadline = Instant::now() + self.timeout;

        ctx.guard(async {
            let mut channel = self.open(deadline).await?;
            let template = self.get_template(&mut channel, deadline).await?;
            let credentials = self.get_credentials(&mut channel, deadline).await?;
            Ok((template, credentials))
        })
        .await
    }

    fn check_link_id(&self) -> Result<(), ActivityError> {
        match link_id::validate(&self.link_id) {
            Ok(()) => Ok(()),
            Err(LinkIdError::NotConfigured) => {
                let msg = format!("secret broker link ID not configured for {}", self.provider);
                tracing::warn!(provider = self.provider, "{msg}");
                Err(ActivityError::non_retryable("LinkNotConfigured", msg))
            }
            Err(LinkIdError::Malformed(reason)) => {
                let msg = format!("invalid secret broker link ID configured for {}", self.provider);
                tracing::warn!(provider = self.provider, link_id = %self.link_id, %reason, "{msg}");
                Err(ActivityError::non_retryable("InvalidLinkID", msg).with_detail(self.link_id.clone()))
            }
        }
    }

    async fn open(&self, deadline: Instant) -> Result<SecretChannel, ActivityError> {
        let opened = within(deadline, SecretChannel::open(&self.endpoint, &self.metrics)).await;
        match opened {
            Some(Ok(channel)) => Ok(channel),
            Some(Err(e)) => {
                tracing::error!(error = %e, broker_addr = %self.endpoint.uri(), "failed to connect to secret broker");
                Err(ActivityError::retryable(
                    "BrokerUnavailable",
                    format!("secret broker connection failed: {e}"),
                ))
            }
            None => {
                tracing::error!(broker_addr = %self.endpoint.uri(), "secret broker connection timed out");
                Err(self.deadline_error("connect"))
            }
        }
    }

    async fn get_template(
        &self,
        channel: &mut SecretChannel,
        deadline: Instant,
    ) -> Result<Template, ActivityError> {
        let mut req = tonic::Request::new(GetLinkRequest {
            link_id: self.link_id.clone(),
        });
        req.set_timeout(deadline.saturating_duration_since(Instant::now()));

        match within(deadline, channel.client().get_link(req)).await {
            Some(Ok(resp)) => Ok(resp.into_inner().template),
            Some(Err(status)) => Err(self.status_error("GetLink", status, deadline)),
            None => Err(self.deadline_error("GetLink")),
        }
    }

    async fn get_credentials(
        &self,
        channel: &mut SecretChannel,
        deadline: Instant,
    ) -> Result<Credentials, ActivityError> {
        let mut req = tonic::Request::new(GetCredentialsRequest {
            link_id: self.link_id.clone(),
        });
        req.set_timeout(deadline.saturating_duration_since(Instant::now()));

        match within(deadline, channel.client().get_credentials(req)).await {
            Some(Ok(resp)) => Ok(resp.into_inner().credentials),
            Some(Err(status)) => Err(self.status_error("GetCredentials", status, deadline)),
            None => Err(self.deadline_error("GetCredentials")),
        }
    }

    /// A status the broker raised because our `grpc-timeout` ran out is a
    /// deadline failure, not a broker failure.
    fn status_error(&self, op: &str, status: tonic::Status, deadline: Instant) -> ActivityError {
        if is_deadline_status(&status, deadline) {
            return self.deadline_error(op);
        }
        tracing::error!(
            code = ?status.code(),
            error = %status.message(),
            link_id = %self.link_id,
            "secret broker {op} error"
        );
        ActivityError::retryable(
            "BrokerError",
            format!("secret broker {op} error: {}", status.message()),
        )
        .with_detail(format!("{:?}", status.code()))
    }

    fn deadline_error(&self, op: &str) -> ActivityError {
        tracing::error!(link_id = %self.link_id, timeout_ms = self.timeout.as_millis() as u64, "secret broker {op} deadline exceeded");
        ActivityError::retryable(
            "BrokerTimeout",
            format!("secret broker {op} exceeded {}ms deadline", self.timeout.as_millis()),
        )
    }
}

fn is_deadline_status(status: &tonic::Status, deadline: Instant) -> bool {
    matches!(status.code(), tonic::Code::DeadlineExceeded | tonic::Code::Cancelled)
        || Instant::now() >= deadline
}

async fn within<F: Future>(deadline: Instant, fut: F) -> Option<F::Output> {
    tokio::time::timeout_at(deadline, fut).await.ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(link_id: &str) -> (LinkClient, Arc<WorkerMetrics>) {
        let metrics = WorkerMetrics::new();
        let c = LinkClient::new(
            link_id,
            "slack",
            BrokerEndpoint::insecure("127.0.0.1:1"),
            metrics.clone(),
        );
        (c, metrics)
    }

    #[tokio::test]
    async fn empty_link_is_not_configured() {
        let (c, metrics) = client("");
        let ctx = ActivityContext::new("slack.chat.postMessage", "t", 1);
        let err = c.fetch_credentials(&ctx).await.unwrap_err();
        assert!(!err.is_retryable());
        assert!(err.message.contains("not configured"));
        assert_eq!(metrics.broker_channels_opened_val(), 0);
    }

    #[tokio::test]
    async fn malformed_link_carries_detail() {
        let (c, metrics) = client("not-a-valid-token!");
        let ctx = ActivityContext::new("slack.chat.postMessage", "t", 1);
        let err = c.fetch_link_data(&ctx).await.unwrap_err();
        assert!(!err.is_retryable());
        assert!(err.message.contains("invalid"));
        assert!(err.message.contains("link ID"));
        assert_eq!(err.details, vec![serde_json::json!("not-a-valid-token!")]);
        assert_eq!(metrics.broker_channels_opened_val(), 0);
    }

    #[tokio::test]
    async fn unreachable_broker_is_retryable() {
        let (c, metrics) = client("abc123validtoken");
        let ctx = ActivityContext::new("slack.chat.postMessage", "t", 1);
        let err = c.fetch_credentials(&ctx).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(metrics.broker_channels_open_val(), 0);
    }

    #[tokio::test]
    async fn expired_deadline_status_maps_to_timeout() {
        let (c, _) = client("abc123validtoken");
        let future = Instant::now() + Duration::from_secs(60);

        let err = c.status_error("GetLink", tonic::Status::deadline_exceeded("Timeout expired"), future);
        assert_eq!(err.kind, "BrokerTimeout");
        assert!(err.is_retryable());

        let err = c.status_error("GetLink", tonic::Status::cancelled("Timeout expired"), future);
        assert_eq!(err.kind, "BrokerTimeout");

        let past = Instant::now() - Duration::from_millis(1);
        let err = c.status_error("GetCredentials", tonic::Status::unavailable("gone"), past);
        assert_eq!(err.kind, "BrokerTimeout");
    }

    #[tokio::test]
    async fn other_status_is_broker_error() {
        let (c, _) = client("abc123validtoken");
        let future = Instant::now() + Duration::from_secs(60);
        let err = c.status_error("GetLink", tonic::Status::not_found("no link"), future);
        assert_eq!(err.kind, "BrokerError");
        assert!(err.is_retryable());
        assert_eq!(err.details, vec![serde_json::json!("NotFound")]);
    }

    #[tokio::test]
    async fn validation_wins_over_cancellation() {
        let (c, _) = client("");
        let ctx = ActivityContext::new("slack.chat.postMessage", "t", 1);
        ctx.cancel_token().cancel();
        let err = c.fetch_credentials(&ctx).await.unwrap_err();
        assert!(!err.is_retryable());
    }
}
