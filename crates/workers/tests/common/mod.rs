#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response as HttpResponse};
use axum::routing::any;
use axum::{Json, Router};
use courier_common::proto::thrippy_service_server::{ThrippyService, ThrippyServiceServer};
use courier_common::proto::{
    GetCredentialsRequest, GetCredentialsResponse, GetLinkRequest, GetLinkResponse,
};
use serde_json::{json, Value};
use tonic::transport::Server;
use tonic::{Request, Response, Status};

use courier_workers::broker::{BrokerEndpoint, LinkClient};
use courier_workers::metrics::worker_metrics::WorkerMetrics;

#[derive(Clone, Default)]
pub struct LinkRecord {
    pub template: String,
    pub credentials: HashMap<String, String>,
}

#[derive(Clone)]
struct FakeThrippy {
    links: Arc<HashMap<String, LinkRecord>>,
    delay: Duration,
    hits: Arc<AtomicUsize>,
}

impl FakeThrippy {
    async fn lookup(&self, link_id: &str) -> Result<LinkRecord, Status> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.links
            .get(link_id)
            .cloned()
            .ok_or_else(|| Status::not_found(format!("link {link_id} not found")))
    }
}

#[tonic::async_trait]
impl ThrippyService for FakeThrippy {
    async fn get_link(
        &self,
        request: Request<GetLinkRequest>,
    ) -> Result<Response<GetLinkResponse>, Status> {
        let link = self.lookup(&request.into_inner().link_id).await?;
        Ok(Response::new(GetLinkResponse {
            template: link.template,
        }))
    }

    async fn get_credentials(
        &self,
        request: Request<GetCredentialsRequest>,
    ) -> Result<Response<GetCredentialsResponse>, Status> {
        let link = self.lookup(&request.into_inner().link_id).await?;
        Ok(Response::new(GetCredentialsResponse {
            credentials: link.credentials,
        }))
    }
}

/// In-process secret broker on a random local port.
pub struct FakeBroker {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    shutdown: Arc<AtomicBool>,
}

impl FakeBroker {
    pub async fn start(links: HashMap<String, LinkRecord>) -> Self {
        Self::start_with_delay(links, Duration::ZERO).await
    }

    pub async fn start_with_delay(links: HashMap<String, LinkRecord>, delay: Duration) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let shutdown = Arc::new(AtomicBool::new(false));
        let svc = FakeThrippy {
            links: Arc::new(links),
            delay,
            hits: hits.clone(),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown_flag = shutdown.clone();
        tokio::spawn(async move {
            let incoming = tokio_stream::wrappers::TcpListenerStream::new(listener);
            Server::builder()
                .add_service(ThrippyServiceServer::new(svc))
                .serve_with_incoming_shutdown(incoming, async move {
                    while !shutdown_flag.load(Ordering::Relaxed) {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                    }
                })
                .await
                .unwrap();
        });

        tokio::time::sleep(Duration::from_millis(100)).await;

        Self {
            addr,
            hits,
            shutdown,
        }
    }

    pub fn endpoint(&self) -> BrokerEndpoint {
        BrokerEndpoint::insecure(&self.addr.to_string())
    }

    pub fn client(&self, link_id: &str, metrics: &Arc<WorkerMetrics>) -> LinkClient {
        LinkClient::new(link_id, "slack", self.endpoint(), metrics.clone())
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for FakeBroker {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

pub fn slack_link(link_id: &str, template: &str, token: &str) -> HashMap<String, LinkRecord> {
    let mut credentials = HashMap::new();
    credentials.insert("bot_token".to_string(), token.to_string());
    HashMap::from([(
        link_id.to_string(),
        LinkRecord {
            template: template.to_string(),
            credentials,
        },
    )])
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub authorization: Option<String>,
    pub query: Option<String>,
    pub body: String,
}

/// How the fake Slack API answers one method.
#[derive(Debug, Clone)]
pub enum SlackReply {
    Json(Value),
    Status(StatusCode),
    Raw(&'static str),
    Slow(Duration, Value),
}

#[derive(Clone)]
struct SlackState {
    responses: Arc<HashMap<String, SlackReply>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// In-process stand-in for the Slack Web API. Unknown methods answer
/// `ok: false, error: unknown_method`.
pub struct FakeSlack {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeSlack {
    pub async fn start(responses: HashMap<String, Value>) -> Self {
        Self::start_with(
            responses
                .into_iter()
                .map(|(method, body)| (method, SlackReply::Json(body)))
                .collect(),
        )
        .await
    }

    pub async fn start_with(responses: HashMap<String, SlackReply>) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = SlackState {
            responses: Arc::new(responses),
            calls: calls.clone(),
        };
        let app = Router::new()
            .route("/api/:method", any(handle))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, calls }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/", self.addr)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn handle(
    State(state): State<SlackState>,
    Path(method): Path<String>,
    uri: axum::http::Uri,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResponse {
    state.calls.lock().unwrap().push(RecordedCall {
        method: method.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        query: uri.query().map(String::from),
        body: String::from_utf8_lossy(&body).into_owned(),
    });
    let reply = state
        .responses
        .get(&method)
        .cloned()
        .unwrap_or_else(|| SlackReply::Json(json!({"ok": false, "error": "unknown_method"})));
    match reply {
        SlackReply::Json(body) => Json(body).into_response(),
        SlackReply::Status(status) => (status, "upstream failure").into_response(),
        SlackReply::Raw(body) => (StatusCode::OK, body).into_response(),
        SlackReply::Slow(delay, body) => {
            tokio::time::sleep(delay).await;
            Json(body).into_response()
        }
    }
}
