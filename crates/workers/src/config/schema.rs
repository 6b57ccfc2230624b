use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct WorkerConfig {
    /// Relaxes transport security and raises log verbosity. Unsafe in production.
    #[serde(default)]
    pub dev: bool,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub secret_broker: BrokerConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct EngineConfig {
    /// Base URL of the engine's HTTP task-queue gateway, which serves the
    /// JSON `poll` / `complete` API under `/api/v1/namespaces/...`. This is
    /// not the engine's gRPC frontend.
    #[serde(default = "default_engine_address")]
    pub address: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_task_queue")]
    pub task_queue: String,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_activities: usize,
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BrokerConfig {
    #[serde(default = "default_broker_address")]
    pub address: String,
    #[serde(default = "default_broker_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,
    #[serde(default)]
    pub client_cert: Option<PathBuf>,
    #[serde(default)]
    pub client_key: Option<PathBuf>,
    #[serde(default)]
    pub server_name: Option<String>,
}

impl BrokerConfig {
    pub fn has_tls_files(&self) -> bool {
        self.ca_cert.is_some() || self.client_cert.is_some() || self.client_key.is_some()
    }
}

/// Link IDs per integration. Validated per activity call, not at load time.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct LinksConfig {
    #[serde(default)]
    pub slack: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_api_addr")]
    pub addr: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            address: default_engine_address(),
            namespace: default_namespace(),
            task_queue: default_task_queue(),
            max_concurrent_activities: default_max_concurrent(),
            poll_timeout_ms: default_poll_timeout_ms(),
        }
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            address: default_broker_address(),
            timeout_ms: default_broker_timeout_ms(),
            ca_cert: None,
            client_cert: None,
            client_key: None,
            server_name: None,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            addr: default_api_addr(),
        }
    }
}

fn default_engine_address() -> String {
    "http://localhost:8088".to_string()
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_task_queue() -> String {
    "courier".to_string()
}

fn default_max_concurrent() -> usize {
    32
}

fn default_poll_timeout_ms() -> u64 {
    30_000
}

fn default_broker_address() -> String {
    "localhost:14460".to_string()
}

fn default_broker_timeout_ms() -> u64 {
    3_000
}

fn default_api_addr() -> String {
    "0.0.0.0:9091".to_string()
}
