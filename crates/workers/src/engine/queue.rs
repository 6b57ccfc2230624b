use courier_common::ActivityError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One activity execution handed to this worker by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTask {
    pub task_token: String,
    pub activity_type: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default = "first_attempt")]
    pub attempt: u32,
    /// Engine-assigned execution bound, when the workflow set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_to_close_timeout_ms: Option<u64>,
}

fn first_attempt() -> u32 {
    1
}

/// What the worker reports back for a task. Serializes as
/// `{"result": ...}` or `{"failure": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Result(Value),
    Failure(ActivityError),
}

impl From<Result<Value, ActivityError>> for Outcome {
    fn from(r: Result<Value, ActivityError>) -> Self {
        match r {
            Ok(v) => Self::Result(v),
            Err(e) => Self::Failure(e),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine transport: {0}")]
    Transport(String),
    #[error("engine rejected request: {0}")]
    Rejected(String),
    #[error("task queue closed")]
    Closed,
}

/// Connection to the orchestration engine's task queue.
#[tonic::async_trait]
pub trait TaskQueue: Send + Sync {
    /// Waits for the next task. `Ok(None)` means the poll window elapsed empty.
    async fn poll(&self) -> Result<Option<ActivityTask>, EngineError>;

    async fn complete(&self, task_token: &str, outcome: Outcome) -> Result<(), EngineError>;
}
