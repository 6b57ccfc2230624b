//! Failure type returned by every activity.
//!
//! The retry classification is decided where the failure originates and is
//! carried unchanged to the engine, which owns backoff. Nothing converts into
//! this type implicitly; each call site picks a classification.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retry {
    Retryable,
    NonRetryable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ActivityError {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub non_retryable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<serde_json::Value>,
}

impl ActivityError {
    pub fn retryable(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Retry::Retryable, kind, message)
    }

    pub fn non_retryable(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Retry::NonRetryable, kind, message)
    }

    fn new(retry: Retry, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: kind.into(),
            non_retryable: retry == Retry::NonRetryable,
            details: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<serde_json::Value>) -> Self {
        self.details.push(detail.into());
        self
    }

    pub fn retry(&self) -> Retry {
        if self.non_retryable {
            Retry::NonRetryable
        } else {
            Retry::Retryable
        }
    }

    pub fn is_retryable(&self) -> bool {
        !self.non_retryable
    }
}
