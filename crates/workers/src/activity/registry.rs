//! Static mapping from stable activity names to typed handlers.
//!
//! The map is built once at startup and never mutated afterwards. Names are
//! part of the wire contract with in-flight workflow histories, so they are
//! `&'static str` constants owned by each integration module.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use courier_common::ActivityError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::context::ActivityContext;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;
type Handler = Arc<dyn Fn(ActivityContext, Value) -> BoxFuture<Result<Value, ActivityError>> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("activity {0:?} registered twice")]
    Duplicate(&'static str),
    #[error("activity name must not be empty")]
    EmptyName,
}

#[derive(Default)]
pub struct ActivityRegistry {
    handlers: HashMap<&'static str, Handler>,
}

impl ActivityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<Req, Resp, F, Fut>(&mut self, name: &'static str, f: F) -> Result<(), RegistryError>
    where
        Req: DeserializeOwned + Send + 'static,
        Resp: Serialize + Send + 'static,
        F: Fn(ActivityContext, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, ActivityError>> + Send + 'static,
    {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.handlers.contains_key(name) {
            return Err(RegistryError::Duplicate(name));
        }

        let f = Arc::new(f);
        let handler: Handler = Arc::new(move |ctx: ActivityContext, input: Value| -> BoxFuture<Result<Value, ActivityError>> {
            let f = Arc::clone(&f);
            Box::pin(async move {
                let req: Req = serde_json::from_value(input).map_err(|e| {
                    ActivityError::non_retryable("InvalidInput", format!("invalid input for {name}: {e}"))
                })?;
                let resp = f(ctx, req).await?;
                serde_json::to_value(resp).map_err(|e| {
                    ActivityError::non_retryable("InvalidOutput", format!("unserializable result of {name}: {e}"))
                })
            })
        });

        self.handlers.insert(name, handler);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub async fn dispatch(&self, ctx: ActivityContext, input: Value) -> Result<Value, ActivityError> {
        let handler = self.handlers.get(ctx.name()).cloned().ok_or_else(|| {
            ActivityError::non_retryable(
                "ActivityNotRegistered",
                format!("activity {:?} is not registered on this worker", ctx.name()),
            )
        })?;
        handler(ctx, input).await
    }
}
