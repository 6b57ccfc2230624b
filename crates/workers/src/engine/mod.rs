//! Connection to the orchestration engine and the worker run loop.
pub mod backoff;
pub mod http_queue;
pub mod in_memory;
pub mod queue;
pub mod worker;

pub use backoff::PollBackoff;
pub use http_queue::HttpTaskQueue;
pub use in_memory::InMemoryTaskQueue;
pub use queue::{ActivityTask, EngineError, Outcome, TaskQueue};
pub use worker::Worker;
