//! Slack Web API activities.

pub mod api;
pub mod chat;
pub mod conversations;
pub mod reactions;
mod registry;

pub use api::{SlackApi, SlackResponse, PROVIDER};
pub use registry::register;
