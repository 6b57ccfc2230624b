mod health;
mod metrics;
mod server;
mod state;

pub use server::{router, serve};
pub use state::ApiState;
