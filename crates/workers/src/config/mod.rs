mod loader;
mod schema;

pub use loader::{default_path, load_from_file, load_from_str, load_or_default, validate, LoadError};
pub use schema::{ApiConfig, BrokerConfig, EngineConfig, LinksConfig, WorkerConfig};
