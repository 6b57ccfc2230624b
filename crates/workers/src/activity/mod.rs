mod context;
mod registry;

pub use context::ActivityContext;
pub use registry::{ActivityRegistry, RegistryError};
