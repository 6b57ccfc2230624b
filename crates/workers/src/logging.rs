use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Production logs JSON at `debug`; dev mode
/// logs human-readable lines at `trace`. `RUST_LOG` overrides either level.
pub fn init(dev: bool) {
    let default_level = if dev { "trace" } else { "debug" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if dev {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        tracing::warn!("DEV MODE - UNSAFE IN PRODUCTION!");
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    }
}
