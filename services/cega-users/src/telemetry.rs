//! Logging setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the fmt subscriber; `RUST_LOG` overrides the default level.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}
