//! Tracing initialization
//!
//! `RUST_LOG` controls the filter; the default is info-level for the whole
//! binary. Upstream body snippets are logged at debug.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // try_init: harmless when a subscriber is already installed (tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
