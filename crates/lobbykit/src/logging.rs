//! Tracing setup for binaries built on Lobbykit.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` (e.g. `"info"` or `"lobbykit=debug"`) when the
/// variable is unset or unparsable.
///
/// Does nothing if a global subscriber is already installed, so tests and
/// embedding applications can call it freely.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
