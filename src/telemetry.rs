//! Tracing subscriber setup for the service binary.

use tracing_subscriber::{EnvFilter, fmt};

/// Filter applied when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a formatting subscriber filtered by `RUST_LOG`.
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    fmt().with_env_filter(filter).try_init()
}
