//! Subscriber setup shared by the binaries.
//!
//! Logs go to stderr so stdout carries only command output.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVES: &str = "info,hyper_util=off,reqwest=warn";

/// Install a global `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_directives`.
///
/// Returns an error if a global subscriber is already installed.
pub fn init(default_directives: &str) -> Result<(), String> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| format!("failed to install tracing subscriber: {e}"))
}
