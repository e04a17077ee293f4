//! Tracing subscriber setup for the binary

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset or invalid
pub const DEFAULT_LOG_FILTER: &str = "warn";

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Install a stderr subscriber honouring `RUST_LOG`.
///
/// Calling this more than once is harmless. `verbose` raises the fallback
/// level to `debug` for this crate when `RUST_LOG` is not set.
pub fn init_tracing(verbose: bool) {
    if TRACING_INIT.get().is_some() {
        return;
    }

    let fallback = if verbose {
        format!("{DEFAULT_LOG_FILTER},taskcheck=debug")
    } else {
        DEFAULT_LOG_FILTER.to_string()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();

    let _ = TRACING_INIT.set(());
}
