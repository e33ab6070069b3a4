//! Tracing subscriber setup for binaries and test harnesses embedding the
//! board.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a global subscriber filtered by `RUST_LOG`, defaulting to
/// `info`.
///
/// Returns `false` when a subscriber was already installed.
#[must_use]
pub fn init(json: bool) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    installed.is_ok()
}
