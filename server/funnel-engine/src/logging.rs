//! Tracing subscriber setup shared by the monitor binaries.

use std::io;

use tracing_subscriber::{fmt, EnvFilter};

/// Install a stderr subscriber filtered by `RUST_LOG`, or `default_level`
/// when the variable is unset or invalid.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(default_level: &str) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  let _ = fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .with_target(false)
    .try_init();
}
