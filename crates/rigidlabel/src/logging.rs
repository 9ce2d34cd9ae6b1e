#![forbid(unsafe_code)]

//! Log output for the binary.
//!
//! Libraries in the workspace only emit `tracing` events under
//! `rigidlabel.*` targets; installing a subscriber is left to the program.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Install a stderr formatter filtered by `RUST_LOG`.
///
/// Calling this twice, or after another subscriber was installed, is a
/// no-op.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
