//! Tracing bootstrap

use tracing_subscriber::EnvFilter;

use super::constants::ENV_LOG;

/// Initialize the global tracing subscriber.
///
/// The filter comes from `TERRABUILD_LOG` (falling back to `info`). Safe to
/// call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
