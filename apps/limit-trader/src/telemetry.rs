//! Tracing Setup
//!
//! Console logging through `tracing-subscriber`. Output goes to stderr so that
//! command results on stdout (e.g. `trade tickers`) stay pipeable.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives (default: `limit_trader=info`)
//! - `NO_COLOR`: disable ANSI colors when set

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "limit_trader=info,trade=info";

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let ansi = std::env::var_os("NO_COLOR").is_none();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .try_init();
}
