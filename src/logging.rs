//! Diagnostics for the terminal host.
//!
//! Output goes to stderr so it never mixes with links printed on stdout.
//! While a board is on screen the terminal is in raw mode, so keep levels
//! above `warn` for debugging only.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Reads `RUST_LOG`, defaulting to `warn`.
///
/// ```bash
/// RUST_LOG=sliding_secret=debug sliding-secret play '<link>' 2>trace.log
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
