//! Diagnostics for the headless host.
//!
//! Filtering follows `SHEETGRID_LOG` with the usual `EnvFilter` syntax, e.g.
//! `SHEETGRID_LOG=grid=debug,script=warn`. Output always goes to stderr so it
//! never mixes with rendered tables on stdout.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "SHEETGRID_LOG";

pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    // Already installed when called twice.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
