//! Logging configuration using tracing
//!
//! Events go to stderr. The filter comes from `FUNNEL_PREVIEW_LOG` when set,
//! otherwise from the `-v`/`-q` flags.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "FUNNEL_PREVIEW_LOG";

pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "funnel_preview=info,warn",
        (false, 1) => "funnel_preview=debug,info",
        (false, _) => "funnel_preview=trace,debug",
    }
}

pub fn init(verbose: u8, quiet: bool, color: bool) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(color)
                .with_target(verbose > 0),
        )
        .try_init();
    if result.is_err() {
        tracing::debug!("Logging already initialized");
    }
}
