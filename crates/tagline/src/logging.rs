//! Logging initialization.
//!
//! Uses the `tracing` ecosystem with human-readable or JSON output on
//! stderr. `RUST_LOG`, when set, wins over everything else.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// # Arguments
///
/// * `level` - Default filter directive when `RUST_LOG` is unset (e.g. "info").
/// * `json_format` - If true, outputs structured JSON logs; otherwise pretty-printed.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section plus CLI flags.
pub fn init_from_config(
    config: &tagline_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let level = effective_level(&config.logging.level, verbose_override);
    let json_format = json_logs_override || config.logging.format == "json";
    init(level, json_format);
}

/// `--verbose` raises the level to at least debug; it never lowers trace.
fn effective_level(configured: &str, verbose: bool) -> &str {
    if verbose && !configured.eq_ignore_ascii_case("trace") {
        "debug"
    } else {
        configured
    }
}
