//! Logging setup for the tgdeps CLI.
//!
//! Library crates emit `tracing` events; this module installs the
//! subscriber that prints them to stderr so report output on stdout stays
//! clean for piping.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: &[&str] = &[
    "tgdeps_core",
    "tgdeps_fs",
    "tgdeps_hcl",
    "tgdeps_config",
    "tgdeps_cli",
];

/// Initialize the tracing subscriber.
///
/// The filter is chosen in this order:
/// 1. `-v`: debug for tgdeps crates (`-vv` for trace)
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG` environment variable
/// 4. Default: warnings only
pub fn init_logger(verbose: u8, quiet: bool, no_color: bool) {
    let filter = if verbose > 0 {
        let level = if verbose > 1 { "trace" } else { "debug" };
        EnvFilter::new(directives(level))
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives("warn")))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, level))
        .collect::<Vec<_>>()
        .join(",")
}
