//! tgdeps CLI library components.
//!
//! The binary in `main.rs` parses arguments and dispatches to [`commands`];
//! everything that touches the terminal lives here so it can be tested.

pub mod commands;
pub mod formatters;
pub mod logger;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}
