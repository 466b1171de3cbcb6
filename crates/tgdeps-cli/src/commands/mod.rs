pub mod analyze;
pub mod config;

pub use analyze::{analyze, render, run_analysis, Analysis, AnalyzeOptions, Report};
pub use config::{handle_config_command, ConfigCommand};
