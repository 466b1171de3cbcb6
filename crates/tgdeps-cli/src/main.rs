//! tgdeps CLI - dependency analysis for Terragrunt module trees.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tgdeps_cli::commands::{self, AnalyzeOptions, ConfigCommand, Report};
use tgdeps_cli::logger::init_logger;
use tgdeps_cli::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "tgdeps", version, args_conflicts_with_subcommands = true)]
#[command(about = "Dependency analysis for Terragrunt module trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Project root to analyze
    ///
    /// Examples:
    ///   tgdeps .                   # Dependency report for the current tree
    ///   tgdeps live/prod           # Only the production units
    #[arg(value_name = "PATH", default_value = ".")]
    path: PathBuf,

    /// Configuration file path (default: <PATH>/.tgdeps.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Output JSON format (alias for --output json)
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Which modules depend on which (default)
    Deps {
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
    },

    /// Orphaned and isolated modules
    Unused {
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
    },

    /// Circular dependencies; exits with status 1 when any are found
    Cycles {
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
    },

    /// The complete dependency graph
    Graph {
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
    },

    /// Size and shape of the project
    Metrics {
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
    },

    /// Manage .tgdeps.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logger(cli.verbose, cli.quiet, cli.no_color);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        cli.format
    };

    let (report, path) = match cli.command {
        Some(Command::Config { command }) => {
            return commands::handle_config_command(command, cli.config.as_deref(), format);
        }
        Some(Command::Deps { path }) => (Report::Deps, path),
        Some(Command::Unused { path }) => (Report::Unused, path),
        Some(Command::Cycles { path }) => (Report::Cycles, path),
        Some(Command::Graph { path }) => (Report::Graph, path),
        Some(Command::Metrics { path }) => (Report::Metrics, path),
        None => (Report::Deps, cli.path),
    };

    commands::run_analysis(
        report,
        &AnalyzeOptions {
            path,
            config: cli.config,
            format,
        },
    )
}
