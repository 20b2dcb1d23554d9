// src/cli.rs

//! CLI argument parsing using `clap` (derive feature).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchrun",
    version,
    about = "Watch directories and restart a command on file changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory to watch recursively. Repeat for multiple roots.
    ///
    /// Default: the current directory (unless the config file sets
    /// its own roots).
    #[arg(short = 'd', long = "dir", value_name = "PATH")]
    pub dirs: Vec<PathBuf>,

    /// Only react to paths matching this regular expression.
    #[arg(long, value_name = "REGEX")]
    pub include: Option<String>,

    /// Ignore paths matching this regular expression (wins over
    /// --include).
    #[arg(long, value_name = "REGEX")]
    pub exclude: Option<String>,

    /// Optional config file (TOML). Flags override its settings.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// The command to run and restart on every change.
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
