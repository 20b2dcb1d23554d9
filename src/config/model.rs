// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::cli::CliArgs;
use crate::errors::{Result, WatchrunError};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// dirs = ["src", "templates"]
/// include = '\.go$'
/// exclude = '_test\.go$'
///
/// [run]
/// command = ["go", "run", "."]
/// ```
///
/// Both sections are optional and default to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Watch roots and filter patterns from `[watch]`.
    #[serde(default)]
    pub watch: WatchSection,

    /// The supervised command from `[run]`.
    #[serde(default)]
    pub run: RunSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchSection {
    /// Directories to watch recursively.
    #[serde(default)]
    pub dirs: Vec<PathBuf>,

    /// Only react to paths matching this regex.
    #[serde(default)]
    pub include: Option<String>,

    /// Ignore paths matching this regex. Wins over `include`.
    #[serde(default)]
    pub exclude: Option<String>,
}

/// `[run]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunSection {
    /// Command line of the supervised process, argv-style.
    #[serde(default)]
    pub command: Vec<String>,
}

/// Effective settings after layering CLI flags over the (optional)
/// config file. Flags win per field.
#[derive(Debug, Clone)]
pub struct Settings {
    pub dirs: Vec<PathBuf>,
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub command: Vec<String>,
}

impl Settings {
    /// Merge CLI arguments with a loaded config file.
    ///
    /// - `dirs`: CLI if any given, else config, else `.`
    /// - `include` / `exclude`: CLI wins when set
    /// - `command`: CLI trailing args win; a missing command in both
    ///   places is a configuration error.
    pub fn merge(cli: &CliArgs, file: Option<ConfigFile>) -> Result<Settings> {
        let file = file.unwrap_or_default();

        let dirs = if !cli.dirs.is_empty() {
            cli.dirs.clone()
        } else if !file.watch.dirs.is_empty() {
            file.watch.dirs
        } else {
            vec![PathBuf::from(".")]
        };

        let command = if !cli.command.is_empty() {
            cli.command.clone()
        } else {
            file.run.command
        };
        if command.is_empty() {
            return Err(WatchrunError::Config(
                "no command given; pass it as trailing arguments or in [run].command".into(),
            ));
        }

        Ok(Settings {
            dirs,
            include: cli.include.clone().or(file.watch.include),
            exclude: cli.exclude.clone().or(file.watch.exclude),
            command,
        })
    }
}
