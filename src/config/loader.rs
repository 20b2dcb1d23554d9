// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::ConfigFile;
use crate::errors::{Result, WatchrunError};

/// Load a configuration file from the given path.
///
/// Deserialization only; field-level semantics (missing command,
/// pattern validity) are checked when the config is merged into
/// [`Settings`](crate::config::Settings) or compiled into a filter.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        WatchrunError::Config(format!("reading config file at {:?}: {}", path, e))
    })?;

    let config: ConfigFile = toml::from_str(&contents)?;
    Ok(config)
}
