// src/errors.rs

//! Crate-wide error types.
//!
//! Library code returns [`WatchrunError`]; the binary boundary
//! (`main.rs` / `lib.rs::run`) wraps everything in `anyhow` for
//! reporting.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchrunError {
    /// A root (or a directory discovered beneath it) could not be
    /// subscribed: missing, unreadable, or the backend refused it.
    #[error("cannot watch {path:?}: {source}")]
    Path {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// Failure inside the OS notification backend, unrelated to a
    /// specific add call. Non-fatal; surfaced on the errors stream.
    #[error("watch backend error: {0}")]
    Notify(#[from] notify::Error),

    #[error("executable not found on search path: {0}")]
    ExecutableNotFound(String),

    #[error("failed to launch {program:?}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The previous child refused to die within the bounded wait. The
    /// slot is in an unknown state; the next restart attempt is the
    /// recovery path.
    #[error("timed out after {timeout:?} waiting for process {pid} to terminate")]
    TerminationTimeout { pid: u32, timeout: Duration },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WatchrunError>;
