// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling the include/exclude filter (`filter.rs`).
//! - Wiring up a cross-platform filesystem watcher (`notify`) and
//!   maintaining the recursive set of watched directories itself,
//!   since the backend is used one directory at a time
//!   (`watcher.rs`).
//!
//! It does **not** know about the supervised process; it only turns
//! raw backend notifications into a filtered [`ChangeEvent`] stream.

pub mod filter;
pub mod watcher;

pub use filter::FilterPolicy;
pub use watcher::{ChangeEvent, ChangeKind, DirectoryWatcher};
