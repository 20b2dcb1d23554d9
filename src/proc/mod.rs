// src/proc/mod.rs

//! Supervised child process management.
//!
//! [`ProcessSupervisor`] owns a single child slot and provides restart
//! semantics that are safe against double-kill and handle-reuse races:
//! the previous instance is confirmed dead and reaped, under a bounded
//! wait, before a replacement is spawned.

pub mod supervisor;

pub use supervisor::ProcessSupervisor;
