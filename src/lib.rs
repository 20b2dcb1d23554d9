// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod proc;
pub mod watch;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::cli::CliArgs;
use crate::config::{load_from_path, Settings};
use crate::proc::ProcessSupervisor;
use crate::watch::{DirectoryWatcher, FilterPolicy};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config file loading and CLI merging
/// - the recursive directory watcher
/// - the process supervisor
/// - Ctrl-C handling
/// and then runs the event loop: one restart per surviving change
/// event, strictly serialized.
pub async fn run(args: CliArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => Some(load_from_path(path)?),
        None => None,
    };
    let settings = Settings::merge(&args, file)?;

    let filter =
        FilterPolicy::from_patterns(settings.include.as_deref(), settings.exclude.as_deref())?;

    let mut watcher = DirectoryWatcher::new(filter)?;
    for dir in &settings.dirs {
        watcher
            .add(dir.clone())
            .await
            .with_context(|| format!("unable to watch directory {:?}", dir))?;
    }

    let mut supervisor = ProcessSupervisor::start(&settings.command).await?;

    // Ctrl-C → graceful shutdown.
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = shutdown_tx.send(()).await;
    });

    info!(dirs = ?settings.dirs, command = ?settings.command, "watchrun started");

    loop {
        tokio::select! {
            event = watcher.events.recv() => {
                let Some(event) = event else { break };
                info!(path = ?event.path, kind = ?event.kind, "change detected");
                // A failed restart (e.g. termination timeout) is
                // per-attempt; the next event tries again.
                if let Err(err) = supervisor.restart().await {
                    error!(error = %err, "restart failed");
                }
            }
            err = watcher.errors.recv() => {
                let Some(err) = err else { break };
                warn!(error = %err, "watch error");
            }
            _ = shutdown_rx.recv() => {
                info!("shutting down");
                break;
            }
        }
    }

    supervisor.kill().await?;
    watcher.close().await;
    Ok(())
}
