// src/watch/watcher.rs

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use notify::event::ModifyKind;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::errors::{Result, WatchrunError};
use crate::watch::filter::FilterPolicy;

/// Kind of filesystem mutation, normalized from the backend's event
/// taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    Write,
    Remove,
    Rename,
    MetadataChange,
}

/// A normalized record of one filesystem mutation under a watched root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Handle for the recursive directory watcher.
///
/// The backend (`notify`) watches one directory level at a time; the
/// watcher grows the watched set itself, both at [`add`] time and
/// reactively whenever a new directory appears under a watched root.
/// Filtered events arrive on `events`, operational problems on
/// `errors`; both are bounded channels read one item at a time by the
/// driving loop.
///
/// [`add`]: DirectoryWatcher::add
pub struct DirectoryWatcher {
    pub events: mpsc::Receiver<ChangeEvent>,
    pub errors: mpsc::Receiver<WatchrunError>,
    cmd_tx: mpsc::Sender<WatcherCmd>,
    quit_tx: mpsc::Sender<()>,
}

enum WatcherCmd {
    Add {
        path: PathBuf,
        reply: oneshot::Sender<Result<()>>,
    },
}

impl DirectoryWatcher {
    /// Create the backend watcher and spawn the dispatch task.
    pub fn new(filter: FilterPolicy) -> Result<DirectoryWatcher> {
        let (raw_tx, raw_rx) = mpsc::unbounded_channel::<notify::Result<notify::Event>>();

        // Closure called synchronously by notify whenever an event
        // arrives; it only crosses into the async world.
        let backend = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| {
                if raw_tx.send(res).is_err() {
                    eprintln!("watchrun: notify event arrived after watcher shutdown");
                }
            },
            Config::default(),
        )?;

        let (events_tx, events) = mpsc::channel(1);
        let (errors_tx, errors) = mpsc::channel(1);
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (quit_tx, quit_rx) = mpsc::channel(1);

        let dispatch = Dispatch {
            backend,
            filter,
            roots: Vec::new(),
            raw_rx,
            cmd_rx,
            quit_rx,
            events_tx,
            errors_tx,
        };
        tokio::spawn(dispatch.run());

        Ok(DirectoryWatcher {
            events,
            errors,
            cmd_tx,
            quit_tx,
        })
    }

    /// Watch `path` and every directory currently beneath it; record it
    /// as a root so later events can be checked against the watched
    /// set. Directories created beneath it later are picked up by the
    /// dispatch task without further calls.
    pub async fn add(&self, path: impl Into<PathBuf>) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(WatcherCmd::Add {
                path: path.into(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| closed())?;
        reply_rx.await.map_err(|_| closed())?
    }

    /// Stop the dispatch task and release all backend subscriptions.
    /// Reads from `events`/`errors` after this return nothing useful.
    pub async fn close(self) {
        let _ = self.quit_tx.send(()).await;
    }
}

fn closed() -> WatchrunError {
    WatchrunError::Notify(notify::Error::generic("watcher dispatch task stopped"))
}

/// State owned by the single background dispatch task: the backend
/// handle and the root side-table are never touched from anywhere
/// else, so no locking is involved.
struct Dispatch {
    backend: RecommendedWatcher,
    filter: FilterPolicy,
    /// Canonicalized paths explicitly added as roots.
    roots: Vec<PathBuf>,
    raw_rx: mpsc::UnboundedReceiver<notify::Result<notify::Event>>,
    cmd_rx: mpsc::Receiver<WatcherCmd>,
    quit_rx: mpsc::Receiver<()>,
    events_tx: mpsc::Sender<ChangeEvent>,
    errors_tx: mpsc::Sender<WatchrunError>,
}

impl Dispatch {
    async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.quit_rx.recv() => {
                    debug!("watcher dispatch loop stopping");
                    return;
                }
                Some(cmd) = self.cmd_rx.recv() => match cmd {
                    WatcherCmd::Add { path, reply } => {
                        let _ = reply.send(self.add_root(path));
                    }
                },
                Some(raw) = self.raw_rx.recv() => {
                    let keep_going = match raw {
                        Ok(event) => self.handle_event(event).await,
                        Err(err) => self.forward_error(err.into()).await,
                    };
                    if !keep_going {
                        return;
                    }
                }
            }
        }
    }

    /// Explicit `add`: subscribe the whole tree and record the root.
    fn add_root(&mut self, path: PathBuf) -> Result<()> {
        let canonical = path.canonicalize().map_err(|e| WatchrunError::Path {
            path: path.clone(),
            source: notify::Error::io(e),
        })?;
        self.subscribe_tree(&canonical)?;
        info!(root = ?canonical, "watching directory tree");
        self.roots.push(canonical);
        Ok(())
    }

    /// Subscribe `path` and every directory transitively beneath it,
    /// via an explicit worklist. A failure aborts the walk and is
    /// returned; directories subscribed before the failure stay
    /// subscribed.
    fn subscribe_tree(&mut self, path: &Path) -> Result<()> {
        let mut pending = VecDeque::new();
        pending.push_back(path.to_path_buf());

        while let Some(entry) = pending.pop_front() {
            self.backend
                .watch(&entry, RecursiveMode::NonRecursive)
                .map_err(|e| WatchrunError::Path {
                    path: entry.clone(),
                    source: e,
                })?;

            let meta = std::fs::metadata(&entry).map_err(|e| WatchrunError::Path {
                path: entry.clone(),
                source: notify::Error::io(e),
            })?;
            if !meta.is_dir() {
                continue;
            }

            let children = std::fs::read_dir(&entry).map_err(|e| WatchrunError::Path {
                path: entry.clone(),
                source: notify::Error::io(e),
            })?;
            for child in children {
                let Ok(child) = child else { continue };
                if child.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                    pending.push_back(child.path());
                }
            }
        }

        Ok(())
    }

    /// Translate, filter and forward one backend event. Returns false
    /// when the dispatch loop should stop (consumer gone or quit
    /// signalled mid-send).
    async fn handle_event(&mut self, event: notify::Event) -> bool {
        debug!(?event, "raw backend event");
        let Some(kind) = translate_kind(&event.kind) else {
            return true;
        };

        for path in event.paths {
            // Grow the watched set before forwarding, so files created
            // inside a brand-new directory are not missed. The root
            // side-table is not touched here.
            if kind == ChangeKind::Create {
                match std::fs::metadata(&path) {
                    Ok(meta) if meta.is_dir() => {
                        if let Err(err) = self.subscribe_tree(&path) {
                            if !self.forward_error(err).await {
                                return false;
                            }
                        }
                    }
                    Ok(_) => {}
                    // Already gone again; diagnostic only.
                    Err(err) => {
                        let err = WatchrunError::Path {
                            path: path.clone(),
                            source: notify::Error::io(err),
                        };
                        if !self.forward_error(err).await {
                            return false;
                        }
                    }
                }
            }

            // Some platforms report paths outside the watched set when
            // it changes concurrently with external mutation (e.g. a
            // branch switch); drop those.
            if !self.under_watched_root(&path) {
                debug!(?path, "event outside watched roots, dropped");
                continue;
            }

            if !self.filter.matches(&path) {
                continue;
            }

            // Attribute-only touches never warrant a restart.
            if kind == ChangeKind::MetadataChange {
                continue;
            }

            if !self.forward_event(ChangeEvent { path, kind }).await {
                return false;
            }
        }

        true
    }

    fn under_watched_root(&self, path: &Path) -> bool {
        self.roots.iter().any(|root| path.starts_with(root))
    }

    async fn forward_event(&mut self, event: ChangeEvent) -> bool {
        tokio::select! {
            res = self.events_tx.send(event) => res.is_ok(),
            _ = self.quit_rx.recv() => false,
        }
    }

    async fn forward_error(&mut self, err: WatchrunError) -> bool {
        tokio::select! {
            res = self.errors_tx.send(err) => res.is_ok(),
            _ = self.quit_rx.recv() => false,
        }
    }
}

fn translate_kind(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Create),
        EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeKind::Rename),
        EventKind::Modify(ModifyKind::Metadata(_)) => Some(ChangeKind::MetadataChange),
        EventKind::Modify(_) => Some(ChangeKind::Write),
        EventKind::Remove(_) => Some(ChangeKind::Remove),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}
