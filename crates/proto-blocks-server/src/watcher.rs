//! File watching for live reload.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events closer together than this on the same path collapse into one.
pub const DEBOUNCE: Duration = Duration::from_millis(100);

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Pattern document was modified
    PatternModified(PathBuf),

    /// Stylesheet was modified
    StyleModified(PathBuf),

    /// File was created
    Created(PathBuf),

    /// File was deleted
    Deleted(PathBuf),

    /// Any other modification
    Modified(PathBuf),
}

/// Drops repeated events for a path inside the debounce window.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    last_seen: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: HashMap::new(),
        }
    }

    /// Whether an event for `path` at `now` should be forwarded.
    pub fn accept(&mut self, path: &Path, now: Instant) -> bool {
        match self.last_seen.get(path) {
            Some(last) if now.duration_since(*last) < self.window => false,
            _ => {
                self.last_seen.insert(path.to_path_buf(), now);
                true
            }
        }
    }
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new file watcher for the given paths.
    ///
    /// Paths that do not exist are skipped. Returns the watcher and a channel to
    /// receive events; events stop when the watcher is dropped.
    pub fn new(
        paths: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), notify::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })?;

        for path in paths {
            if path.exists() {
                let mode = if path.is_dir() {
                    RecursiveMode::Recursive
                } else {
                    RecursiveMode::NonRecursive
                };
                watcher.watch(path, mode)?;
            } else {
                tracing::warn!("Not watching missing path {}", path.display());
            }
        }

        std::thread::spawn(move || {
            let mut debouncer = Debouncer::new(DEBOUNCE);

            while let Ok(event) = sync_rx.recv() {
                let now = Instant::now();
                for path in event.paths {
                    if !debouncer.accept(&path, now) {
                        continue;
                    }
                    if let Some(e) = classify_event(&path, &event.kind) {
                        if async_tx.blocking_send(e).is_err() {
                            return;
                        }
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Classify a notify event into a WatchEvent.
pub fn classify_event(path: &Path, kind: &EventKind) -> Option<WatchEvent> {
    let path = path.to_path_buf();

    match kind {
        EventKind::Create(_) => Some(WatchEvent::Created(path)),
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path)),
        EventKind::Modify(_) => match path.extension().and_then(|e| e.to_str()) {
            Some("md") | Some("markdown") => Some(WatchEvent::PatternModified(path)),
            Some("css") => Some(WatchEvent::StyleModified(path)),
            _ => Some(WatchEvent::Modified(path)),
        },
        _ => None,
    }
}
