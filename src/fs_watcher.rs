//! File watching for `loupe watch`
//!
//! Watches the parent directory of a single file (editors often save by
//! replacing the file) and reports debounced changes to that file only.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};

/// Coalescing window for bursts of file system events from one save
const WATCH_DEBOUNCE: Duration = Duration::from_millis(50);

/// Watches one file for modifications
pub struct FileWatcher {
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    rx: Receiver<DebounceEventResult>,
    path: PathBuf,
}

impl FileWatcher {
    pub fn new(path: &Path) -> Result<Self, notify::Error> {
        let path = path.canonicalize().map_err(notify::Error::io)?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(WATCH_DEBOUNCE, tx)?;
        debouncer
            .watcher()
            .watch(&dir, notify::RecursiveMode::NonRecursive)?;

        tracing::info!("Watching {}", path.display());

        Ok(Self {
            _debouncer: debouncer,
            rx,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if the file changed since the last poll (non-blocking)
    pub fn poll_changed(&self) -> bool {
        let mut changed = false;
        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => changed |= events.iter().any(|e| self.is_target(&e.path)),
                Err(e) => tracing::warn!("File watcher error: {:?}", e),
            }
        }
        changed
    }

    fn is_target(&self, path: &Path) -> bool {
        path == self.path || path.file_name() == self.path.file_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(FileWatcher::new(&dir.path().join("absent.js")).is_err());
    }

    #[test]
    fn test_is_target_matches_by_name() {
        let dir = tempdir().expect("Failed to create temp dir");
        let file = dir.path().join("main.js");
        fs::write(&file, "x;").unwrap();

        let Ok(watcher) = FileWatcher::new(&file) else {
            return; // Skip if the platform watcher is unavailable
        };
        assert!(watcher.is_target(watcher.path()));
        assert!(watcher.is_target(&dir.path().join("main.js")));
        assert!(!watcher.is_target(&dir.path().join("other.js")));
    }

    #[test]
    fn test_no_events_without_changes() {
        let dir = tempdir().expect("Failed to create temp dir");
        let file = dir.path().join("quiet.js");
        fs::write(&file, "x;").unwrap();

        let Ok(watcher) = FileWatcher::new(&file) else {
            return;
        };
        assert!(!watcher.poll_changed());
    }
}
