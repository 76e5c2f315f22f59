use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{DebounceEventResult, DebouncedEventKind, Debouncer, new_debouncer};

/// Watches one list file for changes made by other programs.
///
/// Watches the parent directory: an atomic save replaces the file, which
/// drops any watch on the old inode.
pub struct ListWatcher {
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    rx: Receiver<DebounceEventResult>,
    file_name: OsString,
}

impl ListWatcher {
    /// Start watching `path`. Bursts of events within `debounce` arrive as
    /// one change.
    pub fn start(path: &Path, debounce: Duration) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(debounce, tx)?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        debouncer.watcher().watch(&dir, RecursiveMode::NonRecursive)?;

        let file_name = path.file_name().map(OsString::from).unwrap_or_default();
        tracing::info!(path = %path.display(), "watching list file");
        Ok(ListWatcher {
            _debouncer: debouncer,
            rx,
            file_name,
        })
    }

    /// Non-blocking: true if the list file changed since the last poll.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => {
                    changed |= events.iter().any(|e| {
                        e.kind == DebouncedEventKind::Any
                            && e.path.file_name() == Some(self.file_name.as_os_str())
                    });
                }
                Err(e) => tracing::warn!(error = %e, "file watcher error"),
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Instant;
    use tempfile::TempDir;

    fn wait_for_change(watcher: &ListWatcher) -> bool {
        let start = Instant::now();
        while start.elapsed() < Duration::from_secs(5) {
            if watcher.poll() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        false
    }

    #[test]
    fn reports_writes_to_the_list_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("todo.txt");
        fs::write(&path, "a\n").unwrap();

        let watcher = ListWatcher::start(&path, Duration::from_millis(50)).unwrap();
        fs::write(&path, "a\nb\n").unwrap();
        assert!(wait_for_change(&watcher));
    }

    #[test]
    fn ignores_other_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("todo.txt");
        fs::write(&path, "a\n").unwrap();

        let watcher = ListWatcher::start(&path, Duration::from_millis(50)).unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();
        std::thread::sleep(Duration::from_millis(300));
        assert!(!watcher.poll());
    }
}
