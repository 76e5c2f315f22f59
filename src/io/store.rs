use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::model::record::Record;
use crate::parse::{parse_list, serialize_list};

/// Default archive file name, next to the list file
pub const DONE_FILE_NAME: &str = "done.txt";

/// Error type for persistence
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
}

/// Whole-list persistence. Loading a list that does not exist yet yields an
/// empty list.
pub trait Store {
    fn load(&self) -> Result<Vec<Record>, StoreError>;
    fn save(&self, records: &[&Record]) -> Result<(), StoreError>;
}

/// A todo.txt file on disk plus its done.txt archive
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    done_path: PathBuf,
}

impl FileStore {
    /// `done_path` defaults to `done.txt` in the same directory as `path`
    pub fn new(path: impl Into<PathBuf>, done_path: Option<PathBuf>) -> Self {
        let path = path.into();
        let done_path = done_path.unwrap_or_else(|| sibling(&path, DONE_FILE_NAME));
        FileStore { path, done_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn done_path(&self) -> &Path {
        &self.done_path
    }

    /// Advisory lock file: `.<name>.lock` next to the list
    pub fn lock_path(&self) -> PathBuf {
        sibling(&self.path, &format!(".{}.lock", self.file_name()))
    }

    /// Persisted UI state: `.<name>.state.json` next to the list
    pub fn state_path(&self) -> PathBuf {
        sibling(&self.path, &format!(".{}.state.json", self.file_name()))
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "todo.txt".to_string())
    }

    /// Append records to the archive file, creating it if needed
    pub fn append_done(&self, records: &[&Record]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        let content = serialize_list(records.iter().copied());
        let write_err = |e| StoreError::WriteError {
            path: self.done_path.clone(),
            source: e,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.done_path)
            .map_err(write_err)?;
        file.write_all(content.as_bytes()).map_err(write_err)?;
        info!(count = records.len(), path = %self.done_path.display(), "archived");
        Ok(())
    }
}

impl Store for FileStore {
    fn load(&self) -> Result<Vec<Record>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "list file missing, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        let records = parse_list(&text);
        debug!(count = records.len(), path = %self.path.display(), "loaded");
        Ok(records)
    }

    fn save(&self, records: &[&Record]) -> Result<(), StoreError> {
        let content = serialize_list(records.iter().copied());
        atomic_write(&self.path, content.as_bytes()).map_err(|e| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;
        debug!(count = records.len(), path = %self.path.display(), "saved");
        Ok(())
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    match path.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}
