//! Key-value backends the storage adapter sits on.
//!
//! A backend is the environment-provided store: string keys, string values,
//! no knowledge of namespaces or JSON. Two implementations exist:
//!
//! - [`MemoryBackend`] - in-process map, lost on restart
//! - [`FileBackend`] - a JSON object file on disk, shared between processes
//!   and rewritten atomically on every mutation

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;

/// Errors raised by a [`KeyValueBackend`].
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store file {path} is not a JSON object of strings: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("store encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
    #[error("store unavailable")]
    Unavailable,
}

/// A persistent, string-keyed, string-valued store.
///
/// Implementations must be safe to share between request handlers.
pub trait KeyValueBackend: Send + Sync + fmt::Debug {
    /// Whether the store can currently be used.
    ///
    /// Checked by the adapter before every access.
    fn is_available(&self) -> bool {
        true
    }

    /// Verify the store can be read and written right now.
    ///
    /// Used by readiness checks, not before every access.
    ///
    /// # Errors
    ///
    /// Returns the failure that makes the store unusable.
    fn check(&self) -> Result<(), BackendError> {
        Ok(())
    }

    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), BackendError>;

    /// Every key currently present, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn keys(&self) -> Result<Vec<String>, BackendError>;
}

// =============================================================================
// Memory
// =============================================================================

/// In-process backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with raw entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError> {
        let entries = self.entries.read().map_err(|_| BackendError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let mut entries = self.entries.write().map_err(|_| BackendError::Poisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), BackendError> {
        let mut entries = self.entries.write().map_err(|_| BackendError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let entries = self.entries.read().map_err(|_| BackendError::Poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

// =============================================================================
// File
// =============================================================================

/// Backend persisted as a single JSON object file.
///
/// Nothing is cached: every read loads the file and every mutation is a
/// read-modify-write, so several processes (the site and the CLI) can share
/// one store. Access is serialized through an advisory lock on a sidecar
/// `.lock` file, shared for reads and exclusive for writes. Writes go
/// through a temporary file and a rename, so readers never observe a
/// half-written store.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileBackend {
    /// Open the store at `path`. A missing or empty file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or does not
    /// contain a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let path = path.into();
        let backend = Self {
            lock_path: path.with_extension("lock"),
            path,
        };

        let keys = backend.read(BTreeMap::len)?;
        tracing::debug!(path = %backend.path.display(), keys, "Opened file store");

        Ok(backend)
    }

    /// Location of the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> BackendError {
        BackendError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn lock_file(&self, create: bool) -> std::io::Result<fd_lock::RwLock<File>> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(create)
            .truncate(false)
            .open(&self.lock_path)
            .map(fd_lock::RwLock::new)
    }

    fn load(&self) -> Result<BTreeMap<String, String>, BackendError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| BackendError::Corrupt {
                    path: self.path.clone(),
                    source,
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), BackendError> {
        let json = serde_json::to_string_pretty(entries).map_err(BackendError::Encode)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    fn ensure_parent(&self) -> Result<(), BackendError> {
        match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => fs::create_dir_all(parent).map_err(|e| self.io_error(e)),
            None => Ok(()),
        }
    }

    /// Run `f` over the current file contents under a shared lock.
    fn read<R>(&self, f: impl FnOnce(&BTreeMap<String, String>) -> R) -> Result<R, BackendError> {
        let lock = match self.lock_file(true) {
            Ok(lock) => lock,
            // Nothing has been written yet, not even the directory
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(f(&BTreeMap::new())),
            Err(e) => return Err(self.io_error(e)),
        };
        let _guard = lock.read().map_err(|e| self.io_error(e))?;
        Ok(f(&self.load()?))
    }

    /// Reload, apply `change` and persist under an exclusive lock.
    ///
    /// `change` returns whether it modified the map; unchanged maps are not
    /// written back.
    fn mutate(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), BackendError> {
        self.ensure_parent()?;
        let mut lock = self.lock_file(true).map_err(|e| self.io_error(e))?;
        let _guard = lock.write().map_err(|e| self.io_error(e))?;

        let mut entries = self.load()?;
        if change(&mut entries) {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

impl KeyValueBackend for FileBackend {
    fn check(&self) -> Result<(), BackendError> {
        self.ensure_parent()?;
        let lock = self.lock_file(true).map_err(|e| self.io_error(e))?;
        let _guard = lock.read().map_err(|e| self.io_error(e))?;
        self.load().map(drop)
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError> {
        self.read(|entries| entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.mutate(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
            true
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), BackendError> {
        self.mutate(|entries| entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        self.read(|entries| entries.keys().cloned().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_basic_operations() {
        let backend = MemoryBackend::with_entries([("a", "1")]);
        assert_eq!(backend.get_item("a").unwrap().as_deref(), Some("1"));

        backend.set_item("b", "2").unwrap();
        backend.remove_item("a").unwrap();
        backend.remove_item("missing").unwrap();

        assert_eq!(backend.keys().unwrap(), vec!["b".to_string()]);
        assert!(backend.get_item("a").unwrap().is_none());
    }

    #[test]
    fn test_file_backend_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path().join("store.json")).unwrap();
        assert!(backend.keys().unwrap().is_empty());
    }

    #[test]
    fn test_file_backend_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let backend = FileBackend::open(&path).unwrap();
        backend.set_item("portfolio_theme", "\"dark\"").unwrap();
        backend.set_item("other", "x").unwrap();
        backend.remove_item("other").unwrap();
        drop(backend);

        let reopened = FileBackend::open(&path).unwrap();
        assert_eq!(
            reopened.get_item("portfolio_theme").unwrap().as_deref(),
            Some("\"dark\"")
        );
        assert!(reopened.get_item("other").unwrap().is_none());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_file_backends_on_one_file_see_each_others_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let site = FileBackend::open(&path).unwrap();
        let cli = FileBackend::open(&path).unwrap();

        site.set_item("portfolio_contact_messages", "[1]").unwrap();
        assert_eq!(
            cli.get_item("portfolio_contact_messages").unwrap().as_deref(),
            Some("[1]")
        );

        cli.remove_item("portfolio_contact_messages").unwrap();
        assert!(site.get_item("portfolio_contact_messages").unwrap().is_none());

        site.set_item("portfolio_theme", "\"dark\"").unwrap();
        assert_eq!(cli.keys().unwrap(), vec!["portfolio_theme".to_string()]);

        let reopened = FileBackend::open(&path).unwrap();
        assert!(reopened.get_item("portfolio_contact_messages").unwrap().is_none());
        assert_eq!(
            reopened.get_item("portfolio_theme").unwrap().as_deref(),
            Some("\"dark\"")
        );
    }

    #[test]
    fn test_file_backend_check() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("data");
        let backend = FileBackend::open(parent.join("store.json")).unwrap();
        backend.check().unwrap();

        fs::remove_dir_all(&parent).unwrap();
        fs::write(&parent, "not a directory").unwrap();

        assert!(matches!(backend.check(), Err(BackendError::Io { .. })));
        assert!(backend.set_item("k", "v").is_err());
    }

    #[test]
    fn test_file_backend_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileBackend::open(&path).unwrap_err();
        assert!(matches!(err, BackendError::Corrupt { .. }));
    }

    #[test]
    fn test_file_backend_empty_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "  \n").unwrap();

        assert!(FileBackend::open(&path).unwrap().keys().unwrap().is_empty());
    }
}
