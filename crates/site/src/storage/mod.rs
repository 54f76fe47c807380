//! Namespaced JSON storage over a key-value backend.
//!
//! [`StorageService`] is the only component that touches a backend. It
//! prefixes every key with [`STORAGE_PREFIX`], encodes values as JSON, and
//! never fails outward: without a backend every operation is a silent no-op,
//! and backend or encoding failures are logged and swallowed.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use portfolio_site::storage::{MemoryBackend, StorageService};
//!
//! let storage = StorageService::new(Some(Arc::new(MemoryBackend::new())));
//! storage.set("theme", "dark");
//! assert_eq!(storage.get::<String>("theme").as_deref(), Some("dark"));
//!
//! // Without a backend the same calls are no-ops.
//! let headless = StorageService::headless();
//! headless.set("theme", "dark");
//! assert!(!headless.has("theme"));
//! ```

pub mod backend;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use backend::{BackendError, FileBackend, KeyValueBackend, MemoryBackend};

/// Prefix applied to every key this application persists.
pub const STORAGE_PREFIX: &str = "portfolio_";

/// Errors surfaced by the fallible storage primitives.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to encode value for {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to decode value stored under {key}: {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("store error for {key}: {source}")]
    Backend {
        key: String,
        #[source]
        source: BackendError,
    },
}

/// JSON key-value adapter with a fixed namespace.
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct StorageService {
    backend: Option<Arc<dyn KeyValueBackend>>,
    prefix: Arc<str>,
}

impl fmt::Debug for StorageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageService")
            .field("backend", &self.backend)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl StorageService {
    /// Create an adapter using [`STORAGE_PREFIX`].
    #[must_use]
    pub fn new(backend: Option<Arc<dyn KeyValueBackend>>) -> Self {
        Self::with_prefix(backend, STORAGE_PREFIX)
    }

    #[must_use]
    pub fn with_prefix(backend: Option<Arc<dyn KeyValueBackend>>, prefix: &str) -> Self {
        Self {
            backend,
            prefix: Arc::from(prefix),
        }
    }

    /// An adapter with no store capability.
    #[must_use]
    pub fn headless() -> Self {
        Self::new(None)
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Capability check run before every store access.
    fn backend(&self) -> Option<&dyn KeyValueBackend> {
        self.backend.as_deref().filter(|b| b.is_available())
    }

    /// Whether a usable store is present.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend().is_some()
    }

    /// Probe the store for readiness. Succeeds trivially without one.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured store reports itself unavailable or
    /// cannot currently be read and written.
    pub fn check(&self) -> Result<(), BackendError> {
        match &self.backend {
            None => Ok(()),
            Some(backend) if !backend.is_available() => Err(BackendError::Unavailable),
            Some(backend) => backend.check(),
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    /// Store `value` as JSON under the namespaced `key`.
    ///
    /// Failures are logged, never returned.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_set(key, value) {
            tracing::error!(key, error = %e, "Failed to save to storage");
        }
    }

    /// Fallible form of [`set`](Self::set). Succeeds trivially without a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded or the store rejects
    /// the write.
    pub fn try_set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let Some(backend) = self.backend() else {
            return Ok(());
        };

        let encoded = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_owned(),
            source,
        })?;

        backend
            .set_item(&self.namespaced(key), &encoded)
            .map_err(|source| StorageError::Backend {
                key: key.to_owned(),
                source,
            })
    }

    /// Read and decode the value stored under `key`.
    ///
    /// Returns `None` when the key is absent, there is no store, or the stored
    /// text does not decode (logged).
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(key, error = %e, "Failed to read from storage");
                None
            }
        }
    }

    /// [`get`](Self::get) with an explicit fallback.
    #[must_use]
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Fallible read primitive. `Ok(None)` without a store or when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the stored text is
    /// not valid JSON for `T`.
    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(backend) = self.backend() else {
            return Ok(None);
        };

        let raw = backend
            .get_item(&self.namespaced(key))
            .map_err(|source| StorageError::Backend {
                key: key.to_owned(),
                source,
            })?;

        raw.map(|text| {
            serde_json::from_str(&text).map_err(|source| StorageError::Deserialize {
                key: key.to_owned(),
                source,
            })
        })
        .transpose()
    }

    /// Delete the value under `key`, if any.
    pub fn remove(&self, key: &str) {
        let Some(backend) = self.backend() else {
            return;
        };

        if let Err(e) = backend.remove_item(&self.namespaced(key)) {
            tracing::error!(key, error = %e, "Failed to remove from storage");
        }
    }

    /// Whether a value exists under `key`. `false` without a store.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        let Some(backend) = self.backend() else {
            return false;
        };

        match backend.get_item(&self.namespaced(key)) {
            Ok(value) => value.is_some(),
            Err(e) => {
                tracing::error!(key, error = %e, "Failed to check storage");
                false
            }
        }
    }

    /// Delete every key carrying this adapter's prefix.
    ///
    /// Keys outside the namespace are left untouched.
    pub fn clear_all(&self) {
        let Some(backend) = self.backend() else {
            return;
        };

        let keys = match backend.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list storage keys");
                return;
            }
        };

        let ours: Vec<String> = keys
            .into_iter()
            .filter(|k| k.starts_with(&*self.prefix))
            .collect();

        for key in &ours {
            if let Err(e) = backend.remove_item(key) {
                tracing::error!(key = %key, error = %e, "Failed to clear storage key");
            }
        }

        tracing::info!(removed = ours.len(), "Cleared namespaced storage");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// A store that reports itself unavailable.
    #[derive(Debug, Default)]
    struct UnavailableBackend(MemoryBackend);

    impl KeyValueBackend for UnavailableBackend {
        fn is_available(&self) -> bool {
            false
        }
        fn get_item(&self, key: &str) -> Result<Option<String>, BackendError> {
            self.0.get_item(key)
        }
        fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError> {
            self.0.set_item(key, value)
        }
        fn remove_item(&self, key: &str) -> Result<(), BackendError> {
            self.0.remove_item(key)
        }
        fn keys(&self) -> Result<Vec<String>, BackendError> {
            self.0.keys()
        }
    }

    fn memory() -> (Arc<MemoryBackend>, StorageService) {
        let backend = Arc::new(MemoryBackend::new());
        let storage = StorageService::new(Some(backend.clone()));
        (backend, storage)
    }

    #[test]
    fn test_set_uses_prefix_and_json() {
        let (backend, storage) = memory();
        storage.set("theme", &"dark");

        assert_eq!(
            backend.get_item("portfolio_theme").unwrap().as_deref(),
            Some("\"dark\"")
        );
        assert!(backend.get_item("theme").unwrap().is_none());
    }

    #[test]
    fn test_get_roundtrip_and_default() {
        let (_, storage) = memory();
        storage.set("numbers", &vec![1, 2, 3]);

        assert_eq!(storage.get::<Vec<i32>>("numbers"), Some(vec![1, 2, 3]));
        assert_eq!(storage.get::<Vec<i32>>("missing"), None);
        assert_eq!(storage.get_or("missing", 7), 7);
    }

    #[test]
    fn test_undecodable_value_yields_default() {
        let backend = Arc::new(MemoryBackend::with_entries([("portfolio_count", "not json")]));
        let storage = StorageService::new(Some(backend));

        assert_eq!(storage.get_or("count", 0_u32), 0);
        assert!(matches!(
            storage.try_get::<u32>("count"),
            Err(StorageError::Deserialize { .. })
        ));
    }

    #[test]
    fn test_has_and_remove() {
        let (_, storage) = memory();
        assert!(!storage.has("flag"));

        storage.set("flag", &true);
        assert!(storage.has("flag"));

        storage.remove("flag");
        storage.remove("flag");
        assert!(!storage.has("flag"));
    }

    #[test]
    fn test_clear_all_only_touches_namespace() {
        let backend = Arc::new(MemoryBackend::with_entries([
            ("unrelated", "1"),
            ("portfolioish", "2"),
        ]));
        let storage = StorageService::new(Some(backend.clone()));
        storage.set("theme", &"light");
        storage.set("contact_messages", &Vec::<String>::new());

        storage.clear_all();

        let mut keys = backend.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["portfolioish".to_string(), "unrelated".to_string()]);
    }

    #[test]
    fn test_headless_is_a_no_op() {
        let storage = StorageService::headless();
        assert!(!storage.is_available());

        storage.set("theme", &"dark");
        assert_eq!(storage.get::<String>("theme"), None);
        assert!(!storage.has("theme"));
        assert!(storage.try_set("theme", &"dark").is_ok());
        storage.remove("theme");
        storage.clear_all();
    }

    #[test]
    fn test_unavailable_backend_is_never_touched() {
        let backend = Arc::new(UnavailableBackend::default());
        let storage = StorageService::new(Some(backend.clone()));

        storage.set("theme", &"dark");
        assert!(!storage.is_available());
        assert!(backend.0.keys().unwrap().is_empty());
    }

    #[test]
    fn test_check() {
        assert!(StorageService::headless().check().is_ok());
        assert!(memory().1.check().is_ok());

        let unavailable = StorageService::new(Some(Arc::new(UnavailableBackend::default())));
        assert!(matches!(unavailable.check(), Err(BackendError::Unavailable)));
    }

    #[test]
    fn test_custom_prefix() {
        let backend = Arc::new(MemoryBackend::new());
        let storage = StorageService::with_prefix(Some(backend.clone()), "test_");
        storage.set("k", &1);

        assert_eq!(storage.prefix(), "test_");
        assert!(backend.get_item("test_k").unwrap().is_some());
    }
}
