//! CLI commands over the site's file store.
//!
//! Every command opens the same services the site builds, over a headless
//! environment: a file store, no display root, no ambient theme signal.

pub mod messages;
pub mod preferences;
pub mod storage;
pub mod theme;

use std::path::Path;
use std::sync::Arc;

use portfolio_site::environment::Environment;
use portfolio_site::services::{ContactService, SimulatedTransport, ThemeService};
use portfolio_site::storage::{BackendError, FileBackend, StorageService};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The store file could not be opened.
    #[error("Store error: {0}")]
    Store(#[from] BackendError),

    /// Output could not be encoded.
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The site services, opened over a file store.
pub struct Services {
    pub storage: StorageService,
    pub theme: ThemeService,
    pub contact: ContactService,
}

impl Services {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// Opening initializes the theme exactly as the site does, so a fresh
    /// store gains a `portfolio_theme` entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is not a valid store.
    pub fn open(path: &Path) -> Result<Self, CliError> {
        let backend = FileBackend::open(path)?;
        tracing::debug!(path = %backend.path().display(), "Opened store");

        let env = Environment::headless().with_store(Arc::new(backend));
        let storage = env.storage();

        Ok(Self {
            theme: ThemeService::new(storage.clone(), &env),
            contact: ContactService::new(storage.clone(), SimulatedTransport::default()),
            storage,
        })
    }
}
