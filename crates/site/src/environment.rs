//! Description of what the runtime environment provides.
//!
//! The services never probe for capabilities themselves. They are handed an
//! [`Environment`] and take the no-op path for anything it lacks: no store
//! means nothing is persisted, no display root means no classes are applied,
//! no ambient signal means the theme defaults to light.

use std::sync::Arc;

use crate::display::DisplayRoot;
use crate::storage::{KeyValueBackend, StorageService};

/// Injected environment descriptor.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    store: Option<Arc<dyn KeyValueBackend>>,
    prefers_dark: Option<bool>,
    display: Option<DisplayRoot>,
}

impl Environment {
    /// An environment with no store, no display root and no ambient signal.
    #[must_use]
    pub fn headless() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn KeyValueBackend>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn with_display(mut self, display: DisplayRoot) -> Self {
        self.display = Some(display);
        self
    }

    /// Set the ambient "prefers dark" signal.
    #[must_use]
    pub const fn with_prefers_dark(mut self, prefers_dark: bool) -> Self {
        self.prefers_dark = Some(prefers_dark);
        self
    }

    /// Storage adapter over this environment's store (or none).
    #[must_use]
    pub fn storage(&self) -> StorageService {
        StorageService::new(self.store.clone())
    }

    #[must_use]
    pub const fn prefers_dark(&self) -> Option<bool> {
        self.prefers_dark
    }

    #[must_use]
    pub const fn display(&self) -> Option<&DisplayRoot> {
        self.display.as_ref()
    }
}
