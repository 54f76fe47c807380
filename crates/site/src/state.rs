//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::display::DisplayRoot;
use crate::environment::Environment;
use crate::services::{ContactService, SimulatedTransport, ThemeService};
use crate::storage::{BackendError, StorageService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It is the composition root:
/// exactly one theme service and one contact service exist per state, and
/// every handler goes through them rather than the store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    display: DisplayRoot,
    storage: StorageService,
    theme: ThemeService,
    contact: ContactService,
}

impl AppState {
    /// Open the configured store and build the services.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured store cannot be opened.
    pub fn new(config: SiteConfig) -> Result<Self, BackendError> {
        let env = config.environment()?;
        Ok(Self::from_environment(config, env))
    }

    /// Build the services over an explicit environment.
    ///
    /// A display root is always attached, since every page renders its
    /// classes.
    #[must_use]
    pub fn from_environment(config: SiteConfig, env: Environment) -> Self {
        let display = env.display().cloned().unwrap_or_default();
        let env = env.with_display(display.clone());
        let storage = env.storage();

        let theme = ThemeService::new(storage.clone(), &env);
        let contact = ContactService::new(
            storage.clone(),
            SimulatedTransport::new(config.submit_delay),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                display,
                storage,
                theme,
                contact,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn display(&self) -> &DisplayRoot {
        &self.inner.display
    }

    #[must_use]
    pub fn theme(&self) -> &ThemeService {
        &self.inner.theme
    }

    #[must_use]
    pub fn contact(&self) -> &ContactService {
        &self.inner.contact
    }

    /// Classes for the `<html>` element of every page.
    #[must_use]
    pub fn html_class(&self) -> String {
        self.inner.display.class_attr()
    }

    /// Check that the configured store can be used right now. Always ok
    /// when storage is disabled on purpose.
    ///
    /// # Errors
    ///
    /// Returns the store failure.
    pub fn storage_ready(&self) -> Result<(), BackendError> {
        self.inner.storage.check()
    }
}
