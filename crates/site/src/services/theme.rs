//! Theme and preference management.
//!
//! [`ThemeService`] owns the current theme. Every mutation, including the
//! initial value, is pushed synchronously to the registered observers. The
//! first observer is installed at construction and persists the theme to
//! storage and applies the matching class to the display root, so callers
//! never have to save or render explicitly.

use std::fmt;
use std::sync::{Mutex, PoisonError, RwLock};

use portfolio_core::{Theme, UserPreferences};
use tokio::sync::watch;
use tracing::instrument;

use crate::display::DisplayRoot;
use crate::environment::Environment;
use crate::storage::StorageService;

/// Storage key of the current theme.
pub const THEME_KEY: &str = "theme";

/// Storage key of the preference bundle.
pub const PREFERENCES_KEY: &str = "preferences";

/// Callback run after every theme mutation.
///
/// Observers run while the mutation lock is held and must not mutate the
/// theme themselves.
pub type ThemeObserver = Box<dyn Fn(Theme) + Send + Sync>;

/// Owner of the current theme and the preference bundle.
pub struct ThemeService {
    storage: StorageService,
    current: watch::Sender<Theme>,
    observers: RwLock<Vec<ThemeObserver>>,
    mutation: Mutex<()>,
}

impl fmt::Debug for ThemeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeService")
            .field("current", &*self.current.borrow())
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl ThemeService {
    /// Initialize the theme and run the first persistence pass.
    ///
    /// The initial theme is the stored one if present, else the
    /// environment's prefers-dark signal, else light. A stored value that
    /// cannot be read falls back to light.
    #[must_use]
    pub fn new(storage: StorageService, env: &Environment) -> Self {
        let initial = initial_theme(&storage, env.prefers_dark());
        let (current, _) = watch::channel(initial);

        let service = Self {
            observers: RwLock::new(vec![persist_and_apply(
                storage.clone(),
                env.display().cloned(),
            )]),
            storage,
            current,
            mutation: Mutex::new(()),
        };

        service.notify(initial);
        tracing::info!(theme = %initial, "Theme initialized");
        service
    }

    /// The current theme.
    #[must_use]
    pub fn current(&self) -> Theme {
        *self.current.borrow()
    }

    /// Receiver that observes every subsequent theme value.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Theme> {
        self.current.subscribe()
    }

    /// Register an additional synchronous observer.
    pub fn subscribe(&self, observer: impl Fn(Theme) + Send + Sync + 'static) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(observer));
    }

    /// Set an explicit theme.
    #[instrument(skip(self))]
    pub fn set(&self, theme: Theme) {
        let _guard = self.lock_mutation();
        self.replace(theme);
    }

    /// Flip between light and dark, returning the new theme.
    #[instrument(skip(self))]
    pub fn toggle(&self) -> Theme {
        let _guard = self.lock_mutation();
        let next = self.current().toggled();
        self.replace(next);
        next
    }

    /// Load the preference bundle, falling back to the default bundle when
    /// nothing is stored or the stored value cannot be read.
    #[must_use]
    pub fn load_preferences(&self) -> UserPreferences {
        match self.storage.try_get::<UserPreferences>(PREFERENCES_KEY) {
            Ok(Some(preferences)) => preferences,
            Ok(None) => UserPreferences::default(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load user preferences");
                UserPreferences::default()
            }
        }
    }

    /// Replace the preference bundle and adopt its theme.
    #[instrument(skip(self, preferences), fields(theme = %preferences.theme))]
    pub fn save_preferences(&self, preferences: &UserPreferences) {
        self.storage.set(PREFERENCES_KEY, preferences);
        self.set(preferences.theme);
    }

    fn lock_mutation(&self) -> std::sync::MutexGuard<'_, ()> {
        self.mutation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(&self, theme: Theme) {
        self.current.send_replace(theme);
        self.notify(theme);
        tracing::debug!(theme = %theme, "Theme changed");
    }

    fn notify(&self, theme: Theme) {
        let observers = self.observers.read().unwrap_or_else(PoisonError::into_inner);
        for observer in observers.iter() {
            observer(theme);
        }
    }
}

/// Resolve the starting theme.
fn initial_theme(storage: &StorageService, prefers_dark: Option<bool>) -> Theme {
    match storage.try_get::<Theme>(THEME_KEY) {
        Ok(Some(theme)) => theme,
        Ok(None) => prefers_dark.map_or(Theme::Light, Theme::from_prefers_dark),
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize theme, falling back to light");
            Theme::Light
        }
    }
}

/// The built-in observer: save the theme and reflect it on the display root.
fn persist_and_apply(storage: StorageService, display: Option<DisplayRoot>) -> ThemeObserver {
    Box::new(move |theme| {
        storage.set(THEME_KEY, &theme);
        if let Some(display) = &display {
            display.apply_theme(theme);
        }
    })
}
