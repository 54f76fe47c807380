//! Preference bundle commands.

use portfolio_core::{FontSize, Theme, UserPreferences};

use super::{CliError, Services};

/// Fields to change on save. `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct PreferenceChanges {
    pub theme: Option<Theme>,
    pub language: Option<String>,
    pub font_size: Option<FontSize>,
    pub notifications: Option<bool>,
}

impl PreferenceChanges {
    fn apply(self, mut preferences: UserPreferences) -> UserPreferences {
        if let Some(theme) = self.theme {
            preferences.theme = theme;
        }
        if let Some(language) = self.language {
            preferences.language = language;
        }
        if let Some(font_size) = self.font_size {
            preferences.font_size = font_size;
        }
        if let Some(notifications) = self.notifications {
            preferences.notifications = notifications;
        }
        preferences
    }
}

/// The stored bundle (or the default bundle) as pretty JSON.
///
/// # Errors
///
/// Returns an error if the bundle cannot be encoded.
pub fn show(services: &Services) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(&services.theme.load_preferences())?)
}

/// Save the current bundle with `changes` applied and print the result.
///
/// The whole bundle is written; the bundle's theme becomes current.
///
/// # Errors
///
/// Returns an error if the saved bundle cannot be encoded for output.
pub fn save(services: &Services, changes: PreferenceChanges) -> Result<String, CliError> {
    let preferences = changes.apply(services.theme.load_preferences());
    services.theme.save_preferences(&preferences);
    show(services)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::test_support::services;

    #[test]
    fn test_show_defaults() {
        let (_dir, services) = services();
        let shown: UserPreferences = serde_json::from_str(&show(&services).unwrap()).unwrap();
        assert_eq!(shown, UserPreferences::default());
    }

    #[test]
    fn test_partial_save_keeps_other_fields() {
        let (_dir, services) = services();

        save(
            &services,
            PreferenceChanges {
                theme: Some(Theme::Dark),
                font_size: Some(FontSize::Large),
                ..PreferenceChanges::default()
            },
        )
        .unwrap();

        let saved = services.theme.load_preferences();
        assert_eq!(saved.theme, Theme::Dark);
        assert_eq!(saved.font_size, FontSize::Large);
        assert_eq!(saved.language, "es");
        assert!(saved.notifications);
        assert_eq!(services.theme.current(), Theme::Dark);
    }
}
