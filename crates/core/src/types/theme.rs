//! Visual display theme.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a [`Theme`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid theme: {0} (expected `light` or `dark`)")]
pub struct ThemeParseError(pub String);

/// Visual display mode of the site.
///
/// Serialized as `"light"` / `"dark"`, which is also the format persisted in
/// the key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// CSS class applied to the display root while this theme is active.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Light => "light-mode",
            Self::Dark => "dark-mode",
        }
    }

    /// The opposite theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Theme matching an ambient "prefers dark" signal.
    #[must_use]
    pub const fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ThemeParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn test_css_class() {
        assert_eq!(Theme::Light.css_class(), "light-mode");
        assert_eq!(Theme::Dark.css_class(), "dark-mode");
    }

    #[test]
    fn test_serde_format() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let theme: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(theme, Theme::Light);
        assert!(serde_json::from_str::<Theme>("\"sepia\"").is_err());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" light ".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!(
            "blue".parse::<Theme>(),
            Err(ThemeParseError("blue".to_string()))
        );
    }

    #[test]
    fn test_from_prefers_dark() {
        assert_eq!(Theme::from_prefers_dark(true), Theme::Dark);
        assert_eq!(Theme::from_prefers_dark(false), Theme::Light);
    }
}
